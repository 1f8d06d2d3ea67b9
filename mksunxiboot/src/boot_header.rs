//! eGON boot file header structures and serialization

use crate::error::{Result, SunxiBootError};
use crate::profile::BootProfile;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Size of the simplified boot file header
pub const BOOT_HEADER_SIZE: usize = 32;

/// Byte offset of `check_sum` inside the header
pub const CHECK_SUM_OFFSET: usize = 12;

/// Byte offset of `length` inside the header
pub const LENGTH_OFFSET: usize = 16;

/// ARM `b` with condition AL
const ARM_BRANCH_OPCODE: u32 = 0xEA00_0000;
const ARM_BRANCH_OFFSET_MASK: u32 = 0x00FF_FFFF;

/// Reserved bytes bringing the header to 32 bytes
const PAD_LEN: usize = 12;

/// Simplified boot file header, the part the boot ROM actually reads.
///
/// Layout on disk (little-endian):
///
/// | Offset | Size | Field |
/// |---|---|---|
/// | 0 | 4 | `jump_instruction` |
/// | 4 | 8 | `magic` |
/// | 12 | 4 | `check_sum` |
/// | 16 | 4 | `length` |
/// | 20 | 12 | zero pad |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootHeader {
    /// Branch over the header to the first payload instruction
    pub jump_instruction: u32,
    /// Image type stamp
    pub magic: [u8; 8],
    /// Additive checksum over the first `length` bytes
    pub check_sum: u32,
    /// Total image length, block aligned
    pub length: u32,
}

impl BootHeader {
    /// Header for `profile` with the checksum set to the stamp.
    pub fn new(profile: &BootProfile, length: u32) -> Self {
        Self {
            jump_instruction: branch_instruction(BOOT_HEADER_SIZE),
            magic: profile.magic,
            check_sum: profile.stamp,
            length,
        }
    }

    /// Word offset encoded in the branch, relative to pc + 8.
    pub fn jump_offset(&self) -> u32 {
        self.jump_instruction & ARM_BRANCH_OFFSET_MASK
    }

    /// Whether `jump_instruction` is an unconditional ARM branch
    pub fn is_branch(&self) -> bool {
        self.jump_instruction & !ARM_BRANCH_OFFSET_MASK == ARM_BRANCH_OPCODE
    }

    /// Magic as printable text
    pub fn magic_str(&self) -> String {
        String::from_utf8_lossy(&self.magic).into_owned()
    }

    /// Check the header against `profile`.
    pub fn validate(&self, profile: &BootProfile) -> Result<()> {
        if self.magic != profile.magic {
            return Err(SunxiBootError::invalid_magic(&profile.magic, &self.magic));
        }

        if self.length % profile.block_size != 0 {
            return Err(SunxiBootError::UnalignedBlock {
                length: self.length,
                block_size: profile.block_size,
            });
        }

        if (self.length as usize) < BOOT_HEADER_SIZE {
            return Err(SunxiBootError::too_short(
                self.length as usize,
                BOOT_HEADER_SIZE,
            ));
        }

        Ok(())
    }

    /// Serialize the header to its 32 bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(BOOT_HEADER_SIZE);
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Write the header to a writer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LittleEndian>(self.jump_instruction)?;
        writer.write_all(&self.magic)?;
        writer.write_u32::<LittleEndian>(self.check_sum)?;
        writer.write_u32::<LittleEndian>(self.length)?;
        writer.write_all(&[0u8; PAD_LEN])?;
        Ok(())
    }

    /// Parse a header from the start of `data`.
    ///
    /// Only the layout is checked here; use [`BootHeader::validate`] to check
    /// the contents against a profile.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < BOOT_HEADER_SIZE {
            return Err(SunxiBootError::too_short(data.len(), BOOT_HEADER_SIZE));
        }
        Self::read_from(&mut std::io::Cursor::new(data))
    }

    /// Read the header from a reader
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let jump_instruction = reader.read_u32::<LittleEndian>()?;
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;
        let check_sum = reader.read_u32::<LittleEndian>()?;
        let length = reader.read_u32::<LittleEndian>()?;
        let mut pad = [0u8; PAD_LEN];
        reader.read_exact(&mut pad)?;

        Ok(Self {
            jump_instruction,
            magic,
            check_sum,
            length,
        })
    }

    /// Get a summary of the header information
    pub fn summary(&self) -> String {
        format!(
            "Magic: {}\n\
             Jump: 0x{:08x} (b +{} words)\n\
             Length: 0x{:x} ({} bytes)\n\
             Checksum: 0x{:08x}",
            self.magic_str(),
            self.jump_instruction,
            self.jump_offset(),
            self.length,
            self.length,
            self.check_sum,
        )
    }
}

/// Encode the branch that skips a header of `header_size` bytes.
pub const fn branch_instruction(header_size: usize) -> u32 {
    ARM_BRANCH_OPCODE | ((header_size as u32 / 4 - 2) & ARM_BRANCH_OFFSET_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_instruction() {
        assert_eq!(branch_instruction(BOOT_HEADER_SIZE), 0xEA00_0006);
    }

    #[test]
    fn test_header_new() {
        let header = BootHeader::new(&BootProfile::SUN4I_BOOT0, 512);
        assert!(header.is_branch());
        assert_eq!(header.jump_offset(), 6);
        assert_eq!(&header.magic, b"eGON.BT0");
        assert_eq!(header.check_sum, BootProfile::SUN4I_BOOT0.stamp);
        assert_eq!(header.length, 512);
        assert!(header.validate(&BootProfile::SUN4I_BOOT0).is_ok());
    }

    #[test]
    fn test_header_layout() {
        let mut header = BootHeader::new(&BootProfile::SUN4I_BOOT0, 0x200);
        header.check_sum = 0x1122_3344;

        let bytes = header.to_bytes().unwrap();
        assert_eq!(bytes.len(), BOOT_HEADER_SIZE);
        assert_eq!(&bytes[0..4], &[0x06, 0x00, 0x00, 0xEA]);
        assert_eq!(&bytes[4..12], b"eGON.BT0");
        assert_eq!(&bytes[CHECK_SUM_OFFSET..CHECK_SUM_OFFSET + 4], &[0x44, 0x33, 0x22, 0x11]);
        assert_eq!(&bytes[LENGTH_OFFSET..LENGTH_OFFSET + 4], &[0x00, 0x02, 0x00, 0x00]);
        assert!(bytes[20..].iter().all(|&b| b == 0));

        let parsed = BootHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_header_too_short() {
        let err = BootHeader::from_bytes(&[0u8; 16]).unwrap_err();
        assert!(matches!(
            err,
            SunxiBootError::ImageTooShort { len: 16, need: 32 }
        ));
    }

    #[test]
    fn test_header_invalid_magic() {
        let mut header = BootHeader::new(&BootProfile::SUN4I_BOOT0, 512);
        header.magic = *b"eGON.BT1";
        assert!(matches!(
            header.validate(&BootProfile::SUN4I_BOOT0),
            Err(SunxiBootError::InvalidMagic { .. })
        ));
    }

    #[test]
    fn test_header_unaligned_length() {
        let header = BootHeader::new(&BootProfile::SUN4I_BOOT0, 516);
        assert!(matches!(
            header.validate(&BootProfile::SUN4I_BOOT0),
            Err(SunxiBootError::UnalignedBlock {
                length: 516,
                block_size: 512
            })
        ));
    }

    #[test]
    fn test_header_summary() {
        let header = BootHeader::new(&BootProfile::SUN4I_BOOT0, 512);
        let summary = header.summary();
        assert!(summary.contains("eGON.BT0"));
        assert!(summary.contains("b +6 words"));
        assert!(summary.contains("512 bytes"));
    }
}
