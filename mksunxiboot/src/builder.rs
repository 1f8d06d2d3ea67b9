//! Image builder for creating boot ROM images

use crate::align_up;
use crate::boot_header::{BOOT_HEADER_SIZE, BootHeader};
use crate::checksum::{gen_check_sum, verify_check_sum};
use crate::error::{Result, SunxiBootError};
use crate::profile::BootProfile;
use log::{debug, warn};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Payload bytes are loaded in units of the target's native word.
const WORD_SIZE: u32 = size_of::<u32>() as u32;

/// Number of payload bytes to load for an input of `file_size` bytes.
///
/// Inputs larger than the profile's SRAM budget are truncated to it, smaller
/// inputs are rounded up to a whole word.
pub fn load_size(profile: &BootProfile, file_size: u64) -> u32 {
    let max = profile.max_load_size();
    if file_size > max as u64 {
        max
    } else {
        align_up(file_size as u32, WORD_SIZE)
    }
}

/// Total image length for `load_size` payload bytes.
pub fn image_length(profile: &BootProfile, load_size: u32) -> u32 {
    align_up(load_size + BOOT_HEADER_SIZE as u32, profile.block_size)
}

/// Sizes observed while loading a payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Size of the input as found
    pub file_size: u64,
    /// Bytes of payload placed in the image
    pub load_size: u32,
    /// Bytes actually read from the input
    pub read: usize,
}

impl LoadStats {
    pub fn truncated(&self) -> bool {
        self.file_size > self.load_size as u64
    }
}

/// Builder for boot ROM images
///
/// The payload is clamped and word aligned when it is set; [`build`] then
/// fills in the header and the checksum.
///
/// [`build`]: BootImageBuilder::build
#[derive(Debug, Clone)]
pub struct BootImageBuilder<'a> {
    profile: &'a BootProfile,
    payload: Vec<u8>,
    stats: LoadStats,
}

impl<'a> BootImageBuilder<'a> {
    /// Create a builder with an empty payload
    pub fn new(profile: &'a BootProfile) -> Self {
        Self {
            profile,
            payload: Vec::new(),
            stats: LoadStats::default(),
        }
    }

    /// Set the payload from memory.
    pub fn payload(mut self, data: &[u8]) -> Self {
        let load = load_size(self.profile, data.len() as u64);
        let read = data.len().min(load as usize);
        self.set_payload(data.len() as u64, load, data[..read].to_vec());
        self
    }

    /// Load the payload from a seekable reader, starting at its beginning.
    pub fn payload_from_reader<R: Read + Seek>(mut self, reader: &mut R) -> Result<Self> {
        let file_size = reader.seek(SeekFrom::End(0))?;
        let load = load_size(self.profile, file_size);

        reader.seek(SeekFrom::Start(0))?;
        let mut data = Vec::with_capacity(load as usize);
        reader.by_ref().take(load as u64).read_to_end(&mut data)?;

        self.set_payload(file_size, load, data);
        Ok(self)
    }

    /// Load the payload from a file.
    pub fn payload_from_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|source| SunxiBootError::OpenInput {
            path: path.to_path_buf(),
            source,
        })?;
        self.payload_from_reader(&mut file)
    }

    fn set_payload(&mut self, file_size: u64, load: u32, mut data: Vec<u8>) {
        let read = data.len();

        if file_size > load as u64 {
            warn!(
                "payload truncated from 0x{file_size:x} to 0x{load:x} bytes, the {} SRAM budget",
                self.profile.magic_str()
            );
        }
        if read < load as usize {
            debug!("zero filling 0x{:x} bytes of payload", load as usize - read);
        }

        data.resize(load as usize, 0);
        self.payload = data;
        self.stats = LoadStats {
            file_size,
            load_size: load,
            read,
        };
    }

    /// Sizes recorded when the payload was set
    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// Get the target profile
    pub fn profile(&self) -> &BootProfile {
        self.profile
    }

    /// Assemble the image: header, payload, block padding, and checksum.
    pub fn build(&self) -> Result<BootImage> {
        self.profile.validate()?;

        let length = image_length(self.profile, self.stats.load_size);
        let mut data = vec![0u8; length as usize];

        let mut header = BootHeader::new(self.profile, length);
        header.write_to(&mut &mut data[..BOOT_HEADER_SIZE])?;
        data[BOOT_HEADER_SIZE..BOOT_HEADER_SIZE + self.payload.len()]
            .copy_from_slice(&self.payload);

        header.check_sum = gen_check_sum(&mut data, self.profile.stamp)?;
        debug!(
            "built {} image: length 0x{length:x}, check_sum 0x{:08x}",
            self.profile.magic_str(),
            header.check_sum
        );

        Ok(BootImage { header, data })
    }

    /// Build the image and write it to a writer, returning the bytes written
    pub fn build_to_writer<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let image = self.build()?;
        image.write_to(writer)?;
        Ok(image.len())
    }
}

/// A finished boot image, exactly `header.length` bytes long
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootImage {
    header: BootHeader,
    data: Vec<u8>,
}

impl BootImage {
    /// Parse an existing image. Bytes past `length` are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = BootHeader::from_bytes(bytes)?;
        let length = (header.length as usize).max(BOOT_HEADER_SIZE);
        if bytes.len() < length {
            return Err(SunxiBootError::too_short(bytes.len(), length));
        }

        Ok(Self {
            header,
            data: bytes[..length].to_vec(),
        })
    }

    /// Get the image header
    pub fn header(&self) -> &BootHeader {
        &self.header
    }

    /// The whole image, header included
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Everything after the header, block padding included.
    pub fn payload(&self) -> &[u8] {
        &self.data[BOOT_HEADER_SIZE..]
    }

    /// Image length in bytes, equal to `header().length`
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the image holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Take the image bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Write exactly `len()` bytes to a writer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()?;
        Ok(())
    }

    /// Check magic, block alignment and checksum against `profile`.
    pub fn verify(&self, profile: &BootProfile) -> Result<()> {
        profile.validate()?;
        self.header.validate(profile)?;
        verify_check_sum(&self.data, profile.stamp)
    }
}
