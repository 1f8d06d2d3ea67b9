//! Boot format parameters

use crate::boot_header::BOOT_HEADER_SIZE;
use crate::error::{Result, SunxiBootError};

/// Fixed parameters of one eGON boot image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootProfile {
    /// Identifying stamp at offset 4, not NUL terminated
    pub magic: [u8; 8],
    /// Placeholder written into the checksum field while summing
    pub stamp: u32,
    /// Output alignment, the storage sector size
    pub block_size: u32,
    /// SRAM the boot ROM loads the image into, header included
    pub sram_size: u32,
}

impl BootProfile {
    /// First-stage loader for sun4i (A10) and its siblings.
    pub const SUN4I_BOOT0: BootProfile = BootProfile {
        magic: *b"eGON.BT0",
        stamp: 0x5F0A_6C39,
        block_size: 512,
        sram_size: 24 * 1024,
    };

    /// Largest payload that fits in SRAM behind the header.
    pub const fn max_load_size(&self) -> u32 {
        self.sram_size.saturating_sub(BOOT_HEADER_SIZE as u32)
    }

    /// Reject parameters no image can be built from.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(SunxiBootError::invalid_profile("block size is zero"));
        }

        if (self.sram_size as usize) < BOOT_HEADER_SIZE {
            return Err(SunxiBootError::invalid_profile(format!(
                "SRAM size {} is smaller than the {BOOT_HEADER_SIZE} byte header",
                self.sram_size
            )));
        }

        Ok(())
    }

    /// Magic as printable text, for diagnostics.
    pub fn magic_str(&self) -> String {
        String::from_utf8_lossy(&self.magic).into_owned()
    }
}

impl Default for BootProfile {
    fn default() -> Self {
        Self::SUN4I_BOOT0
    }
}
