//! Error types for boot image generation

use std::path::PathBuf;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, SunxiBootError>;

/// Errors raised while building or checking a boot image
#[derive(thiserror::Error, Debug)]
pub enum SunxiBootError {
    #[error("Open input file {}", .path.display())]
    OpenInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Open output file {}", .path.display())]
    OpenOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image length 0x{length:x} is not 4-byte aligned")]
    UnalignedLength { length: u32 },

    #[error("Image length 0x{length:x} is not a multiple of the {block_size} byte block size")]
    UnalignedBlock { length: u32, block_size: u32 },

    #[error("Image data too short: {len} bytes (expected at least {need})")]
    ImageTooShort { len: usize, need: usize },

    #[error("Invalid magic: expected {expected:?}, found {found:?}")]
    InvalidMagic { expected: String, found: String },

    #[error("Invalid boot profile: {reason}")]
    InvalidProfile { reason: String },

    #[error("Checksum mismatch: stored 0x{expected:08x}, calculated 0x{calculated:08x}")]
    ChecksumMismatch { expected: u32, calculated: u32 },
}

impl SunxiBootError {
    pub fn invalid_magic(expected: &[u8], found: &[u8]) -> Self {
        Self::InvalidMagic {
            expected: String::from_utf8_lossy(expected).into_owned(),
            found: String::from_utf8_lossy(found).into_owned(),
        }
    }

    pub fn checksum_mismatch(expected: u32, calculated: u32) -> Self {
        Self::ChecksumMismatch {
            expected,
            calculated,
        }
    }

    pub fn invalid_profile(reason: impl Into<String>) -> Self {
        Self::InvalidProfile {
            reason: reason.into(),
        }
    }

    pub fn too_short(len: usize, need: usize) -> Self {
        Self::ImageTooShort { len, need }
    }
}
