//! # mksunxiboot
//!
//! Build bootable images for the Allwinner sun4i boot ROM.
//!
//! The boot ROM loads the first-stage loader ("boot0") from storage into SRAM
//! and only runs it if it carries the 32 byte `eGON.BT0` header with a valid
//! additive checksum. This crate prepends that header and pads the result to
//! the storage block size.
//!
//! ## Example
//!
//! ```rust
//! use mksunxiboot::{BootImageBuilder, BootProfile};
//!
//! let boot0 = [0x01u8, 0x02, 0x03, 0x04];
//!
//! let image = BootImageBuilder::new(&BootProfile::SUN4I_BOOT0)
//!     .payload(&boot0)
//!     .build()?;
//!
//! assert_eq!(image.len(), 512);
//! image.verify(&BootProfile::SUN4I_BOOT0)?;
//! # Ok::<(), mksunxiboot::SunxiBootError>(())
//! ```

pub mod boot_header;
pub mod builder;
pub mod checksum;
pub mod cli;
pub mod error;
pub mod profile;

pub use boot_header::{BOOT_HEADER_SIZE, BootHeader};
pub use builder::{BootImage, BootImageBuilder, LoadStats, image_length, load_size};
pub use checksum::{compute_check_sum, gen_check_sum, verify_check_sum};
pub use error::{Result, SunxiBootError};
pub use profile::BootProfile;

/// Current version of the mksunxiboot implementation
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Round `value` up to the next multiple of `align`, which must be nonzero.
pub const fn align_up(value: u32, align: u32) -> u32 {
    value.next_multiple_of(align)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 4), 0);
        assert_eq!(align_up(1, 4), 4);
        assert_eq!(align_up(4, 4), 4);
        assert_eq!(align_up(33, 512), 512);
        assert_eq!(align_up(512, 512), 512);
        assert_eq!(align_up(513, 512), 1024);
        assert_eq!(align_up(36, 1000), 1000);
        assert_eq!(align_up(1001, 1000), 2000);
    }
}
