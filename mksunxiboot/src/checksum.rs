//! Additive checksum checked by the boot ROM
//!
//! The sum runs over every little-endian 32-bit word of the first `length`
//! bytes of the image, header included, with wrapping addition. The checksum
//! field itself takes part in the sum holding the profile stamp.

use crate::boot_header::{CHECK_SUM_OFFSET, LENGTH_OFFSET};
use crate::error::{Result, SunxiBootError};
use byteorder::{ByteOrder, LittleEndian};
use log::debug;

/// Compute the checksum of `image` and store it in the header.
///
/// `length` is taken from the header and must be a multiple of 4.
pub fn gen_check_sum(image: &mut [u8], stamp: u32) -> Result<u32> {
    let length = checked_length(image)?;

    LittleEndian::write_u32(&mut image[CHECK_SUM_OFFSET..CHECK_SUM_OFFSET + 4], stamp);
    let sum = sum_words(&image[..length]);
    LittleEndian::write_u32(&mut image[CHECK_SUM_OFFSET..CHECK_SUM_OFFSET + 4], sum);

    debug!("check_sum over 0x{length:x} bytes: 0x{sum:08x}");
    Ok(sum)
}

/// Recompute the checksum of `image` without touching it.
pub fn compute_check_sum(image: &[u8], stamp: u32) -> Result<u32> {
    let length = checked_length(image)?;

    Ok(image[..length]
        .chunks_exact(4)
        .enumerate()
        .map(|(i, word)| {
            if i * 4 == CHECK_SUM_OFFSET {
                stamp
            } else {
                LittleEndian::read_u32(word)
            }
        })
        .fold(0u32, u32::wrapping_add))
}

/// Check the stored checksum of `image` against a recomputation.
pub fn verify_check_sum(image: &[u8], stamp: u32) -> Result<()> {
    let calculated = compute_check_sum(image, stamp)?;
    let stored = LittleEndian::read_u32(&image[CHECK_SUM_OFFSET..CHECK_SUM_OFFSET + 4]);
    if stored != calculated {
        return Err(SunxiBootError::checksum_mismatch(stored, calculated));
    }
    Ok(())
}

fn checked_length(image: &[u8]) -> Result<usize> {
    if image.len() < LENGTH_OFFSET + 4 {
        return Err(SunxiBootError::too_short(image.len(), LENGTH_OFFSET + 4));
    }

    let length = LittleEndian::read_u32(&image[LENGTH_OFFSET..LENGTH_OFFSET + 4]);
    if length & 0x3 != 0 {
        return Err(SunxiBootError::UnalignedLength { length });
    }

    let need = (length as usize).max(LENGTH_OFFSET + 4);
    if image.len() < need {
        return Err(SunxiBootError::too_short(image.len(), need));
    }

    Ok(length as usize)
}

fn sum_words(data: &[u8]) -> u32 {
    data.chunks_exact(4)
        .map(LittleEndian::read_u32)
        .fold(0u32, u32::wrapping_add)
}
