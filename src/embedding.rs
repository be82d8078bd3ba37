//! LSB pixel embedding: writing and reading a framed bitstream in the
//! least significant bits of an image's RGB channels.
//!
//! Pixels are walked in row-major order and channels in R, G, B order,
//! one payload bit per channel. The 7 high bits of every channel are
//! never touched, and pixels past the end of the payload pass through
//! unchanged, so capacity is `width * height * 3 / 8` bytes.

use image::RgbImage;
use log::debug;

use crate::bitstream::TERMINATOR;
use crate::error::{Result, StegoError};

/// How many payload bytes an image of this size can carry.
pub fn capacity_bytes(image: &RgbImage) -> usize {
    (image.width() as usize * image.height() as usize * 3) / 8
}

/// Write a bitstream into a copy of the image's channel LSBs.
///
/// The capacity check runs before any pixel is modified; on failure the
/// input image is untouched and no partial output exists.
pub fn embed(image: &RgbImage, bits: &[u8]) -> Result<RgbImage> {
    let needed = (bits.len() + 7) / 8;
    let available = capacity_bytes(image);
    if needed > available {
        return Err(StegoError::MessageTooLarge { needed, available });
    }
    debug!(
        "embedding {} bits into {}x{} image ({} of {} bytes)",
        bits.len(),
        image.width(),
        image.height(),
        needed,
        available
    );

    let mut output = image.clone();
    let mut remaining = bits.iter();
    'pixels: for pixel in output.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            match remaining.next() {
                Some(&bit) => *channel = *channel & 0xFE | bit,
                None => break 'pixels,
            }
        }
    }
    Ok(output)
}

/// Read channel LSBs until the frame terminator appears.
///
/// Accumulation stops the instant the tail of the bit sequence matches
/// the terminator, even mid-pixel. The returned stream still contains
/// the header and the terminator; `bitstream::unpack` consumes it.
pub fn extract(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bits = Vec::new();
    for pixel in image.pixels() {
        for &channel in pixel.0.iter() {
            bits.push(channel & 1);
            if bits.ends_with(&TERMINATOR) {
                return Ok(bits);
            }
        }
    }
    Err(StegoError::TerminatorNotFound)
}
