//! # Raw RGBA frames

use crate::error::{FlowError, Mismatch, Result};
use bytemuck::{Pod, Zeroable};

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 4;

/// RGBA colour structure.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RGBA {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RGBA {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Rec. 601 luminance, in `0..=255` range.
    pub fn luma(&self) -> f32 {
        0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32
    }

    /// Sum of absolute per-channel differences, alpha included.
    pub fn abs_diff(&self, other: &Self) -> u32 {
        bytemuck::bytes_of(self)
            .iter()
            .zip(bytemuck::bytes_of(other))
            .map(|(&a, &b)| a.abs_diff(b) as u32)
            .sum()
    }
}

/// Verify that `buf` holds exactly `width * height` RGBA pixels.
pub fn check_frame(buf: &[u8], width: usize, height: usize) -> Result<()> {
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(CHANNELS));

    if expected == Some(buf.len()) {
        Ok(())
    } else {
        Err(FlowError::InvalidDimensions(Mismatch::FrameSize {
            width,
            height,
            expected,
            actual: buf.len(),
        }))
    }
}

/// View a validated byte buffer as pixels.
///
/// # Panics
///
/// If the length is not a multiple of [`CHANNELS`]. Run [`check_frame`] first.
pub fn pixels(buf: &[u8]) -> &[RGBA] {
    bytemuck::cast_slice(buf)
}

/// Owned copy of a single frame.
///
/// This is the "previous frame" slot the tracker keeps between ticks.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Frame {
    /// Copy a frame out of a capture buffer.
    pub fn copy_from(buf: &[u8], width: usize, height: usize) -> Result<Self> {
        check_frame(buf, width, height)?;
        Ok(Self {
            data: buf.to_vec(),
            width,
            height,
        })
    }

    /// Replace the whole frame with new contents, reusing the allocation.
    pub fn replace_with(&mut self, buf: &[u8], width: usize, height: usize) -> Result<()> {
        check_frame(buf, width, height)?;
        self.data.clear();
        self.data.extend_from_slice(buf);
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Get width and height of the frame.
    pub fn dim(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn pixels(&self) -> &[RGBA] {
        pixels(&self.data)
    }
}
