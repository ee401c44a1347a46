//! # Error types

use std::fmt;
use thiserror::Error;

/// Errors produced by the flow engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Buffer sizes and declared dimensions do not agree.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(Mismatch),
}

/// Which dimension check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    /// Previous and current buffers have different lengths.
    BufferLengths { previous: usize, current: usize },
    /// `width * height * 4` does not match the buffer length.
    ///
    /// `expected` is `None` if the product overflows.
    FrameSize {
        width: usize,
        height: usize,
        expected: Option<usize>,
        actual: usize,
    },
    /// Grid spacing of zero.
    GridSize,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::BufferLengths { previous, current } => write!(
                f,
                "previous buffer is {previous} bytes, current buffer is {current} bytes"
            ),
            Self::FrameSize {
                width,
                height,
                expected: Some(expected),
                actual,
            } => write!(
                f,
                "{width}x{height} frame needs {expected} bytes, got {actual}"
            ),
            Self::FrameSize {
                width,
                height,
                expected: None,
                ..
            } => write!(f, "{width}x{height} frame size overflows"),
            Self::GridSize => write!(f, "grid size must be positive"),
        }
    }
}

/// Result alias for the flow engine.
pub type Result<T, E = FlowError> = std::result::Result<T, E>;
