//! Error type shared by every mosaic-core operation.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Failure raised on the first violated precondition.
///
/// Composition is all-or-nothing: no partial output is ever returned
/// alongside an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MosaicError {
    /// A buffer or resize target has a zero dimension.
    #[error("invalid dimensions: {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    /// The block size does not fit inside the base image.
    #[error("block size {size} exceeds base dimensions {width}x{height}")]
    BlockTooLarge { size: u32, width: u32, height: u32 },

    /// The block size is zero.
    #[error("block size must be positive")]
    ZeroBlockSize,

    /// No candidate tiles were supplied.
    #[error("tile pool is empty")]
    EmptyTilePool,

    /// Base presence is outside `[0, 1]` or not a number.
    #[error("base presence must be within 0..=1, got {0}")]
    BasePresenceOutOfRange(f32),

    /// Channel count other than 3 or 4.
    #[error("unsupported channel count: {0} (expected 3 or 4)")]
    UnsupportedChannels(usize),

    /// Pixel data length does not match the declared geometry.
    #[error("malformed buffer: expected {expected} bytes, got {actual}")]
    MalformedBuffer { expected: usize, actual: usize },

    /// Random placement needs at least one visible base pixel.
    #[error("base image has no visible pixels to place tiles on")]
    NoVisiblePixels,
}

impl MosaicError {
    /// True for the InvalidDimension family.
    pub fn is_invalid_dimension(&self) -> bool {
        matches!(
            self,
            MosaicError::ZeroDimension { .. }
                | MosaicError::BlockTooLarge { .. }
                | MosaicError::ZeroBlockSize
        )
    }

    /// True for the InvalidInput family.
    pub fn is_invalid_input(&self) -> bool {
        !self.is_invalid_dimension()
    }
}
