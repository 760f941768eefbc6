//! Reusable grid-mosaic configuration.

use crate::buffer::PixelBuffer;
use crate::error::{MosaicError, Result};
use crate::matcher::TilePool;
use crate::normalize::normalize_alpha;

use super::compose_grid;

/// Grid compositor configured once and reusable across images.
///
/// # Example
///
/// ```
/// use mosaic_core::{MosaicBuilder, PixelBuffer};
///
/// let base = PixelBuffer::filled(4, 4, [255, 0, 0, 255]).unwrap();
/// let tiles = [
///     PixelBuffer::filled(2, 2, [0, 0, 255, 255]).unwrap(),
///     PixelBuffer::filled(2, 2, [255, 0, 0, 255]).unwrap(),
/// ];
///
/// let mosaic = MosaicBuilder::new(2).base_presence(0.0);
/// let out = mosaic.compose(&base, &tiles).unwrap();
/// assert_eq!(out, base);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MosaicBuilder {
    size: u32,
    base_presence: f32,
}

impl MosaicBuilder {
    /// Blocks of `size x size` pixels, pure tiles (base presence 0).
    pub fn new(size: u32) -> Self {
        Self {
            size,
            base_presence: 0.0,
        }
    }

    /// How much of the original block color shows through, in `[0, 1]`.
    #[inline]
    pub fn base_presence(mut self, presence: f32) -> Self {
        self.base_presence = presence;
        self
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Build the tile pool and composite `base`.
    ///
    /// # Errors
    ///
    /// Checked in this order, first failure wins:
    /// - [`MosaicError::ZeroBlockSize`]
    /// - [`MosaicError::BlockTooLarge`] if `size` exceeds either base dimension
    /// - [`MosaicError::BasePresenceOutOfRange`]
    /// - [`MosaicError::EmptyTilePool`]
    pub fn compose(&self, base: &PixelBuffer, tiles: &[PixelBuffer]) -> Result<PixelBuffer> {
        self.validate(base)?;
        if tiles.is_empty() {
            return Err(MosaicError::EmptyTilePool);
        }
        let pool = TilePool::build(tiles, self.size)?;
        self.compose_with_pool(base, &pool)
    }

    /// Composite `base` against an already prepared pool.
    ///
    /// The pool's tile size takes precedence over the configured size.
    pub fn compose_with_pool(&self, base: &PixelBuffer, pool: &TilePool) -> Result<PixelBuffer> {
        let builder = Self {
            size: pool.size(),
            ..*self
        };
        builder.validate(base)?;

        let size = builder.size;
        let aligned_w = base.width() - base.width() % size;
        let aligned_h = base.height() - base.height() % size;
        // Remainder strips on the right and bottom are dropped
        let base = normalize_alpha(base).crop(0, 0, aligned_w, aligned_h)?;

        compose_grid(&base, pool, builder.base_presence)
    }

    fn validate(&self, base: &PixelBuffer) -> Result<()> {
        if self.size == 0 {
            return Err(MosaicError::ZeroBlockSize);
        }
        if self.size > base.width() || self.size > base.height() {
            return Err(MosaicError::BlockTooLarge {
                size: self.size,
                width: base.width(),
                height: base.height(),
            });
        }
        if !self.base_presence.is_finite() || !(0.0..=1.0).contains(&self.base_presence) {
            return Err(MosaicError::BasePresenceOutOfRange(self.base_presence));
        }
        Ok(())
    }
}
