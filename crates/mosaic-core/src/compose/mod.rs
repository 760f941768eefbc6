//! Grid mosaic compositing.
//!
//! The base image is cut into non-overlapping `size x size` blocks. For each
//! block the mean color is computed; mostly transparent blocks (mean alpha
//! below [`TRANSPARENCY_THRESHOLD`]) become fully transparent, the rest are
//! replaced by the pool tile with the nearest mean color, blended with the
//! block by the base presence weight.
//!
//! ```text
//! base ──normalize──crop to size multiple──┐
//!                                          ├─ per block: average ─┬─ transparent? → zeros
//! tiles ─normalize──resize size×size──avg──┘                      └─ best_match → blend → output
//! ```
//!
//! Blocks never overlap, so the iteration order has no effect on the result.

mod blend;
mod builder;

pub use blend::blend;
pub use builder::MosaicBuilder;

use crate::buffer::PixelBuffer;
use crate::color::average_region;
use crate::error::Result;
use crate::matcher::TilePool;

/// Blocks whose mean alpha falls below this value are left transparent.
pub const TRANSPARENCY_THRESHOLD: f64 = 128.0;

/// Build a photomosaic of `base` from `tiles`.
///
/// Output dimensions are `(W - W % size, H - H % size)`.
///
/// # Errors
///
/// See [`MosaicBuilder::compose`].
pub fn compose_mosaic(
    base: &PixelBuffer,
    tiles: &[PixelBuffer],
    size: u32,
    base_presence: f32,
) -> Result<PixelBuffer> {
    MosaicBuilder::new(size)
        .base_presence(base_presence)
        .compose(base, tiles)
}

/// Grid loop over an RGBA base already cropped to a multiple of the pool size.
fn compose_grid(base: &PixelBuffer, pool: &TilePool, base_presence: f32) -> Result<PixelBuffer> {
    let size = pool.size();
    let (width, height) = (base.width(), base.height());
    let mut output = PixelBuffer::transparent(width, height)?;

    let columns = width / size;
    let rows = height / size;
    let mut skipped = 0usize;

    tracing::debug!(
        width,
        height,
        size,
        columns,
        rows,
        tiles = pool.len(),
        base_presence,
        "Composing grid mosaic"
    );

    for row in 0..rows {
        for col in 0..columns {
            let (x, y) = (col * size, row * size);
            let average = average_region(base, x, y, size, size);

            if average.alpha() < TRANSPARENCY_THRESHOLD {
                // Output already holds zeros here
                skipped += 1;
                continue;
            }

            let tile = pool.best_match(&average)?;
            let block = base.crop(x, y, size, size)?;
            output.blit(&blend(&tile.buffer, &block, base_presence), x, y);
        }
    }

    tracing::debug!(
        blocks = (columns * rows) as usize,
        transparent = skipped,
        "Grid mosaic complete"
    );

    Ok(output)
}
