//! Tile pool construction and nearest-average-color lookup.

use crate::buffer::PixelBuffer;
use crate::color::{average_color, AverageColor};
use crate::error::{MosaicError, Result};
use crate::normalize::normalize_alpha;
use crate::resize::resize_buffer;

/// One candidate tile: an RGBA `size x size` buffer and its mean color.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub buffer: PixelBuffer,
    pub average: AverageColor,
}

/// Ordered, read-only set of prepared tiles for one composition.
///
/// Order is significant: ties in [`best_match`](Self::best_match) resolve
/// to the tile that appears first.
#[derive(Debug, Clone)]
pub struct TilePool {
    tiles: Vec<Tile>,
    size: u32,
}

impl TilePool {
    /// Normalize every tile, resize it to `size x size`, and record its
    /// average color. Runs once per composition regardless of base size.
    ///
    /// # Errors
    ///
    /// - [`MosaicError::EmptyTilePool`] if `tiles` is empty.
    /// - [`MosaicError::ZeroBlockSize`] if `size` is 0.
    pub fn build(tiles: &[PixelBuffer], size: u32) -> Result<Self> {
        if size == 0 {
            return Err(MosaicError::ZeroBlockSize);
        }
        if tiles.is_empty() {
            return Err(MosaicError::EmptyTilePool);
        }

        let tiles = tiles
            .iter()
            .map(|tile| {
                let buffer = resize_buffer(&normalize_alpha(tile), size, Some(size))?;
                let average = average_color(&buffer);
                Ok(Tile { buffer, average })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { tiles, size })
    }

    /// Side length every tile was resized to.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile whose average color is closest to `query` (Euclidean, RGBA).
    ///
    /// Linear scan; the first tile reaching the minimum wins, so results are
    /// stable across calls.
    ///
    /// # Errors
    ///
    /// [`MosaicError::EmptyTilePool`] when the pool holds no tiles.
    pub fn best_match(&self, query: &AverageColor) -> Result<&Tile> {
        let mut best: Option<(&Tile, f64)> = None;
        for tile in &self.tiles {
            // Squared distance preserves ordering and skips the sqrt
            let dist = query.distance_squared(&tile.average);
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((tile, dist)),
            }
        }
        best.map(|(tile, _)| tile).ok_or(MosaicError::EmptyTilePool)
    }
}
