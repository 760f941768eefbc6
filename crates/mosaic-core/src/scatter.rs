//! Random-placement mosaic.
//!
//! Instead of a grid, tiles are stamped at random visible points of the base
//! until a requested count is reached. Tiles may overlap; later stamps win.
//!
//! Matching compares the tile footprint pixel by pixel against the base at
//! the candidate position rather than comparing block averages. Footprints
//! wrap around the buffer edges (toroidal indexing), so a tile centered near
//! the right edge continues on the left.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::buffer::PixelBuffer;
use crate::color::AverageColor;
use crate::error::{MosaicError, Result};
use crate::normalize::normalize_alpha;
use crate::resize::resize_buffer;

/// Progress callback: receives `(placed, total)`.
pub type ProgressCallback<'a> = Option<&'a mut dyn FnMut(usize, usize)>;

/// Tiles are shrunk to at most `1 / DEFAULT_SIZE_DIVISOR` of the base.
pub const DEFAULT_SIZE_DIVISOR: u32 = 20;

/// Configuration for [`scatter_mosaic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScatterOptions {
    count: usize,
    size_divisor: u32,
    seed: Option<u64>,
    progress_interval: Option<usize>,
}

impl ScatterOptions {
    /// Place `count` tiles with default sizing and an entropy-seeded RNG.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            size_divisor: DEFAULT_SIZE_DIVISOR,
            seed: None,
            progress_interval: None,
        }
    }

    #[inline]
    pub fn size_divisor(mut self, divisor: u32) -> Self {
        self.size_divisor = divisor;
        self
    }

    /// Fixed RNG seed for reproducible output.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Report progress every `interval` placements (default: 1% of count).
    #[inline]
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = Some(interval.max(1));
        self
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    fn interval(&self) -> usize {
        self.progress_interval.unwrap_or((self.count / 100).max(1))
    }
}

/// Scatter tiles over a canvas the size of `base`.
///
/// # Errors
///
/// - [`MosaicError::EmptyTilePool`] if `tiles` is empty.
/// - [`MosaicError::ZeroBlockSize`] if the size divisor is 0.
/// - [`MosaicError::NoVisiblePixels`] if `count > 0` and every base pixel
///   has alpha 0.
pub fn scatter_mosaic(
    base: &PixelBuffer,
    tiles: &[PixelBuffer],
    options: &ScatterOptions,
    progress: ProgressCallback<'_>,
) -> Result<PixelBuffer> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    scatter_mosaic_with_rng(base, tiles, options, &mut rng, progress)
}

/// [`scatter_mosaic`] with a caller-supplied RNG. The options' seed is ignored.
pub fn scatter_mosaic_with_rng<R: Rng>(
    base: &PixelBuffer,
    tiles: &[PixelBuffer],
    options: &ScatterOptions,
    rng: &mut R,
    mut progress: ProgressCallback<'_>,
) -> Result<PixelBuffer> {
    if tiles.is_empty() {
        return Err(MosaicError::EmptyTilePool);
    }
    if options.size_divisor == 0 {
        return Err(MosaicError::ZeroBlockSize);
    }

    let base = normalize_alpha(base);
    let (width, height) = (base.width(), base.height());
    let mut canvas = PixelBuffer::transparent(width, height)?;
    if options.count == 0 {
        return Ok(canvas);
    }

    let tiles = tiles
        .iter()
        .map(|tile| fit_tile(width, height, &normalize_alpha(tile), options.size_divisor))
        .collect::<Result<Vec<_>>>()?;

    let visible = visible_pixels(&base);
    if visible.is_empty() {
        return Err(MosaicError::NoVisiblePixels);
    }

    tracing::debug!(
        width,
        height,
        tiles = tiles.len(),
        count = options.count,
        "Scattering tiles"
    );

    let interval = options.interval();
    for i in 0..options.count {
        let (px, py) = visible[rng.gen_range(0..visible.len())];

        let mut best: Option<(&PixelBuffer, (i64, i64), f64)> = None;
        for tile in &tiles {
            let origin = centered_origin(px, py, tile);
            let diff = footprint_distance(&base, tile, origin);
            match best {
                Some((_, _, best_diff)) if diff >= best_diff => {}
                _ => best = Some((tile, origin, diff)),
            }
        }
        if let Some((tile, origin, _)) = best {
            stamp(&mut canvas, tile, origin);
        }

        let placed = i + 1;
        if placed % interval == 0 || placed == options.count {
            if let Some(cb) = progress.as_mut() {
                cb(placed, options.count);
            }
        }
    }

    Ok(canvas)
}

/// Shrink `tile` so it is at most `1 / divisor` of the base.
///
/// Tiles already smaller than that in both dimensions are returned as is.
/// Otherwise the longer tile side is scaled to `base_side / divisor` and the
/// other side follows the tile's aspect ratio (never below 1 pixel).
pub fn fit_tile(base_width: u32, base_height: u32, tile: &PixelBuffer, divisor: u32) -> Result<PixelBuffer> {
    if divisor == 0 {
        return Err(MosaicError::ZeroBlockSize);
    }
    let (tw, th) = (tile.width() as u64, tile.height() as u64);
    let (bw, bh, d) = (base_width as u64, base_height as u64, divisor as u64);

    if tw * d < bw && th * d < bh {
        return Ok(tile.clone());
    }

    let (new_w, new_h) = if tw >= th {
        let w = bw / d;
        (w, th * bw / (tw * d))
    } else {
        let h = bh / d;
        (tw * bh / (th * d), h)
    };

    resize_buffer(tile, (new_w as u32).max(1), Some((new_h as u32).max(1)))
}

/// Mean per-pixel distance between `tile` and the base pixels beneath it
/// when its top-left sits at `origin` (wrapped toroidally).
pub fn footprint_distance(base: &PixelBuffer, tile: &PixelBuffer, origin: (i64, i64)) -> f64 {
    let (bw, bh) = (base.width() as i64, base.height() as i64);
    let mut total = 0.0;
    for y in 0..tile.height() {
        let by = (origin.1 + y as i64).rem_euclid(bh) as u32;
        for x in 0..tile.width() {
            let bx = (origin.0 + x as i64).rem_euclid(bw) as u32;
            total += pixel_distance(base.pixel(bx, by), tile.pixel(x, y));
        }
    }
    total / (tile.width() as f64 * tile.height() as f64)
}

/// Squared RGBA distance; two fully transparent pixels are identical.
#[inline]
pub fn pixel_distance(a: [u8; 4], b: [u8; 4]) -> f64 {
    if a[3] == 0 && b[3] == 0 {
        return 0.0;
    }
    AverageColor::from(a).distance_squared(&AverageColor::from(b))
}

fn centered_origin(x: u32, y: u32, tile: &PixelBuffer) -> (i64, i64) {
    (
        x as i64 - (tile.width() / 2) as i64,
        y as i64 - (tile.height() / 2) as i64,
    )
}

fn visible_pixels(base: &PixelBuffer) -> Vec<(u32, u32)> {
    let mut visible = Vec::new();
    for y in 0..base.height() {
        for x in 0..base.width() {
            if base.pixel(x, y)[3] > 0 {
                visible.push((x, y));
            }
        }
    }
    visible
}

/// Overwrite canvas pixels under every non-transparent tile pixel.
fn stamp(canvas: &mut PixelBuffer, tile: &PixelBuffer, origin: (i64, i64)) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    for y in 0..tile.height() {
        let cy = (origin.1 + y as i64).rem_euclid(ch) as u32;
        for x in 0..tile.width() {
            let px = tile.pixel(x, y);
            if px[3] > 0 {
                let cx = (origin.0 + x as i64).rem_euclid(cw) as u32;
                canvas.put_pixel(cx, cy, px);
            }
        }
    }
}
