//! Average-color fingerprints and RGBA distance.

use crate::buffer::PixelBuffer;

/// Per-channel arithmetic mean over a region, in `[R, G, B, A]` order.
///
/// Stored as `f64` so sums over large regions never overflow and the mean
/// keeps its fractional part for distance comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AverageColor(pub [f64; 4]);

impl AverageColor {
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.0[3]
    }

    /// Euclidean distance over all four channels.
    #[inline]
    pub fn distance(&self, other: &AverageColor) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared Euclidean distance; same ordering as [`distance`](Self::distance).
    #[inline]
    pub fn distance_squared(&self, other: &AverageColor) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }
}

impl From<[u8; 4]> for AverageColor {
    /// The "average" of a single pixel.
    fn from(px: [u8; 4]) -> Self {
        AverageColor([px[0] as f64, px[1] as f64, px[2] as f64, px[3] as f64])
    }
}

/// Mean color of the whole buffer.
///
/// # Example
///
/// ```
/// use mosaic_core::{average_color, PixelBuffer};
///
/// let buffer = PixelBuffer::filled(3, 3, [30, 60, 90, 255]).unwrap();
/// assert_eq!(average_color(&buffer).0, [30.0, 60.0, 90.0, 255.0]);
/// ```
pub fn average_color(buffer: &PixelBuffer) -> AverageColor {
    average_region(buffer, 0, 0, buffer.width(), buffer.height())
}

/// Mean color of the `width x height` region whose top-left is `(x, y)`.
///
/// The region is clipped to the buffer. Callers always pass a non-empty
/// region; an empty one yields the zero color rather than dividing by zero.
pub fn average_region(buffer: &PixelBuffer, x: u32, y: u32, width: u32, height: u32) -> AverageColor {
    let x_end = x.saturating_add(width).min(buffer.width());
    let y_end = y.saturating_add(height).min(buffer.height());

    let mut sums = [0u64; 4];
    let mut count = 0u64;
    for py in y..y_end {
        for px in x..x_end {
            let p = buffer.pixel(px, py);
            for (sum, &c) in sums.iter_mut().zip(p.iter()) {
                *sum += c as u64;
            }
            count += 1;
        }
    }

    if count == 0 {
        return AverageColor::default();
    }
    let n = count as f64;
    AverageColor([
        sums[0] as f64 / n,
        sums[1] as f64 / n,
        sums[2] as f64 / n,
        sums[3] as f64 / n,
    ])
}
