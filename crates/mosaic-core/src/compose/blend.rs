//! Weighted mixing of a matched tile with the base block it replaces.

use crate::buffer::{Channels, PixelBuffer};

/// `(1 - presence) * tile + presence * base`, per channel, rounded and
/// saturated to `u8`.
///
/// Both buffers must be RGBA with identical dimensions. `presence` of 0
/// returns the tile unchanged and 1 returns the base block unchanged.
pub fn blend(tile: &PixelBuffer, base: &PixelBuffer, presence: f32) -> PixelBuffer {
    debug_assert_eq!(tile.channels(), Channels::Rgba);
    debug_assert_eq!(base.channels(), Channels::Rgba);
    debug_assert_eq!(
        (tile.width(), tile.height()),
        (base.width(), base.height())
    );

    if presence <= 0.0 {
        return tile.clone();
    }
    if presence >= 1.0 {
        return base.clone();
    }

    let p = presence as f64;
    let data = tile
        .as_bytes()
        .iter()
        .zip(base.as_bytes())
        .map(|(&t, &b)| ((1.0 - p) * t as f64 + p * b as f64).round().clamp(0.0, 255.0) as u8)
        .collect();

    PixelBuffer::from_parts(tile.width(), tile.height(), Channels::Rgba, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_boundaries() {
        let tile = PixelBuffer::filled(2, 2, [0, 0, 255, 255]).unwrap();
        let base = PixelBuffer::filled(2, 2, [255, 0, 0, 128]).unwrap();
        assert_eq!(blend(&tile, &base, 0.0), tile);
        assert_eq!(blend(&tile, &base, 1.0), base);
    }

    #[test]
    fn test_blend_midpoint_rounds() {
        let tile = PixelBuffer::filled(1, 1, [0, 10, 255, 255]).unwrap();
        let base = PixelBuffer::filled(1, 1, [255, 11, 0, 255]).unwrap();
        let out = blend(&tile, &base, 0.5);
        assert_eq!(out.pixel(0, 0), [128, 11, 128, 255]);
    }

    #[test]
    fn test_blend_quarter_presence() {
        let tile = PixelBuffer::filled(1, 1, [200, 200, 200, 255]).unwrap();
        let base = PixelBuffer::filled(1, 1, [0, 0, 0, 255]).unwrap();
        let out = blend(&tile, &base, 0.25);
        assert_eq!(out.pixel(0, 0), [150, 150, 150, 255]);
    }
}
