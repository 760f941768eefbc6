//! Alpha normalization.
//!
//! Guarantees a 4-channel buffer and canonicalizes fully transparent pixels
//! to `[0, 0, 0, 0]` so averaging never sees stale color under zero alpha.

use crate::buffer::{Channels, PixelBuffer};

/// Return an RGBA copy of `buffer` with zero-alpha pixels zeroed.
///
/// RGB input gains an opaque alpha channel (255). Never fails.
///
/// # Example
///
/// ```
/// use mosaic_core::{normalize_alpha, Channels, PixelBuffer};
///
/// let rgb = PixelBuffer::new(1, 1, Channels::Rgb, vec![10, 20, 30]).unwrap();
/// let rgba = normalize_alpha(&rgb);
/// assert_eq!(rgba.as_bytes(), &[10, 20, 30, 255]);
/// ```
pub fn normalize_alpha(buffer: &PixelBuffer) -> PixelBuffer {
    let data = match buffer.channels() {
        Channels::Rgb => {
            let mut data = Vec::with_capacity(buffer.as_bytes().len() / 3 * 4);
            for px in buffer.as_bytes().chunks_exact(3) {
                data.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
            data
        }
        Channels::Rgba => {
            let mut data = buffer.as_bytes().to_vec();
            for px in data.chunks_exact_mut(4) {
                if px[3] == 0 {
                    px.fill(0);
                }
            }
            data
        }
    };

    PixelBuffer::from_parts(buffer.width(), buffer.height(), Channels::Rgba, data)
}
