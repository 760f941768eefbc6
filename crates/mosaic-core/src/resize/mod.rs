//! Buffer rescaling.
//!
//! The interpolation filter is chosen by comparing areas:
//!
//! - **Shrinking** (`dst_w * dst_h < src_w * src_h`): area averaging. Every
//!   source pixel contributes to exactly the destination pixels it overlaps,
//!   which keeps block average colors faithful and avoids aliasing.
//! - **Enlarging or same size**: bicubic convolution, which avoids the blocky
//!   look of nearest/box filters.
//!
//! Both filters are separable: one horizontal pass into an `f32` scratch
//! buffer, one vertical pass that rounds and saturates back to `u8`.
//! Channel layout is preserved (RGB stays RGB).

mod area;
mod cubic;

use crate::buffer::PixelBuffer;
use crate::error::{MosaicError, Result};

/// `(source index, weight)` pairs contributing to one destination index.
type Taps = Vec<(usize, f32)>;

/// Interpolation filter picked by [`resize_buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFilter {
    /// Area averaging, used when the target area is smaller.
    Area,
    /// Bicubic convolution, used otherwise.
    Cubic,
}

impl ResizeFilter {
    /// Filter for a `src -> dst` resize.
    pub fn for_dimensions(src: (u32, u32), dst: (u32, u32)) -> Self {
        let src_area = src.0 as u64 * src.1 as u64;
        let dst_area = dst.0 as u64 * dst.1 as u64;
        if dst_area < src_area {
            ResizeFilter::Area
        } else {
            ResizeFilter::Cubic
        }
    }
}

/// Resize `buffer` to `width x height`.
///
/// When `height` is `None` or `Some(0)` it is derived from the aspect ratio:
/// `round(width * src_height / src_width)`, never less than 1.
///
/// # Errors
///
/// Returns [`MosaicError::ZeroDimension`] when `width` is 0 or the source
/// buffer is empty.
///
/// # Example
///
/// ```
/// use mosaic_core::{resize_buffer, PixelBuffer};
///
/// let buffer = PixelBuffer::filled(8, 4, [10, 20, 30, 255]).unwrap();
/// let half = resize_buffer(&buffer, 4, None).unwrap();
/// assert_eq!((half.width(), half.height()), (4, 2));
/// assert_eq!(half.pixel(0, 0), [10, 20, 30, 255]);
/// ```
pub fn resize_buffer(buffer: &PixelBuffer, width: u32, height: Option<u32>) -> Result<PixelBuffer> {
    // Filters need at least one source sample per axis
    if buffer.width() == 0 || buffer.height() == 0 {
        return Err(MosaicError::ZeroDimension {
            width: buffer.width(),
            height: buffer.height(),
        });
    }
    let height = match height {
        Some(h) if h > 0 => h,
        _ => aspect_height(buffer.width(), buffer.height(), width),
    };
    if width == 0 || height == 0 {
        return Err(MosaicError::ZeroDimension { width, height });
    }

    let src = (buffer.width(), buffer.height());
    if src == (width, height) {
        return Ok(buffer.clone());
    }

    let filter = ResizeFilter::for_dimensions(src, (width, height));
    let (x_taps, y_taps) = match filter {
        ResizeFilter::Area => (
            area::area_taps(src.0, width),
            area::area_taps(src.1, height),
        ),
        ResizeFilter::Cubic => (
            cubic::cubic_taps(src.0, width),
            cubic::cubic_taps(src.1, height),
        ),
    };

    Ok(resample(buffer, width, height, &x_taps, &y_taps))
}

/// Height that keeps a `src_width x src_height` aspect ratio at `width`.
///
/// Never below 1, except for a `width` of 0 which yields 0.
pub fn aspect_height(src_width: u32, src_height: u32, width: u32) -> u32 {
    if width == 0 {
        return 0;
    }
    let h = (width as f64 * src_height as f64 / src_width as f64).round();
    (h as u32).max(1)
}

fn resample(
    buffer: &PixelBuffer,
    dst_w: u32,
    dst_h: u32,
    x_taps: &[Taps],
    y_taps: &[Taps],
) -> PixelBuffer {
    let n = buffer.channels().count();
    let src = buffer.as_bytes();
    let src_w = buffer.width() as usize;
    let src_h = buffer.height() as usize;
    let dst_w_us = dst_w as usize;

    // Horizontal pass: src_h rows of dst_w pixels
    let mut scratch = vec![0f32; src_h * dst_w_us * n];
    for y in 0..src_h {
        let src_row = &src[y * src_w * n..(y + 1) * src_w * n];
        let out_row = &mut scratch[y * dst_w_us * n..(y + 1) * dst_w_us * n];
        for (x, taps) in x_taps.iter().enumerate() {
            for &(sx, w) in taps {
                for c in 0..n {
                    out_row[x * n + c] += src_row[sx * n + c] as f32 * w;
                }
            }
        }
    }

    // Vertical pass
    let mut out = vec![0u8; dst_h as usize * dst_w_us * n];
    let mut acc = vec![0f32; dst_w_us * n];
    for (y, taps) in y_taps.iter().enumerate() {
        acc.fill(0.0);
        for &(sy, w) in taps {
            let row = &scratch[sy * dst_w_us * n..(sy + 1) * dst_w_us * n];
            for (a, &v) in acc.iter_mut().zip(row) {
                *a += v * w;
            }
        }
        let out_row = &mut out[y * dst_w_us * n..(y + 1) * dst_w_us * n];
        for (o, &a) in out_row.iter_mut().zip(acc.iter()) {
            *o = a.round().clamp(0.0, 255.0) as u8;
        }
    }

    PixelBuffer::from_parts(dst_w, dst_h, buffer.channels(), out)
}
