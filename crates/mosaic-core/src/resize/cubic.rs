//! Bicubic convolution weights for enlarging.
//!
//! Keys cubic kernel with `a = -0.75`; four taps per destination pixel,
//! sampled at pixel centers with edge clamping.

use super::Taps;

const A: f32 = -0.75;

fn kernel(x: f32) -> f32 {
    let x = x.abs();
    if x <= 1.0 {
        ((A + 2.0) * x - (A + 3.0)) * x * x + 1.0
    } else if x < 2.0 {
        ((A * x - 5.0 * A) * x + 8.0 * A) * x - 4.0 * A
    } else {
        0.0
    }
}

/// Per-destination-index taps for one axis.
pub(super) fn cubic_taps(src_len: u32, dst_len: u32) -> Vec<Taps> {
    let scale = src_len as f32 / dst_len as f32;
    let max = src_len as i64 - 1;

    (0..dst_len)
        .map(|i| {
            let center = (i as f32 + 0.5) * scale - 0.5;
            let base = center.floor();
            let frac = center - base;

            let mut taps: Taps = Vec::with_capacity(4);
            for k in -1..=2i64 {
                let weight = kernel(frac - k as f32);
                let idx = (base as i64 + k).clamp(0, max) as usize;
                // Clamped taps at the edges collapse onto the same index
                match taps.iter_mut().find(|(j, _)| *j == idx) {
                    Some((_, w)) => *w += weight,
                    None => taps.push((idx, weight)),
                }
            }
            taps
        })
        .collect()
}
