//! Area-averaging weights for shrinking.
//!
//! Each destination pixel covers the source interval
//! `[i * scale, (i + 1) * scale)`; every source pixel contributes in
//! proportion to how much of that interval it overlaps.

use super::Taps;

/// Per-destination-index taps for one axis.
pub(super) fn area_taps(src_len: u32, dst_len: u32) -> Vec<Taps> {
    let scale = src_len as f64 / dst_len as f64;

    (0..dst_len)
        .map(|i| {
            let start = i as f64 * scale;
            let end = (start + scale).min(src_len as f64);
            let first = start.floor() as u32;
            let last = (end.ceil() as u32).min(src_len);

            let mut taps: Taps = Vec::with_capacity((last - first) as usize);
            for s in first..last {
                let overlap = (end.min(s as f64 + 1.0) - start.max(s as f64)) as f32;
                if overlap > 1e-6 {
                    taps.push((s as usize, overlap));
                }
            }
            normalize(&mut taps);
            taps
        })
        .collect()
}

fn normalize(taps: &mut Taps) {
    let total: f32 = taps.iter().map(|&(_, w)| w).sum();
    if total > 0.0 {
        for (_, w) in taps.iter_mut() {
            *w /= total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halving_averages_pairs() {
        let taps = area_taps(4, 2);
        assert_eq!(taps[0], vec![(0, 0.5), (1, 0.5)]);
        assert_eq!(taps[1], vec![(2, 0.5), (3, 0.5)]);
    }

    #[test]
    fn test_fractional_coverage() {
        // 3 -> 2: each output covers 1.5 source pixels
        let taps = area_taps(3, 2);
        assert_eq!(taps[0].len(), 2);
        assert!((taps[0][0].1 - 2.0 / 3.0).abs() < 1e-6);
        assert!((taps[0][1].1 - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(taps[1][0].0, 1);
        assert_eq!(taps[1][1].0, 2);
    }

    #[test]
    fn test_weights_sum_to_one() {
        for taps in area_taps(17, 5) {
            let sum: f32 = taps.iter().map(|&(_, w)| w).sum();
            assert!((sum - 1.0).abs() < 1e-5);
        }
    }
}
