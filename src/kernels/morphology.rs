// In: src/kernels/morphology.rs

//! Mask dilation.
//!
//! Interference rarely stops exactly where the detector stops seeing it, so
//! strategies usually finish by growing every flagged region a few cells
//! along each axis. The dilation is separable: one pass along the time axis
//! followed by one along the channel axis, which grows each flagged sample
//! into a rectangle.

use ndarray::Array2;

pub fn dilate(mask: &mut Array2<bool>, time_extend: usize, channel_extend: usize) {
    if time_extend == 0 && channel_extend == 0 {
        return;
    }
    let (height, width) = mask.dim();

    if time_extend > 0 {
        let snapshot = mask.clone();
        for y in 0..height {
            for x in 0..width {
                if snapshot[[y, x]] {
                    let lo = x.saturating_sub(time_extend);
                    let hi = (x + time_extend).min(width - 1);
                    for nx in lo..=hi {
                        mask[[y, nx]] = true;
                    }
                }
            }
        }
    }

    if channel_extend > 0 {
        let snapshot = mask.clone();
        for x in 0..width {
            for y in 0..height {
                if snapshot[[y, x]] {
                    let lo = y.saturating_sub(channel_extend);
                    let hi = (y + channel_extend).min(height - 1);
                    for ny in lo..=hi {
                        mask[[ny, x]] = true;
                    }
                }
            }
        }
    }
}
