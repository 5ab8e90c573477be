// In: src/kernels/sum_threshold.rs

//! The SumThreshold pass.
//!
//! A single-sample threshold misses the most common kind of interference: a
//! contiguous run of samples that are each individually unremarkable. This
//! kernel slides windows of exponentially growing length along both axes
//! and flags a whole window when the summed excess over the plane median
//! beats a per-window threshold. The threshold decays as the window grows
//! (`chi_n = chi_1 / rho^log2(n)`), so longer runs need less per-sample
//! excess to be caught.
//!
//! Samples flagged in an earlier window size contribute the threshold value
//! itself to later sums, which keeps one bright spike from flagging its
//! whole neighborhood.

use ndarray::{Array2, ArrayView2, Zip};

use super::stats;

/// Threshold decay base between successive window sizes.
const RHO: f32 = 1.5;

pub fn apply(
    amp: ArrayView2<'_, f32>,
    mask: &mut Array2<bool>,
    base_sensitivity: f32,
    max_window: usize,
) {
    let mut unflagged: Vec<f32> = Zip::from(&amp)
        .and(&*mask)
        .fold(Vec::new(), |mut acc, &v, &m| {
            if !m {
                acc.push(v);
            }
            acc
        });

    let Some(center) = stats::median(&mut unflagged) else {
        return;
    };
    let Some(sigma) = stats::mad_sigma(&unflagged, center) else {
        return;
    };
    if sigma <= 0.0 {
        return;
    }
    let chi_1 = base_sensitivity * sigma;

    let mut window = 1;
    while window <= max_window {
        let chi = chi_1 / RHO.powf((window as f32).log2());
        // Flags from this window size only take effect at the next size.
        let snapshot = mask.clone();
        horizontal_pass(amp, &snapshot, mask, center, chi, window);
        vertical_pass(amp, &snapshot, mask, center, chi, window);
        window *= 2;
    }
}

fn horizontal_pass(
    amp: ArrayView2<'_, f32>,
    snapshot: &Array2<bool>,
    mask: &mut Array2<bool>,
    center: f32,
    chi: f32,
    window: usize,
) {
    let (height, width) = amp.dim();
    if window > width {
        return;
    }
    for y in 0..height {
        for start in 0..=(width - window) {
            let mut sum = 0.0f32;
            for x in start..start + window {
                sum += if snapshot[[y, x]] {
                    chi
                } else {
                    amp[[y, x]] - center
                };
            }
            if sum > chi * window as f32 {
                for x in start..start + window {
                    mask[[y, x]] = true;
                }
            }
        }
    }
}

fn vertical_pass(
    amp: ArrayView2<'_, f32>,
    snapshot: &Array2<bool>,
    mask: &mut Array2<bool>,
    center: f32,
    chi: f32,
    window: usize,
) {
    let (height, width) = amp.dim();
    if window > height {
        return;
    }
    for x in 0..width {
        for start in 0..=(height - window) {
            let mut sum = 0.0f32;
            for y in start..start + window {
                sum += if snapshot[[y, x]] {
                    chi
                } else {
                    amp[[y, x]] - center
                };
            }
            if sum > chi * window as f32 {
                for y in start..start + window {
                    mask[[y, x]] = true;
                }
            }
        }
    }
}
