// In: src/kernels/threshold.rs

//! Single-sample amplitude thresholding.
//!
//! Flags every sample whose amplitude exceeds the robust plane median by
//! more than `factor` noise levels. Already-flagged samples are excluded
//! from the statistics so a heavily contaminated plane does not inflate its
//! own cutoff.

use ndarray::{Array2, ArrayView2, Zip};
use num_traits::Float;

use super::stats;

pub fn apply<T: Float>(amp: ArrayView2<'_, T>, mask: &mut Array2<bool>, factor: T) {
    let mut unflagged: Vec<T> = Zip::from(&amp)
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
    if sigma <= T::zero() {
        // A perfectly flat plane has nothing to flag.
        return;
    }

    let cutoff = center + factor * sigma;
    Zip::from(mask).and(&amp).for_each(|m, &v| {
        if v > cutoff {
            *m = true;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_flags_only_the_outliers() {
        // Alternating low-level values with two hot samples.
        let mut amp = Array2::from_shape_fn((8, 8), |(y, x)| ((x + y) % 3) as f32);
        amp[[2, 3]] = 100.0;
        amp[[5, 1]] = 80.0;
        let mut mask = Array2::from_elem((8, 8), false);

        apply(amp.view(), &mut mask, 6.0);

        assert!(mask[[2, 3]]);
        assert!(mask[[5, 1]]);
        assert_eq!(mask.iter().filter(|&&m| m).count(), 2);
    }

    #[test]
    fn test_flat_plane_flags_nothing() {
        let amp = Array2::from_elem((4, 4), 1.0f32);
        let mut mask = Array2::from_elem((4, 4), false);
        apply(amp.view(), &mut mask, 3.0);
        assert!(mask.iter().all(|&m| !m));
    }

    #[test]
    fn test_existing_flags_do_not_inflate_the_cutoff() {
        // Pre-flagged hot samples must not drag the noise estimate up and
        // hide a weaker outlier.
        let mut amp = Array2::from_shape_fn((8, 8), |(y, x)| ((x + y) % 3) as f64);
        for x in 0..8 {
            amp[[0, x]] = 1000.0;
        }
        amp[[4, 4]] = 50.0;

        let mut mask = Array2::from_elem((8, 8), false);
        for x in 0..8 {
            mask[[0, x]] = true;
        }

        apply(amp.view(), &mut mask, 6.0);
        assert!(mask[[4, 4]]);
    }
}
