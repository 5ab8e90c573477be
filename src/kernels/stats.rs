// In: src/kernels/stats.rs

//! Robust statistics shared by the thresholding kernels.
//!
//! RFI is sparse and strong, so plain mean/stddev estimates are dominated by
//! the very samples we are trying to flag. The kernels therefore work from
//! the median and the median absolute deviation (MAD), scaled to be
//! consistent with a Gaussian standard deviation.

use num_traits::Float;
use std::cmp::Ordering;

/// `MAD * MAD_TO_SIGMA` estimates the standard deviation of Gaussian noise.
const MAD_TO_SIGMA: f64 = 1.4826;

fn float_cmp<T: Float>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// The upper median of `values`. Reorders the slice in place; returns `None`
/// for an empty slice.
pub fn median<T: Float>(values: &mut [T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let mid = values.len() / 2;
    let (_, pivot, _) = values.select_nth_unstable_by(mid, float_cmp);
    Some(*pivot)
}

/// MAD-based noise estimate of `values` around `center`. Returns `None` for
/// an empty slice.
pub fn mad_sigma<T: Float>(values: &[T], center: T) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let mut deviations: Vec<T> = values.iter().map(|&v| (v - center).abs()).collect();
    let mad = median(&mut deviations)?;
    T::from(MAD_TO_SIGMA).map(|scale| mad * scale)
}
