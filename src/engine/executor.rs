// In: src/engine/executor.rs

//! Runs a compiled strategy against an image/mask pair.
//!
//! The executor is the only place where handles' storage, the strategy
//! vocabulary and the kernels meet. It derives a single RMS amplitude plane
//! from the image collection, seeds a working mask from the prior baseline,
//! applies the steps in order and packs the result into a fresh mask.

use log::{debug, trace};
use ndarray::Array2;

use crate::engine::image::ImageBuf;
use crate::engine::mask::MaskBuf;
use crate::engine::strategy::{CompiledStrategy, StrategyStep};
use crate::error::FlagError;
use crate::kernels;

pub fn run(
    strategy: &CompiledStrategy,
    images: &ImageBuf,
    existing_flags: &MaskBuf,
) -> Result<MaskBuf, FlagError> {
    if images.width() != existing_flags.width() || images.height() != existing_flags.height() {
        return Err(FlagError::DimensionMismatch {
            image_width: images.width(),
            image_height: images.height(),
            mask_width: existing_flags.width(),
            mask_height: existing_flags.height(),
        });
    }

    trace!("start strategy '{}'", strategy.name());
    let amp = amplitude_plane(images);
    let mut mask = unpack_mask(existing_flags);

    for step in strategy.steps() {
        match *step {
            StrategyStep::Threshold { factor } => {
                kernels::threshold::apply(amp.view(), &mut mask, factor);
            }
            StrategyStep::SumThreshold {
                base_sensitivity,
                max_window,
            } => {
                kernels::sum_threshold::apply(amp.view(), &mut mask, base_sensitivity, max_window);
            }
            StrategyStep::Extend { time, channel } => {
                kernels::morphology::dilate(&mut mask, time, channel);
            }
        }
        debug!(
            "strategy '{}': {:?} -> {} flagged",
            strategy.name(),
            step,
            mask.iter().filter(|&&m| m).count()
        );
    }

    trace!("end strategy '{}'", strategy.name());
    Ok(pack_mask(&mask))
}

/// Per-sample RMS over all images of the collection. The image count is
/// nonzero for any collection a strategy can legally receive (allocation
/// rejects zero counts and empty handles fail the dimension check).
fn amplitude_plane(images: &ImageBuf) -> Array2<f32> {
    let (width, height) = (images.width(), images.height());
    let count = images.image_count().max(1);
    Array2::from_shape_fn((height, width), |(y, x)| {
        let sum_sq: f32 = (0..images.image_count())
            .map(|i| {
                let v = images.sample(i, x, y);
                v * v
            })
            .sum();
        (sum_sq / count as f32).sqrt()
    })
}

fn unpack_mask(mask: &MaskBuf) -> Array2<bool> {
    let plane = mask.to_plane();
    Array2::from_shape_vec((mask.height(), mask.width()), plane)
        .unwrap_or_else(|_| Array2::from_elem((mask.height(), mask.width()), false))
}

fn pack_mask(mask: &Array2<bool>) -> MaskBuf {
    let (height, width) = mask.dim();
    let plane: Vec<bool> = mask.iter().copied().collect();
    MaskBuf::from_plane(width, height, &plane)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::strategy::CompiledStrategy;

    const STRATEGY: &str = r#"{
        "name": "executor-test",
        "steps": [
            {"op": "threshold", "factor": 6.0},
            {"op": "extend", "time": 1, "channel": 0}
        ]
    }"#;

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let strategy = CompiledStrategy::from_json(STRATEGY).unwrap();
        let images = ImageBuf::new(16, 8, 2, 0.0, 16).unwrap();
        let mask = MaskBuf::new(8, 8, false).unwrap();
        let err = run(&strategy, &images, &mask).unwrap_err();
        assert!(matches!(err, FlagError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_prior_flags_survive_into_the_result() {
        let strategy = CompiledStrategy::from_json(STRATEGY).unwrap();
        let images = ImageBuf::new(8, 8, 1, 1.0, 8).unwrap();
        let mut existing = MaskBuf::new(8, 8, false).unwrap();
        existing.set(2, 5, true);

        let result = run(&strategy, &images, &existing).unwrap();
        assert!(result.get(2, 5));
        // The extend step grows the prior flag along the time axis too.
        assert!(result.get(1, 5));
        assert!(result.get(3, 5));
    }

    #[test]
    fn test_outlier_in_one_image_is_flagged() {
        let strategy = CompiledStrategy::from_json(STRATEGY).unwrap();
        let mut images = ImageBuf::new(16, 16, 2, 0.0, 20).unwrap();
        // A mild gradient as background, one hot sample in the second image.
        for i in 0..2 {
            for y in 0..16 {
                for x in 0..16 {
                    images.plane_mut(i)[y * 20 + x] = ((x + 3 * y + i) % 7) as f32 * 0.1;
                }
            }
        }
        images.plane_mut(1)[4 * 20 + 9] = 500.0;

        let existing = MaskBuf::new(16, 16, false).unwrap();
        let result = run(&strategy, &images, &existing).unwrap();
        assert!(result.get(9, 4));
        // The time extend grows it to the neighbors.
        assert!(result.get(8, 4));
        assert!(result.get(10, 4));
        // Far corners stay clean.
        assert!(!result.get(0, 15));
    }

    #[test]
    fn test_inputs_are_left_untouched() {
        let strategy = CompiledStrategy::from_json(STRATEGY).unwrap();
        let images = ImageBuf::new(8, 8, 1, 1.0, 8).unwrap();
        let existing = MaskBuf::new(8, 8, false).unwrap();
        let before = existing.clone();
        let _ = run(&strategy, &images, &existing).unwrap();
        assert_eq!(existing, before);
    }
}
