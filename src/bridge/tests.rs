use super::*;
use crate::config::{FlaggerConfig, Instrument};
use crate::error::FlagError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::path::Path;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A 64x64, two-image set of seeded uniform noise with a strong persistent
/// line injected at `line_y`, plus an all-clear mask.
fn synthetic_observation(flagger: &Flagger, line_y: usize) -> (ImageSet, FlagMask) {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut imgset = flagger.make_image_set(64, 64, 2, 0.0, 64).unwrap();
    for i in 0..2 {
        let stride = imgset.horizontal_stride();
        let buf = imgset.image_buffer_mut(i);
        for y in 0..64 {
            for x in 0..64 {
                buf[y * stride + x] = rng.random::<f32>();
            }
        }
        for x in 0..64 {
            buf[line_y * stride + x] = 30.0;
        }
    }
    let mask = flagger.make_flag_mask(64, 64, false).unwrap();
    (imgset, mask)
}

//==================================================================================
// I. Marshaling fidelity: allocation echoes its inputs
//==================================================================================

#[test]
fn test_version_echoes_the_crate_version() {
    let (major, minor, sub_minor) = Flagger::version();
    assert_eq!(
        format!("{}.{}.{}", major, minor, sub_minor),
        crate::VERSION
    );
}

#[test]
fn test_make_image_set_echoes_inputs() {
    let flagger = Flagger::new();
    let imgset = flagger.make_image_set(5, 7, 3, 2.5, 8).unwrap();

    assert_eq!(imgset.width(), 5);
    assert_eq!(imgset.height(), 7);
    assert_eq!(imgset.image_count(), 3);
    assert_eq!(imgset.horizontal_stride(), 8);
    assert!(imgset.horizontal_stride() >= imgset.width());

    for i in 0..3 {
        let view = imgset.image_buffer(i);
        assert_eq!(view.len(), 5 * 7);
        assert!(view.iter().all(|&v| v == 2.5));
    }
}

#[test]
fn test_make_image_set_rejects_bad_dimensions() {
    let flagger = Flagger::new();
    assert!(matches!(
        flagger.make_image_set(0, 7, 3, 0.0, 8),
        Err(FlagError::InvalidDimensions(_))
    ));
    assert!(matches!(
        flagger.make_image_set(8, 7, 3, 0.0, 5),
        Err(FlagError::InvalidDimensions(_))
    ));
}

#[test]
fn test_make_flag_mask_echoes_inputs_and_packs() {
    let flagger = Flagger::new();
    let mask = flagger.make_flag_mask(10, 8, true).unwrap();

    assert_eq!(mask.width(), 10);
    assert_eq!(mask.height(), 8);
    assert!(mask.horizontal_stride() >= mask.width());
    assert_eq!(mask.buffer().len(), 10 * 8 / 8);
    assert_eq!(mask.count_set(), 80);

    let clear = flagger.make_flag_mask(10, 8, false).unwrap();
    assert_eq!(clear.count_set(), 0);
}

#[test]
fn test_make_flag_mask_rejects_odd_areas() {
    let flagger = Flagger::new();
    assert!(matches!(
        flagger.make_flag_mask(3, 5, false),
        Err(FlagError::InvalidDimensions(_))
    ));
}

#[test]
#[should_panic]
fn test_image_buffer_out_of_range_panics() {
    let flagger = Flagger::new();
    let imgset = flagger.make_image_set(4, 4, 2, 0.0, 4).unwrap();
    let _ = imgset.image_buffer(2);
}

//==================================================================================
// II. Shared ownership
//==================================================================================

#[test]
fn test_shared_handles_report_identical_geometry() {
    let flagger = Flagger::new();
    let imgset = flagger.make_image_set(6, 4, 2, 1.0, 8).unwrap();
    let shared = imgset.clone();
    assert_eq!(shared.width(), imgset.width());
    assert_eq!(shared.height(), imgset.height());
    assert_eq!(shared.image_count(), imgset.image_count());
    assert_eq!(shared.horizontal_stride(), imgset.horizontal_stride());

    let mask = flagger.make_flag_mask(8, 4, false).unwrap();
    let shared_mask = mask.clone();
    assert_eq!(shared_mask.width(), mask.width());
    assert_eq!(shared_mask.height(), mask.height());
    assert_eq!(shared_mask.horizontal_stride(), mask.horizontal_stride());
}

#[test]
fn test_mutating_a_shared_handle_detaches_it() {
    let flagger = Flagger::new();
    let original = flagger.make_image_set(4, 4, 1, 0.0, 4).unwrap();
    let mut copy = original.clone();

    copy.image_buffer_mut(0)[0] = 9.0;
    assert_eq!(copy.image_buffer(0)[0], 9.0);
    assert_eq!(original.image_buffer(0)[0], 0.0);

    let mask = flagger.make_flag_mask(8, 8, false).unwrap();
    let mut mask_copy = mask.clone();
    mask_copy.set(1, 1, true);
    assert!(mask_copy.get(1, 1));
    assert!(!mask.get(1, 1));
}

//==================================================================================
// III. Strategy discovery and loading
//==================================================================================

#[test]
fn test_find_strategy_file_returns_an_existing_default() {
    let flagger = Flagger::new();
    let path = flagger.find_strategy_file().unwrap();
    assert!(!path.is_empty());
    assert!(Path::new(&path).is_file());

    let strategy = flagger.load_strategy_file(&path).unwrap();
    assert_eq!(strategy.name(), "generic-default");
}

#[test]
fn test_instrument_from_config_drives_discovery() {
    let flagger = Flagger::with_config(FlaggerConfig {
        instrument: Instrument::Mwa,
        strategy_dirs: Vec::new(),
    });
    let path = flagger.find_strategy_file().unwrap();
    assert!(path.ends_with("mwa-default.json"));

    let strategy = flagger.load_strategy_file(&path).unwrap();
    assert_eq!(strategy.name(), "mwa-default");
}

#[test]
fn test_load_strategy_file_missing_path_fails() {
    let flagger = Flagger::new();
    let err = flagger
        .load_strategy_file("/no/such/strategy.json")
        .unwrap_err();
    assert!(matches!(err, FlagError::Io(_)));
}

#[test]
fn test_load_strategy_file_rejects_garbage() {
    let flagger = Flagger::new();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "this is not a strategy").unwrap();

    let err = flagger.load_strategy_file(file.path()).unwrap_err();
    assert!(matches!(err, FlagError::SerdeJson(_)));
}

//==================================================================================
// IV. Running a strategy end to end
//==================================================================================

#[test]
fn test_run_flags_a_synthetic_rfi_line() {
    init_logging();
    let flagger = Flagger::new();
    let (imgset, mut existing) = synthetic_observation(&flagger, 20);
    existing.set(3, 3, true);

    let path = flagger.find_strategy_file().unwrap();
    let strategy = flagger.load_strategy_file(&path).unwrap();
    let result = strategy.run(&imgset, &existing).unwrap();

    assert_eq!(result.width(), 64);
    assert_eq!(result.height(), 64);

    // The injected line is caught end to end, and grown one channel out.
    for x in 0..64 {
        assert!(result.get(x, 20), "line sample {} not flagged", x);
    }
    assert!(result.get(5, 19));
    assert!(result.get(5, 21));

    // The prior baseline survives.
    assert!(result.get(3, 3));

    // The detector stays conservative on the noise floor.
    let flagged = result.count_set();
    assert!(
        flagged < 64 * 64 * 2 / 5,
        "flagged {} of {} samples",
        flagged,
        64 * 64
    );

    // Inputs are read-only: the existing mask still has exactly one flag.
    assert_eq!(existing.count_set(), 1);
}

#[test]
fn test_run_is_repeatable_on_the_same_handle() {
    let flagger = Flagger::new();
    let (imgset, existing) = synthetic_observation(&flagger, 8);
    let path = flagger.find_strategy_file().unwrap();
    let strategy = flagger.load_strategy_file(&path).unwrap();

    let first = strategy.run(&imgset, &existing).unwrap();
    let second = strategy.run(&imgset, &existing).unwrap();
    assert_eq!(first.buffer(), second.buffer());
}

#[test]
fn test_run_rejects_mismatched_dimensions() {
    let flagger = Flagger::new();
    let imgset = flagger.make_image_set(16, 8, 2, 0.0, 16).unwrap();
    let mask = flagger.make_flag_mask(8, 8, false).unwrap();

    let path = flagger.find_strategy_file().unwrap();
    let strategy = flagger.load_strategy_file(&path).unwrap();
    let err = strategy.run(&imgset, &mask).unwrap_err();
    assert!(matches!(err, FlagError::DimensionMismatch { .. }));
}
