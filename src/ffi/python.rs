// In: src/ffi/python.rs

use log::LevelFilter;
use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyBytes;
use std::sync::Once;

use crate::bridge::{FlagMask, Flagger, ImageSet, Strategy};
use crate::config::{FlaggerConfig, Instrument};

//==================================================================================
// I. The Flagger facade
//==================================================================================

#[pyclass(name = "Flagger", module = "flagkit")]
pub struct PyFlagger {
    inner: Flagger,
}

#[pymethods]
impl PyFlagger {
    /// Creates a new Flagger facade.
    ///
    /// This constructor is the main entry point from Python. It takes the
    /// session options as keyword arguments, constructs the unified
    /// `FlaggerConfig` struct, and hands it to the Rust facade.
    #[new]
    #[pyo3(signature = (instrument = "generic", strategy_dirs = Vec::new()))]
    fn new(instrument: &str, strategy_dirs: Vec<String>) -> PyResult<Self> {
        let parsed_instrument = match instrument.to_lowercase().as_str() {
            "generic" => Instrument::Generic,
            "mwa" => Instrument::Mwa,
            "lofar" => Instrument::Lofar,
            "askap" => Instrument::Askap,
            _ => {
                return Err(PyValueError::new_err(
                    "Invalid instrument. Must be 'generic', 'mwa', 'lofar' or 'askap'.",
                ))
            }
        };

        let config = FlaggerConfig {
            instrument: parsed_instrument,
            strategy_dirs: strategy_dirs.into_iter().map(Into::into).collect(),
        };
        Ok(Self {
            inner: Flagger::with_config(config),
        })
    }

    /// Library version as a (major, minor, sub_minor) tuple.
    #[staticmethod]
    fn version() -> (u16, u16, u16) {
        Flagger::version()
    }

    #[pyo3(signature = (width, height, count, initial_value = 0.0, width_capacity = None))]
    fn make_image_set(
        &self,
        width: usize,
        height: usize,
        count: usize,
        initial_value: f32,
        width_capacity: Option<usize>,
    ) -> PyResult<PyImageSet> {
        let capacity = width_capacity.unwrap_or(width);
        let inner = self
            .inner
            .make_image_set(width, height, count, initial_value, capacity)?;
        Ok(PyImageSet { inner })
    }

    #[pyo3(signature = (width, height, initial_value = false))]
    fn make_flag_mask(
        &self,
        width: usize,
        height: usize,
        initial_value: bool,
    ) -> PyResult<PyFlagMask> {
        let inner = self.inner.make_flag_mask(width, height, initial_value)?;
        Ok(PyFlagMask { inner })
    }

    fn find_strategy_file(&self) -> PyResult<String> {
        Ok(self.inner.find_strategy_file()?)
    }

    fn load_strategy_file(&self, path: &str) -> PyResult<PyStrategy> {
        let inner = self.inner.load_strategy_file(path)?;
        Ok(PyStrategy { inner })
    }
}

//==================================================================================
// II. Handle classes
//==================================================================================

#[pyclass(name = "ImageSet", module = "flagkit")]
pub struct PyImageSet {
    pub(crate) inner: ImageSet,
}

#[pymethods]
impl PyImageSet {
    fn width(&self) -> usize {
        self.inner.width()
    }

    fn height(&self) -> usize {
        self.inner.height()
    }

    fn image_count(&self) -> usize {
        self.inner.image_count()
    }

    fn horizontal_stride(&self) -> usize {
        self.inner.horizontal_stride()
    }

    /// A copy of the logical `width * height` region of image `index`.
    /// The borrowed-slice contract lives on the Rust side; at this boundary
    /// a copy is the only view that cannot outlive its handle.
    fn image_buffer(&self, index: usize) -> PyResult<Vec<f32>> {
        if index >= self.inner.image_count() {
            return Err(PyIndexError::new_err(format!(
                "image index {} out of range (count {})",
                index,
                self.inner.image_count()
            )));
        }
        Ok(self.inner.image_buffer(index).to_vec())
    }

    /// Replaces the full backing buffer of image `index`
    /// (`height * horizontal_stride` floats, row-major).
    fn write_image_buffer(&mut self, index: usize, values: Vec<f32>) -> PyResult<()> {
        if index >= self.inner.image_count() {
            return Err(PyIndexError::new_err(format!(
                "image index {} out of range (count {})",
                index,
                self.inner.image_count()
            )));
        }
        let expected = self.inner.height() * self.inner.horizontal_stride();
        if values.len() != expected {
            return Err(PyValueError::new_err(format!(
                "expected {} floats (height * stride), got {}",
                expected,
                values.len()
            )));
        }
        self.inner.image_buffer_mut(index).copy_from_slice(&values);
        Ok(())
    }
}

#[pyclass(name = "FlagMask", module = "flagkit")]
pub struct PyFlagMask {
    pub(crate) inner: FlagMask,
}

#[pymethods]
impl PyFlagMask {
    fn width(&self) -> usize {
        self.inner.width()
    }

    fn height(&self) -> usize {
        self.inner.height()
    }

    fn horizontal_stride(&self) -> usize {
        self.inner.horizontal_stride()
    }

    /// The packed mask bytes (`width * height / 8`, MSB first).
    fn buffer<'py>(&self, py: Python<'py>) -> Bound<'py, PyBytes> {
        PyBytes::new_bound(py, self.inner.buffer())
    }

    fn get(&self, x: usize, y: usize) -> PyResult<bool> {
        if x >= self.inner.width() || y >= self.inner.height() {
            return Err(PyIndexError::new_err(format!(
                "sample ({}, {}) out of range ({}x{})",
                x,
                y,
                self.inner.width(),
                self.inner.height()
            )));
        }
        Ok(self.inner.get(x, y))
    }

    fn set(&mut self, x: usize, y: usize, value: bool) -> PyResult<()> {
        if x >= self.inner.width() || y >= self.inner.height() {
            return Err(PyIndexError::new_err(format!(
                "sample ({}, {}) out of range ({}x{})",
                x,
                y,
                self.inner.width(),
                self.inner.height()
            )));
        }
        self.inner.set(x, y, value);
        Ok(())
    }

    fn count_set(&self) -> usize {
        self.inner.count_set()
    }
}

#[pyclass(name = "Strategy", module = "flagkit")]
pub struct PyStrategy {
    pub(crate) inner: Strategy,
}

#[pymethods]
impl PyStrategy {
    fn name(&self) -> &str {
        self.inner.name()
    }

    /// Applies the strategy and returns a new FlagMask. Releases the GIL
    /// while the kernels run.
    fn run(
        &self,
        py: Python,
        images: &PyImageSet,
        existing_flags: &PyFlagMask,
    ) -> PyResult<PyFlagMask> {
        let inner = py.allow_threads(|| self.inner.run(&images.inner, &existing_flags.inner))?;
        Ok(PyFlagMask { inner })
    }
}

//==================================================================================
// III. Module-Level Functions
//==================================================================================

/// Library version as a (major, minor, sub_minor) tuple, independent of any
/// facade instance.
#[pyfunction]
#[pyo3(name = "version")]
pub fn version_py() -> (u16, u16, u16) {
    Flagger::version()
}

static INIT_LOGGER: Once = Once::new();

#[pyfunction]
#[pyo3(name = "enable_verbose_logging")]
pub fn enable_verbose_logging_py() {
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Debug);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        let _ = builder.try_init();
    });
}
