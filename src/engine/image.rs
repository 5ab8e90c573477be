// In: src/engine/image.rs

//! Owned storage for a collection of 2-D float images that share a single
//! geometry.
//!
//! Each image is one contiguous `f32` buffer of `height * stride` elements
//! in row-major order; the logical sub-region is `width * height`. The
//! stride is at least the width so rows can be padded out for alignment.

use crate::error::FlagError;

/// An owned image collection: `count` planes of `height x stride` floats.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuf {
    width: usize,
    height: usize,
    stride: usize,
    images: Vec<Vec<f32>>,
}

impl ImageBuf {
    /// An empty, zero-sized collection. This is what a default-constructed
    /// handle wraps.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            stride: 0,
            images: Vec::new(),
        }
    }

    /// Allocates `count` images of `width x height` with every pixel set to
    /// `initial_value`. `width_capacity` becomes the horizontal stride and
    /// must be at least `width`.
    pub fn new(
        width: usize,
        height: usize,
        count: usize,
        initial_value: f32,
        width_capacity: usize,
    ) -> Result<Self, FlagError> {
        if width == 0 || height == 0 || count == 0 {
            return Err(FlagError::InvalidDimensions(format!(
                "image set dimensions must be nonzero, got {}x{}x{}",
                width, height, count
            )));
        }
        if width_capacity < width {
            return Err(FlagError::InvalidDimensions(format!(
                "width capacity {} is smaller than width {}",
                width_capacity, width
            )));
        }
        let images = (0..count)
            .map(|_| vec![initial_value; height * width_capacity])
            .collect();
        Ok(Self {
            width,
            height,
            stride: width_capacity,
            images,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn horizontal_stride(&self) -> usize {
        self.stride
    }

    /// The full backing buffer of image `index` (`height * stride` floats).
    ///
    /// # Panics
    /// Panics if `index >= image_count()`; staying in range is a caller
    /// invariant, not a recoverable condition.
    pub fn plane(&self, index: usize) -> &[f32] {
        &self.images[index]
    }

    /// Mutable access to the full backing buffer of image `index`.
    ///
    /// # Panics
    /// Panics if `index >= image_count()`.
    pub fn plane_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.images[index]
    }

    /// The pixel of image `index` at `(x, y)`, honoring the stride.
    pub fn sample(&self, index: usize, x: usize, y: usize) -> f32 {
        self.images[index][y * self.stride + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_echoes_geometry_and_fills() {
        let buf = ImageBuf::new(3, 4, 2, 7.5, 8).unwrap();
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 4);
        assert_eq!(buf.image_count(), 2);
        assert_eq!(buf.horizontal_stride(), 8);
        assert_eq!(buf.plane(0).len(), 4 * 8);
        assert!(buf.plane(1).iter().all(|&v| v == 7.5));
    }

    #[test]
    fn test_zero_dimensions_are_rejected() {
        assert!(matches!(
            ImageBuf::new(0, 4, 2, 0.0, 4),
            Err(FlagError::InvalidDimensions(_))
        ));
        assert!(matches!(
            ImageBuf::new(4, 0, 2, 0.0, 4),
            Err(FlagError::InvalidDimensions(_))
        ));
        assert!(matches!(
            ImageBuf::new(4, 4, 0, 0.0, 4),
            Err(FlagError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_stride_below_width_is_rejected() {
        assert!(matches!(
            ImageBuf::new(8, 4, 1, 0.0, 6),
            Err(FlagError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_sample_honors_stride() {
        let mut buf = ImageBuf::new(2, 2, 1, 0.0, 5).unwrap();
        buf.plane_mut(0)[1 * 5 + 1] = 42.0;
        assert_eq!(buf.sample(0, 1, 1), 42.0);
        assert_eq!(buf.sample(0, 0, 1), 0.0);
    }

    #[test]
    #[should_panic]
    fn test_plane_out_of_range_panics() {
        let buf = ImageBuf::new(2, 2, 1, 0.0, 2).unwrap();
        let _ = buf.plane(1);
    }
}
