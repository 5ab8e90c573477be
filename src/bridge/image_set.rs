// In: src/bridge/image_set.rs

use std::sync::Arc;

use crate::engine::image::ImageBuf;

/// An owning handle around a collection of equally sized 2-D float images.
///
/// Cloning the handle shares the underlying collection (reference counted;
/// it lives as long as the longest holder). Buffer views borrow from the
/// handle and cannot outlive it.
#[derive(Debug, Clone)]
pub struct ImageSet {
    inner: Arc<ImageBuf>,
}

impl ImageSet {
    /// Wraps an already-constructed image collection, establishing shared
    /// ownership.
    pub(crate) fn from_buf(buf: ImageBuf) -> Self {
        Self {
            inner: Arc::new(buf),
        }
    }

    pub(crate) fn buf(&self) -> &ImageBuf {
        &self.inner
    }

    /// Width of every image, in pixels.
    pub fn width(&self) -> usize {
        self.inner.width()
    }

    /// Height of every image, in pixels.
    pub fn height(&self) -> usize {
        self.inner.height()
    }

    /// Number of images in the collection.
    pub fn image_count(&self) -> usize {
        self.inner.image_count()
    }

    /// Horizontal stride of every image, in pixels. At least `width()`.
    pub fn horizontal_stride(&self) -> usize {
        self.inner.horizontal_stride()
    }

    /// A view of length `width() * height()` into image `index`. Rows sit
    /// `horizontal_stride()` apart in the backing buffer.
    ///
    /// # Panics
    /// Panics if `index >= image_count()`.
    pub fn image_buffer(&self, index: usize) -> &[f32] {
        let len = self.width() * self.height();
        &self.inner.plane(index)[..len]
    }

    /// Mutable view of the full backing buffer of image `index`
    /// (`height() * horizontal_stride()` floats).
    ///
    /// If the collection is shared with another handle it is detached first
    /// (copy-on-write): writes through this view are never observed by other
    /// holders.
    ///
    /// # Panics
    /// Panics if `index >= image_count()`.
    pub fn image_buffer_mut(&mut self, index: usize) -> &mut [f32] {
        Arc::make_mut(&mut self.inner).plane_mut(index)
    }
}

impl Default for ImageSet {
    /// An empty, zero-sized instance.
    fn default() -> Self {
        Self::from_buf(ImageBuf::empty())
    }
}
