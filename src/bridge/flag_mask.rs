// In: src/bridge/flag_mask.rs

use std::sync::Arc;

use crate::engine::mask::MaskBuf;

/// An owning handle around a packed-bit flag mask.
///
/// One bit per time/frequency sample; a set bit marks the sample as
/// contaminated. Same ownership model as [`crate::ImageSet`]: cloning
/// shares the underlying mask, views borrow from the handle.
#[derive(Debug, Clone)]
pub struct FlagMask {
    inner: Arc<MaskBuf>,
}

impl FlagMask {
    /// Wraps an already-constructed mask, establishing shared ownership.
    pub(crate) fn from_buf(buf: MaskBuf) -> Self {
        Self {
            inner: Arc::new(buf),
        }
    }

    pub(crate) fn buf(&self) -> &MaskBuf {
        &self.inner
    }

    /// Width in samples.
    pub fn width(&self) -> usize {
        self.inner.width()
    }

    /// Height in samples.
    pub fn height(&self) -> usize {
        self.inner.height()
    }

    /// Horizontal stride in samples. Packed rows are dense, so this equals
    /// `width()`.
    pub fn horizontal_stride(&self) -> usize {
        self.inner.horizontal_stride()
    }

    /// The packed mask bytes, length `width() * height() / 8`, most
    /// significant bit first within each byte.
    pub fn buffer(&self) -> &[u8] {
        self.inner.bytes()
    }

    /// Mutable access to the packed mask bytes. Detaches from other holders
    /// first (copy-on-write), like
    /// [`ImageSet::image_buffer_mut`](crate::ImageSet::image_buffer_mut).
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        Arc::make_mut(&mut self.inner).bytes_mut()
    }

    /// The flag at `(x, y)`.
    ///
    /// # Panics
    /// Panics if `x >= width()` or `y >= height()`.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.inner.get(x, y)
    }

    /// Sets the flag at `(x, y)`, detaching from other holders first.
    ///
    /// # Panics
    /// Panics if `x >= width()` or `y >= height()`.
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        Arc::make_mut(&mut self.inner).set(x, y, value);
    }

    /// Number of flagged samples.
    pub fn count_set(&self) -> usize {
        self.inner.count_set()
    }
}

impl Default for FlagMask {
    /// An empty, zero-sized instance.
    fn default() -> Self {
        Self::from_buf(MaskBuf::empty())
    }
}
