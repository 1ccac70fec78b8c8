//! Growth-only pixel storage
//!
//! Tracks a logical length separately from the allocated capacity so that
//! windows which shrink and grow again do not reallocate.

use alloc::vec::Vec;

use super::WindowError;

/// Grayscale pixel buffer, one byte per pixel
#[derive(Debug, Default)]
pub struct PixelBuffer {
    data: Vec<u8>,
    len: usize,
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer of `len` pixels
    pub fn new(len: usize) -> Result<Self, WindowError> {
        let mut buffer = Self::default();
        buffer.resize(len)?;
        Ok(buffer)
    }

    /// Change the logical length
    ///
    /// Growing past the capacity replaces the storage with a zero-filled
    /// allocation; existing content is discarded. Otherwise the storage is
    /// reused untouched. Returns `true` if a reallocation happened.
    pub fn resize(&mut self, len: usize) -> Result<bool, WindowError> {
        let reserved = self.reserve(len)?;
        Ok(self.apply(reserved))
    }

    /// Allocate whatever a resize to `len` needs without touching `self`
    pub fn reserve(&self, len: usize) -> Result<Reserved, WindowError> {
        if len <= self.data.len() {
            return Ok(Reserved { data: None, len });
        }

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| WindowError::OutOfMemory)?;
        data.resize(len, 0);
        Ok(Reserved {
            data: Some(data),
            len,
        })
    }

    /// Finish a resize prepared by [`reserve`](Self::reserve)
    ///
    /// Cannot fail. Returns `true` if the storage was replaced.
    pub fn apply(&mut self, reserved: Reserved) -> bool {
        self.len = reserved.len;
        match reserved.data {
            Some(data) => {
                self.data = data;
                true
            }
            None => false,
        }
    }

    /// Logical length in pixels
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the logical length is zero
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated capacity in pixels
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Pixels within the logical length
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Mutable pixels within the logical length
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..self.len]
    }
}

/// Storage set aside for a pending resize
#[derive(Debug)]
pub struct Reserved {
    data: Option<Vec<u8>>,
    len: usize,
}
