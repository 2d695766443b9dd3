//! Growable array in relocatable storage

use crate::errors::MemoryError;
use crate::pointer::FancyPtr;
use crate::strategy::{AllocationStrategy, LeakyStrategy};
use std::borrow::Cow;
use std::fmt;
use std::ops::Index;
use std::ptr;
use std::slice;

/// Smallest non-zero capacity
const MIN_CAPACITY: usize = 4;

/// A `Vec`-like array whose buffer is addressed by a fancy pointer
pub struct RelocatableVec<T, S: AllocationStrategy = LeakyStrategy> {
    buf: FancyPtr<T, S::Address>,
    len: usize,
    cap: usize,
    strategy: S,
}

impl<T, S: AllocationStrategy> RelocatableVec<T, S> {
    pub fn new() -> Self {
        Self::with_strategy(S::default())
    }

    pub fn with_strategy(strategy: S) -> Self {
        RelocatableVec {
            buf: FancyPtr::null(),
            len: 0,
            cap: 0,
            strategy,
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, MemoryError> {
        let mut vec = Self::new();
        vec.reserve(capacity)?;
        Ok(vec)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Fancy pointer to the first element (null before the first allocation)
    pub fn as_fancy_ptr(&self) -> FancyPtr<T, S::Address> {
        self.buf
    }

    /// Make room for at least `additional` more elements
    pub fn reserve(&mut self, additional: usize) -> Result<(), MemoryError> {
        let needed = self
            .len
            .checked_add(additional)
            .ok_or(MemoryError::SizeOverflow {
                count: additional,
                elem_size: std::mem::size_of::<T>(),
            })?;
        if needed <= self.cap {
            return Ok(());
        }

        let new_cap = needed.max(self.cap * 2).max(MIN_CAPACITY);
        let new_buf = self.strategy.allocate_array::<T>(new_cap)?;

        if self.len > 0 {
            // SAFETY: both buffers hold at least `len` elements and are distinct chunks
            unsafe {
                ptr::copy_nonoverlapping(self.buf.as_ptr(), new_buf.as_mut_ptr(), self.len);
            }
        }
        if !self.buf.is_null() {
            self.strategy.deallocate(self.buf.cast_void());
        }

        self.buf = new_buf;
        self.cap = new_cap;
        Ok(())
    }

    pub fn push(&mut self, value: T) -> Result<(), MemoryError> {
        if self.len == self.cap {
            self.reserve(1)?;
        }
        // SAFETY: `len < cap`, the slot is allocated and uninitialized
        unsafe { self.buf.add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot was initialized and is now outside `len`
        Some(unsafe { self.buf.add(self.len).read() })
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Elements, resolved under the current segment layout
    pub fn as_slice(&self) -> &[T] {
        if self.cap == 0 {
            return &[];
        }
        // SAFETY: `buf` addresses `len` initialized elements
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.cap == 0 {
            return &mut [];
        }
        // SAFETY: as in `as_slice`, and `&mut self` gives exclusive access
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Drop every element, keeping the buffer
    pub fn clear(&mut self) {
        let len = self.len;
        self.len = 0;
        if len > 0 {
            // SAFETY: the first `len` slots were initialized
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.buf.as_mut_ptr(), len));
            }
        }
    }
}

impl<T: Clone, S: AllocationStrategy> RelocatableVec<T, S> {
    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<(), MemoryError> {
        self.reserve(values.len())?;
        for value in values {
            self.push(value.clone())?;
        }
        Ok(())
    }
}

impl<S: AllocationStrategy> RelocatableVec<u8, S> {
    /// Byte string holding a copy of `text`
    pub fn from_str_in(text: &str, strategy: S) -> Result<Self, MemoryError> {
        let mut vec = Self::with_strategy(strategy);
        vec.extend_from_slice(text.as_bytes())?;
        Ok(vec)
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_slice())
    }
}

impl<T, S: AllocationStrategy> Default for RelocatableVec<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: AllocationStrategy> Drop for RelocatableVec<T, S> {
    fn drop(&mut self) {
        self.clear();
        if !self.buf.is_null() {
            self.strategy.deallocate(self.buf.cast_void());
        }
    }
}

impl<T, S: AllocationStrategy> Index<usize> for RelocatableVec<T, S> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<'a, T, S: AllocationStrategy> IntoIterator for &'a RelocatableVec<T, S> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug, S: AllocationStrategy> fmt::Debug for RelocatableVec<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
