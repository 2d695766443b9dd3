//! Allocation strategies
//!
//! An [`AllocationStrategy`] carves storage into chunks and hands them out as
//! [`VoidPtr`]s. Containers only see the strategy through this trait, so a
//! reclaiming allocator can replace the bump strategy in [`leaky`] without any
//! change to coordinates or fancy pointers.

pub mod leaky;

pub use leaky::LeakyStrategy;

use crate::errors::MemoryError;
use crate::memory::AddressingModel;
use crate::pointer::{FancyPtr, VoidPtr};
use std::fmt;
use std::mem;

/// Alignment (and size granularity) of every chunk
pub const CHUNK_ALIGN: usize = 16;

/// Number of segments allocated up front on first use
pub const POOL_SEGMENTS: usize = 4;

/// Source of relocatable storage
pub trait AllocationStrategy: Copy + Default + fmt::Debug {
    /// Coordinate type of the pointers this strategy returns
    type Address: AddressingModel;

    /// Largest single request, in bytes
    fn max_size(&self) -> usize;

    /// Allocate `n` bytes aligned to [`CHUNK_ALIGN`]
    fn allocate(&self, n: usize) -> Result<VoidPtr<Self::Address>, MemoryError>;

    /// Return a chunk obtained from [`AllocationStrategy::allocate`]
    fn deallocate(&self, ptr: VoidPtr<Self::Address>);

    /// Move all storage of this strategy to new locations
    ///
    /// # Safety
    ///
    /// No reference or raw pointer into the storage may be used after the call.
    unsafe fn relocate(&self);

    /// Allocate uninitialized room for `count` values of `T`
    fn allocate_array<T>(&self, count: usize) -> Result<FancyPtr<T, Self::Address>, MemoryError> {
        if mem::align_of::<T>() > CHUNK_ALIGN {
            return Err(MemoryError::UnsupportedAlignment {
                align: mem::align_of::<T>(),
                limit: CHUNK_ALIGN,
            });
        }

        let bytes = count
            .checked_mul(mem::size_of::<T>())
            .ok_or(MemoryError::SizeOverflow {
                count,
                elem_size: mem::size_of::<T>(),
            })?;

        self.allocate(bytes).map(VoidPtr::cast)
    }

    /// Move `value` into freshly allocated storage
    fn emplace<T>(&self, value: T) -> Result<FancyPtr<T, Self::Address>, MemoryError> {
        let ptr = self.allocate_array::<T>(1)?;
        // SAFETY: fresh, aligned chunk large enough for one `T`
        unsafe { ptr.write(value) };
        Ok(ptr)
    }
}
