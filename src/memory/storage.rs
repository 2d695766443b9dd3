//! Process-wide segment tables
//!
//! A [`StorageModel`] is a zero-sized handle naming one segment table. The table
//! itself lives in thread-local storage, so coordinates and fancy pointers can
//! resolve lazily (at the moment of use) without carrying a reference to it.
//!
//! [`PrivateStorage`] is the default model: up to [`MAX_SEGMENTS`] segments of
//! [`MAX_SEGMENT_SIZE`] bytes. Further independent models with other limits are
//! declared with [`storage_model!`](crate::storage_model).
//!
//! # Single-threaded model
//!
//! Each thread sees its own table. Within a thread every operation runs to
//! completion before the next starts, so a relocation is never observed half
//! done. Operations must not be nested: resolving a coordinate from inside a
//! `with_table_mut` closure panics on the `RefCell` borrow.

use super::address::SegmentedAddress;
use super::segment::{SegmentTable, SegmentView};
use super::{FIRST_SEGMENT, MAX_SEGMENTS, MAX_SEGMENT_SIZE};
use crate::errors::MemoryError;
use std::cell::RefCell;
use std::fmt;
use std::ptr::NonNull;
use std::thread::LocalKey;

/// Handle to a thread-local segment table
pub trait StorageModel: Copy + Default + fmt::Debug + 'static {
    /// The thread-local cell holding this model's table
    fn table() -> &'static LocalKey<RefCell<SegmentTable>>;

    /// Run `f` with shared access to the table
    fn with_table<R>(f: impl FnOnce(&SegmentTable) -> R) -> R {
        Self::table().with(|table| f(&table.borrow()))
    }

    /// Run `f` with exclusive access to the table
    fn with_table_mut<R>(f: impl FnOnce(&mut SegmentTable) -> R) -> R {
        Self::table().with(|table| f(&mut table.borrow_mut()))
    }

    fn first_segment() -> usize {
        FIRST_SEGMENT
    }

    fn max_segment_count() -> usize {
        Self::with_table(|table| table.max_segment_count())
    }

    fn max_segment_size() -> usize {
        Self::with_table(|table| table.max_segment_size())
    }

    /// Allocate segment `id` with the maximum segment size
    fn allocate_segment(id: usize) -> Result<(), MemoryError> {
        Self::with_table_mut(|table| table.allocate(id))
    }

    /// Allocate segment `id` with `size` bytes
    fn allocate_segment_with_size(id: usize, size: usize) -> Result<(), MemoryError> {
        Self::with_table_mut(|table| table.allocate_with_size(id, size))
    }

    /// Release segment `id`
    ///
    /// # Safety
    ///
    /// No reference into the segment may be alive, and no fancy pointer naming
    /// it may be dereferenced afterwards.
    unsafe fn deallocate_segment(id: usize) -> bool {
        Self::with_table_mut(|table| table.deallocate(id))
    }

    /// Release every segment
    ///
    /// # Safety
    ///
    /// Same contract as [`StorageModel::deallocate_segment`], for all segments.
    unsafe fn clear_segments() {
        Self::with_table_mut(|table| table.clear_all())
    }

    /// Relocate every segment to new storage
    ///
    /// Coordinates and fancy pointers stay valid; raw addresses resolved earlier
    /// do not.
    ///
    /// # Safety
    ///
    /// No reference or raw pointer obtained by resolving a coordinate of this
    /// model may be used after the call.
    unsafe fn relocate_all() {
        Self::with_table_mut(|table| table.relocate_all())
    }

    fn segment_address(id: usize) -> Option<NonNull<u8>> {
        Self::with_table(|table| table.segment_address(id))
    }

    fn segment_size(id: usize) -> usize {
        Self::with_table(|table| table.segment_size(id))
    }

    fn segment_views() -> Vec<SegmentView> {
        Self::with_table(|table| table.views())
    }

    fn generation() -> u64 {
        Self::with_table(|table| table.generation())
    }

    /// Coordinate of byte `offset` in segment `id`
    fn segment_pointer(id: usize, offset: usize) -> SegmentedAddress<Self> {
        SegmentedAddress::new(id, offset)
    }
}

/// Declare a unit struct implementing [`StorageModel`] with its own table
///
/// ```
/// segptr::storage_model! {
///     /// Tiny segments for boundary tests
///     pub TinyStorage, segments = 3, segment_size = 256
/// }
/// ```
#[macro_export]
macro_rules! storage_model {
    ($(#[$meta:meta])* $vis:vis $name:ident, segments = $count:expr, segment_size = $size:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::memory::StorageModel for $name {
            fn table() -> &'static ::std::thread::LocalKey<
                ::std::cell::RefCell<$crate::memory::SegmentTable>,
            > {
                ::std::thread_local! {
                    static TABLE: ::std::cell::RefCell<$crate::memory::SegmentTable> =
                        ::std::cell::RefCell::new($crate::memory::SegmentTable::new($count, $size));
                }
                &TABLE
            }
        }
    };
}

storage_model! {
    /// The default storage model: 8 segments of 4 MiB
    pub PrivateStorage, segments = MAX_SEGMENTS, segment_size = MAX_SEGMENT_SIZE
}
