//! Segmented memory model
//!
//! This module provides the core memory abstractions:
//! - [`segment`]: the segment table, owning live and shadow buffers per segment id
//! - [`storage`]: the process-wide table instance and the [`StorageModel`] handle trait
//! - [`address`]: the packed `(segment, offset)` coordinate and the [`AddressingModel`] trait
//!
//! # Coordinates
//!
//! A coordinate is one 64-bit word:
//! ```text
//!  63          48 47                                            0
//! +--------------+-----------------------------------------------+
//! |  segment id  |                   offset                      |
//! +--------------+-----------------------------------------------+
//! ```
//! Segment ids below [`FIRST_SEGMENT`] are reserved: the offset field then holds
//! a literal address, so ordinary (non-segmented) memory round-trips through a
//! coordinate unchanged. The all-zero word is the null coordinate.
//!
//! # Pointer Arithmetic
//!
//! Arithmetic is scaled by element size:
//! ```text
//! ptr + n  →  offset + (n * size_of::<T>())
//! ```
//!
//! Helper functions [`scaled_offset`] and [`element_distance`] handle this scaling.

pub mod address;
pub mod segment;
pub mod storage;

pub use address::{AddressingModel, SegmentedAddress};
pub use segment::{SegmentTable, SegmentView};
pub use storage::{PrivateStorage, StorageModel};

/// First segment id that maps to managed storage; ids below it are reserved
pub const FIRST_SEGMENT: usize = 2;

/// Default number of usable segment ids
pub const MAX_SEGMENTS: usize = 8;

/// Default (and maximum) segment size: 4 MiB
pub const MAX_SEGMENT_SIZE: usize = 1 << 22;

/// Width of the offset field in a coordinate
pub const OFFSET_BITS: u32 = 48;

/// Mask selecting the offset field of a packed coordinate
pub const OFFSET_MASK: u64 = (1u64 << OFFSET_BITS) - 1;

/// Largest segment id a coordinate can carry
pub const MAX_SEGMENT_ID: usize = u16::MAX as usize;

/// Round `n` up to the next multiple of `align` (`align` must be a power of two)
pub fn round_up(n: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    n.checked_add(align - 1).map(|v| v & !(align - 1))
}

/// Byte offset of `count` elements of `T` (wrapping, like raw pointer arithmetic)
pub fn scaled_offset<T>(count: isize) -> isize {
    count.wrapping_mul(std::mem::size_of::<T>() as isize)
}

/// Number of whole `T` elements in a byte distance
///
/// # Panics
///
/// Panics if `T` is zero-sized, as `pointer::offset_from` does.
pub fn element_distance<T>(bytes: isize) -> isize {
    let size = std::mem::size_of::<T>();
    assert!(size != 0, "element distance of a zero-sized type");
    bytes / size as isize
}
