//! Error types for the segmented memory model
//!
//! This module defines [`MemoryError`], the single error type returned by the
//! segment table, the addressing model, the allocation strategy and the
//! containers built on top of them.
//!
//! Two situations are *not* errors:
//! - an address outside every segment is a valid coordinate (it is stored as a
//!   literal address under a reserved segment id)
//! - the plain pointer arithmetic operators wrap exactly like raw pointer
//!   arithmetic; the `checked_*` variants report [`MemoryError::OffsetOutOfSegment`]

use std::fmt;

/// Errors raised by segment, addressing and allocation operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// Segment id is reserved or beyond the table
    SegmentOutOfRange { id: usize, first: usize, end: usize },

    /// Requested segment size exceeds the table's maximum
    SegmentTooLarge { size: usize, limit: usize },

    /// Zero-byte segments cannot be backed by an allocation
    ZeroSizedSegment { id: usize },

    /// Segment id already has storage
    SegmentAlreadyAllocated { id: usize },

    /// Coordinate names a segment without storage (deallocated or never allocated)
    SegmentNotAllocated { id: usize },

    /// Offset falls outside its segment (arithmetic crossed a segment boundary)
    OffsetOutOfSegment { id: usize, offset: i64, size: usize },

    /// Allocation request larger than the strategy's `max_size()`
    CapacityExceeded { requested: usize, limit: usize },

    /// Bump cursor ran past the last usable segment
    PoolExhausted { segment: usize },

    /// Element alignment stricter than chunk alignment
    UnsupportedAlignment { align: usize, limit: usize },

    /// Size computation overflowed `usize`
    SizeOverflow { count: usize, elem_size: usize },
}

impl MemoryError {
    /// The segment id involved in the error, if any
    pub fn segment(&self) -> Option<usize> {
        match self {
            MemoryError::SegmentOutOfRange { id, .. } => Some(*id),
            MemoryError::ZeroSizedSegment { id } => Some(*id),
            MemoryError::SegmentAlreadyAllocated { id } => Some(*id),
            MemoryError::SegmentNotAllocated { id } => Some(*id),
            MemoryError::OffsetOutOfSegment { id, .. } => Some(*id),
            MemoryError::PoolExhausted { segment } => Some(*segment),
            MemoryError::SegmentTooLarge { .. } => None,
            MemoryError::CapacityExceeded { .. } => None,
            MemoryError::UnsupportedAlignment { .. } => None,
            MemoryError::SizeOverflow { .. } => None,
        }
    }
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::SegmentOutOfRange { id, first, end } => {
                write!(
                    f,
                    "Segment {} is outside the usable range {}..{}",
                    id, first, end
                )
            }
            MemoryError::SegmentTooLarge { size, limit } => {
                write!(
                    f,
                    "Segment size {} bytes exceeds the limit of {} bytes",
                    size, limit
                )
            }
            MemoryError::ZeroSizedSegment { id } => {
                write!(f, "Segment {} cannot be allocated with zero size", id)
            }
            MemoryError::SegmentAlreadyAllocated { id } => {
                write!(f, "Segment {} is already allocated", id)
            }
            MemoryError::SegmentNotAllocated { id } => {
                write!(f, "Segment {} is not allocated", id)
            }
            MemoryError::OffsetOutOfSegment { id, offset, size } => {
                write!(
                    f,
                    "Offset {} is outside segment {} of size {}",
                    offset, id, size
                )
            }
            MemoryError::CapacityExceeded { requested, limit } => {
                write!(
                    f,
                    "Allocation of {} bytes exceeds the maximum of {} bytes",
                    requested, limit
                )
            }
            MemoryError::PoolExhausted { segment } => {
                write!(
                    f,
                    "Segment pool exhausted: no usable segment after {}",
                    segment
                )
            }
            MemoryError::UnsupportedAlignment { align, limit } => {
                write!(
                    f,
                    "Alignment of {} bytes is stricter than the chunk alignment of {}",
                    align, limit
                )
            }
            MemoryError::SizeOverflow { count, elem_size } => {
                write!(
                    f,
                    "Size of {} element{} of {} bytes overflows",
                    count,
                    if *count == 1 { "" } else { "s" },
                    elem_size
                )
            }
        }
    }
}

impl std::error::Error for MemoryError {}
