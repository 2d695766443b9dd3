//! Segmented addressing
//!
//! [`SegmentedAddress`] is the coordinate every fancy pointer stores: a 16-bit
//! segment id and a 48-bit offset packed into one word. It never caches a linear
//! address; [`SegmentedAddress::resolve`] looks the segment base up in the
//! storage model's table each time it is called.
//!
//! # Ordering
//!
//! Coordinates compare by the address they resolve to, not by their bits. Two
//! coordinates in different segments therefore order the way their data is laid
//! out in memory right now, which is what raw pointers into the same data would
//! report.
//!
//! # Null
//!
//! The null coordinate is the all-zero word. [`SegmentedAddress::is_null`] tests
//! that bit pattern only; a coordinate that happens to resolve to address zero is
//! not null.

use super::segment::SegmentTable;
use super::storage::{PrivateStorage, StorageModel};
use super::{FIRST_SEGMENT, MAX_SEGMENT_ID, OFFSET_BITS, OFFSET_MASK};
use crate::errors::MemoryError;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// The contract a fancy pointer needs from its stored address
///
/// Implementations decide how an address is represented and resolved; fancy
/// pointers only ever go through these operations.
pub trait AddressingModel: Copy + fmt::Debug + 'static {
    /// The null address
    fn null() -> Self;

    /// Whether this is the null address (bit pattern test)
    fn is_null(&self) -> bool;

    /// Linear address of the addressed byte, resolved now
    fn address(&self) -> *mut u8;

    /// Linear address, rejecting addresses that do not name live storage
    fn try_address(&self) -> Result<*mut u8, MemoryError>;

    /// Address that resolves to `addr`
    fn from_raw(addr: *const u8) -> Self;

    /// Move forward by `bytes` (wrapping, unchecked)
    fn increment(&mut self, bytes: isize);

    /// Move backward by `bytes` (wrapping, unchecked)
    fn decrement(&mut self, bytes: isize);

    /// Move by `bytes`, failing if the result leaves the addressed region
    fn checked_offset(&self, bytes: isize) -> Result<Self, MemoryError>;

    /// Null is equal only to null, whatever a non-null address resolves to
    fn equals(&self, other: &Self) -> bool {
        match (self.is_null(), other.is_null()) {
            (false, false) => self.address() == other.address(),
            (a, b) => a == b,
        }
    }

    /// Null orders before every non-null address
    fn compare(&self, other: &Self) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (false, false) => self.address().cmp(&other.address()),
            (a, b) => b.cmp(&a),
        }
    }

    fn equals_raw(&self, addr: *const u8) -> bool {
        self.address() as *const u8 == addr
    }

    fn compare_raw(&self, addr: *const u8) -> Ordering {
        (self.address() as *const u8).cmp(&addr)
    }
}

/// A packed `(segment, offset)` coordinate resolved through storage model `S`
pub struct SegmentedAddress<S: StorageModel = PrivateStorage> {
    bits: u64,
    _model: PhantomData<fn() -> S>,
}

impl<S: StorageModel> SegmentedAddress<S> {
    /// The null coordinate
    pub const fn null() -> Self {
        SegmentedAddress {
            bits: 0,
            _model: PhantomData,
        }
    }

    /// Coordinate of byte `offset` in segment `segment`
    pub fn new(segment: usize, offset: usize) -> Self {
        debug_assert!(segment <= MAX_SEGMENT_ID, "segment id {} too large", segment);
        debug_assert!(offset as u64 <= OFFSET_MASK, "offset {} too large", offset);
        Self::from_bits(((segment as u64) << OFFSET_BITS) | (offset as u64 & OFFSET_MASK))
    }

    /// Coordinate from its packed representation
    pub const fn from_bits(bits: u64) -> Self {
        SegmentedAddress {
            bits,
            _model: PhantomData,
        }
    }

    /// Packed representation
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    pub fn offset(&self) -> usize {
        (self.bits & OFFSET_MASK) as usize
    }

    pub fn segment(&self) -> usize {
        (self.bits >> OFFSET_BITS) as usize
    }

    pub fn is_null(&self) -> bool {
        self.bits == 0
    }

    /// Whether the coordinate holds a literal address (reserved segment id)
    pub fn is_unmanaged(&self) -> bool {
        SegmentTable::is_reserved(self.segment())
    }

    /// Linear address of the addressed byte under the current segment layout
    pub fn resolve(&self) -> *mut u8 {
        let (segment, offset) = (self.segment(), self.offset());
        S::with_table(|table| table.resolve(segment, offset))
    }

    /// Like [`SegmentedAddress::resolve`], but fails for unallocated segments and
    /// offsets past the end of the segment
    pub fn try_resolve(&self) -> Result<*mut u8, MemoryError> {
        let (segment, offset) = (self.segment(), self.offset());
        S::with_table(|table| table.try_resolve(segment, offset))
    }

    /// Coordinate resolving to `addr`
    ///
    /// Addresses inside an allocated segment become `(id, offset)`; any other
    /// address is kept literally under reserved segment 0.
    pub fn from_raw(addr: *const u8) -> Self {
        match S::with_table(|table| table.locate(addr)) {
            Some((segment, offset)) => Self::new(segment, offset),
            None => Self::unmanaged(addr as usize),
        }
    }

    fn unmanaged(addr: usize) -> Self {
        debug_assert!(
            addr as u64 <= OFFSET_MASK,
            "address {:#x} does not fit a coordinate",
            addr
        );
        Self::from_bits(addr as u64 & OFFSET_MASK)
    }

    /// Re-point this coordinate at `addr`
    pub fn assign_from(&mut self, addr: *const u8) {
        *self = Self::from_raw(addr);
    }

    /// Add `bytes` to the packed word
    ///
    /// Only the offset changes as long as the result stays inside the segment.
    /// Crossing a segment boundary is out of contract and produces a
    /// meaningless coordinate, as out-of-bounds raw pointer arithmetic would.
    pub fn advance(&mut self, bytes: isize) {
        self.bits = self.bits.wrapping_add(bytes as u64);
    }

    /// Subtract `bytes` from the packed word (see [`SegmentedAddress::advance`])
    pub fn retreat(&mut self, bytes: isize) {
        self.bits = self.bits.wrapping_sub(bytes as u64);
    }

    /// Coordinate `bytes` away, staying within `[0, size]` of the same segment
    pub fn checked_offset(&self, bytes: isize) -> Result<Self, MemoryError> {
        let segment = self.segment();
        let target = (self.offset() as i64).checked_add(bytes as i64);

        let limit = if self.is_unmanaged() {
            OFFSET_MASK as usize
        } else {
            match S::with_table(|table| table.is_allocated(segment).then(|| table.segment_size(segment))) {
                Some(size) => size,
                None => return Err(MemoryError::SegmentNotAllocated { id: segment }),
            }
        };

        match target {
            Some(offset) if offset >= 0 && offset as u64 <= limit as u64 => {
                Ok(Self::new(segment, offset as usize))
            }
            _ => Err(MemoryError::OffsetOutOfSegment {
                id: segment,
                offset: target.unwrap_or(i64::MAX),
                size: limit,
            }),
        }
    }
}

impl<S: StorageModel> Clone for SegmentedAddress<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: StorageModel> Copy for SegmentedAddress<S> {}

impl<S: StorageModel> Default for SegmentedAddress<S> {
    fn default() -> Self {
        Self::null()
    }
}

impl<S: StorageModel> PartialEq for SegmentedAddress<S> {
    fn eq(&self, other: &Self) -> bool {
        AddressingModel::equals(self, other)
    }
}

impl<S: StorageModel> Eq for SegmentedAddress<S> {}

impl<S: StorageModel> PartialOrd for SegmentedAddress<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: StorageModel> Ord for SegmentedAddress<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        AddressingModel::compare(self, other)
    }
}

impl<S: StorageModel> fmt::Debug for SegmentedAddress<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentedAddress")
            .field("segment", &self.segment())
            .field("offset", &self.offset())
            .finish()
    }
}

impl<S: StorageModel> fmt::Display for SegmentedAddress<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segment() < FIRST_SEGMENT {
            write!(f, "--:{:#014x}", self.offset())
        } else {
            write!(f, "{:02}:{:#08x}", self.segment(), self.offset())
        }
    }
}

impl<S: StorageModel> AddressingModel for SegmentedAddress<S> {
    fn null() -> Self {
        SegmentedAddress::null()
    }

    fn is_null(&self) -> bool {
        SegmentedAddress::is_null(self)
    }

    fn address(&self) -> *mut u8 {
        self.resolve()
    }

    fn try_address(&self) -> Result<*mut u8, MemoryError> {
        self.try_resolve()
    }

    fn from_raw(addr: *const u8) -> Self {
        SegmentedAddress::from_raw(addr)
    }

    fn increment(&mut self, bytes: isize) {
        self.advance(bytes);
    }

    fn decrement(&mut self, bytes: isize) {
        self.retreat(bytes);
    }

    fn checked_offset(&self, bytes: isize) -> Result<Self, MemoryError> {
        SegmentedAddress::checked_offset(self, bytes)
    }
}
