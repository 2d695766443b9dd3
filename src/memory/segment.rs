//! Segment table
//!
//! The table maps small integer segment ids to backing storage. Every allocated
//! segment owns two zero-initialized buffers of equal size:
//! - the *live* buffer, which coordinates resolve into
//! - the *shadow* buffer, the relocation target
//!
//! [`SegmentTable::relocate_all`] copies each live buffer into its shadow and
//! swaps the two, so segment contents stay the same while every base address
//! changes. Anything holding a resolved address across that call is left
//! dangling; anything holding a coordinate is not.
//!
//! # Reserved ids
//!
//! Ids below [`FIRST_SEGMENT`] never own storage. A coordinate carrying one of
//! them stores a literal address in its offset field.

use super::{FIRST_SEGMENT, MAX_SEGMENTS, MAX_SEGMENT_ID, MAX_SEGMENT_SIZE, OFFSET_MASK};
use crate::errors::MemoryError;
use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::mem;
use std::ptr::{self, NonNull};

/// Alignment of every segment buffer
pub const SEGMENT_ALIGN: usize = 16;

/// One heap buffer with the layout it was allocated with
#[derive(Debug)]
struct Buffer {
    data: NonNull<u8>,
    layout: Layout,
}

impl Buffer {
    fn zeroed(size: usize) -> Result<Self, MemoryError> {
        let layout = Layout::from_size_align(size, SEGMENT_ALIGN).map_err(|_| {
            MemoryError::SegmentTooLarge {
                size,
                limit: isize::MAX as usize,
            }
        })?;

        // SAFETY: callers reject zero sizes, so the layout is non-zero sized
        let raw = unsafe { alloc_zeroed(layout) };
        let data = match NonNull::new(raw) {
            Some(data) => data,
            None => handle_alloc_error(layout),
        };

        Ok(Buffer { data, layout })
    }

    fn as_ptr(&self) -> *mut u8 {
        self.data.as_ptr()
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        // SAFETY: allocated in `zeroed` with this layout
        unsafe {
            dealloc(self.data.as_ptr(), self.layout);
        }
    }
}

/// An allocated segment record
#[derive(Debug)]
struct Segment {
    live: Buffer,
    shadow: Buffer,
    size: usize,
}

/// Read-only description of one allocated segment (for display and snapshots)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentView {
    pub id: usize,
    pub live_base: usize,
    pub shadow_base: usize,
    pub size: usize,
}

/// The segment table
#[derive(Debug)]
pub struct SegmentTable {
    slots: Vec<Option<Segment>>, // Index = segment id
    max_segments: usize,
    max_segment_size: usize,
    generation: u64, // Number of completed relocations
}

impl SegmentTable {
    /// Create a table with `max_segments` usable ids of at most `max_segment_size` bytes
    ///
    /// Both limits are clamped to what a coordinate can encode: ids must fit the
    /// 16-bit segment field and sizes the 48-bit offset field.
    pub fn new(max_segments: usize, max_segment_size: usize) -> Self {
        let max_segments = max_segments.min(MAX_SEGMENT_ID + 1 - FIRST_SEGMENT);
        let max_segment_size = max_segment_size.min(OFFSET_MASK as usize);

        let mut slots = Vec::with_capacity(FIRST_SEGMENT + max_segments);
        slots.resize_with(FIRST_SEGMENT + max_segments, || None);

        SegmentTable {
            slots,
            max_segments,
            max_segment_size,
            generation: 0,
        }
    }

    /// First id that can own storage
    pub const fn first_segment(&self) -> usize {
        FIRST_SEGMENT
    }

    /// Number of usable segment ids
    pub fn max_segment_count(&self) -> usize {
        self.max_segments
    }

    /// Largest size a segment may be allocated with
    pub fn max_segment_size(&self) -> usize {
        self.max_segment_size
    }

    /// One past the last usable id
    pub fn end_segment(&self) -> usize {
        FIRST_SEGMENT + self.max_segments
    }

    /// Whether `id` is reserved for literal (unmanaged) addresses
    pub fn is_reserved(id: usize) -> bool {
        id < FIRST_SEGMENT
    }

    /// Whether `id` lies in the usable range
    pub fn is_usable(&self, id: usize) -> bool {
        (FIRST_SEGMENT..self.end_segment()).contains(&id)
    }

    /// Whether `id` currently owns storage
    pub fn is_allocated(&self, id: usize) -> bool {
        self.segment(id).is_some()
    }

    /// Number of relocations performed so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn segment(&self, id: usize) -> Option<&Segment> {
        self.slots.get(id).and_then(|slot| slot.as_ref())
    }

    /// Allocate segment `id` with the maximum segment size
    pub fn allocate(&mut self, id: usize) -> Result<(), MemoryError> {
        self.allocate_with_size(id, self.max_segment_size)
    }

    /// Allocate segment `id` with `size` bytes of zeroed live and shadow storage
    ///
    /// On error the table is left untouched.
    pub fn allocate_with_size(&mut self, id: usize, size: usize) -> Result<(), MemoryError> {
        if !self.is_usable(id) {
            return Err(MemoryError::SegmentOutOfRange {
                id,
                first: FIRST_SEGMENT,
                end: self.end_segment(),
            });
        }
        if size > self.max_segment_size {
            return Err(MemoryError::SegmentTooLarge {
                size,
                limit: self.max_segment_size,
            });
        }
        if size == 0 {
            return Err(MemoryError::ZeroSizedSegment { id });
        }
        if self.is_allocated(id) {
            return Err(MemoryError::SegmentAlreadyAllocated { id });
        }

        let shadow = Buffer::zeroed(size)?;
        let live = Buffer::zeroed(size)?;
        self.slots[id] = Some(Segment { live, shadow, size });
        Ok(())
    }

    /// Release both buffers of segment `id`
    ///
    /// Returns `false` (and does nothing) when the segment was not allocated.
    /// Coordinates still naming `id` no longer resolve to valid memory.
    pub fn deallocate(&mut self, id: usize) -> bool {
        match self.slots.get_mut(id) {
            Some(slot) => slot.take().is_some(),
            None => false,
        }
    }

    /// Deallocate every segment
    pub fn clear_all(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
    }

    /// Move every segment to its shadow buffer
    ///
    /// Copies each live buffer into its shadow, then swaps their roles. Contents
    /// are preserved and every segment base changes.
    pub fn relocate_all(&mut self) {
        for segment in self.slots.iter_mut().flatten() {
            // SAFETY: both buffers are distinct allocations of `size` bytes
            unsafe {
                ptr::copy_nonoverlapping(segment.live.as_ptr(), segment.shadow.as_ptr(), segment.size);
            }
            mem::swap(&mut segment.live, &mut segment.shadow);
        }
        self.generation += 1;
    }

    /// Resolve `(id, offset)` to a linear address without validation
    ///
    /// Reserved ids yield `offset` as a literal address. For an id without
    /// storage the result is meaningless; see [`SegmentTable::try_resolve`].
    pub fn resolve(&self, id: usize, offset: usize) -> *mut u8 {
        match self.segment(id) {
            Some(segment) => segment.live.as_ptr().wrapping_add(offset),
            None => offset as *mut u8,
        }
    }

    /// Resolve `(id, offset)`, rejecting unallocated segments and out-of-range offsets
    ///
    /// The one-past-the-end offset (`offset == size`) is accepted, as for slices.
    pub fn try_resolve(&self, id: usize, offset: usize) -> Result<*mut u8, MemoryError> {
        if Self::is_reserved(id) {
            return Ok(offset as *mut u8);
        }

        let segment = self
            .segment(id)
            .ok_or(MemoryError::SegmentNotAllocated { id })?;

        if offset > segment.size {
            return Err(MemoryError::OffsetOutOfSegment {
                id,
                offset: offset as i64,
                size: segment.size,
            });
        }

        Ok(segment.live.as_ptr().wrapping_add(offset))
    }

    /// Find the segment containing `addr`
    ///
    /// Scans allocated segments in id order and returns the first `(id, offset)`
    /// whose live range `[base, base + size)` holds the address.
    pub fn locate(&self, addr: *const u8) -> Option<(usize, usize)> {
        let addr = addr as usize;
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|segment| (id, segment)))
            .find_map(|(id, segment)| {
                let base = segment.live.as_ptr() as usize;
                if addr >= base && addr - base < segment.size {
                    Some((id, addr - base))
                } else {
                    None
                }
            })
    }

    /// Live base address of segment `id`
    pub fn segment_address(&self, id: usize) -> Option<NonNull<u8>> {
        self.segment(id).map(|segment| segment.live.data)
    }

    /// Shadow (next relocation target) base address of segment `id`
    pub fn shadow_address(&self, id: usize) -> Option<NonNull<u8>> {
        self.segment(id).map(|segment| segment.shadow.data)
    }

    /// Size of segment `id` in bytes, 0 when unallocated
    pub fn segment_size(&self, id: usize) -> usize {
        self.segment(id).map_or(0, |segment| segment.size)
    }

    /// Live contents of segment `id`
    ///
    /// The slice must not be held while anything writes into the segment
    /// through a resolved address.
    pub fn segment_bytes(&self, id: usize) -> Option<&[u8]> {
        self.segment(id).map(|segment| {
            // SAFETY: the live buffer is an initialized allocation of `size` bytes
            unsafe { std::slice::from_raw_parts(segment.live.as_ptr(), segment.size) }
        })
    }

    /// Ids that currently own storage, in ascending order
    pub fn allocated_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(id, _)| id)
    }

    /// Describe every allocated segment
    pub fn views(&self) -> Vec<SegmentView> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| {
                slot.as_ref().map(|segment| SegmentView {
                    id,
                    live_base: segment.live.as_ptr() as usize,
                    shadow_base: segment.shadow.as_ptr() as usize,
                    size: segment.size,
                })
            })
            .collect()
    }
}

impl Default for SegmentTable {
    fn default() -> Self {
        Self::new(MAX_SEGMENTS, MAX_SEGMENT_SIZE)
    }
}
