//! Bump allocation over a segment pool
//!
//! [`LeakyStrategy`] hands out chunks by advancing a cursor through the
//! segments of its storage model:
//! - requests are rounded up to [`CHUNK_ALIGN`] bytes
//! - a chunk that does not fit in the rest of the current segment starts at
//!   offset 0 of the next one, so no chunk ever spans two segments
//! - the first request allocates a pool of [`POOL_SEGMENTS`] segments; later
//!   segments are allocated when the cursor reaches them
//! - nothing is ever reclaimed; `deallocate` is a no-op
//!
//! The cursor is per storage model and per thread, like the segment table it
//! walks.

use super::{AllocationStrategy, CHUNK_ALIGN, POOL_SEGMENTS};
use crate::errors::MemoryError;
use crate::memory::{round_up, PrivateStorage, SegmentedAddress, StorageModel};
use crate::pointer::VoidPtr;
use rustc_hash::FxHashMap;
use std::any::TypeId;
use std::cell::RefCell;
use std::marker::PhantomData;

/// Cursor and usage bookkeeping of one storage model
#[derive(Debug, Clone, Default)]
struct BumpState {
    segment: usize, // 0 until the pool is set up
    offset: usize,
    used: FxHashMap<usize, usize>, // Segment id -> bytes handed out
}

thread_local! {
    static BUMP_STATES: RefCell<FxHashMap<TypeId, BumpState>> = RefCell::new(FxHashMap::default());
}

/// Non-reclaiming bump allocator over storage model `S`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeakyStrategy<S: StorageModel = PrivateStorage> {
    _model: PhantomData<S>,
}

impl<S: StorageModel> LeakyStrategy<S> {
    pub fn new() -> Self {
        LeakyStrategy {
            _model: PhantomData,
        }
    }

    fn with_state<R>(f: impl FnOnce(&mut BumpState) -> R) -> R {
        BUMP_STATES.with(|states| f(states.borrow_mut().entry(TypeId::of::<S>()).or_default()))
    }

    /// Current `(segment, offset)` of the cursor; segment 0 before first use
    pub fn cursor() -> (usize, usize) {
        Self::with_state(|state| (state.segment, state.offset))
    }

    /// Bytes handed out from segment `id`
    pub fn used_bytes(id: usize) -> usize {
        Self::with_state(|state| state.used.get(&id).copied().unwrap_or(0))
    }

    /// Release every segment and rewind the cursor
    ///
    /// # Safety
    ///
    /// Every pointer handed out by this strategy dangles afterwards; none may
    /// be dereferenced.
    pub unsafe fn reset() {
        S::clear_segments();
        Self::with_state(|state| *state = BumpState::default());
    }

    fn init_segments() -> Result<(), MemoryError> {
        let first = S::first_segment();
        for id in first..first + POOL_SEGMENTS {
            match S::allocate_segment(id) {
                Ok(()) | Err(MemoryError::SegmentAlreadyAllocated { .. }) => {}
                // Table smaller than the pool
                Err(MemoryError::SegmentOutOfRange { .. }) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn ensure_segment(id: usize) -> Result<(), MemoryError> {
        if S::with_table(|table| table.is_allocated(id)) {
            return Ok(());
        }
        S::allocate_segment(id).map_err(|e| match e {
            MemoryError::SegmentOutOfRange { .. } => MemoryError::PoolExhausted { segment: id - 1 },
            other => other,
        })
    }

    /// Find room for `chunk_size` bytes starting at the cursor
    fn place(
        mut segment: usize,
        mut offset: usize,
        chunk_size: usize,
    ) -> Result<(usize, usize), MemoryError> {
        loop {
            Self::ensure_segment(segment)?;
            if offset + chunk_size <= S::segment_size(segment) {
                return Ok((segment, offset));
            }
            segment += 1;
            offset = 0;
        }
    }
}

impl<S: StorageModel> AllocationStrategy for LeakyStrategy<S> {
    type Address = SegmentedAddress<S>;

    /// Half a segment, so any permitted chunk fits in an empty segment
    fn max_size(&self) -> usize {
        S::max_segment_size() / 2
    }

    fn allocate(&self, n: usize) -> Result<VoidPtr<Self::Address>, MemoryError> {
        let limit = self.max_size();
        if n > limit {
            return Err(MemoryError::CapacityExceeded {
                requested: n,
                limit,
            });
        }
        let chunk_size = round_up(n, CHUNK_ALIGN).ok_or(MemoryError::CapacityExceeded {
            requested: n,
            limit,
        })?;

        let (mut segment, offset) = Self::cursor();
        if segment == 0 {
            Self::init_segments()?;
            segment = S::first_segment();
        }

        let (segment, offset) = Self::place(segment, offset, chunk_size)?;

        Self::with_state(|state| {
            state.segment = segment;
            state.offset = offset + chunk_size;
            *state.used.entry(segment).or_insert(0) += chunk_size;
        });

        Ok(VoidPtr::from_address(S::segment_pointer(segment, offset)))
    }

    fn deallocate(&self, _ptr: VoidPtr<Self::Address>) {}

    unsafe fn relocate(&self) {
        S::relocate_all();
    }
}
