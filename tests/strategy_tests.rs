// Tests for the bump allocation strategy

use segptr::errors::MemoryError;
use segptr::memory::{PrivateStorage, StorageModel, FIRST_SEGMENT, MAX_SEGMENT_SIZE};
use segptr::pointer::FancyPtr;
use segptr::strategy::{AllocationStrategy, LeakyStrategy, CHUNK_ALIGN, POOL_SEGMENTS};

segptr::storage_model! {
    TinyStorage, segments = 3, segment_size = 256
}

#[test]
fn test_chunks_fill_first_segment_in_order() {
    let strategy = LeakyStrategy::<PrivateStorage>::new();
    let mut chunks = Vec::new();

    for i in 0..10u8 {
        let chunk = strategy.allocate(300).unwrap();
        let bytes: FancyPtr<u8> = chunk.cast();
        for j in 0..300 {
            // SAFETY: the chunk holds at least 300 bytes
            unsafe { bytes.add(j).write(i.wrapping_mul(31).wrapping_add(j as u8)) };
        }
        chunks.push(chunk);
    }

    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.address().segment(), FIRST_SEGMENT);
        assert_eq!(chunk.address().offset(), i * 304);
    }
    assert_eq!(LeakyStrategy::<PrivateStorage>::used_bytes(FIRST_SEGMENT), 3040);

    let before: Vec<usize> = chunks.iter().map(|c| c.as_ptr() as usize).collect();
    // SAFETY: only the fancy pointers above are used afterwards
    unsafe { strategy.relocate() };

    for (i, chunk) in chunks.iter().enumerate() {
        assert_ne!(chunk.as_ptr() as usize, before[i]);
        let bytes: FancyPtr<u8> = chunk.cast();
        for j in 0..300 {
            // SAFETY: as above
            let value = unsafe { bytes.add(j).read() };
            assert_eq!(value, (i as u8).wrapping_mul(31).wrapping_add(j as u8));
        }
    }
}

#[test]
fn test_first_use_allocates_pool() {
    assert!(PrivateStorage::segment_views().is_empty());
    let strategy = LeakyStrategy::<PrivateStorage>::new();
    assert_eq!(LeakyStrategy::<PrivateStorage>::cursor(), (0, 0));

    strategy.allocate(1).unwrap();

    let ids: Vec<usize> = PrivateStorage::segment_views().iter().map(|v| v.id).collect();
    let expected: Vec<usize> = (FIRST_SEGMENT..FIRST_SEGMENT + POOL_SEGMENTS).collect();
    assert_eq!(ids, expected);
    assert_eq!(LeakyStrategy::<PrivateStorage>::cursor(), (FIRST_SEGMENT, CHUNK_ALIGN));
}

#[test]
fn test_requests_round_to_chunk_alignment() {
    let strategy = LeakyStrategy::<PrivateStorage>::new();
    let a = strategy.allocate(1).unwrap();
    let b = strategy.allocate(17).unwrap();
    let c = strategy.allocate(0).unwrap();
    let d = strategy.allocate(16).unwrap();

    assert_eq!(a.address().offset(), 0);
    assert_eq!(b.address().offset(), 16);
    assert_eq!(c.address().offset(), 48);
    assert_eq!(d.address().offset(), 48);
    assert_eq!(a.as_ptr() as usize % CHUNK_ALIGN, 0);
}

#[test]
fn test_chunk_that_does_not_fit_starts_next_segment() {
    let strategy = LeakyStrategy::<TinyStorage>::new();
    let a = strategy.allocate(100).unwrap(); // 112 bytes
    let b = strategy.allocate(100).unwrap(); // 112 bytes, ends at 224
    let c = strategy.allocate(40).unwrap(); // 48 bytes do not fit in the last 32

    assert_eq!((a.address().segment(), a.address().offset()), (2, 0));
    assert_eq!((b.address().segment(), b.address().offset()), (2, 112));
    assert_eq!((c.address().segment(), c.address().offset()), (3, 0));
    assert_eq!(LeakyStrategy::<TinyStorage>::used_bytes(2), 224);
    assert_eq!(LeakyStrategy::<TinyStorage>::used_bytes(3), 48);
}

#[test]
fn test_capacity_exceeded() {
    let strategy = LeakyStrategy::<PrivateStorage>::new();
    assert_eq!(strategy.max_size(), MAX_SEGMENT_SIZE / 2);
    assert_eq!(
        strategy.allocate(MAX_SEGMENT_SIZE / 2 + 1),
        Err(MemoryError::CapacityExceeded {
            requested: MAX_SEGMENT_SIZE / 2 + 1,
            limit: MAX_SEGMENT_SIZE / 2
        })
    );
    // The failed request allocates nothing
    assert!(PrivateStorage::segment_views().is_empty());
    assert!(strategy.allocate(MAX_SEGMENT_SIZE / 2).is_ok());
}

#[test]
fn test_pool_exhausted_past_last_segment() {
    let strategy = LeakyStrategy::<TinyStorage>::new();
    // Three segments of 256 bytes hold two 128-byte chunks each
    for _ in 0..6 {
        strategy.allocate(128).unwrap();
    }
    assert_eq!(
        strategy.allocate(1),
        Err(MemoryError::PoolExhausted { segment: 4 })
    );
    // The cursor did not move
    assert_eq!(LeakyStrategy::<TinyStorage>::cursor(), (4, 256));
}

#[test]
fn test_deallocate_is_a_no_op() {
    let strategy = LeakyStrategy::<PrivateStorage>::new();
    let a = strategy.allocate(32).unwrap();
    strategy.deallocate(a);
    let b = strategy.allocate(32).unwrap();
    assert_ne!(a, b);
    assert_eq!(b.address().offset(), 32);
}

#[test]
fn test_reset_rewinds_cursor() {
    let strategy = LeakyStrategy::<TinyStorage>::new();
    strategy.allocate(64).unwrap();
    // SAFETY: the chunk above is never used
    unsafe { LeakyStrategy::<TinyStorage>::reset() };
    assert_eq!(LeakyStrategy::<TinyStorage>::cursor(), (0, 0));
    assert!(TinyStorage::segment_views().is_empty());

    let again = strategy.allocate(64).unwrap();
    assert_eq!(again.address().offset(), 0);
}

#[test]
fn test_emplace_and_allocate_array() {
    let strategy = LeakyStrategy::<PrivateStorage>::new();
    let value = strategy.emplace((7u32, 9u64)).unwrap();
    // SAFETY: emplace initialized the value
    assert_eq!(unsafe { value.read() }, (7, 9));

    let array = strategy.allocate_array::<u64>(8).unwrap();
    for i in 0..8 {
        // SAFETY: room for 8 elements
        unsafe { array.add(i).write(i as u64 * 3) };
    }
    // SAFETY: written above
    assert_eq!(unsafe { *array.index(5) }, 15);

    assert_eq!(
        strategy.allocate_array::<u64>(usize::MAX),
        Err(MemoryError::SizeOverflow {
            count: usize::MAX,
            elem_size: 8
        })
    );
}

#[repr(align(32))]
struct OverAligned(#[allow(dead_code)] u8);

#[test]
fn test_alignment_above_chunk_alignment_is_rejected() {
    let strategy = LeakyStrategy::<PrivateStorage>::new();
    assert_eq!(
        strategy.allocate_array::<OverAligned>(1).map(|_| ()),
        Err(MemoryError::UnsupportedAlignment {
            align: 32,
            limit: CHUNK_ALIGN
        })
    );
}
