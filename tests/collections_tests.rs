// Tests for containers built on fancy pointers

use segptr::collections::{RelocatableList, RelocatableVec};
use segptr::errors::MemoryError;
use segptr::memory::{PrivateStorage, StorageModel};
use segptr::strategy::{AllocationStrategy, LeakyStrategy};

segptr::storage_model! {
    CramStorage, segments = 2, segment_size = 512
}

#[test]
fn test_vec_push_pop_and_growth() {
    let mut vec: RelocatableVec<u32> = RelocatableVec::new();
    assert!(vec.is_empty());
    assert!(vec.as_fancy_ptr().is_null());

    for i in 0..20 {
        vec.push(i * i).unwrap();
    }
    assert_eq!(vec.len(), 20);
    assert!(vec.capacity() >= 20);
    assert_eq!(vec[4], 16);
    assert_eq!(vec.get(19), Some(&361));
    assert_eq!(vec.get(20), None);

    *vec.get_mut(0).unwrap() = 99;
    assert_eq!(vec.pop(), Some(361));
    assert_eq!(vec.len(), 19);
    assert_eq!(vec.iter().next(), Some(&99));

    vec.clear();
    assert!(vec.is_empty());
    assert_eq!(vec.pop(), None);
}

#[test]
fn test_vec_with_capacity_and_extend() {
    let mut vec: RelocatableVec<u8> = RelocatableVec::with_capacity(10).unwrap();
    assert!(vec.capacity() >= 10);
    vec.extend_from_slice(b"jetsam").unwrap();
    assert_eq!(vec.as_slice(), b"jetsam");
    vec.as_mut_slice()[0] = b'J';
    assert_eq!(vec.to_string_lossy(), "Jetsam");
    assert_eq!(format!("{:?}", vec), format!("{:?}", b"Jetsam".to_vec()));
}

#[test]
fn test_vec_survives_relocation() {
    let text = RelocatableVec::<u8>::from_str_in("dreck and blither", LeakyStrategy::new()).unwrap();
    let mut numbers: RelocatableVec<u64> = RelocatableVec::new();
    numbers.extend_from_slice(&[1, 1, 2, 3, 5, 8]).unwrap();
    let before = numbers.as_fancy_ptr().as_ptr();

    // SAFETY: no slice or reference into the containers is alive here
    unsafe { PrivateStorage::relocate_all() };

    assert_ne!(numbers.as_fancy_ptr().as_ptr(), before);
    assert_eq!(numbers.as_slice(), &[1, 1, 2, 3, 5, 8]);
    assert_eq!(text.to_string_lossy(), "dreck and blither");
}

#[test]
fn test_list_push_pop_and_reverse() {
    let mut list: RelocatableList<i32> = RelocatableList::new();
    assert!(list.is_empty());
    assert_eq!(list.front(), None);

    for i in 1..=4 {
        list.push_front(i).unwrap();
    }
    assert_eq!(list.len(), 4);
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![4, 3, 2, 1]);
    assert_eq!(list.iter().size_hint(), (4, Some(4)));

    list.reverse();
    assert_eq!((&list).into_iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);

    *list.front_mut().unwrap() = 10;
    assert_eq!(list.pop_front(), Some(10));
    assert_eq!(list.front(), Some(&2));
    assert_eq!(format!("{:?}", list), "[2, 3, 4]");

    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.len(), 0);
}

#[test]
fn test_nested_containers_survive_relocation() {
    let strategy = LeakyStrategy::<PrivateStorage>::new();
    let list = strategy
        .emplace(RelocatableList::<RelocatableVec<u8>>::with_strategy(strategy))
        .unwrap();

    for word in ["flotsam", "jetsam", "dreck"] {
        let item = RelocatableVec::from_str_in(word, strategy).unwrap();
        // SAFETY: the list is only reached through `list`
        let words = unsafe { list.as_mut() };
        words.push_front(item).unwrap();
    }

    let list_before = list.as_ptr();
    // SAFETY: no reference into segment storage is alive here
    unsafe { strategy.relocate() };
    assert_ne!(list.as_ptr(), list_before);

    // SAFETY: as above
    let words: Vec<String> = unsafe { list.as_ref() }
        .iter()
        .map(|w| w.to_string_lossy().into_owned())
        .collect();
    assert_eq!(words, vec!["dreck", "jetsam", "flotsam"]);
}

#[test]
fn test_push_reports_exhausted_storage() {
    let strategy = LeakyStrategy::<CramStorage>::new();
    let mut vec = RelocatableVec::<u8, LeakyStrategy<CramStorage>>::with_strategy(strategy);
    let failure = (0..2048).map(|_| vec.push(0)).find(|result| result.is_err());
    assert!(matches!(failure, Some(Err(MemoryError::CapacityExceeded { .. }))));
    assert!(vec.len() < 2048);
    assert!(CramStorage::segment_views().len() <= 2);
}
