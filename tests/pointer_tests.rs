// Tests for typed and untyped fancy pointers

use segptr::memory::{PrivateStorage, SegmentedAddress, StorageModel};
use segptr::pointer::{CoercesTo, ConstVoidPtr, FancyPtr, PointerTraits, VoidPtr};
use segptr::strategy::{AllocationStrategy, LeakyStrategy};
use std::ffi::c_void;

fn int_array(values: &[i32]) -> FancyPtr<i32> {
    let strategy = LeakyStrategy::<PrivateStorage>::new();
    let ptr = strategy.allocate_array::<i32>(values.len()).unwrap();
    for (i, &v) in values.iter().enumerate() {
        // SAFETY: fresh array of `values.len()` elements
        unsafe { ptr.add(i).write(v) };
    }
    ptr
}

#[test]
fn test_null_and_default() {
    let p: FancyPtr<i32> = FancyPtr::null();
    assert!(p.is_null());
    assert!(FancyPtr::<i32>::default().is_null());
    assert!(VoidPtr::<SegmentedAddress>::default().is_null());
    assert!(ConstVoidPtr::<SegmentedAddress>::null().is_null());
    assert_eq!(p.address().bits(), 0);
}

#[test]
fn test_arithmetic_is_scaled_by_element_size() {
    let p = int_array(&[10, 20, 30, 40]);
    let q = p + 3isize;
    assert_eq!(q.address().offset() - p.address().offset(), 12);
    assert_eq!(q - p, 3);
    assert_eq!(p - q, -3);
    assert_eq!((q - 2isize).address().offset(), p.address().offset() + 4);
    assert_eq!(p.add(2), p.offset(2));
    assert_eq!(q.sub(3), p);
    assert_eq!(q.offset_from(p), 3);

    let mut r = p;
    r += 2;
    // SAFETY: inside the array
    assert_eq!(unsafe { r.read() }, 30);
    r -= 1;
    assert_eq!(unsafe { r.read() }, 20);
}

#[test]
fn test_increment_and_decrement() {
    let p = int_array(&[1, 2, 3]);
    let mut cursor = p;

    // SAFETY: every read below stays inside the array
    assert_eq!(unsafe { cursor.inc().read() }, 2);
    let old = cursor.post_inc();
    assert_eq!(unsafe { old.read() }, 2);
    assert_eq!(unsafe { cursor.read() }, 3);
    let old = cursor.post_dec();
    assert_eq!(unsafe { old.read() }, 3);
    assert_eq!(unsafe { cursor.dec().read() }, 1);
    assert_eq!(cursor, p);
}

#[test]
fn test_indexing() {
    let p = int_array(&[5, 6, 7, 8]);
    // SAFETY: indexes are in bounds
    unsafe {
        assert_eq!(*p.index(0), 5);
        assert_eq!(*p.index(3), 8);
        *p.index_mut(1) = 60;
        assert_eq!(*p.index(1), 60);
        assert_eq!(p.replace(50), 5);
        assert_eq!(*p.as_ref(), 50);
    }
}

#[test]
fn test_contents_survive_relocation() {
    let p = int_array(&[3, 1, 4, 1, 5, 9, 2, 6]);
    let before = p.as_ptr();

    // SAFETY: only `p` is used afterwards
    unsafe { PrivateStorage::relocate_all() };

    assert_ne!(p.as_ptr(), before);
    let values: Vec<i32> = (0..8).map(|i| unsafe { *p.index(i) }).collect();
    assert_eq!(values, vec![3, 1, 4, 1, 5, 9, 2, 6]);
}

#[test]
fn test_comparisons_with_raw_and_void_pointers() {
    let p = int_array(&[1, 2]);
    let q = p.add(1);
    let raw: *const i32 = p.as_ptr();
    let raw_mut: *mut i32 = q.as_mut_ptr();

    assert!(p == raw);
    assert!(raw == p);
    assert!(q == raw_mut);
    assert!(p < raw_mut);
    assert!(raw_mut > p);

    let void: VoidPtr = p.into();
    let const_void: ConstVoidPtr = q.into();
    assert!(p == void);
    assert!(void == p);
    assert!(const_void == q);
    assert!(void < const_void);
    assert!(void == p.as_ptr() as *mut c_void);
    assert!(const_void == q.as_ptr() as *const c_void);
}

#[test]
fn test_null_is_not_resolved_zero() {
    let null: FancyPtr<u8> = FancyPtr::null();
    assert!(null.is_null());
    assert!(null == std::ptr::null::<u8>());

    // A coordinate in an unallocated segment resolves to its offset but is not null
    let odd: FancyPtr<u8> = FancyPtr::from_address(SegmentedAddress::new(7, 0));
    assert!(!odd.is_null());
    assert!(odd.try_as_ptr().is_err());
    assert!(odd != FancyPtr::null());
    assert!(null < odd);
    assert!(odd > null);

    // A reserved id at offset 0 resolves to address 0 but is not null either
    let zero: FancyPtr<u8> = FancyPtr::from_address(SegmentedAddress::new(1, 0));
    assert!(!zero.is_null());
    assert!(zero != null);
    assert!(null < zero);
    assert!(zero.cast_void() != VoidPtr::null());
    assert!(null == FancyPtr::null());
}

#[test]
fn test_checked_offset_reports_segment_crossing() {
    let strategy = LeakyStrategy::<PrivateStorage>::new();
    let p = strategy.allocate_array::<u64>(4).unwrap();
    let size = PrivateStorage::segment_size(p.address().segment());
    let elements = (size / 8) as isize;

    assert!(p.checked_offset(elements).is_ok());
    assert!(p.checked_offset(elements + 1).is_err());
    assert!(p.checked_offset(-1).is_err());
    assert!(p.checked_offset(isize::MAX).is_err());
}

#[test]
fn test_raw_round_trip_for_unmanaged_memory() {
    let mut local = [1u16, 2, 3];
    let p: FancyPtr<u16> = FancyPtr::from_raw(local.as_ptr());
    assert!(p.address().is_unmanaged());
    assert_eq!(p.as_ptr(), local.as_ptr());

    let from_ref: FancyPtr<u16> = (&mut local[1]).into();
    assert_eq!(from_ref - p, 1);
    let back: *const u16 = from_ref.into();
    assert_eq!(back, &local[1] as *const u16);
}

#[test]
fn test_pointer_to_and_rebind() {
    let strategy = LeakyStrategy::<PrivateStorage>::new();
    let p = strategy.emplace(0x0102_0304u32).unwrap();

    // SAFETY: `p` addresses an initialized u32 and nothing else borrows it
    let element = unsafe { p.as_mut() };
    let q = <FancyPtr<u32> as PointerTraits>::pointer_to(element);
    assert_eq!(q.address().bits(), p.address().bits());

    let bytes: FancyPtr<u8> = q.rebind::<u8>();
    assert_eq!(bytes.address().bits(), p.address().bits());
    // SAFETY: reading the first byte of an initialized u32
    let first = unsafe { bytes.read() };
    assert_eq!(first, 0x0102_0304u32.to_ne_bytes()[0]);
}

#[repr(C)]
struct Base {
    id: u32,
}

#[repr(C)]
struct Derived {
    base: Base,
    extra: u64,
}

// SAFETY: `Base` is the first field of a `#[repr(C)]` struct
unsafe impl CoercesTo<Base> for Derived {}

#[test]
fn test_coerce_derived_to_base() {
    let strategy = LeakyStrategy::<PrivateStorage>::new();
    let derived = strategy
        .emplace(Derived {
            base: Base { id: 42 },
            extra: 7,
        })
        .unwrap();

    let base: FancyPtr<Base> = derived.coerce();
    let also_base = FancyPtr::<Base>::from_coerced(derived);
    // SAFETY: both point at the initialized `Derived`
    unsafe {
        assert_eq!(base.as_ref().id, 42);
        assert_eq!(also_base.as_ref().id, 42);
        assert_eq!(derived.as_ref().extra, 7);
    }

    // The explicit cast goes back down
    let down: FancyPtr<Derived> = base.cast();
    assert_eq!(down, derived);

    // Identity coercion
    let same: FancyPtr<Derived> = derived.coerce();
    assert_eq!(same, derived);
}

#[test]
fn test_void_conversions() {
    let p = int_array(&[9]);
    let void = p.cast_void();
    let typed: FancyPtr<i32> = void.cast();
    // SAFETY: initialized above
    assert_eq!(unsafe { typed.read() }, 9);

    let const_void = void.cast_const();
    let back: VoidPtr = const_void.cast_mut();
    assert_eq!(back, void);
    let raw: *mut c_void = back.into();
    assert_eq!(raw as usize, p.as_ptr() as usize);
}

#[test]
fn test_formatting() {
    let null: FancyPtr<u8> = FancyPtr::null();
    assert!(format!("{:?}", null).contains("FancyPtr"));
    assert_eq!(format!("{:p}", null), format!("{:p}", std::ptr::null::<u8>()));
}
