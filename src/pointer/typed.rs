//! Typed fancy pointer
//!
//! [`FancyPtr<T, A>`] behaves like `*mut T`: it can be null, converted,
//! compared, offset by element counts and dereferenced. Dereferencing,
//! indexing, reading and writing are `unsafe` for the same reasons they are on
//! raw pointers, plus one more: a reference obtained through a fancy pointer is
//! only valid until the next relocation of the storage it points into.
//!
//! Arithmetic never touches the segment table. It adjusts the stored
//! coordinate by `n * size_of::<T>()` bytes and wraps on overflow, like
//! `pointer::wrapping_offset`. Use [`FancyPtr::checked_offset`] to have
//! boundary crossings reported instead.

use super::void::{ConstVoidPtr, VoidPtr};
use super::{CoercesTo, PointerTraits};
use crate::errors::MemoryError;
use crate::memory::{element_distance, scaled_offset, AddressingModel, SegmentedAddress};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A relocatable pointer to `T`
///
/// Comparisons need the same element type on both sides; bring a
/// `FancyPtr<U, A>` over with [`FancyPtr::cast`] (or [`FancyPtr::coerce`]) first.
pub struct FancyPtr<T, A: AddressingModel = SegmentedAddress> {
    addr: A,
    _elem: PhantomData<*mut T>,
}

impl<T, A: AddressingModel> FancyPtr<T, A> {
    /// The null pointer
    pub fn null() -> Self {
        Self::from_address(A::null())
    }

    /// Pointer holding `addr`
    pub fn from_address(addr: A) -> Self {
        FancyPtr {
            addr,
            _elem: PhantomData,
        }
    }

    /// Pointer that resolves to `ptr`
    pub fn from_raw(ptr: *const T) -> Self {
        Self::from_address(A::from_raw(ptr.cast()))
    }

    /// Pointer to an existing element
    pub fn pointer_to(element: &T) -> Self {
        Self::from_raw(element)
    }

    /// Widen a pointer to a type that coerces to `T`
    pub fn from_coerced<U: CoercesTo<T>>(ptr: FancyPtr<U, A>) -> Self {
        Self::from_address(ptr.addr)
    }

    /// The stored coordinate
    pub fn address(&self) -> A {
        self.addr
    }

    /// Whether the stored coordinate is the null bit pattern
    pub fn is_null(&self) -> bool {
        self.addr.is_null()
    }

    /// Resolve to a raw pointer under the current segment layout
    pub fn as_ptr(&self) -> *const T {
        self.addr.address() as *const T
    }

    /// Resolve to a raw mutable pointer under the current segment layout
    pub fn as_mut_ptr(&self) -> *mut T {
        self.addr.address().cast()
    }

    /// Resolve, failing if the coordinate does not name live storage
    pub fn try_as_ptr(&self) -> Result<*mut T, MemoryError> {
        self.addr.try_address().map(|ptr| ptr.cast())
    }

    /// Reinterpret as a pointer to `U` (explicit conversion)
    pub fn cast<U>(self) -> FancyPtr<U, A> {
        FancyPtr::from_address(self.addr)
    }

    /// Widen to a pointer to `U` (implicit conversion)
    pub fn coerce<U>(self) -> FancyPtr<U, A>
    where
        T: CoercesTo<U>,
    {
        FancyPtr::from_address(self.addr)
    }

    /// Erase the element type
    pub fn cast_void(self) -> VoidPtr<A> {
        VoidPtr::from_address(self.addr)
    }

    /// Pointer `count` elements away (wrapping)
    pub fn offset(self, count: isize) -> Self {
        let mut addr = self.addr;
        addr.increment(scaled_offset::<T>(count));
        Self::from_address(addr)
    }

    /// Pointer `count` elements forward (wrapping)
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, count: usize) -> Self {
        self.offset(count as isize)
    }

    /// Pointer `count` elements backward (wrapping)
    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, count: usize) -> Self {
        self.offset((count as isize).wrapping_neg())
    }

    /// Pointer `count` elements away, failing if it would leave the segment
    ///
    /// The one-past-the-end position is allowed.
    pub fn checked_offset(self, count: isize) -> Result<Self, MemoryError> {
        let bytes = count.checked_mul(std::mem::size_of::<T>() as isize).ok_or(
            MemoryError::SizeOverflow {
                count: count.unsigned_abs(),
                elem_size: std::mem::size_of::<T>(),
            },
        )?;
        self.addr.checked_offset(bytes).map(Self::from_address)
    }

    /// Distance to `origin` in elements, from resolved addresses
    ///
    /// # Panics
    ///
    /// Panics if `T` is zero-sized.
    pub fn offset_from(self, origin: Self) -> isize {
        let bytes = (self.addr.address() as isize).wrapping_sub(origin.addr.address() as isize);
        element_distance::<T>(bytes)
    }

    /// Pre-increment: advance by one element and return the pointer
    pub fn inc(&mut self) -> &mut Self {
        self.addr.increment(scaled_offset::<T>(1));
        self
    }

    /// Pre-decrement: step back one element and return the pointer
    pub fn dec(&mut self) -> &mut Self {
        self.addr.decrement(scaled_offset::<T>(1));
        self
    }

    /// Post-increment: advance by one element, returning the old pointer
    pub fn post_inc(&mut self) -> Self {
        let old = *self;
        self.inc();
        old
    }

    /// Post-decrement: step back one element, returning the old pointer
    pub fn post_dec(&mut self) -> Self {
        let old = *self;
        self.dec();
        old
    }

    /// Borrow the pointee
    ///
    /// # Safety
    ///
    /// The pointer must resolve to an initialized, properly aligned `T`, the
    /// usual aliasing rules apply, and the reference must not be used after
    /// the next relocation or deallocation of its segment.
    pub unsafe fn as_ref<'a>(self) -> &'a T {
        &*self.as_ptr()
    }

    /// Mutably borrow the pointee
    ///
    /// # Safety
    ///
    /// As for [`FancyPtr::as_ref`], and no other reference to the pointee may
    /// exist while the returned one is alive.
    pub unsafe fn as_mut<'a>(self) -> &'a mut T {
        &mut *self.as_mut_ptr()
    }

    /// Borrow element `index` (the `p[n]` operation)
    ///
    /// # Safety
    ///
    /// As for [`FancyPtr::as_ref`], applied to `self.add(index)`.
    pub unsafe fn index<'a>(self, index: usize) -> &'a T {
        self.add(index).as_ref()
    }

    /// Mutably borrow element `index`
    ///
    /// # Safety
    ///
    /// As for [`FancyPtr::as_mut`], applied to `self.add(index)`.
    pub unsafe fn index_mut<'a>(self, index: usize) -> &'a mut T {
        self.add(index).as_mut()
    }

    /// Read the pointee without moving it
    ///
    /// # Safety
    ///
    /// See [`std::ptr::read`].
    pub unsafe fn read(self) -> T {
        self.as_ptr().read()
    }

    /// Overwrite the pointee without dropping the old value
    ///
    /// # Safety
    ///
    /// See [`std::ptr::write`].
    pub unsafe fn write(self, value: T) {
        self.as_mut_ptr().write(value)
    }

    /// Replace the pointee, returning the old value
    ///
    /// # Safety
    ///
    /// See [`std::ptr::replace`].
    pub unsafe fn replace(self, value: T) -> T {
        std::ptr::replace(self.as_mut_ptr(), value)
    }

    /// Run the pointee's destructor in place
    ///
    /// # Safety
    ///
    /// See [`std::ptr::drop_in_place`].
    pub unsafe fn drop_in_place(self) {
        std::ptr::drop_in_place(self.as_mut_ptr())
    }
}

impl<T, A: AddressingModel> Clone for FancyPtr<T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: AddressingModel> Copy for FancyPtr<T, A> {}

impl<T, A: AddressingModel> Default for FancyPtr<T, A> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T, A: AddressingModel> fmt::Debug for FancyPtr<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FancyPtr").field(&self.addr).finish()
    }
}

impl<T, A: AddressingModel> fmt::Pointer for FancyPtr<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.as_ptr(), f)
    }
}

impl<T, A: AddressingModel> PointerTraits for FancyPtr<T, A> {
    type Element = T;
    type Rebind<U> = FancyPtr<U, A>;

    fn pointer_to(element: &mut T) -> Self {
        FancyPtr::pointer_to(element)
    }

    fn rebind<U>(self) -> FancyPtr<U, A> {
        self.cast()
    }
}

impl<T, A: AddressingModel> Add<isize> for FancyPtr<T, A> {
    type Output = Self;

    fn add(self, count: isize) -> Self {
        self.offset(count)
    }
}

impl<T, A: AddressingModel> Sub<isize> for FancyPtr<T, A> {
    type Output = Self;

    fn sub(self, count: isize) -> Self {
        self.offset(count.wrapping_neg())
    }
}

impl<T, A: AddressingModel> Sub for FancyPtr<T, A> {
    type Output = isize;

    fn sub(self, origin: Self) -> isize {
        self.offset_from(origin)
    }
}

impl<T, A: AddressingModel> AddAssign<isize> for FancyPtr<T, A> {
    fn add_assign(&mut self, count: isize) {
        self.addr.increment(scaled_offset::<T>(count));
    }
}

impl<T, A: AddressingModel> SubAssign<isize> for FancyPtr<T, A> {
    fn sub_assign(&mut self, count: isize) {
        self.addr.decrement(scaled_offset::<T>(count));
    }
}

impl<T, A: AddressingModel> From<*const T> for FancyPtr<T, A> {
    fn from(ptr: *const T) -> Self {
        Self::from_raw(ptr)
    }
}

impl<T, A: AddressingModel> From<*mut T> for FancyPtr<T, A> {
    fn from(ptr: *mut T) -> Self {
        Self::from_raw(ptr)
    }
}

impl<T, A: AddressingModel> From<&T> for FancyPtr<T, A> {
    fn from(element: &T) -> Self {
        Self::pointer_to(element)
    }
}

impl<T, A: AddressingModel> From<&mut T> for FancyPtr<T, A> {
    fn from(element: &mut T) -> Self {
        Self::pointer_to(element)
    }
}

impl<T, A: AddressingModel> From<FancyPtr<T, A>> for *const T {
    fn from(ptr: FancyPtr<T, A>) -> Self {
        ptr.as_ptr()
    }
}

impl<T, A: AddressingModel> From<FancyPtr<T, A>> for *mut T {
    fn from(ptr: FancyPtr<T, A>) -> Self {
        ptr.as_mut_ptr()
    }
}

impl<T, A: AddressingModel> From<FancyPtr<T, A>> for VoidPtr<A> {
    fn from(ptr: FancyPtr<T, A>) -> Self {
        ptr.cast_void()
    }
}

impl<T, A: AddressingModel> From<FancyPtr<T, A>> for ConstVoidPtr<A> {
    fn from(ptr: FancyPtr<T, A>) -> Self {
        ConstVoidPtr::from_address(ptr.addr)
    }
}
