//! Untyped fancy pointers
//!
//! [`VoidPtr`] and [`ConstVoidPtr`] are what allocation strategies hand out and
//! take back. Like `*mut c_void` they can be compared and converted but carry no
//! arithmetic and cannot be dereferenced; turn them into a [`FancyPtr`] with
//! `cast` first.

use super::typed::FancyPtr;
use crate::memory::{AddressingModel, SegmentedAddress};
use std::ffi::c_void;
use std::fmt;

/// A relocatable untyped pointer (`*mut c_void`)
#[derive(Clone, Copy)]
pub struct VoidPtr<A: AddressingModel = SegmentedAddress> {
    addr: A,
}

/// A relocatable untyped pointer to immutable data (`*const c_void`)
#[derive(Clone, Copy)]
pub struct ConstVoidPtr<A: AddressingModel = SegmentedAddress> {
    addr: A,
}

impl<A: AddressingModel> VoidPtr<A> {
    pub fn null() -> Self {
        Self::from_address(A::null())
    }

    pub fn from_address(addr: A) -> Self {
        VoidPtr { addr }
    }

    /// Pointer that resolves to `ptr`
    pub fn from_raw<T>(ptr: *mut T) -> Self {
        Self::from_address(A::from_raw(ptr.cast()))
    }

    pub fn address(&self) -> A {
        self.addr
    }

    pub fn is_null(&self) -> bool {
        self.addr.is_null()
    }

    /// Resolve under the current segment layout
    pub fn as_ptr(&self) -> *mut c_void {
        self.addr.address().cast()
    }

    /// Give the pointer an element type (explicit conversion)
    pub fn cast<T>(self) -> FancyPtr<T, A> {
        FancyPtr::from_address(self.addr)
    }

    pub fn cast_const(self) -> ConstVoidPtr<A> {
        ConstVoidPtr::from_address(self.addr)
    }
}

impl<A: AddressingModel> ConstVoidPtr<A> {
    pub fn null() -> Self {
        Self::from_address(A::null())
    }

    pub fn from_address(addr: A) -> Self {
        ConstVoidPtr { addr }
    }

    /// Pointer that resolves to `ptr`
    pub fn from_raw<T>(ptr: *const T) -> Self {
        Self::from_address(A::from_raw(ptr.cast()))
    }

    pub fn address(&self) -> A {
        self.addr
    }

    pub fn is_null(&self) -> bool {
        self.addr.is_null()
    }

    /// Resolve under the current segment layout
    pub fn as_ptr(&self) -> *const c_void {
        self.addr.address() as *const c_void
    }

    /// Drop the const qualifier (explicit conversion)
    pub fn cast_mut(self) -> VoidPtr<A> {
        VoidPtr::from_address(self.addr)
    }

    /// Give the pointer an element type (explicit conversion)
    pub fn cast<T>(self) -> FancyPtr<T, A> {
        FancyPtr::from_address(self.addr)
    }
}

impl<A: AddressingModel> Default for VoidPtr<A> {
    fn default() -> Self {
        Self::null()
    }
}

impl<A: AddressingModel> Default for ConstVoidPtr<A> {
    fn default() -> Self {
        Self::null()
    }
}

impl<A: AddressingModel> fmt::Debug for VoidPtr<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VoidPtr").field(&self.addr).finish()
    }
}

impl<A: AddressingModel> fmt::Debug for ConstVoidPtr<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConstVoidPtr").field(&self.addr).finish()
    }
}

impl<A: AddressingModel> fmt::Pointer for VoidPtr<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.as_ptr(), f)
    }
}

impl<A: AddressingModel> fmt::Pointer for ConstVoidPtr<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.as_ptr(), f)
    }
}

impl<A: AddressingModel> From<VoidPtr<A>> for ConstVoidPtr<A> {
    fn from(ptr: VoidPtr<A>) -> Self {
        ptr.cast_const()
    }
}

impl<T, A: AddressingModel> From<*mut T> for VoidPtr<A> {
    fn from(ptr: *mut T) -> Self {
        Self::from_raw(ptr)
    }
}

impl<T, A: AddressingModel> From<*const T> for ConstVoidPtr<A> {
    fn from(ptr: *const T) -> Self {
        Self::from_raw(ptr)
    }
}

impl<T, A: AddressingModel> From<*mut T> for ConstVoidPtr<A> {
    fn from(ptr: *mut T) -> Self {
        Self::from_raw(ptr as *const T)
    }
}

impl<A: AddressingModel> From<VoidPtr<A>> for *mut c_void {
    fn from(ptr: VoidPtr<A>) -> Self {
        ptr.as_ptr()
    }
}

impl<A: AddressingModel> From<VoidPtr<A>> for *const c_void {
    fn from(ptr: VoidPtr<A>) -> Self {
        ptr.as_ptr()
    }
}

impl<A: AddressingModel> From<ConstVoidPtr<A>> for *const c_void {
    fn from(ptr: ConstVoidPtr<A>) -> Self {
        ptr.as_ptr()
    }
}
