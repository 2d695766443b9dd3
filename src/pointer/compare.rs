// Equality and ordering for fancy pointers
//
// Every comparison resolves both sides and compares linear addresses, so
// pointers into different segments order by where their data lives now.
// Null is the exception: it equals only null and sorts first, even against a
// coordinate that happens to resolve to address 0.

use super::typed::FancyPtr;
use super::void::{ConstVoidPtr, VoidPtr};
use crate::memory::AddressingModel;
use std::cmp::Ordering;
use std::ffi::c_void;

macro_rules! fancy_comparisons {
    ([$($gen:tt)*] $lhs:ty, $rhs:ty) => {
        impl<$($gen)*> PartialEq<$rhs> for $lhs {
            fn eq(&self, other: &$rhs) -> bool {
                self.address().equals(&other.address())
            }
        }

        impl<$($gen)*> PartialOrd<$rhs> for $lhs {
            fn partial_cmp(&self, other: &$rhs) -> Option<Ordering> {
                Some(self.address().compare(&other.address()))
            }
        }
    };
}

macro_rules! raw_comparisons {
    ([$($gen:tt)*] $fancy:ty, $raw:ty) => {
        impl<$($gen)*> PartialEq<$raw> for $fancy {
            fn eq(&self, other: &$raw) -> bool {
                self.address().equals_raw(*other as *const u8)
            }
        }

        impl<$($gen)*> PartialOrd<$raw> for $fancy {
            fn partial_cmp(&self, other: &$raw) -> Option<Ordering> {
                Some(self.address().compare_raw(*other as *const u8))
            }
        }

        impl<$($gen)*> PartialEq<$fancy> for $raw {
            fn eq(&self, other: &$fancy) -> bool {
                other.address().equals_raw(*self as *const u8)
            }
        }

        impl<$($gen)*> PartialOrd<$fancy> for $raw {
            fn partial_cmp(&self, other: &$fancy) -> Option<Ordering> {
                Some(other.address().compare_raw(*self as *const u8).reverse())
            }
        }
    };
}

fancy_comparisons!([T, A: AddressingModel] FancyPtr<T, A>, FancyPtr<T, A>);
fancy_comparisons!([T, A: AddressingModel] FancyPtr<T, A>, VoidPtr<A>);
fancy_comparisons!([T, A: AddressingModel] FancyPtr<T, A>, ConstVoidPtr<A>);
fancy_comparisons!([T, A: AddressingModel] VoidPtr<A>, FancyPtr<T, A>);
fancy_comparisons!([T, A: AddressingModel] ConstVoidPtr<A>, FancyPtr<T, A>);
fancy_comparisons!([A: AddressingModel] VoidPtr<A>, VoidPtr<A>);
fancy_comparisons!([A: AddressingModel] VoidPtr<A>, ConstVoidPtr<A>);
fancy_comparisons!([A: AddressingModel] ConstVoidPtr<A>, VoidPtr<A>);
fancy_comparisons!([A: AddressingModel] ConstVoidPtr<A>, ConstVoidPtr<A>);

raw_comparisons!([T, A: AddressingModel] FancyPtr<T, A>, *const T);
raw_comparisons!([T, A: AddressingModel] FancyPtr<T, A>, *mut T);
raw_comparisons!([A: AddressingModel] VoidPtr<A>, *mut c_void);
raw_comparisons!([A: AddressingModel] VoidPtr<A>, *const c_void);
raw_comparisons!([A: AddressingModel] ConstVoidPtr<A>, *const c_void);

impl<T, A: AddressingModel> Eq for FancyPtr<T, A> {}

impl<T, A: AddressingModel> Ord for FancyPtr<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address().compare(&other.address())
    }
}

impl<A: AddressingModel> Eq for VoidPtr<A> {}

impl<A: AddressingModel> Ord for VoidPtr<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address().compare(&other.address())
    }
}

impl<A: AddressingModel> Eq for ConstVoidPtr<A> {}

impl<A: AddressingModel> Ord for ConstVoidPtr<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address().compare(&other.address())
    }
}
