//! Fancy pointers
//!
//! A fancy pointer is a pointer-shaped handle that stores an
//! [`AddressingModel`] value instead of a linear address and resolves it only
//! when the pointer is used. Containers that keep fancy pointers internally
//! survive relocation of the storage they point into.
//!
//! Three shapes mirror raw pointers:
//! - [`FancyPtr<T, A>`]: typed, like `*mut T` / `NonNull<T>`; arithmetic scaled
//!   by `size_of::<T>()`, indexing and (unsafe) dereference
//! - [`VoidPtr<A>`]: like `*mut c_void`; conversion and comparison only
//! - [`ConstVoidPtr<A>`]: like `*const c_void`
//!
//! # Conversions
//!
//! | From → To                         | How                              |
//! |-----------------------------------|----------------------------------|
//! | `FancyPtr<T>` → `VoidPtr`          | `From` (implicit)                |
//! | `FancyPtr<T>`/`VoidPtr` → `ConstVoidPtr` | `From` (implicit)          |
//! | `FancyPtr<T>` → `*const T`/`*mut T` | `From` (implicit)               |
//! | `FancyPtr<T>` → `FancyPtr<U>`      | [`FancyPtr::coerce`] if `T: CoercesTo<U>`, else [`FancyPtr::cast`] |
//! | `VoidPtr` → `FancyPtr<T>`          | [`VoidPtr::cast`] (explicit)      |
//! | `ConstVoidPtr` → `VoidPtr`         | [`ConstVoidPtr::cast_mut`] (explicit) |
//!
//! [`AddressingModel`]: crate::memory::AddressingModel

mod compare;
pub mod typed;
pub mod void;

pub use typed::FancyPtr;
pub use void::{ConstVoidPtr, VoidPtr};

/// Marks element types whose pointers widen to pointers to `U` without a cast
///
/// This is the analog of a derived-to-base pointer conversion. Every type
/// widens to itself.
///
/// ```
/// use segptr::pointer::CoercesTo;
///
/// #[repr(C)]
/// struct Base { id: u32 }
///
/// #[repr(C)]
/// struct Derived { base: Base, extra: u64 }
///
/// // SAFETY: `Base` is the first field of a `#[repr(C)]` struct
/// unsafe impl CoercesTo<Base> for Derived {}
/// ```
///
/// # Safety
///
/// A pointer to `Self` must also be a valid pointer to a `U` at the same
/// address (for example `U` is the first field of a `#[repr(C)]` `Self`, or
/// `Self` is `#[repr(transparent)]` over `U`).
pub unsafe trait CoercesTo<U> {}

// SAFETY: identity
unsafe impl<T> CoercesTo<T> for T {}

/// Pointer-family information used by generic containers
pub trait PointerTraits: Copy {
    /// The pointed-to type
    type Element;

    /// The same pointer family for element type `U`
    type Rebind<U>: Copy;

    /// Pointer to an existing element
    fn pointer_to(element: &mut Self::Element) -> Self;

    /// Reinterpret as a pointer to `U` at the same address
    fn rebind<U>(self) -> Self::Rebind<U>;
}
