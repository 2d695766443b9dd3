//! Containers over relocatable storage
//!
//! These containers keep [`FancyPtr`](crate::pointer::FancyPtr)s wherever a
//! `Vec` or linked list would keep raw pointers, and get their storage from an
//! [`AllocationStrategy`](crate::strategy::AllocationStrategy). A container,
//! its elements and every pointer between them can live inside segments and
//! still be usable after the segments are relocated.
//!
//! - [`vec`]: growable array, also used as a byte string
//! - [`list`]: singly linked list

pub mod list;
pub mod vec;

pub use list::RelocatableList;
pub use vec::RelocatableVec;
