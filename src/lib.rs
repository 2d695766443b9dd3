//! # Introduction
//!
//! segptr provides pointers that survive the relocation of the memory they
//! point into. Storage is carved into numbered segments held in a segment
//! table; a fancy pointer stores a packed (segment, offset) coordinate and
//! resolves it against the table each time it is dereferenced. When every
//! segment is moved to a fresh buffer the coordinates stay valid and the
//! data structures built from them keep working.
//!
//! ## Layers
//!
//! ```text
//! SegmentTable → StorageModel → SegmentedAddress → FancyPtr → AllocationStrategy → containers
//! ```
//!
//! 1. [`memory`]: the [`memory::SegmentTable`], the [`memory::StorageModel`]
//!    handles that reach a thread-local table, and the packed
//!    [`memory::SegmentedAddress`] coordinate.
//! 2. [`pointer`]: [`pointer::FancyPtr`] with raw-pointer semantics, plus the
//!    untyped [`pointer::VoidPtr`] and [`pointer::ConstVoidPtr`].
//! 3. [`strategy`]: the [`strategy::AllocationStrategy`] interface and the
//!    never-freeing bump allocator [`strategy::LeakyStrategy`].
//! 4. [`collections`]: a vector and a forward list linked by fancy pointers.
//! 5. [`snapshot`] and [`demo`]: relocation history and the demo scenario.
//! 6. [`ui`]: ratatui-based inspector; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use segptr::strategy::{AllocationStrategy, LeakyStrategy};
//!
//! let strategy: LeakyStrategy = LeakyStrategy::new();
//! let p = strategy.emplace(42u64).unwrap();
//! // SAFETY: no reference into segment storage is alive across the move
//! unsafe { strategy.relocate() };
//! assert_eq!(unsafe { p.read() }, 42);
//! ```

pub mod collections;
pub mod demo;
pub mod errors;
pub mod memory;
pub mod pointer;
pub mod snapshot;
pub mod strategy;
pub mod ui;
