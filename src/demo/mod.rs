//! Relocation demo
//!
//! Builds a forward list and a vector of byte strings entirely inside segment
//! storage: the container objects, their nodes or buffers, and the string
//! bytes all come from [`LeakyStrategy`]. The demo then relocates every
//! segment and reads the same containers again through the fancy pointers it
//! kept, recording what it saw in an [`EventLog`] and the table layout in a
//! [`SnapshotHistory`].

use crate::collections::{RelocatableList, RelocatableVec};
use crate::errors::MemoryError;
use crate::memory::{PrivateStorage, SegmentedAddress, StorageModel};
use crate::pointer::FancyPtr;
use crate::snapshot::{EventLog, SnapshotHistory, TableSnapshot};
use crate::strategy::{AllocationStrategy, LeakyStrategy};

/// Byte string stored in segments
pub type DemoString = RelocatableVec<u8>;

/// Snapshot history budget used by the binary
pub const DEFAULT_HISTORY_LIMIT: usize = 1024 * 1024;

/// One container element as resolved right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub coordinate: SegmentedAddress, // Where the string bytes live
    pub address: usize,
    pub text: String,
}

/// The demo's containers and what it has recorded about them
pub struct Demo {
    strategy: LeakyStrategy,
    list: FancyPtr<RelocatableList<DemoString>>,
    vector: FancyPtr<RelocatableVec<DemoString>>,
    next_item: usize,
    pub log: EventLog,
    pub history: SnapshotHistory,
}

impl Demo {
    /// Place both containers in segment storage and fill them with `items` strings each
    pub fn new(items: usize, history_limit: usize) -> Result<Self, MemoryError> {
        let strategy = LeakyStrategy::new();
        let list = strategy.emplace(RelocatableList::with_strategy(strategy))?;
        let vector = strategy.emplace(RelocatableVec::with_strategy(strategy))?;

        let mut demo = Demo {
            strategy,
            list,
            vector,
            next_item: 0,
            log: EventLog::new(),
            history: SnapshotHistory::new(history_limit),
        };
        demo.append(items)?;
        Ok(demo)
    }

    /// Append `count` new strings to each container and record the layout
    pub fn append(&mut self, count: usize) -> Result<(), MemoryError> {
        for _ in 0..count {
            let n = self.next_item;
            let item = DemoString::from_str_in(
                &format!("this is a very long test string of flotsam and jetsam #{} for the list", n),
                self.strategy,
            )?;
            // SAFETY: the containers are only reached through these pointers and no
            // reference outlives the loop iteration
            let list = unsafe { self.list.as_mut() };
            list.push_front(item)?;

            let item = DemoString::from_str_in(
                &format!("this is a very long test string of dreck and blither #{} for the vector", n),
                self.strategy,
            )?;
            // SAFETY: as above
            let vector = unsafe { self.vector.as_mut() };
            vector.push(item)?;

            self.next_item += 1;
        }
        self.log.push(
            format!("appended {} item(s) to each container", count),
            self.generation(),
        );
        self.history.push(TableSnapshot::capture::<PrivateStorage>(format!(
            "after appending {}",
            count
        )));
        Ok(())
    }

    /// Relocate every segment and record the new layout
    pub fn relocate(&mut self) {
        // SAFETY: every access to segment storage goes through the fancy pointers
        // held here and no reference survives a method call
        unsafe { self.strategy.relocate() };

        let snapshot = TableSnapshot::capture::<PrivateStorage>(format!(
            "after relocation {}",
            self.generation()
        ));
        let moved = self
            .history
            .latest()
            .map(|prev| snapshot.moved_since(prev).len())
            .unwrap_or(0);
        self.log.push(
            format!(
                "relocated all segments ({} of {} moved)",
                moved,
                snapshot.segments.len()
            ),
            self.generation(),
        );
        self.history.push(snapshot);
    }

    pub fn generation(&self) -> u64 {
        PrivateStorage::generation()
    }

    /// Coordinate and current address of the list object itself
    pub fn list_location(&self) -> (SegmentedAddress, usize) {
        (self.list.address(), self.list.as_ptr() as usize)
    }

    /// Coordinate and current address of the vector object itself
    pub fn vector_location(&self) -> (SegmentedAddress, usize) {
        (self.vector.address(), self.vector.as_ptr() as usize)
    }

    pub fn list_entries(&self) -> Vec<EntryView> {
        // SAFETY: see `append`
        let list = unsafe { self.list.as_ref() };
        list.iter().map(entry_view).collect()
    }

    pub fn vector_entries(&self) -> Vec<EntryView> {
        // SAFETY: see `append`
        let vector = unsafe { self.vector.as_ref() };
        vector.iter().map(entry_view).collect()
    }

    /// Log both containers with their current addresses
    pub fn report(&mut self, phase: &str) {
        let generation = self.generation();
        let (coord, addr) = self.list_location();
        self.log.push(
            format!("{} forward list at {} -> {:#x}", phase, coord, addr),
            generation,
        );
        for entry in self.list_entries() {
            self.log.push(format!("  {}", entry.text), generation);
        }

        let (coord, addr) = self.vector_location();
        self.log.push(
            format!("{} vector at {} -> {:#x}", phase, coord, addr),
            generation,
        );
        for entry in self.vector_entries() {
            self.log.push(format!("  {}", entry.text), generation);
        }
    }

    /// Report, relocate, report again, and check that nothing changed but addresses
    pub fn run_relocation_round(&mut self) -> bool {
        let before = (self.list_entries(), self.vector_entries());
        self.report("original");
        self.relocate();
        self.report("relocated");
        let after = (self.list_entries(), self.vector_entries());

        let same_text = texts(&before.0) == texts(&after.0) && texts(&before.1) == texts(&after.1);
        let all_moved = before
            .0
            .iter()
            .chain(before.1.iter())
            .zip(after.0.iter().chain(after.1.iter()))
            .all(|(b, a)| b.coordinate.bits() == a.coordinate.bits() && b.address != a.address);

        self.log.push(
            format!(
                "contents unchanged: {}, every element moved: {}",
                if same_text { "yes" } else { "NO" },
                if all_moved { "yes" } else { "NO" }
            ),
            self.generation(),
        );
        same_text && all_moved
    }
}

fn entry_view(item: &DemoString) -> EntryView {
    let ptr = item.as_fancy_ptr();
    EntryView {
        coordinate: ptr.address(),
        address: ptr.as_ptr() as usize,
        text: item.to_string_lossy().into_owned(),
    }
}

fn texts(entries: &[EntryView]) -> Vec<&str> {
    entries.iter().map(|e| e.text.as_str()).collect()
}
