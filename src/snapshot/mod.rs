// Snapshot management for relocation history

use crate::memory::{SegmentView, StorageModel};
use crate::strategy::LeakyStrategy;
use rustc_hash::FxHashMap;

/// Captured log of demo output
#[derive(Debug, Clone)]
pub struct EventLog {
    pub lines: Vec<LogLine>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog { lines: Vec::new() }
    }

    /// Append one line tagged with the relocation generation it was written in
    pub fn push(&mut self, text: impl Into<String>, generation: u64) {
        self.lines.push(LogLine {
            text: text.into(),
            generation,
        });
    }

    /// Get all lines as a vector of strings
    pub fn get_output(&self) -> Vec<String> {
        self.lines
            .iter()
            .flat_map(|line| line.text.split('\n').map(|s| s.to_string()))
            .collect()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

/// A line of log output
#[derive(Debug, Clone)]
pub struct LogLine {
    pub text: String,
    pub generation: u64,
}

/// One segment as seen at snapshot time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentUsage {
    pub view: SegmentView,
    pub used: usize,
}

/// Layout of a segment table at one point in time
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub generation: u64,
    pub label: String,
    pub segments: Vec<SegmentUsage>,
}

impl TableSnapshot {
    /// Capture the table of storage model `S`, with usage from its bump cursor
    pub fn capture<S: StorageModel>(label: impl Into<String>) -> Self {
        let segments = S::segment_views()
            .into_iter()
            .map(|view| SegmentUsage {
                view,
                used: LeakyStrategy::<S>::used_bytes(view.id),
            })
            .collect();

        TableSnapshot {
            generation: S::generation(),
            label: label.into(),
            segments,
        }
    }

    /// Segments whose live base differs from `earlier`
    pub fn moved_since(&self, earlier: &TableSnapshot) -> Vec<usize> {
        let before: FxHashMap<usize, usize> = earlier
            .segments
            .iter()
            .map(|s| (s.view.id, s.view.live_base))
            .collect();

        self.segments
            .iter()
            .filter(|s| before.get(&s.view.id).is_some_and(|&base| base != s.view.live_base))
            .map(|s| s.view.id)
            .collect()
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.label.len()
            + self.segments.len() * std::mem::size_of::<SegmentUsage>()
    }
}

/// Bounded history of table snapshots
#[derive(Debug)]
pub struct SnapshotHistory {
    snapshots: Vec<TableSnapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotHistory {
    pub fn new(max_memory: usize) -> Self {
        SnapshotHistory {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot, evicting the oldest ones once over the memory limit
    pub fn push(&mut self, snapshot: TableSnapshot) {
        self.current_memory += snapshot.estimated_size();
        self.snapshots.push(snapshot);

        while self.current_memory > self.max_memory && self.snapshots.len() > 1 {
            let evicted = self.snapshots.remove(0);
            self.current_memory -= evicted.estimated_size();
        }
    }

    pub fn get(&self, index: usize) -> Option<&TableSnapshot> {
        self.snapshots.get(index)
    }

    pub fn latest(&self) -> Option<&TableSnapshot> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}
