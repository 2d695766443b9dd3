// Tests for the relocation demo and its snapshot history

use segptr::demo::{Demo, DEFAULT_HISTORY_LIMIT};
use segptr::memory::{PrivateStorage, FIRST_SEGMENT};
use segptr::snapshot::{EventLog, SnapshotHistory, TableSnapshot};
use segptr::ui::app::FocusedPane;

#[test]
fn test_relocation_round_preserves_contents() {
    let mut demo = Demo::new(11, DEFAULT_HISTORY_LIMIT).unwrap();
    assert_eq!(demo.list_entries().len(), 11);
    assert_eq!(demo.vector_entries().len(), 11);

    let texts_before: Vec<String> = demo.list_entries().into_iter().map(|e| e.text).collect();
    assert!(demo.run_relocation_round());
    let texts_after: Vec<String> = demo.list_entries().into_iter().map(|e| e.text).collect();

    assert_eq!(texts_before, texts_after);
    assert_eq!(demo.generation(), 1);
    assert!(demo.run_relocation_round());
    assert_eq!(demo.generation(), 2);
}

#[test]
fn test_list_is_newest_first_and_vector_in_order() {
    let demo = Demo::new(3, DEFAULT_HISTORY_LIMIT).unwrap();
    let list = demo.list_entries();
    let vector = demo.vector_entries();
    assert!(list[0].text.contains("#2"));
    assert!(list[2].text.contains("#0"));
    assert!(vector[0].text.contains("#0"));
    assert!(vector[2].text.contains("#2"));
}

#[test]
fn test_containers_live_in_segments() {
    let demo = Demo::new(2, DEFAULT_HISTORY_LIMIT).unwrap();
    let (list_coord, _) = demo.list_location();
    let (vector_coord, _) = demo.vector_location();
    assert_eq!(list_coord.segment(), FIRST_SEGMENT);
    assert_eq!(list_coord.offset(), 0);
    assert!(!vector_coord.is_unmanaged());
    assert!(demo
        .list_entries()
        .iter()
        .all(|e| e.coordinate.segment() >= FIRST_SEGMENT));
}

#[test]
fn test_relocation_moves_addresses_not_coordinates() {
    let mut demo = Demo::new(4, DEFAULT_HISTORY_LIMIT).unwrap();
    let before = demo.vector_entries();
    let (coord_before, addr_before) = demo.vector_location();
    demo.relocate();
    let after = demo.vector_entries();
    let (coord_after, addr_after) = demo.vector_location();

    assert_eq!(coord_before.bits(), coord_after.bits());
    assert_ne!(addr_before, addr_after);
    for (b, a) in before.iter().zip(after.iter()) {
        assert_eq!(b.coordinate.bits(), a.coordinate.bits());
        assert_ne!(b.address, a.address);
        assert_eq!(b.text, a.text);
    }
}

#[test]
fn test_append_grows_containers_and_history() {
    let mut demo = Demo::new(1, DEFAULT_HISTORY_LIMIT).unwrap();
    let snapshots = demo.history.len();
    demo.append(5).unwrap();
    assert_eq!(demo.list_entries().len(), 6);
    assert_eq!(demo.vector_entries().len(), 6);
    assert_eq!(demo.history.len(), snapshots + 1);
}

#[test]
fn test_log_records_both_phases() {
    let mut demo = Demo::new(2, DEFAULT_HISTORY_LIMIT).unwrap();
    demo.run_relocation_round();
    let output = demo.log.get_output();
    assert!(output.iter().any(|l| l.starts_with("original forward list")));
    assert!(output.iter().any(|l| l.starts_with("relocated vector")));
    assert!(output
        .iter()
        .any(|l| l == "contents unchanged: yes, every element moved: yes"));
}

#[test]
fn test_snapshot_moved_since() {
    let mut demo = Demo::new(1, DEFAULT_HISTORY_LIMIT).unwrap();
    let first = TableSnapshot::capture::<PrivateStorage>("before");
    demo.relocate();
    let second = TableSnapshot::capture::<PrivateStorage>("after");

    let moved = second.moved_since(&first);
    assert_eq!(moved.len(), first.segments.len());
    assert!(second.moved_since(&second).is_empty());
    assert_eq!(second.generation, first.generation + 1);
    assert!(first.segments[0].used > 0);
}

#[test]
fn test_history_evicts_oldest_over_limit() {
    let snapshot = TableSnapshot::capture::<PrivateStorage>("empty");
    let size = snapshot.estimated_size();
    let mut history = SnapshotHistory::new(size * 2);
    assert!(history.is_empty());

    for _ in 0..5 {
        history.push(snapshot.clone());
    }
    assert_eq!(history.len(), 2);
    assert!(history.memory_usage() <= history.memory_limit());
    assert!(history.get(1).is_some());
    assert!(history.get(2).is_none());

    // A single oversized snapshot is still kept
    let mut tiny = SnapshotHistory::new(1);
    tiny.push(snapshot);
    assert_eq!(tiny.len(), 1);
    assert_eq!(tiny.latest().map(|s| s.label.as_str()), Some("empty"));
}

#[test]
fn test_event_log_splits_lines() {
    let mut log = EventLog::new();
    log.push("one\ntwo", 0);
    log.push("three", 1);
    assert_eq!(log.get_output(), vec!["one", "two", "three"]);
    assert_eq!(log.lines[1].generation, 1);
}

#[test]
fn test_focus_cycles_through_panes() {
    let pane = FocusedPane::Segments;
    assert_eq!(pane.next(), FocusedPane::Containers);
    assert_eq!(pane.next().next().next(), pane);
    assert_eq!(pane.prev(), FocusedPane::Log);
    assert_eq!(pane.next().prev(), pane);
}
