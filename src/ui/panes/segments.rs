//! Segment table pane
//!
//! One block per allocated segment: its id, live and shadow base addresses,
//! how many bytes the bump cursor has handed out, and (when showing the
//! latest snapshot) the first bytes of the live buffer. Segments whose live
//! base changed since the previous snapshot are highlighted.

use super::utils::{border_style, hex_bytes, printable, usage_bar, visible_window};
use crate::memory::{PrivateStorage, StorageModel};
use crate::snapshot::TableSnapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

const PREVIEW_BYTES: usize = 16;
const BAR_WIDTH: usize = 20;

/// Scroll state for the segments pane
pub struct SegmentsScrollState {
    pub offset: usize,
}

/// Data needed to render the segments pane
pub struct SegmentsRenderData<'a> {
    pub snapshot: &'a TableSnapshot,
    pub previous: Option<&'a TableSnapshot>,
    /// Live bytes can only be previewed while the snapshot is the current layout
    pub is_latest: bool,
}

/// Render the segments pane
pub fn render_segments_pane(
    frame: &mut Frame,
    area: Rect,
    data: SegmentsRenderData,
    is_focused: bool,
    scroll_state: &mut SegmentsScrollState,
) {
    let block = Block::default()
        .title(format!(
            " Segments (generation {}: {}) ",
            data.snapshot.generation, data.snapshot.label
        ))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let moved = data
        .previous
        .map(|prev| data.snapshot.moved_since(prev))
        .unwrap_or_default();

    let mut all_items = Vec::new();
    if data.snapshot.segments.is_empty() {
        all_items.push(
            ListItem::new("(no segments allocated)")
                .style(Style::default().fg(DEFAULT_THEME.comment)),
        );
    }

    let count = data.snapshot.segments.len();
    for (i, usage) in data.snapshot.segments.iter().enumerate() {
        let view = usage.view;
        let base_style = if moved.contains(&view.id) {
            Style::default()
                .fg(DEFAULT_THEME.moved)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DEFAULT_THEME.address)
        };

        all_items.push(ListItem::new(Line::from(vec![
            Span::styled(
                format!("seg {:02}", view.id),
                Style::default()
                    .fg(DEFAULT_THEME.coordinate)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | live "),
            Span::styled(format!("0x{:012x}", view.live_base), base_style),
            Span::raw(" | shadow "),
            Span::styled(
                format!("0x{:012x}", view.shadow_base),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
        ])));

        all_items.push(ListItem::new(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                usage_bar(usage.used, view.size, BAR_WIDTH),
                Style::default().fg(DEFAULT_THEME.success),
            ),
            Span::raw(" "),
            Span::styled(
                format!("{} / {} bytes", usage.used, view.size),
                Style::default().fg(DEFAULT_THEME.number),
            ),
        ])));

        if data.is_latest && usage.used > 0 {
            let preview = PrivateStorage::with_table(|table| {
                table
                    .segment_bytes(view.id)
                    .map(|bytes| bytes[..PREVIEW_BYTES.min(bytes.len())].to_vec())
            });
            if let Some(bytes) = preview {
                all_items.push(
                    ListItem::new(format!("  {}  {}", hex_bytes(&bytes), printable(&bytes)))
                        .style(Style::default().fg(DEFAULT_THEME.comment)),
                );
            }
        }

        if i + 1 < count {
            all_items.push(ListItem::new(""));
        }
    }

    let visible_items = visible_window(all_items, area.height, &mut scroll_state.offset);
    frame.render_widget(List::new(visible_items).block(block), area);
}
