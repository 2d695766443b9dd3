//! Containers pane: the demo's forward list and vector

use super::utils::{border_style, visible_window};
use crate::demo::EntryView;
use crate::memory::SegmentedAddress;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Data needed to render the containers pane
pub struct ContainersRenderData<'a> {
    pub list_location: (SegmentedAddress, usize),
    pub list_entries: &'a [EntryView],
    pub vector_location: (SegmentedAddress, usize),
    pub vector_entries: &'a [EntryView],
}

fn header<'a>(name: &'a str, location: (SegmentedAddress, usize), len: usize) -> ListItem<'a> {
    ListItem::new(Line::from(vec![
        Span::styled(
            name,
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" at "),
        Span::styled(
            location.0.to_string(),
            Style::default().fg(DEFAULT_THEME.coordinate),
        ),
        Span::raw(" -> "),
        Span::styled(
            format!("0x{:012x}", location.1),
            Style::default().fg(DEFAULT_THEME.address),
        ),
        Span::styled(
            format!(" ({} items)", len),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ]))
}

fn entry(item: &EntryView) -> ListItem<'_> {
    ListItem::new(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            item.coordinate.to_string(),
            Style::default().fg(DEFAULT_THEME.coordinate),
        ),
        Span::raw(" "),
        Span::styled(
            format!("0x{:012x}", item.address),
            Style::default().fg(DEFAULT_THEME.address),
        ),
        Span::raw(" "),
        Span::styled(item.text.as_str(), Style::default().fg(DEFAULT_THEME.fg)),
    ]))
}

/// Render the containers pane
pub fn render_containers_pane(
    frame: &mut Frame,
    area: Rect,
    data: ContainersRenderData,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Containers ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let mut all_items = vec![header(
        "forward list",
        data.list_location,
        data.list_entries.len(),
    )];
    all_items.extend(data.list_entries.iter().map(entry));
    all_items.push(ListItem::new(""));
    all_items.push(header(
        "vector",
        data.vector_location,
        data.vector_entries.len(),
    ));
    all_items.extend(data.vector_entries.iter().map(entry));

    let visible_items = visible_window(all_items, area.height, scroll_offset);
    frame.render_widget(List::new(visible_items).block(block), area);
}
