//! Event log pane rendering

use super::utils::{border_style, visible_window};
use crate::snapshot::EventLog;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the event log pane
///
/// Lines written after `generation` are dimmed so the log lines up with the
/// snapshot being browsed.
pub fn render_log_pane(
    frame: &mut Frame,
    area: Rect,
    log: &EventLog,
    generation: u64,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Event Log ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    if log.lines.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let all_items: Vec<ListItem> = log
        .lines
        .iter()
        .flat_map(|line| {
            let color = if line.generation > generation {
                DEFAULT_THEME.comment
            } else {
                DEFAULT_THEME.fg
            };
            let tag = format!("[{}] ", line.generation);
            line.text.split('\n').map(move |text| {
                ListItem::new(Line::from(vec![
                    Span::styled(tag.clone(), Style::default().fg(DEFAULT_THEME.number)),
                    Span::styled(text, Style::default().fg(color)),
                ]))
            })
        })
        .collect();

    let visible_items = visible_window(all_items, area.height, scroll_offset);
    frame.render_widget(List::new(visible_items).block(block), area);
}
