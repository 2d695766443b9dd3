//! Shared helpers for pane rendering

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::ListItem;

pub(crate) fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp `offset` to the scrollable range and cut out the visible window
pub(crate) fn visible_window<'a>(
    items: Vec<ListItem<'a>>,
    height: u16,
    offset: &mut usize,
) -> Vec<ListItem<'a>> {
    let total_items = items.len();
    let visible_height = height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    if total_items > visible_height {
        *offset = (*offset).min(total_items - visible_height);
    } else {
        *offset = 0;
    }

    items
        .into_iter()
        .skip(*offset)
        .take(visible_height)
        .collect()
}

/// Text bar of `width` cells filled in proportion to `used / total`
pub(crate) fn usage_bar(used: usize, total: usize, width: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        ((used as u128 * width as u128).div_ceil(total as u128) as usize).min(width)
    };
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

/// Hex bytes separated by spaces
pub(crate) fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace non-printable bytes with '.'
pub(crate) fn printable(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
        .collect()
}
