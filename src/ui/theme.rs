//! Inspector palette (Catppuccin Mocha)

use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub comment: Color,
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub error: Color,
    pub number: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color, // status bar background
    pub address: Color,         // linear addresses
    pub coordinate: Color,      // segment:offset pairs
    pub moved: Color,           // live bases that changed since the previous snapshot
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),        // text
    comment: Color::Rgb(108, 112, 134),   // overlay0
    primary: Color::Rgb(137, 180, 250),   // blue
    secondary: Color::Rgb(250, 179, 135), // peach
    success: Color::Rgb(166, 227, 161),   // green
    error: Color::Rgb(243, 139, 168),     // red
    number: Color::Rgb(250, 179, 135),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(108, 112, 134),
    current_line_bg: Color::Rgb(50, 50, 70),
    address: Color::Rgb(249, 226, 175),    // yellow
    coordinate: Color::Rgb(148, 226, 213), // teal
    moved: Color::Rgb(245, 194, 231),      // pink
};
