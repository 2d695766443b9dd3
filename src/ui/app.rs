//! Main TUI application state and logic

use super::panes::{
    render_containers_pane, render_log_pane, render_segments_pane, render_status_bar,
    ContainersRenderData, SegmentsRenderData, SegmentsScrollState, StatusRenderData,
};
use crate::demo::Demo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Segments,
    Containers,
    Log,
}

impl FocusedPane {
    /// Move focus to the next pane (segments -> containers -> log)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Segments => FocusedPane::Containers,
            FocusedPane::Containers => FocusedPane::Log,
            FocusedPane::Log => FocusedPane::Segments,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Segments => FocusedPane::Log,
            FocusedPane::Containers => FocusedPane::Segments,
            FocusedPane::Log => FocusedPane::Containers,
        }
    }
}

/// The main application state
pub struct App {
    pub demo: Demo,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub segments_scroll: SegmentsScrollState,
    pub containers_scroll: usize,
    pub log_scroll: usize,

    /// Index into the demo's snapshot history being displayed
    pub history_position: usize,

    pub should_quit: bool,
    pub status_message: String,
    pub is_error: bool,
}

impl App {
    pub fn new(demo: Demo) -> Self {
        let history_position = demo.history.len().saturating_sub(1);
        App {
            demo,
            focused_pane: FocusedPane::Segments,
            segments_scroll: SegmentsScrollState { offset: 0 },
            containers_scroll: 0,
            log_scroll: usize::MAX,
            history_position,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_error: false,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn is_latest(&self) -> bool {
        self.history_position + 1 >= self.demo.history.len()
    }

    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(main_chunks[0]);

        // Right column: Containers (top) | Log (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        let is_latest = self.is_latest();
        if let Some(snapshot) = self.demo.history.get(self.history_position) {
            let previous = self
                .history_position
                .checked_sub(1)
                .and_then(|i| self.demo.history.get(i));
            render_segments_pane(
                frame,
                columns[0],
                SegmentsRenderData {
                    snapshot,
                    previous,
                    is_latest,
                },
                self.focused_pane == FocusedPane::Segments,
                &mut self.segments_scroll,
            );
        }

        let list_entries = self.demo.list_entries();
        let vector_entries = self.demo.vector_entries();
        render_containers_pane(
            frame,
            right_rows[0],
            ContainersRenderData {
                list_location: self.demo.list_location(),
                list_entries: &list_entries,
                vector_location: self.demo.vector_location(),
                vector_entries: &vector_entries,
            },
            self.focused_pane == FocusedPane::Containers,
            &mut self.containers_scroll,
        );

        let shown_generation = self
            .demo
            .history
            .get(self.history_position)
            .map_or(self.demo.generation(), |s| s.generation);
        render_log_pane(
            frame,
            right_rows[1],
            &self.demo.log,
            shown_generation,
            self.focused_pane == FocusedPane::Log,
            &mut self.log_scroll,
        );

        render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                position: self.history_position,
                total: self.demo.history.len(),
                is_error: self.is_error,
            },
        );
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('r') => self.relocate(),
            KeyCode::Char('a') => self.append(),
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                if self.history_position > 0 {
                    self.history_position -= 1;
                    self.status_message = "Viewing earlier snapshot".to_string();
                } else {
                    self.status_message = "Already at the oldest snapshot".to_string();
                }
                self.is_error = false;
            }
            KeyCode::Right => {
                if !self.is_latest() {
                    self.history_position += 1;
                    self.status_message = "Viewing later snapshot".to_string();
                } else {
                    self.status_message = "Already at the latest snapshot".to_string();
                }
                self.is_error = false;
            }
            KeyCode::Enter => {
                self.jump_to_latest();
                self.status_message = "Jumped to latest".to_string();
                self.is_error = false;
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Segments => {
                    self.segments_scroll.offset = self.segments_scroll.offset.saturating_sub(1);
                }
                FocusedPane::Containers => {
                    self.containers_scroll = self.containers_scroll.saturating_sub(1);
                }
                FocusedPane::Log => {
                    self.log_scroll = self.log_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Segments => {
                    self.segments_scroll.offset = self.segments_scroll.offset.saturating_add(1);
                }
                FocusedPane::Containers => {
                    self.containers_scroll = self.containers_scroll.saturating_add(1);
                }
                FocusedPane::Log => {
                    self.log_scroll = self.log_scroll.saturating_add(1);
                }
            },
            _ => {}
        }
    }

    fn jump_to_latest(&mut self) {
        self.history_position = self.demo.history.len().saturating_sub(1);
        self.log_scroll = usize::MAX;
    }

    fn relocate(&mut self) {
        if self.demo.run_relocation_round() {
            self.status_message = format!(
                "Relocated (generation {}): contents intact",
                self.demo.generation()
            );
            self.is_error = false;
        } else {
            self.status_message = "Relocation changed container contents".to_string();
            self.is_error = true;
        }
        self.jump_to_latest();
    }

    fn append(&mut self) {
        match self.demo.append(1) {
            Ok(()) => {
                self.status_message = "Appended one item to each container".to_string();
                self.is_error = false;
            }
            Err(e) => {
                self.status_message = format!("Cannot append: {}", e);
                self.is_error = true;
            }
        }
        self.jump_to_latest();
    }
}
