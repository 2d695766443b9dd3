//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`segments`]: Segment table with live and shadow bases, usage bars and a byte preview
//! - [`containers`]: The demo's list and vector, each element with its coordinate and address
//! - [`log`]: Event log written by the demo
//! - [`status`]: Status bar with keybindings and history position
//!
//! Each pane module exports a primary `render_*` function, plus the render data and
//! scroll state types it needs.

mod utils;

pub mod containers;
pub mod log;
pub mod segments;
pub mod status;

pub use containers::{render_containers_pane, ContainersRenderData};
pub use log::render_log_pane;
pub use segments::{render_segments_pane, SegmentsRenderData, SegmentsScrollState};
pub use status::{render_status_bar, StatusRenderData};
