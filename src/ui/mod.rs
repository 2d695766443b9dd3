//! Segment inspector
//!
//! A ratatui front end over [`Demo`]: the segment table on the left, the
//! demo's containers and its event log on the right, and a status bar with
//! the snapshot being viewed.
//!
//! - [`app`]: state, key handling and the draw loop
//! - [`panes`]: one render function per pane
//! - [`theme`]: colours shared by the panes
//!
//! [`Demo`]: crate::demo::Demo

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
