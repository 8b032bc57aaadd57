//! Timeline Board
//!
//! Project timelines and Kanban boards. The layout engine, view state,
//! scroll synchronization and Kanban projection are plain Rust; `app` and
//! `ui` are the egui shell on top.

pub mod app;
pub mod config;
pub mod error;
pub mod io;
pub mod kanban;
pub mod layout;
pub mod logging;
pub mod model;
pub mod scroll_sync;
pub mod source;
pub mod state;
pub mod summary;
pub mod ui;

pub use error::{Error, Result};
