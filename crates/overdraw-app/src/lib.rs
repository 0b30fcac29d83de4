//! Overdraw Application
//!
//! Headless shell that replays a recorded drawing session and exports
//! the editor or preview surface as PNG.

mod action;
mod app;

pub use action::Action;
pub use app::{App, AppConfig, AppError, Script, USAGE};
