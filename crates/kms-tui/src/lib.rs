//! Terminal user interface for kms-explorer.
//!
//! Two panes side by side: the folder tree on the left and the knowledge
//! table of the current folder on the right, with a breadcrumb header on top.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kms_core::ExplorerConfig;
//! use kms_ops::MemoryBackend;
//!
//! kms_tui::run(Arc::new(MemoryBackend::sample()), ExplorerConfig::default()).unwrap();
//! ```
//!
//! # Keyboard Navigation
//!
//! - `j`/`k` - Move down/up
//! - `h`/`l` - Collapse/expand folders
//! - `Enter` - Open folder
//! - `Backspace` - Go to the parent folder
//! - `Tab` - Switch between tree and table
//! - `Space` - Mark a row
//! - `d` - Delete marked rows
//! - `m` - Pick up an element and move it
//! - `?` - Help
//! - `q` - Quit

pub mod app;
mod event;
mod theme;
mod ui;

use kms_core::ExplorerConfig;
use kms_ops::SharedBackend;

pub use app::{App, AppResult};
pub use theme::Theme;

/// Run the TUI application.
pub fn run(backend: SharedBackend, config: ExplorerConfig) -> AppResult<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let terminal = ratatui::init();
    let result = rt.block_on(App::new(backend, config).run(terminal));
    ratatui::restore();

    // Cancel background listings still in flight
    rt.shutdown_timeout(std::time::Duration::from_millis(100));

    result
}
