//! Application state modules.

mod status;
mod ui;

pub use status::{Status, StatusLevel};
pub use ui::{ExportKind, UiState};
