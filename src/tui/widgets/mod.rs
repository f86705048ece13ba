//! TUI Widgets
//!
//! Custom widgets for the Gemini Chat TUI.

mod settings;
mod upload;

pub use settings::render_settings;
pub use upload::render_upload_preview;
