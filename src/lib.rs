// Gemini Chat - terminal chat client for Google's Gemini models with file uploads

pub mod config;
pub mod types;
pub mod upload;    // File normalization: images, text, tables, PDFs, ZIP archives
pub mod chat;      // Session, prompt assembly and the reply flow
pub mod llm;
pub mod settings;  // Runtime model/key settings
pub mod tui;       // Terminal User Interface
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use types::{AppError, AppResult};
