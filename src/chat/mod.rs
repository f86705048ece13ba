//! Chat flow
//!
//! ```text
//! message + pending upload
//!      │
//!      ▼
//! PromptAssembler  → text, optional inline JPEG
//!      │
//!      ▼
//! ReplyAgent       → Gemini call, session updated
//! ```

pub mod prompt;
pub mod reply;
pub mod session;

pub use prompt::PromptAssembler;
pub use reply::ReplyAgent;
pub use session::{ConversationSession, ConversationTurn, Role};
