//! Turning a natural-language question into a candidate SQL statement.
//!
//! The prompt builder embeds the schema into a system instruction, the
//! client makes exactly one chat-completion call, and the guard decides
//! whether the reply is executable.

pub mod client;
pub mod error;
pub mod guard;
pub mod prompt;

pub use client::LlmClient;
pub use error::{ForbiddenStatementError, SynthesisError};
pub use guard::{classify_reply, ensure_read_only, SynthesizedSql};
pub use prompt::{system_instruction, UNANSWERABLE};
