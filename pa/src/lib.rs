//! Planassist - streaming planning assistant
//!
//! A chat assistant that can both converse and directly edit the user's task
//! list. The model's streamed response interleaves prose with delimited JSON
//! action blocks; the pipeline here decodes the stream, keeps a live
//! prose-only view for display, and once the response is complete, parses
//! and applies the embedded mutations to the task store.
//!
//! # Modules
//!
//! - [`llm`] - SSE decoding, the chat client trait, the Moonshot client
//! - [`chat`] - block extraction, action parsing/execution, the turn manager
//! - [`config`] - configuration types and loading
//! - [`cli`] / [`repl`] - the interactive surface
//!
//! # A turn
//!
//! ```text
//! snapshot store ─> rebuild system message ─> append user message
//!        ─> stream completion (live display = strip(buffer))
//!        ─> extract blocks ─> parse ─> execute ─> confirmations
//! ```

pub mod chat;
pub mod cli;
pub mod config;
pub mod llm;
pub mod repl;

pub use chat::{ChatService, TaskAction, TaskFields, TurnOutcome};
pub use config::{Config, LlmConfig, StorageConfig};
pub use llm::{ChatMessage, LlmClient, LlmError, MoonshotClient, Role, SseDecoder};
pub use repl::ChatRepl;
