//! LLM transport layer for planassist
//!
//! Chat client trait, the Moonshot implementation, and the SSE decoder that
//! turns streamed response bytes into text fragments.

pub mod client;
mod error;
mod moonshot;
mod sse;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use moonshot::MoonshotClient;
pub use sse::SseDecoder;
pub use types::{ChatMessage, Role};
