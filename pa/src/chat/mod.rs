//! The streaming assistant action pipeline
//!
//! A model response is free-form prose with `[ACTION]`-delimited JSON
//! commands embedded in it. This module separates the two, parses the
//! commands into typed mutation requests, applies them to the task store,
//! and manages the conversation history the whole exchange lives in.
//!
//! - [`blocks`] - display stripping and block extraction
//! - [`actions`] - payload parsing into [`TaskAction`]
//! - [`executor`] - applying actions to the store
//! - [`context`] - per-turn system prompt rendering
//! - [`service`] - the turn state machine

pub mod actions;
pub mod blocks;
pub mod context;
pub mod executor;
pub mod service;

pub use actions::{TaskAction, TaskFields, parse_action};
pub use blocks::{ACTION_END, ACTION_START, extract_action_blocks, strip_action_blocks};
pub use context::{format_task_context, render_system_prompt};
pub use executor::apply_action;
pub use service::{ChatService, TurnOutcome};
