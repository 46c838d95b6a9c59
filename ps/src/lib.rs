//! PlanStore - task list storage for the planning assistant
//!
//! Holds the user's tasks as a single JSON document and exposes the narrow
//! mutation surface the assistant pipeline drives: list, add, update,
//! remove, toggle-complete. Ships with a small CLI for inspecting and
//! editing the same file by hand.
//!
//! # Layout
//!
//! ```text
//! ~/.local/share/planassist/
//! └── tasks.json      # every task, pretty-printed JSON array
//! ```
//!
//! # Example
//!
//! ```ignore
//! use planstore::{JsonFileStore, Task, TaskStore};
//!
//! let mut store = JsonFileStore::open("tasks.json")?;
//! store.add(Task::new("Gym session", due_date));
//! for task in store.list() {
//!     println!("{} {}", task.due_date, task.title);
//! }
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::{Category, JsonFileStore, MemoryStore, Priority, Task, TaskStore};

/// Wire format for calendar dates ("2026-02-25")
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format for times of day ("08:30", 24-hour)
pub const TIME_FORMAT: &str = "%H:%M";
