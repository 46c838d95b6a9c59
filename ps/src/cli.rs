//! CLI argument parsing for planstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::{Category, Priority};

#[derive(Parser, Debug)]
#[command(name = "planstore")]
#[command(author, version, about = "Task list storage for the planning assistant", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the tasks JSON file (overrides config)
    #[arg(short = 'f', long)]
    pub tasks_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task
    Add {
        /// Task title
        #[arg(required = true)]
        title: String,

        /// Due date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        due: Option<String>,

        /// Free-form description
        #[arg(short = 'D', long)]
        description: Option<String>,

        /// Priority (low, medium, high)
        #[arg(short, long)]
        priority: Option<Priority>,

        /// Category (gym, class, study, meeting, dinner, other)
        #[arg(short = 't', long = "type")]
        category: Option<Category>,

        /// Start time (HH:MM, on the due date)
        #[arg(long)]
        start: Option<String>,

        /// End time (HH:MM, on the due date)
        #[arg(long)]
        end: Option<String>,
    },

    /// List tasks ordered by due date
    List {
        /// Include completed tasks
        #[arg(short, long)]
        all: bool,
    },

    /// Update fields on an existing task
    Update {
        /// Task ID
        #[arg(required = true)]
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,

        /// New description
        #[arg(short = 'D', long)]
        description: Option<String>,

        /// New priority (low, medium, high)
        #[arg(short, long)]
        priority: Option<Priority>,

        /// New category (gym, class, study, meeting, dinner, other)
        #[arg(short = 't', long = "type")]
        category: Option<Category>,
    },

    /// Remove a task
    Remove {
        /// Task ID
        #[arg(required = true)]
        id: String,
    },

    /// Toggle a task's completion
    Complete {
        /// Task ID
        #[arg(required = true)]
        id: String,
    },

    /// Remove every task
    Clear,
}
