//! Interactive chat REPL
//!
//! Line-oriented chat surface over the conversation pipeline. While a turn
//! streams, the live display text is printed incrementally; once the turn
//! settles, any applied-action confirmations are printed in green.

use std::io::{self, Write};
use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use planstore::{DATE_FORMAT, TIME_FORMAT, TaskStore};

use crate::chat::{ACTION_START, ChatService};
use crate::llm::LlmClient;

/// Interactive chat session
pub struct ChatRepl<S: TaskStore> {
    service: ChatService,
    store: S,
}

impl<S: TaskStore> ChatRepl<S> {
    pub fn new(llm: Arc<dyn LlmClient>, store: S) -> Self {
        Self {
            service: ChatService::new(llm),
            store,
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.process_user_input(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show a new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Planassist".bright_cyan().bold());
        println!("Chat with your planner; it can create, update, and complete tasks.");
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    /// Handle slash commands
    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let cmd = input.split_whitespace().next().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/clear" | "/c" => {
                self.service.reset();
                println!("{}", "Conversation cleared.".dimmed());
                SlashResult::Continue
            }
            "/tasks" | "/t" => {
                self.print_tasks();
                SlashResult::Continue
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:10} Show this help", "/help".yellow());
        println!("  {:10} Exit the chat", "/quit".yellow());
        println!("  {:10} Clear conversation history", "/clear".yellow());
        println!("  {:10} List current tasks", "/tasks".yellow());
        println!();
    }

    fn print_tasks(&self) {
        let mut tasks = self.store.list();
        if tasks.is_empty() {
            println!("{}", "No tasks currently scheduled.".dimmed());
            return;
        }
        tasks.sort_by_key(|t| t.due_date);

        println!();
        for t in tasks {
            let marker = if t.is_completed { "[x]".dimmed() } else { "[ ]".normal() };
            let mut line = format!(
                "{} {} {} {} {}",
                marker,
                t.due_date.format(DATE_FORMAT),
                t.priority.to_string().yellow(),
                t.category.to_string().blue(),
                t.title.bold(),
            );
            if let (Some(start), Some(end)) = (t.start_time, t.end_time) {
                line.push_str(&format!(" {}-{}", start.format(TIME_FORMAT), end.format(TIME_FORMAT)));
            }
            println!("{}", line);
        }
        println!();
    }

    /// Send one message through the pipeline, printing as it streams
    async fn process_user_input(&mut self, input: &str) {
        let (display_tx, mut display_rx) = mpsc::channel::<String>(64);

        // The display text can only be appended to, except when an action
        // block closes and its text vanishes. Printing up to the first still
        // open delimiter keeps the visible part monotonic, so a plain suffix
        // diff is enough.
        let print_handle = tokio::spawn(async move {
            let mut shown = String::new();
            while let Some(display) = display_rx.recv().await {
                let visible = match display.find(ACTION_START) {
                    Some(idx) => &display[..idx],
                    None => display.as_str(),
                };
                if let Some(suffix) = visible.strip_prefix(shown.as_str()) {
                    print!("{}", suffix);
                    let _ = io::stdout().flush();
                    shown = visible.to_string();
                }
            }
        });

        let result = self.service.send_message(&mut self.store, input, display_tx).await;
        let _ = print_handle.await;
        println!();

        match result {
            Ok(outcome) => {
                for confirmation in &outcome.confirmations {
                    println!("{} {}", "✓".green(), confirmation.green());
                }
            }
            Err(e) => {
                println!("{} {}", "Error:".red(), e);
            }
        }
        println!();
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}
