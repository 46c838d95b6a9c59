use chrono::{Local, NaiveDate, NaiveTime};
use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;
use uuid::Uuid;

use planstore::cli::Cli;
use planstore::config::Config;
use planstore::{DATE_FORMAT, JsonFileStore, TIME_FORMAT, Task, TaskStore};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let tasks_file = cli.tasks_file.unwrap_or(config.tasks_file);

    info!("planstore starting");

    let mut store = JsonFileStore::open(&tasks_file)
        .context(format!("Failed to open task store at {}", tasks_file.display()))?;

    match cli.command {
        planstore::cli::Command::Add {
            title,
            due,
            description,
            priority,
            category,
            start,
            end,
        } => {
            let due_date = match due {
                Some(s) => parse_date(&s)?,
                None => Local::now().date_naive(),
            };
            let start_time = start.map(|s| parse_time(&s)).transpose()?;
            let end_time = end.map(|s| parse_time(&s)).transpose()?;

            let task = Task::new(&title, due_date)
                .with_description(description.unwrap_or_default())
                .with_priority(priority.unwrap_or(config.default_priority))
                .with_category(category.unwrap_or_default())
                .with_times(
                    start_time.map(|t| due_date.and_time(t)),
                    end_time.map(|t| due_date.and_time(t)),
                );
            let id = task.id;
            store.add(task);
            println!("{} Added: {} ({})", "✓".green(), title.cyan(), id.to_string().dimmed());
        }
        planstore::cli::Command::List { all } => {
            let mut tasks = store.list();
            tasks.sort_by_key(|t| t.due_date);
            if !all {
                tasks.retain(|t| !t.is_completed);
            }

            if tasks.is_empty() {
                println!("No tasks");
            } else {
                for t in tasks {
                    print_task(&t);
                }
            }
        }
        planstore::cli::Command::Update {
            id,
            title,
            due,
            description,
            priority,
            category,
        } => {
            let id = parse_id(&id)?;
            let mut task = store
                .list()
                .into_iter()
                .find(|t| t.id == id)
                .ok_or_else(|| eyre!("No task with id {}", id))?;

            if let Some(title) = title {
                task.title = title;
            }
            if let Some(due) = due {
                task.due_date = parse_date(&due)?;
            }
            if let Some(description) = description {
                task.description = description;
            }
            if let Some(priority) = priority {
                task.priority = priority;
            }
            if let Some(category) = category {
                task.category = category;
            }

            let title = task.title.clone();
            store.update(task);
            println!("{} Updated: {}", "✓".green(), title.cyan());
        }
        planstore::cli::Command::Remove { id } => {
            let id = parse_id(&id)?;
            let title = store
                .list()
                .into_iter()
                .find(|t| t.id == id)
                .map(|t| t.title)
                .ok_or_else(|| eyre!("No task with id {}", id))?;
            store.remove_by_id(&id);
            println!("{} Removed: {}", "✓".green(), title.cyan());
        }
        planstore::cli::Command::Complete { id } => {
            let id = parse_id(&id)?;
            if !store.toggle_complete_by_id(&id) {
                return Err(eyre!("No task with id {}", id));
            }
            let task = store.list().into_iter().find(|t| t.id == id);
            let state = match task {
                Some(ref t) if t.is_completed => "Completed",
                _ => "Reopened",
            };
            let title = task.map(|t| t.title).unwrap_or_default();
            println!("{} {}: {}", "✓".green(), state, title.cyan());
        }
        planstore::cli::Command::Clear => {
            let tasks = store.list();
            let count = tasks.len();
            for t in tasks {
                store.remove_by_id(&t.id);
            }
            println!("{} Cleared {} task(s)", "✓".green(), count);
        }
    }

    Ok(())
}

fn print_task(t: &Task) {
    let marker = if t.is_completed { "[x]" } else { "[ ]" };
    let mut line = format!(
        "{} {} {} {} {} {}",
        t.id.to_string().dimmed(),
        marker,
        t.due_date.format(DATE_FORMAT),
        t.priority.to_string().yellow(),
        t.category.to_string().blue(),
        t.title.bold(),
    );
    if let (Some(start), Some(end)) = (t.start_time, t.end_time) {
        line.push_str(&format!(" {}-{}", start.format(TIME_FORMAT), end.format(TIME_FORMAT)));
    } else if let Some(start) = t.start_time {
        line.push_str(&format!(" {}", start.format(TIME_FORMAT)));
    }
    if !t.description.is_empty() {
        line.push_str(&format!(" {}", t.description.dimmed()));
    }
    println!("{}", line);
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| eyre!("Invalid date '{}', expected YYYY-MM-DD", s))
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT).map_err(|_| eyre!("Invalid time '{}', expected HH:MM", s))
}

fn parse_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|_| eyre!("Invalid task id '{}'", s))
}
