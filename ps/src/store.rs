//! Task records and the stores that hold them

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Priority level for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Category tag for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Gym,
    Class,
    Study,
    Meeting,
    Dinner,
    #[default]
    Other,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gym => write!(f, "gym"),
            Self::Class => write!(f, "class"),
            Self::Study => write!(f, "study"),
            Self::Meeting => write!(f, "meeting"),
            Self::Dinner => write!(f, "dinner"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gym" => Ok(Self::Gym),
            "class" => Ok(Self::Class),
            "study" => Ok(Self::Study),
            "meeting" => Ok(Self::Meeting),
            "dinner" => Ok(Self::Dinner),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// A single task on the user's plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,
    /// Short title shown in lists
    pub title: String,
    /// Free-form details, empty when none
    #[serde(default)]
    pub description: String,
    /// Whether the task has been completed
    #[serde(default)]
    pub is_completed: bool,
    /// Calendar day the task falls on
    pub due_date: NaiveDate,
    /// Start of the scheduled slot, if the task is timed
    #[serde(default)]
    pub start_time: Option<NaiveDateTime>,
    /// End of the scheduled slot, if the task is timed
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
    /// Priority level
    #[serde(default)]
    pub priority: Priority,
    /// Category tag
    #[serde(default)]
    pub category: Category,
    /// Creation timestamp
    pub created_at: DateTime<Local>,
}

impl Task {
    /// Create a task due on the given date, with defaults everywhere else
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            is_completed: false,
            due_date,
            start_time: None,
            end_time: None,
            priority: Priority::default(),
            category: Category::default(),
            created_at: Local::now(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the category
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the scheduled slot
    pub fn with_times(mut self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }
}

/// Mutation surface the assistant pipeline drives
///
/// `list` returns an owned snapshot so callers can hold it across their own
/// mutations. The by-id operations report whether a matching task existed;
/// they never fail on an unknown id.
pub trait TaskStore: Send {
    /// Snapshot of every task, in insertion order
    fn list(&self) -> Vec<Task>;

    /// Insert a new task
    fn add(&mut self, task: Task);

    /// Replace the task carrying the same id; false if none does
    fn update(&mut self, task: Task) -> bool;

    /// Remove the task with this id; false if none does
    fn remove_by_id(&mut self, id: &Uuid) -> bool;

    /// Flip the completion flag of the task with this id; false if none does
    fn toggle_complete_by_id(&mut self, id: &Uuid) -> bool;
}

/// In-memory store backing tests and the JSON file store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Vec<Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryStore {
    fn list(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    fn add(&mut self, task: Task) {
        debug!(id = %task.id, title = %task.title, "MemoryStore::add");
        self.tasks.push(task);
    }

    fn update(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    fn remove_by_id(&mut self, id: &Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != *id);
        self.tasks.len() < before
    }

    fn toggle_complete_by_id(&mut self, id: &Uuid) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == *id) {
            Some(task) => {
                task.is_completed = !task.is_completed;
                true
            }
            None => false,
        }
    }
}

/// Store persisted as one pretty-printed JSON array
///
/// Loads the whole file at open and rewrites it after every mutation. Fine
/// for a personal task list; a failed write is logged and the in-memory
/// state stays authoritative for the rest of the session.
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at the given path; a missing file starts empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tasks: Vec<Task> = if path.exists() {
            let content =
                fs::read_to_string(&path).context(format!("Failed to read task file: {}", path.display()))?;
            serde_json::from_str(&content).context(format!("Failed to parse task file: {}", path.display()))?
        } else {
            Vec::new()
        };

        debug!(?path, count = tasks.len(), "Opened task store");
        Ok(Self {
            path,
            inner: MemoryStore { tasks },
        })
    }

    /// Where this store persists its tasks
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create task store directory")?;
        }
        let content = serde_json::to_string_pretty(&self.inner.tasks)?;
        fs::write(&self.path, content).context(format!("Failed to write task file: {}", self.path.display()))?;
        Ok(())
    }

    fn save_or_warn(&self) {
        if let Err(e) = self.save() {
            warn!(error = %e, path = ?self.path, "Failed to persist tasks");
        }
    }
}

impl TaskStore for JsonFileStore {
    fn list(&self) -> Vec<Task> {
        self.inner.list()
    }

    fn add(&mut self, task: Task) {
        info!(id = %task.id, title = %task.title, "JsonFileStore::add");
        self.inner.add(task);
        self.save_or_warn();
    }

    fn update(&mut self, task: Task) -> bool {
        let updated = self.inner.update(task);
        if updated {
            self.save_or_warn();
        }
        updated
    }

    fn remove_by_id(&mut self, id: &Uuid) -> bool {
        let removed = self.inner.remove_by_id(id);
        if removed {
            info!(%id, "JsonFileStore::remove_by_id");
            self.save_or_warn();
        }
        removed
    }

    fn toggle_complete_by_id(&mut self, id: &Uuid) -> bool {
        let toggled = self.inner.toggle_complete_by_id(id);
        if toggled {
            self.save_or_warn();
        }
        toggled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_task(title: &str) -> Task {
        Task::new(title, NaiveDate::from_ymd_opt(2026, 2, 25).unwrap())
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }

    #[test]
    fn test_priority_display_and_parse() {
        assert_eq!(Priority::High.to_string(), "high");
        assert_eq!("LOW".parse::<Priority>().unwrap(), Priority::Low);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_category_display_and_parse() {
        assert_eq!(Category::Gym.to_string(), "gym");
        assert_eq!("Meeting".parse::<Category>().unwrap(), Category::Meeting);
        assert!("party".parse::<Category>().is_err());
        assert_eq!(Category::default(), Category::Other);
    }

    #[test]
    fn test_priority_serde() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"high\"");

        let category: Category = serde_json::from_str("\"dinner\"").unwrap();
        assert_eq!(category, Category::Dinner);
    }

    #[test]
    fn test_memory_store_add_and_list() {
        let mut store = MemoryStore::new();
        assert!(store.list().is_empty());

        store.add(sample_task("Buy groceries"));
        store.add(sample_task("Gym session"));

        let tasks = store.list();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "Buy groceries");
        assert_eq!(tasks[1].title, "Gym session");
    }

    #[test]
    fn test_memory_store_update() {
        let mut store = MemoryStore::new();
        let mut task = sample_task("Draft report");
        let id = task.id;
        store.add(task.clone());

        task.title = "Finish report".to_string();
        task.priority = Priority::High;
        assert!(store.update(task));

        let tasks = store.list();
        assert_eq!(tasks[0].id, id);
        assert_eq!(tasks[0].title, "Finish report");
        assert_eq!(tasks[0].priority, Priority::High);
    }

    #[test]
    fn test_memory_store_update_unknown_id() {
        let mut store = MemoryStore::new();
        store.add(sample_task("Only task"));
        assert!(!store.update(sample_task("Different id")));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_memory_store_remove() {
        let mut store = MemoryStore::new();
        let task = sample_task("Ephemeral");
        let id = task.id;
        store.add(task);

        assert!(store.remove_by_id(&id));
        assert!(store.list().is_empty());
        assert!(!store.remove_by_id(&id));
    }

    #[test]
    fn test_memory_store_toggle_complete() {
        let mut store = MemoryStore::new();
        let task = sample_task("Laundry");
        let id = task.id;
        store.add(task);

        assert!(store.toggle_complete_by_id(&id));
        assert!(store.list()[0].is_completed);

        assert!(store.toggle_complete_by_id(&id));
        assert!(!store.list()[0].is_completed);

        assert!(!store.toggle_complete_by_id(&Uuid::new_v4()));
    }

    #[test]
    fn test_json_store_missing_file_starts_empty() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::open(temp.path().join("tasks.json")).unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_json_store_persists_across_opens() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = temp.path().join("nested").join("tasks.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        let task = sample_task("Persisted")
            .with_priority(Priority::High)
            .with_category(Category::Study);
        let id = task.id;
        store.add(task);

        let reopened = JsonFileStore::open(&path).unwrap();
        let tasks = reopened.list();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, id);
        assert_eq!(tasks[0].title, "Persisted");
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[0].category, Category::Study);
    }

    #[test]
    fn test_json_store_mutations_persist() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = temp.path().join("tasks.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        let task = sample_task("Toggle me");
        let id = task.id;
        store.add(task);
        store.add(sample_task("Remove me"));

        let other_id = store.list()[1].id;
        assert!(store.toggle_complete_by_id(&id));
        assert!(store.remove_by_id(&other_id));

        let reopened = JsonFileStore::open(&path).unwrap();
        let tasks = reopened.list();
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].is_completed);
    }

    #[test]
    fn test_json_store_rejects_corrupt_file() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = temp.path().join("tasks.json");
        fs::write(&path, "not json").unwrap();

        assert!(JsonFileStore::open(&path).is_err());
    }

    #[test]
    fn test_task_round_trips_through_json() {
        let task = sample_task("Round trip")
            .with_description("with details")
            .with_times(
                NaiveDate::from_ymd_opt(2026, 2, 25).unwrap().and_hms_opt(8, 0, 0),
                NaiveDate::from_ymd_opt(2026, 2, 25).unwrap().and_hms_opt(9, 0, 0),
            );

        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }
}
