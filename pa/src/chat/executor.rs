//! Action execution against the task store
//!
//! Applies parsed mutation requests and produces one human-readable
//! confirmation per applied mutation. Requests naming an id that no longer
//! resolves are silent no-ops; the model often works from a stale listing
//! and a scolding error would only confuse the conversation.

use chrono::Local;
use planstore::{Task, TaskStore};
use tracing::{debug, info};
use uuid::Uuid;

use super::actions::{TaskAction, TaskFields};

/// Apply one mutation request, returning its confirmation lines
///
/// `CreateMany` yields one confirmation per entry that was created; every
/// other variant yields at most one. No-ops yield nothing.
pub fn apply_action(store: &mut dyn TaskStore, action: TaskAction) -> Vec<String> {
    match action {
        TaskAction::Create(fields) => create_task(store, fields).into_iter().collect(),
        TaskAction::CreateMany(entries) => {
            // Entries apply in order; a bad entry never undoes earlier ones
            entries
                .into_iter()
                .filter_map(|fields| create_task(store, fields))
                .collect()
        }
        TaskAction::Update { id, fields } => update_task(store, &id, fields).into_iter().collect(),
        TaskAction::Delete { id } => delete_task(store, &id).into_iter().collect(),
        TaskAction::Complete { id } => complete_task(store, &id).into_iter().collect(),
    }
}

fn create_task(store: &mut dyn TaskStore, fields: TaskFields) -> Option<String> {
    let title = fields.title?;
    let due_date = fields.due_date.unwrap_or_else(|| Local::now().date_naive());

    let task = Task::new(&title, due_date)
        .with_description(fields.description.unwrap_or_default())
        .with_priority(fields.priority.unwrap_or_default())
        .with_category(fields.category.unwrap_or_default())
        .with_times(
            fields.start_time.map(|t| due_date.and_time(t)),
            fields.end_time.map(|t| due_date.and_time(t)),
        );

    info!(id = %task.id, %title, "create_task: adding task");
    store.add(task);
    Some(format!("Created: {}", title))
}

fn update_task(store: &mut dyn TaskStore, id: &str, fields: TaskFields) -> Option<String> {
    let id = resolve_id(id)?;
    let mut task = store.list().into_iter().find(|t| t.id == id)?;

    if let Some(title) = fields.title {
        task.title = title;
    }
    if let Some(description) = fields.description {
        task.description = description;
    }
    if let Some(due_date) = fields.due_date {
        task.due_date = due_date;
    }
    // Times recombine against the effective due date, updated or not
    if let Some(start) = fields.start_time {
        task.start_time = Some(task.due_date.and_time(start));
    }
    if let Some(end) = fields.end_time {
        task.end_time = Some(task.due_date.and_time(end));
    }
    if let Some(priority) = fields.priority {
        task.priority = priority;
    }
    if let Some(category) = fields.category {
        task.category = category;
    }

    let title = task.title.clone();
    info!(%id, %title, "update_task: merging fields");
    store.update(task).then(|| format!("Updated: {}", title))
}

fn delete_task(store: &mut dyn TaskStore, id: &str) -> Option<String> {
    let id = resolve_id(id)?;
    let title = store
        .list()
        .into_iter()
        .find(|t| t.id == id)
        .map(|t| t.title)
        .unwrap_or_else(|| "task".to_string());

    if store.remove_by_id(&id) {
        info!(%id, %title, "delete_task: removed");
        Some(format!("Deleted: {}", title))
    } else {
        debug!(%id, "delete_task: no such task, skipping");
        None
    }
}

fn complete_task(store: &mut dyn TaskStore, id: &str) -> Option<String> {
    let id = resolve_id(id)?;
    let task = store.list().into_iter().find(|t| t.id == id)?;
    if task.is_completed {
        debug!(%id, "complete_task: already complete, skipping");
        return None;
    }

    store.toggle_complete_by_id(&id).then(|| {
        info!(%id, title = %task.title, "complete_task: marked complete");
        format!("Completed: {}", task.title)
    })
}

fn resolve_id(id: &str) -> Option<Uuid> {
    match Uuid::parse_str(id.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            debug!(%id, "resolve_id: not a task id, skipping");
            None
        }
    }
}
