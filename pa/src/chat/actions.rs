//! Action payload parsing
//!
//! Each action block carries one JSON object naming an action kind plus its
//! fields. The model is not a schema-checked producer, so parsing is a
//! best-effort filter: malformed or incomplete payloads yield nothing
//! instead of failing the turn.

use chrono::{NaiveDate, NaiveTime};
use planstore::{Category, DATE_FORMAT, Priority, TIME_FORMAT};
use serde::Deserialize;
use tracing::debug;

/// Field set carried by create and update actions
///
/// Everything is optional; on update, absent fields leave the stored value
/// alone. Values that fail to parse (a bad date, an unknown priority) are
/// softened rather than rejected: dates and times become absent, priority
/// and category fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
}

/// A validated mutation request against the task store
#[derive(Debug, Clone, PartialEq)]
pub enum TaskAction {
    Create(TaskFields),
    CreateMany(Vec<TaskFields>),
    Update { id: String, fields: TaskFields },
    Delete { id: String },
    Complete { id: String },
}

/// Parse one action payload into at most one mutation request
///
/// Requirements per kind: creates need a non-empty `task.title` (entries of
/// `create_multiple` missing one are dropped individually), update needs
/// `task_id` and a `task` object, delete and complete need `task_id`.
/// Anything else, including JSON that is not an object or an unrecognized
/// `action` value, yields `None`.
pub fn parse_action(payload: &str) -> Option<TaskAction> {
    let raw: RawAction = match serde_json::from_str(payload) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(error = %e, "parse_action: payload is not an action object");
            return None;
        }
    };

    match raw.action.as_str() {
        "create_task" => {
            let fields = convert_fields(raw.task?);
            if fields.title.is_none() {
                debug!("parse_action: create_task missing title");
                return None;
            }
            Some(TaskAction::Create(fields))
        }
        "create_multiple" => {
            let entries: Vec<TaskFields> = raw
                .tasks?
                .into_iter()
                .map(convert_fields)
                .filter(|fields| fields.title.is_some())
                .collect();
            if entries.is_empty() {
                debug!("parse_action: create_multiple has no usable entries");
                return None;
            }
            Some(TaskAction::CreateMany(entries))
        }
        "update_task" => Some(TaskAction::Update {
            id: raw.task_id?,
            fields: convert_fields(raw.task?),
        }),
        "delete_task" => Some(TaskAction::Delete { id: raw.task_id? }),
        "complete_task" => Some(TaskAction::Complete { id: raw.task_id? }),
        other => {
            debug!(kind = %other, "parse_action: unrecognized action kind");
            None
        }
    }
}

fn convert_fields(raw: RawTaskFields) -> TaskFields {
    TaskFields {
        title: raw.title.filter(|t| !t.trim().is_empty()),
        description: raw.description,
        due_date: raw
            .due_date
            .and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()),
        start_time: raw
            .start_time
            .and_then(|s| NaiveTime::parse_from_str(&s, TIME_FORMAT).ok()),
        end_time: raw
            .end_time
            .and_then(|s| NaiveTime::parse_from_str(&s, TIME_FORMAT).ok()),
        priority: raw.priority.map(|s| s.parse().unwrap_or_default()),
        category: raw.event_type.map(|s| s.parse().unwrap_or_default()),
    }
}

// Loose wire shapes; unknown JSON fields are ignored

#[derive(Debug, Deserialize)]
struct RawAction {
    action: String,
    #[serde(default)]
    task: Option<RawTaskFields>,
    #[serde(default)]
    tasks: Option<Vec<RawTaskFields>>,
    #[serde(default)]
    task_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTaskFields {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    event_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_task() {
        let payload = r#"{"action": "create_task", "task": {"title": "Gym session", "due_date": "2026-02-25", "start_time": "08:00", "end_time": "09:00", "priority": "high", "event_type": "gym"}}"#;

        let Some(TaskAction::Create(fields)) = parse_action(payload) else {
            panic!("expected Create");
        };
        assert_eq!(fields.title.as_deref(), Some("Gym session"));
        assert_eq!(fields.due_date, NaiveDate::from_ymd_opt(2026, 2, 25));
        assert_eq!(fields.start_time, NaiveTime::from_hms_opt(8, 0, 0));
        assert_eq!(fields.end_time, NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(fields.priority, Some(Priority::High));
        assert_eq!(fields.category, Some(Category::Gym));
    }

    #[test]
    fn test_parse_create_requires_title() {
        let payload = r#"{"action": "create_task", "task": {"due_date": "2026-02-25"}}"#;
        assert_eq!(parse_action(payload), None);

        let payload = r#"{"action": "create_task", "task": {"title": "   "}}"#;
        assert_eq!(parse_action(payload), None);

        let payload = r#"{"action": "create_task"}"#;
        assert_eq!(parse_action(payload), None);
    }

    #[test]
    fn test_parse_create_multiple_drops_titleless_entries() {
        let payload = r#"{"action": "create_multiple", "tasks": [
            {"title": "Gym", "due_date": "2026-02-25"},
            {"due_date": "2026-02-25"},
            {"title": "Study"}
        ]}"#;

        let Some(TaskAction::CreateMany(entries)) = parse_action(payload) else {
            panic!("expected CreateMany");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title.as_deref(), Some("Gym"));
        assert_eq!(entries[1].title.as_deref(), Some("Study"));
    }

    #[test]
    fn test_parse_create_multiple_all_unusable() {
        let payload = r#"{"action": "create_multiple", "tasks": [{"due_date": "2026-02-25"}]}"#;
        assert_eq!(parse_action(payload), None);
    }

    #[test]
    fn test_parse_update_requires_id_and_fields() {
        let payload = r#"{"action": "update_task", "task_id": "abc", "task": {"start_time": "14:00"}}"#;
        let Some(TaskAction::Update { id, fields }) = parse_action(payload) else {
            panic!("expected Update");
        };
        assert_eq!(id, "abc");
        assert_eq!(fields.start_time, NaiveTime::from_hms_opt(14, 0, 0));
        assert_eq!(fields.title, None);

        // id but no field set
        assert_eq!(parse_action(r#"{"action": "update_task", "task_id": "abc"}"#), None);
        // field set but no id
        assert_eq!(
            parse_action(r#"{"action": "update_task", "task": {"title": "x"}}"#),
            None
        );
    }

    #[test]
    fn test_parse_delete_and_complete() {
        assert_eq!(
            parse_action(r#"{"action": "delete_task", "task_id": "some-id"}"#),
            Some(TaskAction::Delete {
                id: "some-id".to_string()
            })
        );
        assert_eq!(
            parse_action(r#"{"action": "complete_task", "task_id": "some-id"}"#),
            Some(TaskAction::Complete {
                id: "some-id".to_string()
            })
        );
        assert_eq!(parse_action(r#"{"action": "delete_task"}"#), None);
    }

    #[test]
    fn test_parse_unrecognized_kind() {
        assert_eq!(parse_action(r#"{"action": "archive_task", "task_id": "x"}"#), None);
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert_eq!(parse_action("not json at all"), None);
        assert_eq!(parse_action("[1, 2, 3]"), None);
        assert_eq!(parse_action("{}"), None);
    }

    #[test]
    fn test_bad_date_and_time_become_absent() {
        let payload = r#"{"action": "create_task", "task": {"title": "x", "due_date": "tomorrow", "start_time": "8am"}}"#;
        let Some(TaskAction::Create(fields)) = parse_action(payload) else {
            panic!("expected Create");
        };
        assert_eq!(fields.due_date, None);
        assert_eq!(fields.start_time, None);
    }

    #[test]
    fn test_unknown_priority_and_category_fall_back() {
        let payload =
            r#"{"action": "create_task", "task": {"title": "x", "priority": "URGENT", "event_type": "party"}}"#;
        let Some(TaskAction::Create(fields)) = parse_action(payload) else {
            panic!("expected Create");
        };
        assert_eq!(fields.priority, Some(Priority::Medium));
        assert_eq!(fields.category, Some(Category::Other));
    }

    #[test]
    fn test_absent_priority_stays_absent() {
        let payload = r#"{"action": "create_task", "task": {"title": "x"}}"#;
        let Some(TaskAction::Create(fields)) = parse_action(payload) else {
            panic!("expected Create");
        };
        assert_eq!(fields.priority, None);
        assert_eq!(fields.category, None);
    }

    #[test]
    fn test_extra_json_fields_ignored() {
        let payload = r#"{"action": "create_task", "task": {"title": "x", "mood": "great"}, "reason": "user asked"}"#;
        assert!(matches!(parse_action(payload), Some(TaskAction::Create(_))));
    }
}
