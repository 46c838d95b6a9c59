//! System context rendering
//!
//! The system message is rebuilt at the start of every turn from a snapshot
//! of the task store, so the model always sees the current date, time, and
//! task list next to the fixed action protocol.

use chrono::{DateTime, Local};
use eyre::{Result, eyre};
use handlebars::Handlebars;
use planstore::{DATE_FORMAT, TIME_FORMAT, Task};
use serde::Serialize;

/// System prompt template, rendered once per turn
pub const SYSTEM_PROMPT_TEMPLATE: &str = r#"You are an intelligent planning assistant integrated into a task management app. You can both chat naturally AND manage the user's tasks directly.

TODAY: {{today}} ({{weekday}})
CURRENT TIME: {{current_time}}

## Your Capabilities
1. Chat: Answer questions, give advice, help plan
2. Create tasks: When the user asks you to schedule something
3. Update tasks: Modify existing task details
4. Delete tasks: Remove tasks the user no longer needs
5. Complete tasks: Mark tasks as done
6. Plan schedules: Create a full day/week plan with multiple tasks at once

## Current Tasks
{{{task_context}}}

## Action Format
When you need to create, update, delete, or complete tasks, include an action block in your response using this EXACT format:

For creating a single task:
[ACTION]
{"action": "create_task", "task": {"title": "Meeting", "description": "Team standup", "due_date": "2026-02-25", "start_time": "15:00", "end_time": "16:00", "priority": "high", "event_type": "meeting"}}
[/ACTION]

For planning (creating multiple tasks at once):
[ACTION]
{"action": "create_multiple", "tasks": [
  {"title": "Gym", "due_date": "2026-02-25", "start_time": "08:00", "end_time": "09:00", "priority": "medium", "event_type": "gym"},
  {"title": "Study", "due_date": "2026-02-25", "start_time": "10:00", "end_time": "12:00", "priority": "high", "event_type": "study"}
]}
[/ACTION]

For updating an existing task (use the task ID from the list above):
[ACTION]
{"action": "update_task", "task_id": "UUID-HERE", "task": {"title": "New title", "start_time": "14:00"}}
[/ACTION]

For deleting a task:
[ACTION]
{"action": "delete_task", "task_id": "UUID-HERE"}
[/ACTION]

For completing a task:
[ACTION]
{"action": "complete_task", "task_id": "UUID-HERE"}
[/ACTION]

## Rules
- ALWAYS respond in the SAME LANGUAGE as the user's message
- Include natural conversational text ALONGSIDE any action blocks
- Check existing tasks to AVOID time conflicts before scheduling
- Use 24-hour time format (HH:MM) for start_time and end_time
- Use ISO date format (YYYY-MM-DD) for due_date
- Valid event_type values: gym, class, study, meeting, dinner, other
- Valid priority values: low, medium, high
- For "tomorrow", calculate the correct date from TODAY ({{today}})
- For "next week", calculate dates starting from next Monday
- When planning a day, consider reasonable gaps between tasks for rest/travel
- If the user's request is ambiguous, ask for clarification instead of guessing
- When creating timed events, ALWAYS include both start_time and end_time
- The action block must contain valid JSON
"#;

/// Context for rendering the system prompt template
#[derive(Debug, Clone, Serialize)]
struct SystemPromptContext {
    today: String,
    weekday: String,
    current_time: String,
    task_context: String,
}

/// Render the system message for one turn
pub fn render_system_prompt(tasks: &[Task], now: DateTime<Local>) -> Result<String> {
    let context = SystemPromptContext {
        today: now.format(DATE_FORMAT).to_string(),
        weekday: now.format("%A").to_string(),
        current_time: now.format(TIME_FORMAT).to_string(),
        task_context: format_task_context(tasks),
    };

    Handlebars::new()
        .render_template(SYSTEM_PROMPT_TEMPLATE, &context)
        .map_err(|e| eyre!("Failed to render system prompt: {}", e))
}

/// Format the task snapshot the way the prompt teaches the model to read it
///
/// One line per task, ordered by due date, with the optional segments only
/// when present.
pub fn format_task_context(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks currently scheduled.".to_string();
    }

    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by_key(|t| t.due_date);

    sorted
        .iter()
        .map(|t| {
            let mut parts = vec![
                format!("ID: {}", t.id),
                format!("Title: {}", t.title),
                format!("Date: {}", t.due_date.format(DATE_FORMAT)),
                format!("Priority: {}", t.priority),
                format!("Type: {}", t.category),
                format!("Completed: {}", t.is_completed),
            ];
            if let Some(start) = t.start_time {
                parts.push(format!("Start: {}", start.format(TIME_FORMAT)));
            }
            if let Some(end) = t.end_time {
                parts.push(format!("End: {}", end.format(TIME_FORMAT)));
            }
            if !t.description.is_empty() {
                parts.push(format!("Desc: {}", t.description));
            }
            format!("- {}", parts.join(" | "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
