use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::arrange::{parse_due_date, Arrangeable};
use crate::dynamo::{self, Item};
use crate::lifecycle::{self, Retention, SoftDeletable};
use crate::priority::Priority;
use crate::view::Scope;
use crate::TodoError;

pub const TASK_PK: &str = "TASK";
pub const TASK_SK_PREFIX: &str = "TASK#";

/// Task domain model - one entry on the to-do list
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// None = unassigned
    pub space_id: Option<String>,
    pub priority: Priority,
    /// Raw due date as submitted; parsed leniently when arranging.
    pub due_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn sort_key(id: &str) -> String {
        format!("{}{}", TASK_SK_PREFIX, id)
    }

    pub fn from_item(id: &str, item: &Item) -> Task {
        Task {
            id: id.to_string(),
            text: dynamo::string(item, "text").unwrap_or_default(),
            completed: dynamo::boolean(item, "completed").unwrap_or(false),
            space_id: dynamo::non_empty_string(item, "space_id"),
            priority: dynamo::string(item, "priority")
                .map(|p| Priority::parse(&p))
                .unwrap_or_default(),
            due_date: dynamo::non_empty_string(item, "due_date"),
            created_at: dynamo::timestamp(item, "created_at").unwrap_or_default(),
            deleted_at: dynamo::timestamp(item, "deleted_at"),
        }
    }

    pub fn to_item(&self) -> Item {
        let mut item = dynamo::key(TASK_PK, &Task::sort_key(&self.id));
        item.insert("text".to_string(), AttributeValue::S(self.text.clone()));
        item.insert("completed".to_string(), AttributeValue::Bool(self.completed));
        item.insert(
            "priority".to_string(),
            AttributeValue::S(self.priority.as_str().to_string()),
        );
        item.insert(
            "created_at".to_string(),
            AttributeValue::S(self.created_at.to_rfc3339()),
        );
        if let Some(space_id) = &self.space_id {
            item.insert("space_id".to_string(), AttributeValue::S(space_id.clone()));
        }
        if let Some(due_date) = &self.due_date {
            item.insert("due_date".to_string(), AttributeValue::S(due_date.clone()));
        }
        if let Some(deleted_at) = self.deleted_at {
            item.insert(
                "deleted_at".to_string(),
                AttributeValue::S(deleted_at.to_rfc3339()),
            );
        }
        item
    }

    /// Apply a partial update in memory, rejecting a blank text.
    pub fn apply(&mut self, patch: &UpdateTaskPayload) -> Result<(), TodoError> {
        if let Some(text) = &patch.text {
            self.text = required_text(text)?;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = &patch.due_date {
            self.due_date = non_blank(due_date.clone());
        }
        if let Some(space_id) = &patch.space_id {
            self.space_id = non_blank(space_id.clone());
        }
        Ok(())
    }
}

impl SoftDeletable for Task {
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, deleted_at: Option<DateTime<Utc>>) {
        self.deleted_at = deleted_at;
    }
}

impl Arrangeable for Task {
    type Due = NaiveDate;
    const NO_DUE_LABEL: &'static str = "No Due Date";

    fn completed(&self) -> bool {
        self.completed
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn due(&self) -> Option<NaiveDate> {
        self.due_date.as_deref().and_then(parse_due_date)
    }

    fn due_label(due: &NaiveDate) -> String {
        due.format("%Y-%m-%d").to_string()
    }
}

/// Tasks a scope shows: active ones (optionally one space), or the
/// recoverable ones for the trash, newest deletion first.
pub fn select_for_scope(
    tasks: Vec<Task>,
    scope: &Scope,
    retention: &Retention,
    now: DateTime<Utc>,
) -> Vec<Task> {
    match scope {
        Scope::All => lifecycle::active(tasks),
        Scope::Space(space_id) => lifecycle::active(tasks)
            .into_iter()
            .filter(|t| t.space_id.as_deref() == Some(space_id.as_str()))
            .collect(),
        Scope::Deleted => retention.recoverable(tasks, now),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub space_id: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
}

impl CreateTaskPayload {
    /// Build the new record; `text` must not be blank.
    pub fn into_task(self, id: String, now: DateTime<Utc>) -> Result<Task, TodoError> {
        Ok(Task {
            id,
            text: required_text(&self.text)?,
            completed: self.completed,
            space_id: non_blank(self.space_id),
            priority: self.priority.unwrap_or_default(),
            due_date: non_blank(self.due_date),
            created_at: now,
            deleted_at: None,
        })
    }
}

/// Partial update. `dueDate`/`spaceId` distinguish "absent" (leave alone)
/// from `null` (clear).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub space_id: Option<Option<String>>,
}

pub(crate) fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_text(text: &str) -> Result<String, TodoError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TodoError::validation("Task text is required"));
    }
    Ok(trimmed.to_string())
}
