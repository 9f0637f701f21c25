use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::arrange::{Arrangeable, ClockTime};
use crate::dynamo::{self, Item};
use crate::priority::Priority;
use crate::TodoError;

pub const SUBLIST_PK: &str = "SUBLIST";
pub const SUBLIST_SK_PREFIX: &str = "SUBLIST#";
pub const DEFAULT_SUBLIST_NAME: &str = "New List";
pub const DEFAULT_ITEM_TEXT: &str = "Untitled";

/// One checklist entry. Items only exist inside their sub-list.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubListItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    /// "HH:MM" or empty
    #[serde(default)]
    pub due_time: String,
    pub created_at: DateTime<Utc>,
}

/// A named checklist attached to one task. Hard-deleted, never soft-deleted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubList {
    pub id: String,
    pub task_id: String,
    pub name: String,
    pub items: Vec<SubListItem>,
}

impl SubList {
    pub fn sort_key(id: &str) -> String {
        format!("{}{}", SUBLIST_SK_PREFIX, id)
    }

    /// Unreadable embedded items are an error, never an empty list, so a
    /// later write cannot replace the stored checklist with nothing.
    pub fn from_item(id: &str, item: &Item) -> Result<SubList, TodoError> {
        let items = match dynamo::string(item, "items") {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                tracing::error!("Sub-list {} has unreadable items: {}", id, e);
                TodoError::Serialization(e)
            })?,
            None => Vec::new(),
        };

        Ok(SubList {
            id: id.to_string(),
            task_id: dynamo::string(item, "task_id").unwrap_or_default(),
            name: dynamo::string(item, "name").unwrap_or_else(|| DEFAULT_SUBLIST_NAME.to_string()),
            items,
        })
    }

    pub fn to_item(&self) -> Result<Item, TodoError> {
        let mut item = dynamo::key(SUBLIST_PK, &SubList::sort_key(&self.id));
        item.insert("task_id".to_string(), AttributeValue::S(self.task_id.clone()));
        item.insert("name".to_string(), AttributeValue::S(self.name.clone()));
        item.insert("items".to_string(), self.items_attribute()?);
        Ok(item)
    }

    /// Items are embedded as one JSON string attribute.
    pub fn items_attribute(&self) -> Result<AttributeValue, TodoError> {
        Ok(AttributeValue::S(serde_json::to_string(&self.items)?))
    }

    pub fn add_item(&mut self, payload: CreateItemPayload, id: String, now: DateTime<Utc>) -> &SubListItem {
        let text = payload
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_ITEM_TEXT.to_string());

        self.items.push(SubListItem {
            id,
            text,
            completed: false,
            priority: payload.priority.unwrap_or_default(),
            due_time: payload.due_time.map(|t| t.trim().to_string()).unwrap_or_default(),
            created_at: now,
        });
        &self.items[self.items.len() - 1]
    }

    pub fn update_item(&mut self, item_id: &str, patch: UpdateItemPayload) -> Result<&SubListItem, TodoError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| TodoError::not_found("Item"))?;

        if let Some(text) = patch.text {
            item.text = text;
        }
        if let Some(priority) = patch.priority {
            item.priority = priority;
        }
        if let Some(due_time) = patch.due_time {
            item.due_time = due_time.trim().to_string();
        }
        // only an actual boolean toggles completion
        if let Some(completed) = patch.completed.as_ref().and_then(|v| v.as_bool()) {
            item.completed = completed;
        }
        Ok(item)
    }

    pub fn remove_item(&mut self, item_id: &str) -> Result<SubListItem, TodoError> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| TodoError::not_found("Item"))?;
        Ok(self.items.remove(pos))
    }
}

impl Arrangeable for SubListItem {
    type Due = ClockTime;
    const NO_DUE_LABEL: &'static str = "No Due Time";

    fn completed(&self) -> bool {
        self.completed
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn due(&self) -> Option<ClockTime> {
        ClockTime::parse(&self.due_time)
    }

    fn due_label(due: &ClockTime) -> String {
        format!("Due by {}", due)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubListPayload {
    pub task_id: Option<String>,
    pub name: Option<String>,
}

impl CreateSubListPayload {
    pub fn into_sublist(self, id: String) -> Result<SubList, TodoError> {
        let task_id = self
            .task_id
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| TodoError::validation("taskId is required"))?;

        Ok(SubList {
            id,
            task_id,
            name: self
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| DEFAULT_SUBLIST_NAME.to_string()),
            items: Vec::new(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubListPayload {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemPayload {
    pub text: Option<String>,
    pub priority: Option<Priority>,
    pub due_time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemPayload {
    pub text: Option<String>,
    pub priority: Option<Priority>,
    pub due_time: Option<String>,
    pub completed: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrange::{arrange, SortKey};
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, minute, 0).unwrap()
    }

    fn list() -> SubList {
        CreateSubListPayload {
            task_id: Some("t1".into()),
            name: None,
        }
        .into_sublist("l1".into())
        .unwrap()
    }

    fn add(list: &mut SubList, id: &str, body: &str, minute: u32) {
        let payload: CreateItemPayload = serde_json::from_str(body).unwrap();
        list.add_item(payload, id.into(), at(minute));
    }

    #[test]
    fn creation_requires_task_and_defaults_name() {
        let missing = CreateSubListPayload { task_id: None, name: Some("x".into()) };
        assert!(matches!(missing.into_sublist("l".into()), Err(TodoError::Validation(_))));
        assert_eq!(list().name, "New List");
        assert!(list().items.is_empty());
    }

    #[test]
    fn new_items_get_defaults() {
        let mut l = list();
        add(&mut l, "i1", "{}", 0);
        let item = &l.items[0];
        assert_eq!(item.text, "Untitled");
        assert!(!item.completed);
        assert_eq!(item.priority, Priority::None);
        assert_eq!(item.due_time, "");
    }

    #[test]
    fn completed_only_changes_for_booleans() {
        let mut l = list();
        add(&mut l, "i1", r#"{"text":"Eggs"}"#, 0);

        let not_bool: UpdateItemPayload = serde_json::from_str(r#"{"completed":"yes"}"#).unwrap();
        assert!(!l.update_item("i1", not_bool).unwrap().completed);

        let patch: UpdateItemPayload =
            serde_json::from_str(r#"{"completed":true,"dueTime":"7:15"}"#).unwrap();
        let item = l.update_item("i1", patch).unwrap();
        assert!(item.completed);
        assert_eq!(item.due_time, "7:15");
        assert_eq!(item.text, "Eggs");
    }

    #[test]
    fn missing_items_are_not_found() {
        let mut l = list();
        assert!(matches!(
            l.update_item("nope", UpdateItemPayload::default()),
            Err(TodoError::NotFound(_))
        ));
        assert!(matches!(l.remove_item("nope"), Err(TodoError::NotFound(_))));
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut l = list();
        add(&mut l, "a", "{}", 0);
        add(&mut l, "b", "{}", 1);
        add(&mut l, "c", "{}", 2);
        l.remove_item("b").unwrap();
        let ids: Vec<_> = l.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn items_group_by_due_time() {
        let mut l = list();
        add(&mut l, "late", r#"{"dueTime":"14:00"}"#, 0);
        add(&mut l, "none", "{}", 1);
        add(&mut l, "early", r#"{"dueTime":"9:30","priority":"high"}"#, 2);
        add(&mut l, "broken", r#"{"dueTime":"9h30"}"#, 3);

        let groups = arrange(l.items, SortKey::DueTime);
        let labels: Vec<_> = groups.iter().map(|g| g.label.clone().unwrap()).collect();
        assert_eq!(labels, vec!["Due by 09:30", "Due by 14:00", "No Due Time"]);
        let undated: Vec<_> = groups[2].items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(undated, vec!["none", "broken"]);
    }

    #[test]
    fn stored_items_survive_the_json_attribute() {
        let mut l = list();
        add(&mut l, "a", r#"{"text":"Milk","priority":"priority","dueTime":"10:00"}"#, 0);
        let item = l.to_item().unwrap();
        assert_eq!(SubList::from_item("l1", &item).unwrap(), l);
    }

    #[test]
    fn unreadable_items_fail_the_read() {
        let mut item = list().to_item().unwrap();
        item.insert(
            "items".into(),
            AttributeValue::S(
                r#"[{"id":"a","text":"Milk","completed":false,"createdAt":"2025-03-01T08:00:00Z"},{"id":"b","text":"Eggs","completed":false}]"#
                    .into(),
            ),
        );

        assert!(matches!(
            SubList::from_item("l1", &item),
            Err(TodoError::Serialization(_))
        ));
    }

    #[test]
    fn missing_items_attribute_reads_as_empty() {
        let mut item = list().to_item().unwrap();
        item.remove("items");
        assert!(SubList::from_item("l1", &item).unwrap().items.is_empty());
    }
}
