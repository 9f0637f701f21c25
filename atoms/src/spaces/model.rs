use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dynamo::{self, Item};
use crate::TodoError;

pub const SPACE_PK: &str = "SPACE";
pub const SPACE_SK_PREFIX: &str = "SPACE#";

/// A named category tasks can be filed under. Tasks point at spaces, not the other way round.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Space {
    pub fn sort_key(id: &str) -> String {
        format!("{}{}", SPACE_SK_PREFIX, id)
    }

    pub fn from_item(id: &str, item: &Item) -> Space {
        Space {
            id: id.to_string(),
            name: dynamo::string(item, "name").unwrap_or_default(),
            created_at: dynamo::timestamp(item, "created_at").unwrap_or_default(),
        }
    }

    pub fn to_item(&self) -> Item {
        let mut item = dynamo::key(SPACE_PK, &Space::sort_key(&self.id));
        item.insert("name".to_string(), AttributeValue::S(self.name.clone()));
        item.insert(
            "created_at".to_string(),
            AttributeValue::S(self.created_at.to_rfc3339()),
        );
        item
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSpacePayload {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSpacePayload {
    pub name: Option<String>,
}

pub fn required_name(name: &str) -> Result<String, TodoError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TodoError::validation("Space name is required"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_required() {
        assert!(required_name("  ").is_err());
        assert_eq!(required_name(" Work ").unwrap(), "Work");
    }

    #[test]
    fn reads_back_what_it_writes() {
        let space = Space {
            id: "s1".into(),
            name: "Home".into(),
            created_at: DateTime::parse_from_rfc3339("2025-01-02T03:04:05+00:00")
                .unwrap()
                .with_timezone(&Utc),
        };
        let item = space.to_item();
        assert_eq!(item["SK"], AttributeValue::S("SPACE#s1".into()));
        assert_eq!(Space::from_item("s1", &item), space);
    }
}
