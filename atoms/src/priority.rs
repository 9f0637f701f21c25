use serde::{Deserialize, Serialize};

/// Priority shared by tasks and sub-list items, ordered lowest to highest.
///
/// Deserialization is lenient: anything that is not a known value reads as
/// [`Priority::None`] instead of rejecting the whole record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "serde_json::Value")]
pub enum Priority {
    #[default]
    None,
    Priority,
    High,
}

impl Priority {
    pub fn parse(raw: &str) -> Priority {
        match raw {
            "high" => Priority::High,
            "priority" => Priority::Priority,
            _ => Priority::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::None => "none",
            Priority::Priority => "priority",
            Priority::High => "high",
        }
    }

    /// Sort rank; higher ranks sort first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::None => 0,
            Priority::Priority => 1,
            Priority::High => 2,
        }
    }
}

impl From<serde_json::Value> for Priority {
    fn from(raw: serde_json::Value) -> Self {
        raw.as_str().map(Priority::parse).unwrap_or_default()
    }
}
