//! Soft-delete lifecycle: Active -> Recoverable -> Purgeable -> gone.
//!
//! Recoverable and Purgeable are both "soft-deleted"; the split between
//! them is purely a function of how long ago the record was deleted,
//! evaluated whenever the question is asked.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::TodoError;

pub const DEFAULT_RETENTION_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Lifecycle {
    Active,
    Recoverable,
    Purgeable,
}

/// A record carrying a `deleted_at` soft-delete marker.
pub trait SoftDeletable {
    fn deleted_at(&self) -> Option<DateTime<Utc>>;
    fn set_deleted_at(&mut self, deleted_at: Option<DateTime<Utc>>);
}

/// How long a soft-deleted record stays restorable before it becomes purgeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention(TimeDelta);

impl Default for Retention {
    fn default() -> Self {
        Retention::days(DEFAULT_RETENTION_DAYS)
    }
}

impl Retention {
    pub fn days(days: i64) -> Retention {
        Retention(TimeDelta::days(days))
    }

    /// A positive window that `TimeDelta` can represent, or `None`.
    pub fn try_days(days: i64) -> Option<Retention> {
        if days <= 0 {
            return None;
        }
        TimeDelta::try_days(days).map(Retention)
    }

    pub fn window(&self) -> TimeDelta {
        self.0
    }

    pub fn classify(&self, deleted_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Lifecycle {
        match deleted_at {
            None => Lifecycle::Active,
            Some(at) if now - at >= self.0 => Lifecycle::Purgeable,
            Some(_) => Lifecycle::Recoverable,
        }
    }

    pub fn state_of<T: SoftDeletable>(&self, record: &T, now: DateTime<Utc>) -> Lifecycle {
        self.classify(record.deleted_at(), now)
    }

    /// Records still inside the restore window, most recently deleted first.
    pub fn recoverable<T: SoftDeletable>(&self, records: Vec<T>, now: DateTime<Utc>) -> Vec<T> {
        let mut kept: Vec<T> = records
            .into_iter()
            .filter(|r| self.state_of(r, now) == Lifecycle::Recoverable)
            .collect();
        kept.sort_by(|a, b| b.deleted_at().cmp(&a.deleted_at()));
        kept
    }

    pub fn purgeable<T: SoftDeletable>(&self, records: Vec<T>, now: DateTime<Utc>) -> Vec<T> {
        records
            .into_iter()
            .filter(|r| self.state_of(r, now) == Lifecycle::Purgeable)
            .collect()
    }
}

/// Records that are not soft-deleted. The retention window plays no part.
pub fn active<T: SoftDeletable>(records: Vec<T>) -> Vec<T> {
    records
        .into_iter()
        .filter(|r| r.deleted_at().is_none())
        .collect()
}

/// Classify with the default 30-day window.
pub fn classify(deleted_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Lifecycle {
    Retention::default().classify(deleted_at, now)
}

/// Active -> Recoverable. Returns false (and leaves the original deletion
/// instant alone) when the record was already soft-deleted.
pub fn soft_delete<T: SoftDeletable>(record: &mut T, now: DateTime<Utc>) -> bool {
    if record.deleted_at().is_some() {
        return false;
    }
    record.set_deleted_at(Some(now));
    true
}

/// Recoverable or Purgeable -> Active. Only checks that the record is
/// soft-deleted; the retention window does not matter until purge runs.
pub fn restore<T: SoftDeletable>(record: &mut T) -> Result<(), TodoError> {
    if record.deleted_at().is_none() {
        return Err(TodoError::Conflict("Task is not deleted".to_string()));
    }
    record.set_deleted_at(None);
    Ok(())
}
