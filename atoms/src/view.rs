//! Presentation state for a task list, kept as one serializable record so
//! expansion, editing and sort choices can be driven without a UI framework.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::arrange::SortKey;

pub const ALL_SCOPE: &str = "ALL";
pub const DELETED_SCOPE: &str = "DELETED";

/// Which tasks a view shows: every active task, one space, or the trash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Scope {
    #[default]
    All,
    Deleted,
    Space(String),
}

impl Scope {
    /// Parse the `spaceId` query parameter; absent or empty means `ALL`.
    pub fn parse(raw: Option<&str>) -> Scope {
        match raw.map(str::trim) {
            None | Some("") | Some(ALL_SCOPE) => Scope::All,
            Some(DELETED_SCOPE) => Scope::Deleted,
            Some(id) => Scope::Space(id.to_string()),
        }
    }

    pub fn space_id(&self) -> Option<&str> {
        match self {
            Scope::Space(id) => Some(id.as_str()),
            _ => None,
        }
    }
}

impl From<String> for Scope {
    fn from(raw: String) -> Self {
        Scope::parse(Some(&raw))
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::All => ALL_SCOPE.to_string(),
            Scope::Deleted => DELETED_SCOPE.to_string(),
            Scope::Space(id) => id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    pub expanded_ids: BTreeSet<String>,
    pub editing_ids: BTreeSet<String>,
    pub sort_key: SortKey,
    pub selected_scope: Scope,
    pub bulk_edit: bool,
}

impl ViewState {
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded_ids.contains(id)
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.editing_ids.contains(id)
    }

    /// Outside bulk edit only one row is open at a time.
    pub fn toggle_expanded(&mut self, id: &str) {
        let was_expanded = self.expanded_ids.contains(id);
        if !self.bulk_edit {
            self.expanded_ids.clear();
        }
        if was_expanded {
            self.expanded_ids.remove(id);
        } else {
            self.expanded_ids.insert(id.to_string());
        }
    }

    pub fn start_editing(&mut self, id: &str) {
        self.editing_ids.insert(id.to_string());
    }

    pub fn stop_editing(&mut self, id: &str) {
        self.editing_ids.remove(id);
    }

    /// After a successful save the row closes as well.
    pub fn finish_edit(&mut self, id: &str) {
        self.stop_editing(id);
        self.expanded_ids.remove(id);
    }

    pub fn toggle_bulk_edit<'a, I>(&mut self, visible_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.bulk_edit = !self.bulk_edit;
        self.expanded_ids.clear();
        if self.bulk_edit {
            self.expanded_ids
                .extend(visible_ids.into_iter().map(str::to_string));
        }
    }

    pub fn select_scope(&mut self, scope: Scope) {
        self.selected_scope = scope;
        self.bulk_edit = false;
        self.expanded_ids.clear();
        self.editing_ids.clear();
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) {
        self.sort_key = sort_key;
    }

    /// New tasks need a concrete space to land in.
    pub fn can_create_tasks(&self) -> bool {
        matches!(self.selected_scope, Scope::Space(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parsing() {
        assert_eq!(Scope::parse(None), Scope::All);
        assert_eq!(Scope::parse(Some("ALL")), Scope::All);
        assert_eq!(Scope::parse(Some("DELETED")), Scope::Deleted);
        assert_eq!(Scope::parse(Some("s1")), Scope::Space("s1".into()));
        assert_eq!(Scope::parse(Some("s1")).space_id(), Some("s1"));
    }

    #[test]
    fn expanding_collapses_others_outside_bulk_edit() {
        let mut view = ViewState::default();
        view.toggle_expanded("a");
        view.toggle_expanded("b");
        assert!(!view.is_expanded("a"));
        assert!(view.is_expanded("b"));

        view.toggle_expanded("b");
        assert!(view.expanded_ids.is_empty());
    }

    #[test]
    fn bulk_edit_expands_everything_and_toggles_independently() {
        let mut view = ViewState::default();
        view.toggle_bulk_edit(["a", "b", "c"]);
        assert!(view.bulk_edit);
        assert_eq!(view.expanded_ids.len(), 3);

        view.toggle_expanded("b");
        assert!(view.is_expanded("a"));
        assert!(!view.is_expanded("b"));

        view.toggle_bulk_edit(["a", "b", "c"]);
        assert!(!view.bulk_edit);
        assert!(view.expanded_ids.is_empty());
    }

    #[test]
    fn finishing_an_edit_closes_the_row() {
        let mut view = ViewState::default();
        view.toggle_expanded("a");
        view.start_editing("a");
        assert!(view.is_editing("a"));
        view.finish_edit("a");
        assert!(!view.is_editing("a"));
        assert!(!view.is_expanded("a"));
    }

    #[test]
    fn switching_scope_resets_transient_state() {
        let mut view = ViewState::default();
        view.toggle_bulk_edit(["a"]);
        view.start_editing("a");
        view.select_scope(Scope::Space("s1".into()));
        assert!(!view.bulk_edit);
        assert!(view.expanded_ids.is_empty());
        assert!(view.editing_ids.is_empty());
        assert!(view.can_create_tasks());

        view.select_scope(Scope::Deleted);
        assert!(!view.can_create_tasks());
    }

    #[test]
    fn round_trips_through_json() {
        let mut view = ViewState::default();
        view.select_scope(Scope::Deleted);
        view.set_sort_key(SortKey::Priority);
        view.toggle_expanded("t1");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["selectedScope"], "DELETED");
        assert_eq!(json["sortKey"], "priority");

        let back: ViewState = serde_json::from_value(json).unwrap();
        assert_eq!(back, view);
    }
}
