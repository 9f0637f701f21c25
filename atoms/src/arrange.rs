//! Ordering and presentation grouping for tasks and sub-list items.
//!
//! Tasks carry calendar due dates and sub-list items carry bare clock times;
//! both go through the same comparator, parameterised by [`Arrangeable::due`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::priority::Priority;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    DueDate,
    DueTime,
    Priority,
    CreatedAt,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<SortKey> {
        match raw {
            "dueDate" => Some(SortKey::DueDate),
            "dueTime" => Some(SortKey::DueTime),
            "priority" => Some(SortKey::Priority),
            "createdAt" => Some(SortKey::CreatedAt),
            _ => None,
        }
    }

    /// Due-value keys are the only ones that split output into groups.
    pub fn is_due(self) -> bool {
        matches!(self, SortKey::DueDate | SortKey::DueTime)
    }
}

/// A record the engine can order.
pub trait Arrangeable {
    type Due: Ord + Copy;

    /// Label of the trailing group holding items with no due value.
    const NO_DUE_LABEL: &'static str;

    fn completed(&self) -> bool;
    fn priority(&self) -> Priority;
    fn created_at(&self) -> DateTime<Utc>;
    /// Parsed due value; malformed raw values must come back as `None`.
    fn due(&self) -> Option<Self::Due>;
    fn due_label(due: &Self::Due) -> String;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<T> {
    pub label: Option<String>,
    pub items: Vec<T>,
}

/// Missing due values sort after present ones.
fn due_order<D: Ord>(a: Option<D>, b: Option<D>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn priority_desc<T: Arrangeable>(a: &T, b: &T) -> Ordering {
    b.priority().rank().cmp(&a.priority().rank())
}

pub fn compare<T: Arrangeable>(a: &T, b: &T, key: SortKey) -> Ordering {
    // false < true puts incomplete items first whatever the key
    a.completed().cmp(&b.completed()).then_with(|| match key {
        SortKey::DueDate | SortKey::DueTime => due_order(a.due(), b.due())
            .then_with(|| priority_desc(a, b))
            .then_with(|| a.created_at().cmp(&b.created_at())),
        SortKey::Priority => priority_desc(a, b)
            .then_with(|| due_order(a.due(), b.due()))
            .then_with(|| a.created_at().cmp(&b.created_at())),
        SortKey::CreatedAt => a.created_at().cmp(&b.created_at()),
    })
}

/// Sort `items` for `key` and split into presentation groups.
///
/// Items are sorted first and bucketed second, so under a due key completed
/// items trail the incomplete ones within their own group, and groups stay
/// in due order. Empty input yields no groups. Due keys give one group per distinct due
/// value in ascending order followed by the no-due group; every other key
/// yields a single unlabeled group.
pub fn arrange<T: Arrangeable>(mut items: Vec<T>, key: SortKey) -> Vec<Group<T>> {
    if items.is_empty() {
        return Vec::new();
    }

    items.sort_by(|a, b| compare(a, b, key));

    if !key.is_due() {
        return vec![Group { label: None, items }];
    }

    let mut dated: BTreeMap<T::Due, Vec<T>> = BTreeMap::new();
    let mut undated = Vec::new();
    for item in items {
        match item.due() {
            Some(due) => dated.entry(due).or_default().push(item),
            None => undated.push(item),
        }
    }

    let mut groups: Vec<Group<T>> = dated
        .into_iter()
        .map(|(due, items)| Group {
            label: Some(T::due_label(&due)),
            items,
        })
        .collect();

    if !undated.is_empty() {
        groups.push(Group {
            label: Some(T::NO_DUE_LABEL.to_string()),
            items: undated,
        });
    }

    groups
}

/// Calendar day of a due date. Accepts `YYYY-MM-DD` or a full timestamp,
/// which is truncated to its UTC day.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Time of day without a date, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    pub fn new(hour: u16, minute: u16) -> Option<ClockTime> {
        (hour < 24 && minute < 60).then(|| ClockTime(hour * 60 + minute))
    }

    /// Parse `H:MM` or `HH:MM`; anything else is `None`.
    pub fn parse(raw: &str) -> Option<ClockTime> {
        let (hh, mm) = raw.trim().split_once(':')?;
        if hh.is_empty() || hh.len() > 2 || mm.len() != 2 {
            return None;
        }
        if !hh.bytes().chain(mm.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        ClockTime::new(hh.parse().ok()?, mm.parse().ok()?)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        name: &'static str,
        completed: bool,
        priority: Priority,
        created: i64,
        due: Option<&'static str>,
    }

    impl Arrangeable for Entry {
        type Due = ClockTime;
        const NO_DUE_LABEL: &'static str = "No Due Time";

        fn completed(&self) -> bool {
            self.completed
        }
        fn priority(&self) -> Priority {
            self.priority
        }
        fn created_at(&self) -> DateTime<Utc> {
            Utc.timestamp_opt(self.created, 0).unwrap()
        }
        fn due(&self) -> Option<ClockTime> {
            self.due.and_then(ClockTime::parse)
        }
        fn due_label(due: &ClockTime) -> String {
            format!("Due by {}", due)
        }
    }

    fn entry(name: &'static str, due: Option<&'static str>, priority: Priority, created: i64) -> Entry {
        Entry {
            name,
            completed: false,
            priority,
            created,
            due,
        }
    }

    fn names(groups: &[Group<Entry>]) -> Vec<Vec<&'static str>> {
        groups
            .iter()
            .map(|g| g.items.iter().map(|e| e.name).collect())
            .collect()
    }

    fn sample() -> Vec<Entry> {
        let mut done = entry("done-early", Some("7:00"), Priority::High, 1);
        done.completed = true;
        vec![
            entry("late", Some("18:30"), Priority::None, 2),
            done,
            entry("none-low", None, Priority::None, 3),
            entry("early-low", Some("09:00"), Priority::None, 4),
            entry("early-high", Some("9:00"), Priority::High, 5),
            entry("none-high", None, Priority::High, 6),
        ]
    }

    fn completed_trail(items: &[&Entry]) -> bool {
        match items.iter().position(|e| e.completed) {
            Some(first_done) => items[first_done..].iter().all(|e| e.completed),
            None => true,
        }
    }

    #[test]
    fn completed_items_sort_last() {
        // due keys partition inside each group, other keys across the whole list
        let groups = arrange(sample(), SortKey::DueTime);
        for g in &groups {
            let items: Vec<&Entry> = g.items.iter().collect();
            assert!(completed_trail(&items), "{:?}", g.label);
        }

        for key in [SortKey::Priority, SortKey::CreatedAt] {
            let groups = arrange(sample(), key);
            let flat: Vec<&Entry> = groups.iter().flat_map(|g| g.items.iter()).collect();
            assert!(flat.iter().any(|e| e.completed));
            assert!(completed_trail(&flat), "{:?}", key);
        }
    }

    #[test]
    fn completed_item_stays_in_its_own_due_group() {
        let mut done_late = entry("done-late", Some("18:30"), Priority::High, 0);
        done_late.completed = true;
        let items = vec![
            done_late,
            entry("late-b", Some("18:30"), Priority::None, 2),
            entry("late-a", Some("18:30"), Priority::None, 1),
            entry("early", Some("07:00"), Priority::None, 3),
        ];

        let groups = arrange(items, SortKey::DueTime);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].label.as_deref(), Some("Due by 18:30"));
        assert_eq!(names(&groups)[1], vec!["late-a", "late-b", "done-late"]);
    }

    #[test]
    fn due_sort_groups_by_time_with_missing_last() {
        let groups = arrange(sample(), SortKey::DueTime);
        let labels: Vec<_> = groups.iter().map(|g| g.label.clone().unwrap()).collect();
        assert_eq!(
            labels,
            vec!["Due by 07:00", "Due by 09:00", "Due by 18:30", "No Due Time"]
        );
        assert_eq!(
            names(&groups),
            vec![
                vec!["done-early"],
                vec!["early-high", "early-low"],
                vec!["late"],
                vec!["none-high", "none-low"],
            ]
        );
    }

    #[test]
    fn due_groups_keep_sorted_order_inside_each_group() {
        let mut items = sample();
        let mut done_nine = entry("done-nine", Some("09:00"), Priority::High, 0);
        done_nine.completed = true;
        items.push(done_nine);
        let groups = arrange(items, SortKey::DueTime);
        assert_eq!(
            names(&groups)[1],
            vec!["early-high", "early-low", "done-nine"]
        );
    }

    #[test]
    fn priority_sort_breaks_ties_by_due_then_creation() {
        let groups = arrange(sample(), SortKey::Priority);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, None);
        assert_eq!(
            names(&groups)[0],
            vec!["early-high", "none-high", "early-low", "late", "none-low", "done-early"]
        );
    }

    #[test]
    fn created_sort_ignores_due_and_priority() {
        let groups = arrange(sample(), SortKey::CreatedAt);
        assert_eq!(
            names(&groups)[0],
            vec!["late", "none-low", "early-low", "early-high", "none-high", "done-early"]
        );
    }

    #[test]
    fn equal_due_prefers_higher_priority_then_older() {
        let items = vec![
            entry("b", Some("10:00"), Priority::Priority, 2),
            entry("a", Some("10:00"), Priority::Priority, 1),
            entry("c", Some("10:00"), Priority::High, 3),
        ];
        let groups = arrange(items, SortKey::DueTime);
        assert_eq!(names(&groups), vec![vec!["c", "a", "b"]]);
    }

    #[test]
    fn group_count_is_distinct_dues_plus_missing() {
        let groups = arrange(sample(), SortKey::DueTime);
        // 07:00, 09:00, 18:30 plus the no-due group
        assert_eq!(groups.len(), 4);
        assert_eq!(groups.last().unwrap().label.as_deref(), Some("No Due Time"));

        let all_dated = vec![entry("x", Some("1:05"), Priority::None, 1)];
        assert_eq!(arrange(all_dated, SortKey::DueTime).len(), 1);
    }

    #[test]
    fn malformed_times_sort_as_missing() {
        let items = vec![
            entry("bad", Some("noon"), Priority::High, 1),
            entry("good", Some("23:59"), Priority::None, 2),
        ];
        let groups = arrange(items, SortKey::DueTime);
        assert_eq!(names(&groups), vec![vec!["good"], vec!["bad"]]);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        for key in [SortKey::DueTime, SortKey::Priority, SortKey::CreatedAt] {
            assert!(arrange(Vec::<Entry>::new(), key).is_empty());
        }
    }

    #[test]
    fn clock_time_parsing() {
        assert_eq!(ClockTime::parse("9:05").unwrap().minutes(), 545);
        assert_eq!(ClockTime::parse("09:05"), ClockTime::parse("9:05"));
        assert_eq!(ClockTime::parse("0:00").unwrap().minutes(), 0);
        assert_eq!(ClockTime::parse("24:00"), None);
        assert_eq!(ClockTime::parse("12:60"), None);
        assert_eq!(ClockTime::parse("12:5"), None);
        assert_eq!(ClockTime::parse("-1:30"), None);
        assert_eq!(ClockTime::parse(""), None);
        assert_eq!(ClockTime::parse("7:30").unwrap().to_string(), "07:30");
    }

    #[test]
    fn due_date_parsing_truncates_timestamps() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(parse_due_date("2025-03-01"), Some(day));
        assert_eq!(parse_due_date("2025-03-01T00:00:00.000Z"), Some(day));
        assert_eq!(parse_due_date("2025-03-01T23:15:00"), Some(day));
        assert_eq!(parse_due_date("2025-02-30"), None);
        assert_eq!(parse_due_date("soon"), None);
        assert_eq!(parse_due_date(""), None);
    }

    #[test]
    fn sort_key_parsing() {
        assert_eq!(SortKey::parse("dueDate"), Some(SortKey::DueDate));
        assert_eq!(SortKey::parse("createdAt"), Some(SortKey::CreatedAt));
        assert_eq!(SortKey::parse("name"), None);
        assert!(SortKey::DueTime.is_due());
        assert!(!SortKey::Priority.is_due());
    }
}
