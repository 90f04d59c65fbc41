//! Reminder collection and its date index.
//!
//! `ReminderCollection` is the source of truth: sorted by date, at most one
//! reminder per day, never mutated in place. Insert and remove hand back a
//! new collection. `ReminderIndex` is a throwaway lookup table rebuilt from
//! a collection whenever the collection changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::types::Reminder;

/// Reminders ordered by ascending date, unique per date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Reminder>", into = "Vec<Reminder>")]
pub struct ReminderCollection {
    reminders: Vec<Reminder>,
}

impl ReminderCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from untrusted input: sorts by date and keeps the
    /// first reminder seen for each date.
    pub fn from_reminders(reminders: Vec<Reminder>) -> Self {
        let mut seen: HashSet<NaiveDate> = HashSet::new();
        let mut reminders: Vec<Reminder> = reminders
            .into_iter()
            .filter(|r| seen.insert(r.date))
            .collect();
        reminders.sort_by(|a, b| a.date.cmp(&b.date));
        Self { reminders }
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reminder> {
        self.reminders.iter()
    }

    pub fn as_slice(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.lookup(date).is_some()
    }

    /// Reminder filed under `date`, if any
    pub fn lookup(&self, date: NaiveDate) -> Option<&Reminder> {
        self.reminders
            .binary_search_by(|r| r.date.cmp(&date))
            .ok()
            .map(|i| &self.reminders[i])
    }

    /// Collection with a reminder added for `date`.
    ///
    /// Returns an unchanged copy when the date already has a reminder.
    pub fn insert(&self, date: NaiveDate, icon: impl Into<String>) -> Self {
        if self.contains(date) {
            return self.clone();
        }
        let mut reminders = self.reminders.clone();
        reminders.push(Reminder::new(date, icon));
        reminders.sort_by(|a, b| a.date.cmp(&b.date));
        Self { reminders }
    }

    /// Collection without the reminder for `date`. Unchanged if absent.
    pub fn remove(&self, date: NaiveDate) -> Self {
        Self {
            reminders: self
                .reminders
                .iter()
                .filter(|r| r.date != date)
                .cloned()
                .collect(),
        }
    }
}

impl From<Vec<Reminder>> for ReminderCollection {
    fn from(reminders: Vec<Reminder>) -> Self {
        Self::from_reminders(reminders)
    }
}

impl From<ReminderCollection> for Vec<Reminder> {
    fn from(collection: ReminderCollection) -> Self {
        collection.reminders
    }
}

impl<'a> IntoIterator for &'a ReminderCollection {
    type Item = &'a Reminder;
    type IntoIter = std::slice::Iter<'a, Reminder>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Date to reminder map derived from a collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderIndex {
    by_date: HashMap<NaiveDate, Reminder>,
}

impl ReminderIndex {
    pub fn build(collection: &ReminderCollection) -> Self {
        Self {
            by_date: collection.iter().map(|r| (r.date, r.clone())).collect(),
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Reminder> {
        self.by_date.get(&date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.by_date.contains_key(&date)
    }
}
