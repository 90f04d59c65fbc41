//! Application state and the user intents that move it forward.
//!
//! `AppState::apply` never mutates: each intent yields a fresh snapshot,
//! so the presentation layer can hand the old one out while computing
//! the next.

use chrono::{NaiveDate, Weekday};

use crate::date::YearMonth;
use crate::grid::{build_month_grid, MonthView};
use crate::reminders::{ReminderCollection, ReminderIndex};
use crate::types::{Reminder, View};

/// Something the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SelectDate(NaiveDate),
    CloseModal,
    AddReminder { date: NaiveDate, icon: String },
    RemoveReminder(NaiveDate),
    PrevMonth,
    NextMonth,
    /// Leave the welcome screen (if shown) and switch panels
    ShowView(View),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    reminders: ReminderCollection,
    index: ReminderIndex,
    pub month: YearMonth,
    pub week_start: Weekday,
    pub selected: Option<NaiveDate>,
    pub view: View,
    pub calendar_shown: bool,
}

impl AppState {
    pub fn new(reminders: ReminderCollection, month: YearMonth, week_start: Weekday) -> Self {
        let index = ReminderIndex::build(&reminders);
        Self {
            reminders,
            index,
            month,
            week_start,
            selected: None,
            view: View::Calendar,
            calendar_shown: false,
        }
    }

    pub fn reminders(&self) -> &ReminderCollection {
        &self.reminders
    }

    /// Swap in a new collection, rebuilding the index
    pub fn with_reminders(self, reminders: ReminderCollection) -> Self {
        if reminders == self.reminders {
            return self;
        }
        let index = ReminderIndex::build(&reminders);
        Self {
            reminders,
            index,
            ..self
        }
    }

    pub fn apply(&self, intent: Intent) -> Self {
        let next = self.clone();
        match intent {
            Intent::SelectDate(date) => Self {
                selected: Some(date),
                ..next
            },
            Intent::CloseModal => Self {
                selected: None,
                ..next
            },
            Intent::AddReminder { date, icon } => {
                let reminders = self.reminders.insert(date, icon);
                Self {
                    selected: None,
                    ..next.with_reminders(reminders)
                }
            }
            Intent::RemoveReminder(date) => {
                let reminders = self.reminders.remove(date);
                Self {
                    selected: None,
                    ..next.with_reminders(reminders)
                }
            }
            Intent::PrevMonth => Self {
                month: self.month.prev(),
                ..next
            },
            Intent::NextMonth => Self {
                month: self.month.next(),
                ..next
            },
            Intent::ShowView(view) => Self {
                view,
                calendar_shown: true,
                ..next
            },
        }
    }

    /// Welcome screen is shown until the first reminder exists or the user
    /// asks for a panel
    pub fn should_show_welcome(&self) -> bool {
        self.reminders.is_empty() && !self.calendar_shown
    }

    pub fn selected_reminder(&self) -> Option<&Reminder> {
        self.selected.and_then(|date| self.index.get(date))
    }

    pub fn reminder_on(&self, date: NaiveDate) -> Option<&Reminder> {
        self.index.get(date)
    }

    pub fn has_reminder(&self, date: NaiveDate) -> bool {
        self.index.contains(date)
    }

    pub fn month_view(&self) -> MonthView {
        build_month_grid(self.month, self.week_start)
    }
}
