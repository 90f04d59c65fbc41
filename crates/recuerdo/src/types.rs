use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::date::to_iso_date;

/// A mystery reminder pinned to one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct Reminder {
    /// Day of the reminder, serialized as YYYY-MM-DD. Unique per collection.
    pub date: NaiveDate,

    /// Display glyph, opaque to the calendar
    pub icon: String,
}

impl Reminder {
    pub fn new(date: NaiveDate, icon: impl Into<String>) -> Self {
        Self {
            date,
            icon: icon.into(),
        }
    }

    /// ISO key this reminder is filed under
    pub fn key(&self) -> String {
        to_iso_date(self.date)
    }

    /// Category whose icon matches, if the icon came from the picker
    pub fn category(&self) -> Option<&'static Category> {
        category_for_icon(&self.icon)
    }
}

/// An entry of the icon picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub icon: &'static str,
}

/// Picker catalogue. The first entry is the default selection.
pub const CATEGORIES: &[Category] = &[
    Category {
        name: "Memoria",
        icon: "🧠",
    },
    Category {
        name: "Trabajo",
        icon: "💼",
    },
    Category {
        name: "Salud",
        icon: "❤️",
    },
    Category {
        name: "Viaje",
        icon: "✈️",
    },
    Category {
        name: "Evento",
        icon: "🎉",
    },
    Category {
        name: "Ejercicio",
        icon: "💪",
    },
    Category {
        name: "Comida",
        icon: "🍽️",
    },
    Category {
        name: "Idea",
        icon: "💡",
    },
];

pub fn default_category() -> &'static Category {
    &CATEGORIES[0]
}

pub fn category_for_icon(icon: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.icon == icon)
}

/// Which panel the main screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Calendar,
    List,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Calendar => "calendar",
            View::List => "list",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "calendar" => Ok(View::Calendar),
            "list" => Ok(View::List),
            other => Err(format!("Unknown view '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reminder_serialization_shape() {
        let reminder = Reminder::new(ymd(2024, 3, 15), "🧠");
        let json = serde_json::to_string(&reminder).unwrap();
        assert_eq!(json, r#"{"date":"2024-03-15","icon":"🧠"}"#);
    }

    #[test]
    fn test_reminder_deserialization() {
        let json = r#"{"date":"2024-01-10","icon":"💡"}"#;
        let reminder: Reminder = serde_json::from_str(json).unwrap();
        assert_eq!(reminder.date, ymd(2024, 1, 10));
        assert_eq!(reminder.icon, "💡");
    }

    #[test]
    fn test_reminder_deserialization_rejects_bad_date() {
        let json = r#"{"date":"2024-13-10","icon":"💡"}"#;
        assert!(serde_json::from_str::<Reminder>(json).is_err());

        let missing_icon = r#"{"date":"2024-01-10"}"#;
        assert!(serde_json::from_str::<Reminder>(missing_icon).is_err());
    }

    #[test]
    fn test_reminder_key() {
        assert_eq!(Reminder::new(ymd(2024, 1, 5), "x").key(), "2024-01-05");
    }

    #[test]
    fn test_category_lookup() {
        assert_eq!(category_for_icon("💼").map(|c| c.name), Some("Trabajo"));
        assert_eq!(category_for_icon("🦀"), None);
        assert_eq!(default_category().name, "Memoria");
        let reminder = Reminder::new(ymd(2024, 1, 5), "🎉");
        assert_eq!(reminder.category().unwrap().name, "Evento");
    }

    #[test]
    fn test_category_icons_are_unique() {
        for (i, a) in CATEGORIES.iter().enumerate() {
            for b in &CATEGORIES[i + 1..] {
                assert_ne!(a.icon, b.icon);
            }
        }
    }

    #[test]
    fn test_view_parse() {
        assert_eq!("calendar".parse::<View>().unwrap(), View::Calendar);
        assert_eq!("LIST".parse::<View>().unwrap(), View::List);
        assert!("grid".parse::<View>().is_err());
        assert_eq!(View::List.to_string(), "list");
    }
}
