//! Enumerations and field types for task records.
//!
//! This module defines the structured values a task carries besides free text:
//! its workflow status and its priority. Both serialize as their variant name and
//! deserialize leniently so that blobs written by older front-ends still load.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// Workflow status of a task. Column order of the kanban board follows `Status::ALL`.
#[derive(Debug, Clone, Copy, Serialize, ValueEnum, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Pending,
    InProgress,
    InReview,
    Completed,
}

/// Importance of a task, lowest first.
#[derive(Debug, Clone, Copy, Serialize, ValueEnum, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Returned by the strict parsers when a value names no known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue(pub String);

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownValue {}

/// Collapse casing and separators so "In Progress", "in-progress" and "InProgress" compare equal.
fn normalise(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect()
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Pending,
        Status::InProgress,
        Status::InReview,
        Status::Completed,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::InReview => "In Review",
            Status::Completed => "Completed",
        }
    }

    /// Parse anything a stored blob may contain, folding unknown values into `Pending`.
    pub fn parse_lenient(s: &str) -> Status {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!(value = s, "unrecognized status, falling back to Pending");
            Status::Pending
        })
    }
}

impl FromStr for Status {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "pending" | "pendiente" | "todo" | "open" => Ok(Status::Pending),
            "inprogress" | "enprogreso" | "enproceso" => Ok(Status::InProgress),
            "inreview" | "review" | "enrevision" => Ok(Status::InReview),
            "completed" | "complete" | "done" | "completada" | "completado" => {
                Ok(Status::Completed)
            }
            _ => Err(UnknownValue(s.to_string())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Status::parse_lenient(&raw))
    }
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    /// Parse anything a stored blob may contain, folding unknown values into `Medium`.
    pub fn parse_lenient(s: &str) -> Priority {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!(value = s, "unrecognized priority, falling back to Medium");
            Priority::Medium
        })
    }
}

impl FromStr for Priority {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "low" | "baja" => Ok(Priority::Low),
            "medium" | "media" => Ok(Priority::Medium),
            "high" | "alta" => Ok(Priority::High),
            "urgent" | "urgente" => Ok(Priority::Urgent),
            _ => Err(UnknownValue(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Priority::parse_lenient(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_label_variants() {
        assert_eq!("In Progress".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!("in-progress".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!("InReview".parse::<Status>(), Ok(Status::InReview));
        assert_eq!("En revisión".parse::<Status>(), Ok(Status::InReview));
        assert_eq!("Completada".parse::<Status>(), Ok(Status::Completed));
        assert!("archived".parse::<Status>().is_err());
    }

    #[test]
    fn test_lenient_parse_falls_back() {
        assert_eq!(Status::parse_lenient("archived"), Status::Pending);
        assert_eq!(Priority::parse_lenient("whenever"), Priority::Medium);
        assert_eq!(Priority::parse_lenient("Alta"), Priority::High);
    }

    #[test]
    fn test_serialises_as_variant_name() {
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"InProgress\"");
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), "\"Urgent\"");
        let s: Status = serde_json::from_str("\"In Review\"").unwrap();
        assert_eq!(s, Status::InReview);
    }
}
