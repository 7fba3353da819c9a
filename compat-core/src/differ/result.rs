//! Aggregated check result.

use serde::Serialize;
use std::fmt;

use super::changes::{DiffEntry, DiffSummary, Severity};

/// Overall compatibility level of a new version relative to the old one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Level {
    #[default]
    None,
    Minor,
    Major,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::None => "None",
            Level::Minor => "Minor",
            Level::Major => "Major",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Severity> for Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Minor => Level::Minor,
            Severity::Major => Level::Major,
        }
    }
}

/// Severity-partitioned diff entries plus the overall level.
///
/// Built once per check and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    major: Vec<DiffEntry>,
    minor: Vec<DiffEntry>,
    level: Level,
}

impl DiffResult {
    /// Partition entries by severity, keeping their relative order.
    pub fn from_entries(entries: impl IntoIterator<Item = DiffEntry>) -> Self {
        let (major, minor): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|entry| entry.is_major());

        let level = if !major.is_empty() {
            Level::Major
        } else if !minor.is_empty() {
            Level::Minor
        } else {
            Level::None
        };

        Self {
            major,
            minor,
            level,
        }
    }

    pub fn major(&self) -> &[DiffEntry] {
        &self.major
    }

    pub fn minor(&self) -> &[DiffEntry] {
        &self.minor
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn is_empty(&self) -> bool {
        self.major.is_empty() && self.minor.is_empty()
    }

    pub fn has_breaking_changes(&self) -> bool {
        self.level == Level::Major
    }

    /// All entries, majors first.
    pub fn entries(&self) -> impl Iterator<Item = &DiffEntry> {
        self.major.iter().chain(self.minor.iter())
    }

    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::new();
        for entry in self.entries() {
            summary.record(entry);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differ::changes::{Cause, Subject};

    fn entry(severity: Severity, name: &str) -> DiffEntry {
        DiffEntry::new(severity, Cause::TypeAdded, Subject::of_type(name))
    }

    #[test]
    fn test_level_order() {
        assert!(Level::None < Level::Minor);
        assert!(Level::Minor < Level::Major);
        assert_eq!(Level::default(), Level::None);
        assert_eq!(Level::from(Severity::Major), Level::Major);
    }

    #[test]
    fn test_empty_result_is_none() {
        let result = DiffResult::from_entries(Vec::new());
        assert_eq!(result.level(), Level::None);
        assert!(result.is_empty());
        assert!(!result.has_breaking_changes());
    }

    #[test]
    fn test_partition_preserves_order() {
        let result = DiffResult::from_entries(vec![
            entry(Severity::Minor, "A"),
            entry(Severity::Major, "B"),
            entry(Severity::Minor, "C"),
            entry(Severity::Major, "D"),
        ]);

        let majors: Vec<&str> = result.major().iter().map(|e| e.subject.type_name.as_str()).collect();
        let minors: Vec<&str> = result.minor().iter().map(|e| e.subject.type_name.as_str()).collect();
        assert_eq!(majors, vec!["B", "D"]);
        assert_eq!(minors, vec!["A", "C"]);
        assert_eq!(result.level(), Level::Major);
    }

    #[test]
    fn test_minor_only_level() {
        let result = DiffResult::from_entries(vec![entry(Severity::Minor, "A")]);
        assert_eq!(result.level(), Level::Minor);
        assert_eq!(result.summary().minor, 1);
    }

    #[test]
    fn test_serialize_level() {
        let result = DiffResult::from_entries(vec![entry(Severity::Major, "A")]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["level"], "Major");
        assert_eq!(json["major"][0]["cause"], "type_added");
        assert_eq!(json["major"][0]["severity"], "major");
    }
}
