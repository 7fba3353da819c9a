//! Diff entry types and summary statistics.

use serde::Serialize;
use std::fmt;

/// How a difference affects existing consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Additive or widening; existing consumers keep working.
    Minor,
    /// Existing consumers may fail to compile or to run.
    Major,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Major => "major",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Minor => f.write_str("Minor"),
            Severity::Major => f.write_str("Major"),
        }
    }
}

/// Whether a cause describes a type or one of its members.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Type,
    Member,
}

/// The rule that produced a diff entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cause {
    TypeRemoved,
    TypeAdded,
    TypeVisibilityNarrowed,
    TypeVisibilityWidened,
    TypeKindChanged,
    TypeSealed,
    TypeUnsealed,
    TypeMadeAbstract,
    TypeMadeConcrete,
    BaseTypeChanged,
    InterfaceRemoved,
    InterfaceAdded,
    GenericArityChanged,
    GenericConstraintsChanged,
    GenericVarianceChanged,
    EnumUnderlyingTypeChanged,
    EnumValueRemoved,
    EnumValueChanged,
    EnumValueAdded,
    MemberRemoved,
    MemberAdded,
    ParametersChanged,
    ReturnTypeChanged,
    ParameterModifierChanged,
    ParameterRenamed,
    ParameterMadeOptional,
    ParameterMadeRequired,
    ParameterDefaultChanged,
    MemberVisibilityNarrowed,
    MemberVisibilityWidened,
    StaticChanged,
    MemberSealed,
    MemberMadeVirtual,
    MemberMadeAbstract,
    MemberMadeConcrete,
    AccessorRemoved,
    AccessorAdded,
    FieldMadeReadOnly,
    FieldMadeWritable,
    ConstantValueChanged,
}

impl Cause {
    /// Human-readable description template.
    pub fn description(&self) -> &'static str {
        match self {
            Cause::TypeRemoved => "type removed",
            Cause::TypeAdded => "type added",
            Cause::TypeVisibilityNarrowed => "type visibility narrowed",
            Cause::TypeVisibilityWidened => "type visibility widened",
            Cause::TypeKindChanged => "type kind changed",
            Cause::TypeSealed => "type made sealed",
            Cause::TypeUnsealed => "type no longer sealed",
            Cause::TypeMadeAbstract => "type made abstract",
            Cause::TypeMadeConcrete => "type no longer abstract",
            Cause::BaseTypeChanged => "base type changed",
            Cause::InterfaceRemoved => "interface removed",
            Cause::InterfaceAdded => "interface added",
            Cause::GenericArityChanged => "generic parameter count changed",
            Cause::GenericConstraintsChanged => "generic constraints changed",
            Cause::GenericVarianceChanged => "generic variance changed",
            Cause::EnumUnderlyingTypeChanged => "enum underlying type changed",
            Cause::EnumValueRemoved => "enum value removed",
            Cause::EnumValueChanged => "enum value changed",
            Cause::EnumValueAdded => "enum value added",
            Cause::MemberRemoved => "member removed",
            Cause::MemberAdded => "member added",
            Cause::ParametersChanged => "parameters changed",
            Cause::ReturnTypeChanged => "type of member changed",
            Cause::ParameterModifierChanged => "parameter modifier changed",
            Cause::ParameterRenamed => "parameter renamed",
            Cause::ParameterMadeOptional => "parameter made optional",
            Cause::ParameterMadeRequired => "parameter made required",
            Cause::ParameterDefaultChanged => "parameter default value changed",
            Cause::MemberVisibilityNarrowed => "member visibility narrowed",
            Cause::MemberVisibilityWidened => "member visibility widened",
            Cause::StaticChanged => "static modifier changed",
            Cause::MemberSealed => "member no longer overridable",
            Cause::MemberMadeVirtual => "member made virtual",
            Cause::MemberMadeAbstract => "member made abstract",
            Cause::MemberMadeConcrete => "member no longer abstract",
            Cause::AccessorRemoved => "accessor removed",
            Cause::AccessorAdded => "accessor added",
            Cause::FieldMadeReadOnly => "field made read-only",
            Cause::FieldMadeWritable => "field no longer read-only",
            Cause::ConstantValueChanged => "constant value changed",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Cause::TypeRemoved
            | Cause::TypeAdded
            | Cause::TypeVisibilityNarrowed
            | Cause::TypeVisibilityWidened
            | Cause::TypeKindChanged
            | Cause::TypeSealed
            | Cause::TypeUnsealed
            | Cause::TypeMadeAbstract
            | Cause::TypeMadeConcrete
            | Cause::BaseTypeChanged
            | Cause::InterfaceRemoved
            | Cause::InterfaceAdded
            | Cause::GenericArityChanged
            | Cause::GenericConstraintsChanged
            | Cause::GenericVarianceChanged
            | Cause::EnumUnderlyingTypeChanged
            | Cause::EnumValueRemoved
            | Cause::EnumValueChanged
            | Cause::EnumValueAdded => Category::Type,
            _ => Category::Member,
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The entity a diff entry refers to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Subject {
    /// Qualified name of the type.
    pub type_name: String,
    /// Member identity within the type, e.g. `Compute(int)`.
    pub member: Option<String>,
}

impl Subject {
    pub fn of_type(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            member: None,
        }
    }

    pub fn of_member(type_name: &str, member: impl Into<String>) -> Self {
        Self {
            type_name: type_name.to_string(),
            member: Some(member.into()),
        }
    }

    /// Get fully qualified subject path.
    pub fn full_name(&self) -> String {
        match &self.member {
            Some(member) => format!("{}.{}", self.type_name, member),
            None => self.type_name.clone(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// One detected incompatibility or addition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    pub severity: Severity,
    pub cause: Cause,
    pub subject: Subject,
    /// Specifics of the change, e.g. `int -> long`.
    pub details: Option<String>,
}

impl DiffEntry {
    pub fn new(severity: Severity, cause: Cause, subject: Subject) -> Self {
        Self {
            severity,
            cause,
            subject,
            details: None,
        }
    }

    pub fn major(cause: Cause, subject: Subject) -> Self {
        Self::new(Severity::Major, cause, subject)
    }

    pub fn minor(cause: Cause, subject: Subject) -> Self {
        Self::new(Severity::Minor, cause, subject)
    }

    /// Set details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Set `before -> after` details.
    pub fn with_change(self, before: impl fmt::Display, after: impl fmt::Display) -> Self {
        self.with_details(format!("{} -> {}", before, after))
    }

    pub fn is_major(&self) -> bool {
        self.severity == Severity::Major
    }
}

impl fmt::Display for DiffEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.subject, self.cause)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

/// Summary statistics for a diff.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub types_added: u32,
    pub types_removed: u32,
    pub types_modified: u32,

    pub members_added: u32,
    pub members_removed: u32,
    pub members_modified: u32,

    pub major: u32,
    pub minor: u32,
}

impl DiffSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment counters for one entry.
    pub fn record(&mut self, entry: &DiffEntry) {
        match (entry.cause.category(), entry.cause) {
            (_, Cause::TypeAdded) => self.types_added += 1,
            (_, Cause::TypeRemoved) => self.types_removed += 1,
            (Category::Type, _) => self.types_modified += 1,
            (_, Cause::MemberAdded) => self.members_added += 1,
            (_, Cause::MemberRemoved) => self.members_removed += 1,
            (Category::Member, _) => self.members_modified += 1,
        }

        match entry.severity {
            Severity::Major => self.major += 1,
            Severity::Minor => self.minor += 1,
        }
    }

    /// Generate human-readable summary string.
    pub fn text(&self) -> String {
        let mut parts = Vec::new();

        if self.types_added > 0 || self.types_removed > 0 || self.types_modified > 0 {
            parts.push(format!(
                "types: {}",
                counts(self.types_added, self.types_removed, self.types_modified)
            ));
        }

        if self.members_added > 0 || self.members_removed > 0 || self.members_modified > 0 {
            parts.push(format!(
                "members: {}",
                counts(self.members_added, self.members_removed, self.members_modified)
            ));
        }

        if parts.is_empty() {
            "No changes".to_string()
        } else {
            format!(
                "{} ({} major, {} minor)",
                parts.join("; "),
                self.major,
                self.minor
            )
        }
    }
}

fn counts(added: u32, removed: u32, modified: u32) -> String {
    let mut parts = Vec::new();
    if added > 0 {
        parts.push(format!("{} added", added));
    }
    if removed > 0 {
        parts.push(format!("{} removed", removed));
    }
    if modified > 0 {
        parts.push(format!("{} changed", modified));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cause_serialized_name() {
        let name = |cause: Cause| serde_json::to_value(cause).unwrap();
        assert_eq!(name(Cause::TypeRemoved), "type_removed");
        assert_eq!(name(Cause::ReturnTypeChanged), "return_type_changed");
        assert_eq!(name(Cause::FieldMadeReadOnly), "field_made_read_only");
    }

    #[test]
    fn test_cause_category() {
        assert_eq!(Cause::EnumValueAdded.category(), Category::Type);
        assert_eq!(Cause::AccessorRemoved.category(), Category::Member);
    }

    #[test]
    fn test_subject_full_name() {
        assert_eq!(Subject::of_type("Acme.Foo").full_name(), "Acme.Foo");
        assert_eq!(
            Subject::of_member("Acme.Foo", "Bar()").full_name(),
            "Acme.Foo.Bar()"
        );
    }

    #[test]
    fn test_entry_display() {
        let entry = DiffEntry::major(
            Cause::ReturnTypeChanged,
            Subject::of_member("Acme.Calc", "Compute(int)"),
        )
        .with_change("int", "long");

        assert_eq!(
            entry.to_string(),
            "Major: Acme.Calc.Compute(int): type of member changed (int -> long)"
        );
        assert!(entry.is_major());
    }

    #[test]
    fn test_entry_display_without_details() {
        let entry = DiffEntry::minor(Cause::TypeAdded, Subject::of_type("Acme.Baz"));
        assert_eq!(entry.to_string(), "Minor: Acme.Baz: type added");
    }

    #[test]
    fn test_diff_summary_record() {
        let mut summary = DiffSummary::new();

        summary.record(&DiffEntry::minor(Cause::TypeAdded, Subject::of_type("A")));
        summary.record(&DiffEntry::major(Cause::TypeSealed, Subject::of_type("B")));
        summary.record(&DiffEntry::major(
            Cause::MemberRemoved,
            Subject::of_member("B", "Run()"),
        ));

        assert_eq!(summary.types_added, 1);
        assert_eq!(summary.types_modified, 1);
        assert_eq!(summary.members_removed, 1);
        assert_eq!(summary.major, 2);
        assert_eq!(summary.minor, 1);
    }

    #[test]
    fn test_diff_summary_text() {
        let summary = DiffSummary {
            types_added: 2,
            members_modified: 1,
            major: 1,
            minor: 2,
            ..Default::default()
        };

        let text = summary.text();
        assert!(text.contains("types: 2 added"));
        assert!(text.contains("members: 1 changed"));
        assert!(text.contains("1 major, 2 minor"));
    }

    #[test]
    fn test_diff_summary_text_no_changes() {
        assert_eq!(DiffSummary::default().text(), "No changes");
    }
}
