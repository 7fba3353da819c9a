//! Error types for compat-core.
//!
//! Only malformed input and misconfigured comparisons are errors. Every
//! structural difference between two snapshots is reported as a
//! [`DiffEntry`](crate::differ::DiffEntry) instead.

use thiserror::Error;

/// Result type alias for compatibility checks.
pub type Result<T> = std::result::Result<T, CheckError>;

/// Metadata that cannot be turned into a consistent snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Two types resolved to the same qualified name.
    #[error("Duplicate type identity: {name}")]
    DuplicateType {
        /// Qualified name shared by both entries.
        name: String,
    },

    /// Two members of one type share kind, name and signature.
    #[error("Duplicate member identity in {type_name}: {member}")]
    DuplicateMember {
        /// Qualified name of the declaring type.
        type_name: String,
        /// Display form of the member identity.
        member: String,
    },

    /// An enumeration declares the same value name twice.
    #[error("Duplicate enum value in {type_name}: {value}")]
    DuplicateEnumValue {
        /// Qualified name of the enumeration.
        type_name: String,
        /// Repeated value name.
        value: String,
    },

    /// A generic constraint could not be read.
    #[error("Malformed generic constraint on {type_name}<{parameter}>")]
    MalformedConstraint {
        /// Qualified name of the declaring type.
        type_name: String,
        /// Generic parameter carrying the constraint.
        parameter: String,
    },
}

/// Fatal conditions that abort a check without producing a result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// Namespace-scoped comparison found nothing to compare on one side.
    #[error("No relevant types found for test namespace '{namespace}'")]
    NoRelevantTypes {
        /// Requested test namespace.
        namespace: String,
    },

    /// One of the snapshots could not be extracted.
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),
}
