//! Compat core - API surface compatibility checking.
//!
//! Compares two versions of a compiled module's public surface and
//! classifies every difference as Major (breaking) or Minor (additive).
//!
//! # Pipeline
//!
//! - **Extraction**: module metadata ([`types`]) to an arena [`Snapshot`]
//! - **Matching**: types by qualified name, members by kind + name + signature
//! - **Rules**: type-level and member-level rule tables produce [`DiffEntry`] values
//! - **Aggregation**: entries partitioned by severity into a [`DiffResult`] with a [`Level`]
//!
//! # Usage
//!
//! ```
//! use compat_core::{check, CheckOptions, Level};
//! use compat_core::types::{ModuleDef, TypeDef};
//!
//! let old = ModuleDef::new("Acme.dll", vec![TypeDef::class("Acme", "Foo")]);
//! let new = ModuleDef::new(
//!     "Acme.dll",
//!     vec![TypeDef::class("Acme", "Foo"), TypeDef::class("Acme", "Baz")],
//! );
//!
//! let result = check(&old, &new, &CheckOptions::default()).unwrap();
//! assert_eq!(result.level(), Level::Minor);
//! ```

pub mod differ;
pub mod error;
pub mod surface;
pub mod types;

pub use differ::{
    check, check_snapshots, Cause, CheckOptions, DiffEntry, DiffResult, DiffSummary, Level,
    ObligationPolicy, Severity, Subject,
};
pub use error::{CheckError, ExtractError, Result};
pub use surface::Snapshot;
