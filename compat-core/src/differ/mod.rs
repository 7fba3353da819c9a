//! Compatibility diff engine.
//!
//! Pairs the types and members of two [`Snapshot`](crate::surface::Snapshot)s
//! by identity, applies the type and member rule tables to every pair, and
//! aggregates the resulting entries into a [`DiffResult`].
//!
//! # Example
//!
//! ```
//! use compat_core::differ::{check, CheckOptions, Level};
//! use compat_core::types::{MemberDef, ModuleDef, TypeDef};
//!
//! let old = ModuleDef::new(
//!     "Acme.dll",
//!     vec![TypeDef::class("Acme", "Foo").with_member(MemberDef::method("Bar", "void"))],
//! );
//! let new = ModuleDef::new("Acme.dll", vec![TypeDef::class("Acme", "Foo")]);
//!
//! let result = check(&old, &new, &CheckOptions::default()).unwrap();
//! assert_eq!(result.level(), Level::Major);
//! for entry in result.major() {
//!     println!("{}", entry);
//! }
//! ```

pub mod changes;
pub mod comparator;
pub mod matcher;
pub mod member_rules;
pub mod result;
pub mod type_rules;

pub use changes::{Category, Cause, DiffEntry, DiffSummary, Severity, Subject};
pub use comparator::{check, check_snapshots, is_breaking, CheckOptions};
pub use matcher::{match_members, match_types, Pairing};
pub use member_rules::ObligationPolicy;
pub use result::{DiffResult, Level};
