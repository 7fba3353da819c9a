//! Check entry points: extract both snapshots and diff them.

use std::borrow::Cow;
use std::time::Instant;
use tracing::{info, trace};

use super::changes::DiffEntry;
use super::matcher::{match_types, Pairing};
use super::member_rules::{diff_members, ObligationPolicy};
use super::result::DiffResult;
use super::type_rules::{added_type, diff_type_pair, removed_type};
use crate::error::Result;
use crate::surface::{fold_test_namespace, Snapshot};
use crate::types::{ModuleDef, TypeDef};

/// Options for a single check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// Compare only `<ns>.A.*` (old) against `<ns>.B.*` (new).
    pub test_namespace: Option<String>,
    pub obligation_policy: ObligationPolicy,
    /// Extract the two snapshots on separate threads.
    pub parallel: bool,
}

impl CheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_test_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.test_namespace = Some(namespace.into());
        self
    }

    pub fn with_obligation_policy(mut self, policy: ObligationPolicy) -> Self {
        self.obligation_policy = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Compare two versions of a module.
///
/// Fails only on malformed metadata or an empty test namespace; every
/// structural difference is part of the returned [`DiffResult`].
pub fn check(old: &ModuleDef, new: &ModuleDef, options: &CheckOptions) -> Result<DiffResult> {
    let start = Instant::now();

    let (old_types, new_types): (Cow<'_, [TypeDef]>, Cow<'_, [TypeDef]>) = match &options.test_namespace {
        Some(namespace) => {
            let (old_types, new_types) = fold_test_namespace(&old.types, &new.types, namespace)?;
            (Cow::Owned(old_types), Cow::Owned(new_types))
        }
        None => (Cow::Borrowed(old.types.as_slice()), Cow::Borrowed(new.types.as_slice())),
    };

    let (old_snapshot, new_snapshot) = extract_pair(&old_types, &new_types, options.parallel)?;
    let result = check_snapshots(&old_snapshot, &new_snapshot, options.obligation_policy);

    info!(
        "Checked {} -> {}: level {} ({} major, {} minor) in {:.2}ms",
        old.name,
        new.name,
        result.level(),
        result.major().len(),
        result.minor().len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(result)
}

fn extract_pair(old: &[TypeDef], new: &[TypeDef], parallel: bool) -> Result<(Snapshot, Snapshot)> {
    let (old, new) = if parallel {
        rayon::join(|| Snapshot::extract(old), || Snapshot::extract(new))
    } else {
        (Snapshot::extract(old), Snapshot::extract(new))
    };
    Ok((old?, new?))
}

/// Diff two already extracted snapshots.
///
/// Entries are ordered by type name; within a type, type-level entries
/// come before member entries.
pub fn check_snapshots(old: &Snapshot, new: &Snapshot, policy: ObligationPolicy) -> DiffResult {
    let mut entries: Vec<DiffEntry> = Vec::new();

    for pairing in match_types(old, new) {
        match pairing {
            Pairing::Matched { old, new } => {
                entries.extend(diff_type_pair(old, new));
                if old.is_observable() && new.is_observable() {
                    entries.extend(diff_members(old, new, policy));
                }
            }
            Pairing::Removed(ty) => entries.extend(removed_type(ty)),
            Pairing::Added(ty) => entries.extend(added_type(ty)),
        }
    }

    for entry in &entries {
        trace!("{}", entry);
    }

    DiffResult::from_entries(entries)
}

/// Convenience wrapper reporting whether `new` breaks consumers of `old`.
pub fn is_breaking(old: &ModuleDef, new: &ModuleDef) -> Result<bool> {
    Ok(check(old, new, &CheckOptions::default())?.has_breaking_changes())
}
