//! Type-level compatibility rules.

use std::collections::BTreeMap;

use super::changes::{Cause, DiffEntry, Subject};
use crate::surface::{GenericParam, TypeKind, TypeSurface, Variance, Visibility};

/// Diff a type that is only present in the old version.
pub fn removed_type(old: &TypeSurface) -> Option<DiffEntry> {
    old.is_observable()
        .then(|| DiffEntry::major(Cause::TypeRemoved, Subject::of_type(&old.name)))
}

/// Diff a type that is only present in the new version.
pub fn added_type(new: &TypeSurface) -> Option<DiffEntry> {
    new.is_observable().then(|| {
        DiffEntry::minor(Cause::TypeAdded, Subject::of_type(&new.name)).with_details(new.kind.as_str())
    })
}

/// Diff the type-level attributes of a matched pair.
///
/// Members are diffed separately.
pub fn diff_type_pair(old: &TypeSurface, new: &TypeSurface) -> Vec<DiffEntry> {
    let mut entries = Vec::new();
    let subject = || Subject::of_type(&old.name);

    match (old.is_observable(), new.is_observable()) {
        (false, false) => return entries,
        (true, false) => {
            entries.push(narrowed(
                Cause::TypeVisibilityNarrowed,
                subject(),
                old.effective_visibility,
                new.effective_visibility,
            ));
            return entries;
        }
        (false, true) => {
            entries.push(widened(
                Cause::TypeVisibilityWidened,
                subject(),
                old.effective_visibility,
                new.effective_visibility,
            ));
            return entries;
        }
        (true, true) => {
            if new.effective_visibility < old.effective_visibility {
                entries.push(narrowed(
                    Cause::TypeVisibilityNarrowed,
                    subject(),
                    old.effective_visibility,
                    new.effective_visibility,
                ));
            } else if new.effective_visibility > old.effective_visibility {
                entries.push(widened(
                    Cause::TypeVisibilityWidened,
                    subject(),
                    old.effective_visibility,
                    new.effective_visibility,
                ));
            }
        }
    }

    if old.kind != new.kind {
        entries.push(DiffEntry::major(Cause::TypeKindChanged, subject()).with_change(old.kind, new.kind));
    }

    if old.kind == TypeKind::Class && new.kind == TypeKind::Class {
        diff_modifiers(old, new, &mut entries);
    }

    if old.base_type != new.base_type {
        entries.push(
            DiffEntry::major(Cause::BaseTypeChanged, subject())
                .with_change(display_base(&old.base_type), display_base(&new.base_type)),
        );
    }

    for removed in old.interfaces.difference(&new.interfaces) {
        entries.push(DiffEntry::major(Cause::InterfaceRemoved, subject()).with_details(removed.as_str()));
    }
    for added in new.interfaces.difference(&old.interfaces) {
        entries.push(DiffEntry::minor(Cause::InterfaceAdded, subject()).with_details(added.as_str()));
    }

    diff_generics(old, new, &mut entries);

    if old.kind == TypeKind::Enum && new.kind == TypeKind::Enum {
        diff_enum(old, new, &mut entries);
    }

    entries
}

fn narrowed(cause: Cause, subject: Subject, old: Visibility, new: Visibility) -> DiffEntry {
    DiffEntry::major(cause, subject).with_change(old, new)
}

fn widened(cause: Cause, subject: Subject, old: Visibility, new: Visibility) -> DiffEntry {
    DiffEntry::minor(cause, subject).with_change(old, new)
}

fn display_base(base: &Option<String>) -> &str {
    base.as_deref().unwrap_or("(none)")
}

fn diff_modifiers(old: &TypeSurface, new: &TypeSurface, entries: &mut Vec<DiffEntry>) {
    let subject = || Subject::of_type(&old.name);

    match (old.is_sealed, new.is_sealed) {
        (false, true) => entries.push(DiffEntry::major(Cause::TypeSealed, subject())),
        (true, false) => entries.push(DiffEntry::minor(Cause::TypeUnsealed, subject())),
        _ => {}
    }

    match (old.is_abstract, new.is_abstract) {
        (false, true) => entries.push(DiffEntry::major(Cause::TypeMadeAbstract, subject())),
        (true, false) => entries.push(DiffEntry::minor(Cause::TypeMadeConcrete, subject())),
        _ => {}
    }
}

fn diff_generics(old: &TypeSurface, new: &TypeSurface, entries: &mut Vec<DiffEntry>) {
    let subject = || Subject::of_type(&old.name);

    if old.generics.len() != new.generics.len() {
        entries.push(
            DiffEntry::major(Cause::GenericArityChanged, subject())
                .with_change(old.generics.len(), new.generics.len()),
        );
        return;
    }

    for (position, (a, b)) in old.generics.iter().zip(&new.generics).enumerate() {
        if a.constraints != b.constraints {
            entries.push(
                DiffEntry::major(Cause::GenericConstraintsChanged, subject())
                    .with_details(format!("{}: {} -> {}", b.name, constraints(a), constraints(b))),
            );
        }

        if a.variance != b.variance {
            let details = format!(
                "parameter {} ({}): {} -> {}",
                position,
                b.name,
                a.variance.as_str(),
                b.variance.as_str()
            );
            let entry = if a.variance == Variance::Invariant {
                DiffEntry::minor(Cause::GenericVarianceChanged, subject())
            } else {
                DiffEntry::major(Cause::GenericVarianceChanged, subject())
            };
            entries.push(entry.with_details(details));
        }
    }
}

fn constraints(param: &GenericParam) -> String {
    if param.constraints.is_empty() {
        return "(none)".to_string();
    }
    param
        .constraints
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn diff_enum(old: &TypeSurface, new: &TypeSurface, entries: &mut Vec<DiffEntry>) {
    let subject = || Subject::of_type(&old.name);

    if old.enum_underlying_type != new.enum_underlying_type {
        entries.push(
            DiffEntry::major(Cause::EnumUnderlyingTypeChanged, subject()).with_change(
                display_base(&old.enum_underlying_type),
                display_base(&new.enum_underlying_type),
            ),
        );
    }

    let old_values: BTreeMap<&str, i64> = old.enum_values.iter().map(|v| (v.name.as_str(), v.value)).collect();
    let new_values: BTreeMap<&str, i64> = new.enum_values.iter().map(|v| (v.name.as_str(), v.value)).collect();

    for (name, value) in &old_values {
        match new_values.get(name) {
            None => entries.push(DiffEntry::major(Cause::EnumValueRemoved, subject()).with_details(*name)),
            Some(current) if current != value => entries.push(
                DiffEntry::major(Cause::EnumValueChanged, subject())
                    .with_details(format!("{}: {} -> {}", name, value, current)),
            ),
            Some(_) => {}
        }
    }

    for name in new_values.keys() {
        if !old_values.contains_key(name) {
            entries.push(DiffEntry::minor(Cause::EnumValueAdded, subject()).with_details(*name));
        }
    }
}
