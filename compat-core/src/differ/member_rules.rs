//! Member-level compatibility rules.
//!
//! Applied to type pairs observable in both versions. Every applicable rule
//! fires; there is no precedence between rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::changes::{Cause, DiffEntry, Subject};
use super::matcher::{match_members, Pairing};
use crate::surface::{
    MemberDetail, MemberKind, MemberSurface, ParamModifier, TypeKind, TypeSurface, Visibility,
};

/// How to classify a newly added contract obligation (abstract member or
/// required interface member).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObligationPolicy {
    /// Always Major.
    #[default]
    Always,
    /// Major only when external code could already implement the type.
    WhenImplementable,
}

impl ObligationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObligationPolicy::Always => "always",
            ObligationPolicy::WhenImplementable => "when-implementable",
        }
    }

    fn is_breaking(&self, owner: &TypeSurface, member: &MemberSurface) -> bool {
        if !is_obligation(owner, member) {
            return false;
        }
        match self {
            ObligationPolicy::Always => true,
            ObligationPolicy::WhenImplementable => owner.is_implementable(),
        }
    }
}

/// Whether every implementer of `owner` must supply `member`.
///
/// Members flagged `is_abstract` or `implements_contract` by the metadata
/// reader always are. Instance members of an interface are too, unless
/// they carry a default body (virtual but not abstract).
fn is_obligation(owner: &TypeSurface, member: &MemberSurface) -> bool {
    if member.is_obligation() {
        return true;
    }
    owner.kind == TypeKind::Interface
        && !member.is_static
        && !member.detail.dispatch().is_some_and(|d| d.is_virtual)
}

type OverloadSet<'a> = (MemberKind, &'a str);

/// Diff the members of a matched type pair, in member identity order.
pub fn diff_members(old: &TypeSurface, new: &TypeSurface, policy: ObligationPolicy) -> Vec<DiffEntry> {
    let pairings = match_members(old, new);
    let reshaped = reshaped_overloads(&pairings);
    let mut entries = Vec::new();

    for pairing in &pairings {
        match *pairing {
            Pairing::Matched { old: a, new: b } => {
                entries.extend(diff_member_pair(&old.name, new, a, b, true));
            }
            Pairing::Removed(member) if member.is_observable() => {
                match reshaped.get(&(member.kind(), member.name())) {
                    Some(replacement) => {
                        entries.push(
                            DiffEntry::major(Cause::ParametersChanged, subject(&old.name, member))
                                .with_change(&member.key, &replacement.key),
                        );
                        entries.extend(diff_member_pair(&old.name, new, member, replacement, false));
                    }
                    None => entries.push(DiffEntry::major(Cause::MemberRemoved, subject(&old.name, member))),
                }
            }
            Pairing::Removed(_) => {}
            Pairing::Added(member) => {
                if reshaped.contains_key(&(member.kind(), member.name())) || !member.is_observable() {
                    continue;
                }
                let entry = if policy.is_breaking(old, member) {
                    DiffEntry::major(Cause::MemberAdded, subject(&new.name, member))
                        .with_details("new obligation for implementers")
                } else {
                    DiffEntry::minor(Cause::MemberAdded, subject(&new.name, member))
                };
                entries.push(entry);
            }
        }
    }

    entries
}

fn subject(type_name: &str, member: &MemberSurface) -> Subject {
    Subject::of_member(type_name, member.key.to_string())
}

/// Overload sets where exactly one observable member disappeared and
/// exactly one appeared: a parameter list change rather than a removal
/// plus an addition. Maps the set to its new member.
fn reshaped_overloads<'a>(pairings: &[Pairing<'a, MemberSurface>]) -> BTreeMap<OverloadSet<'a>, &'a MemberSurface> {
    let mut removed: BTreeMap<OverloadSet<'a>, Vec<&'a MemberSurface>> = BTreeMap::new();
    let mut added: BTreeMap<OverloadSet<'a>, Vec<&'a MemberSurface>> = BTreeMap::new();

    for pairing in pairings {
        match *pairing {
            Pairing::Removed(m) if m.is_observable() => {
                removed.entry((m.kind(), m.name())).or_default().push(m);
            }
            Pairing::Added(m) if m.is_observable() => {
                added.entry((m.kind(), m.name())).or_default().push(m);
            }
            _ => {}
        }
    }

    removed
        .into_iter()
        .filter_map(|(set, old)| match (old.as_slice(), added.get(&set).map(Vec::as_slice)) {
            ([_], Some([new])) => Some((set, *new)),
            _ => None,
        })
        .collect()
}

/// Diff two versions of one member. Per-parameter checks only apply when
/// both share a signature.
fn diff_member_pair(
    type_name: &str,
    owner: &TypeSurface,
    old: &MemberSurface,
    new: &MemberSurface,
    positional: bool,
) -> Vec<DiffEntry> {
    let mut entries = Vec::new();
    let subject = || subject(type_name, old);

    match (old.is_observable(), new.is_observable()) {
        (false, false) => return entries,
        (true, false) => {
            entries.push(
                DiffEntry::major(Cause::MemberVisibilityNarrowed, subject())
                    .with_change(old.visibility, new.visibility),
            );
            return entries;
        }
        (false, true) => {
            entries.push(
                DiffEntry::minor(Cause::MemberVisibilityWidened, subject())
                    .with_change(old.visibility, new.visibility),
            );
            return entries;
        }
        (true, true) => {
            if new.visibility < old.visibility {
                entries.push(
                    DiffEntry::major(Cause::MemberVisibilityNarrowed, subject())
                        .with_change(old.visibility, new.visibility),
                );
            } else if new.visibility > old.visibility {
                entries.push(
                    DiffEntry::minor(Cause::MemberVisibilityWidened, subject())
                        .with_change(old.visibility, new.visibility),
                );
            }
        }
    }

    if old.is_static != new.is_static {
        entries.push(
            DiffEntry::major(Cause::StaticChanged, subject())
                .with_change(static_label(old.is_static), static_label(new.is_static)),
        );
    }

    if let (Some(a), Some(b)) = (old.detail.value_type(), new.detail.value_type()) {
        if a != b {
            entries.push(DiffEntry::major(Cause::ReturnTypeChanged, subject()).with_change(a, b));
        }
    }

    if let (Some(a), Some(b)) = (old.detail.dispatch(), new.detail.dispatch()) {
        if a.is_overridable() && !b.is_overridable() {
            entries.push(DiffEntry::major(Cause::MemberSealed, subject()));
        }
        if !a.is_virtual && b.is_virtual && !b.is_abstract {
            entries.push(DiffEntry::minor(Cause::MemberMadeVirtual, subject()));
        }
        if !a.is_abstract && b.is_abstract {
            entries.push(DiffEntry::major(Cause::MemberMadeAbstract, subject()));
        }
        if a.is_abstract && !b.is_abstract && !owner.is_sealed {
            entries.push(DiffEntry::minor(Cause::MemberMadeConcrete, subject()));
        }
    }

    if positional {
        diff_parameters(old, new, &subject, &mut entries);
    }

    match (&old.detail, &new.detail) {
        (
            MemberDetail::Property {
                getter: old_get,
                setter: old_set,
                ..
            },
            MemberDetail::Property {
                getter: new_get,
                setter: new_set,
                ..
            },
        ) => {
            diff_accessor("get", *old_get, *new_get, &subject, &mut entries);
            diff_accessor("set", *old_set, *new_set, &subject, &mut entries);
        }
        (
            MemberDetail::Field {
                is_read_only: old_read_only,
                constant_value: old_constant,
                ..
            },
            MemberDetail::Field {
                is_read_only: new_read_only,
                constant_value: new_constant,
                ..
            },
        ) => {
            match (old_read_only, new_read_only) {
                (false, true) => entries.push(DiffEntry::major(Cause::FieldMadeReadOnly, subject())),
                (true, false) => entries.push(DiffEntry::minor(Cause::FieldMadeWritable, subject())),
                _ => {}
            }
            if old_constant != new_constant {
                entries.push(
                    DiffEntry::major(Cause::ConstantValueChanged, subject())
                        .with_change(constant_label(old_constant), constant_label(new_constant)),
                );
            }
        }
        _ => {}
    }

    entries
}

fn static_label(is_static: bool) -> &'static str {
    if is_static {
        "static"
    } else {
        "instance"
    }
}

fn constant_label(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(not constant)")
}

fn diff_parameters(
    old: &MemberSurface,
    new: &MemberSurface,
    subject: &dyn Fn() -> Subject,
    entries: &mut Vec<DiffEntry>,
) {
    for (a, b) in old.detail.parameters().iter().zip(new.detail.parameters()) {
        if a.modifier != b.modifier {
            let entry = match (a.modifier, b.modifier) {
                (ParamModifier::None, ParamModifier::Params) => {
                    DiffEntry::minor(Cause::ParameterModifierChanged, subject())
                }
                _ => DiffEntry::major(Cause::ParameterModifierChanged, subject()),
            };
            entries.push(entry.with_details(format!(
                "{}: {} -> {}",
                b.name,
                a.modifier.as_str(),
                b.modifier.as_str()
            )));
        }

        if a.name != b.name {
            entries.push(DiffEntry::major(Cause::ParameterRenamed, subject()).with_change(&a.name, &b.name));
        }

        match (&a.default_value, &b.default_value) {
            (None, Some(value)) => entries.push(
                DiffEntry::minor(Cause::ParameterMadeOptional, subject())
                    .with_details(format!("{} = {}", b.name, value)),
            ),
            (Some(_), None) => entries.push(
                DiffEntry::major(Cause::ParameterMadeRequired, subject()).with_details(b.name.as_str()),
            ),
            (Some(before), Some(after)) if before != after => entries.push(
                DiffEntry::minor(Cause::ParameterDefaultChanged, subject())
                    .with_details(format!("{}: {} -> {}", b.name, before, after)),
            ),
            _ => {}
        }
    }
}

fn diff_accessor(
    label: &str,
    old: Option<Visibility>,
    new: Option<Visibility>,
    subject: &dyn Fn() -> Subject,
    entries: &mut Vec<DiffEntry>,
) {
    let old = old.filter(|v| v.is_observable());
    let new = new.filter(|v| v.is_observable());

    match (old, new) {
        (Some(_), None) => entries.push(DiffEntry::major(Cause::AccessorRemoved, subject()).with_details(label)),
        (None, Some(_)) => entries.push(DiffEntry::minor(Cause::AccessorAdded, subject()).with_details(label)),
        (Some(a), Some(b)) if b < a => entries.push(
            DiffEntry::major(Cause::MemberVisibilityNarrowed, subject())
                .with_details(format!("{}: {} -> {}", label, a, b)),
        ),
        (Some(a), Some(b)) if b > a => entries.push(
            DiffEntry::minor(Cause::MemberVisibilityWidened, subject())
                .with_details(format!("{}: {} -> {}", label, a, b)),
        ),
        _ => {}
    }
}
