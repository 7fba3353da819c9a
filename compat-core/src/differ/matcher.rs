//! Identity-based pairing of types and members.
//!
//! Both sides are already sorted by identity (snapshot index, member map),
//! so pairing is a single merge-join pass that yields results in ascending
//! identity order.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::surface::{MemberSurface, Snapshot, TypeSurface};

/// Outcome of matching one identity across the two versions.
#[derive(Debug, PartialEq, Eq)]
pub enum Pairing<'a, T> {
    Matched { old: &'a T, new: &'a T },
    Removed(&'a T),
    Added(&'a T),
}

/// Merge-join two identity-sorted sequences.
pub fn align<'a, K, T, I, J>(old: I, new: J) -> Vec<Pairing<'a, T>>
where
    K: Ord,
    I: IntoIterator<Item = (K, &'a T)>,
    J: IntoIterator<Item = (K, &'a T)>,
{
    let mut old = old.into_iter().peekable();
    let mut new = new.into_iter().peekable();
    let mut pairings = Vec::new();

    loop {
        let order = match (old.peek(), new.peek()) {
            (Some((a, _)), Some((b, _))) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };

        match order {
            Ordering::Less => {
                if let Some((_, item)) = old.next() {
                    pairings.push(Pairing::Removed(item));
                }
            }
            Ordering::Greater => {
                if let Some((_, item)) = new.next() {
                    pairings.push(Pairing::Added(item));
                }
            }
            Ordering::Equal => {
                if let (Some((_, a)), Some((_, b))) = (old.next(), new.next()) {
                    pairings.push(Pairing::Matched { old: a, new: b });
                }
            }
        }
    }

    pairings
}

/// Pair types by qualified name, then pair arity changes within a
/// generic family.
pub fn match_types<'a>(old: &'a Snapshot, new: &'a Snapshot) -> Vec<Pairing<'a, TypeSurface>> {
    pair_generic_families(align(old.entries(), new.entries()))
}

/// When exactly one observable old-only and one observable new-only type
/// share a family name (``Box`` and ``Box`1``), they are one type whose
/// arity changed. The pair takes the old type's position.
fn pair_generic_families<'a>(pairings: Vec<Pairing<'a, TypeSurface>>) -> Vec<Pairing<'a, TypeSurface>> {
    let mut removed: BTreeMap<&'a str, Vec<&'a TypeSurface>> = BTreeMap::new();
    let mut added: BTreeMap<&'a str, Vec<&'a TypeSurface>> = BTreeMap::new();

    for pairing in &pairings {
        match *pairing {
            Pairing::Removed(ty) if ty.is_observable() => {
                removed.entry(ty.family_name.as_str()).or_default().push(ty);
            }
            Pairing::Added(ty) if ty.is_observable() => {
                added.entry(ty.family_name.as_str()).or_default().push(ty);
            }
            _ => {}
        }
    }

    let families: BTreeMap<&'a str, &'a TypeSurface> = removed
        .into_iter()
        .filter_map(|(family, old)| match (old.as_slice(), added.get(family).map(Vec::as_slice)) {
            ([_], Some([new])) => Some((family, *new)),
            _ => None,
        })
        .collect();

    if families.is_empty() {
        return pairings;
    }

    pairings
        .into_iter()
        .filter_map(|pairing| match pairing {
            Pairing::Removed(old) if old.is_observable() => match families.get(old.family_name.as_str()) {
                Some(&new) => Some(Pairing::Matched { old, new }),
                None => Some(Pairing::Removed(old)),
            },
            Pairing::Added(new) if new.is_observable() && families.contains_key(new.family_name.as_str()) => None,
            other => Some(other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Accessibility, GenericParameterDef, MemberDef, ParameterDef, TypeDef};

    #[test]
    fn test_align_merge_order() {
        let old = [(1, &"a"), (3, &"c"), (4, &"d")];
        let new = [(2, &"b"), (3, &"c"), (5, &"e")];

        let pairings = align(old, new);
        assert_eq!(
            pairings,
            vec![
                Pairing::Removed(&"a"),
                Pairing::Added(&"b"),
                Pairing::Matched { old: &"c", new: &"c" },
                Pairing::Removed(&"d"),
                Pairing::Added(&"e"),
            ]
        );
    }

    /// Render type pairings as `=name`, `-name` or `+name`.
    fn outcomes(pairings: &[Pairing<'_, TypeSurface>]) -> Vec<String> {
        pairings
            .iter()
            .map(|pairing| match pairing {
                Pairing::Matched { old, new } if old.name == new.name => format!("={}", old.name),
                Pairing::Matched { old, new } => format!("{}={}", old.name, new.name),
                Pairing::Removed(ty) => format!("-{}", ty.name),
                Pairing::Added(ty) => format!("+{}", ty.name),
            })
            .collect()
    }

    fn types(defs: Vec<TypeDef>) -> Snapshot {
        Snapshot::extract(&defs).unwrap()
    }

    #[test]
    fn test_match_types_by_name() {
        let old = types(vec![TypeDef::class("Acme", "Foo"), TypeDef::class("Acme", "Gone")]);
        let new = types(vec![TypeDef::class("Acme", "Baz"), TypeDef::class("Acme", "Foo")]);

        assert_eq!(
            outcomes(&match_types(&old, &new)),
            vec!["+Acme.Baz", "=Acme.Foo", "-Acme.Gone"]
        );
    }

    #[test]
    fn test_rename_is_removal_plus_addition() {
        let old = types(vec![TypeDef::class("Acme", "Old")]);
        let new = types(vec![TypeDef::class("Acme", "New")]);

        assert_eq!(outcomes(&match_types(&old, &new)), vec!["+Acme.New", "-Acme.Old"]);
    }

    #[test]
    fn test_arity_change_paired_within_family() {
        let old = types(vec![TypeDef::class("Acme", "Box")]);
        let new = types(vec![TypeDef::class("Acme", "Box").with_generic(GenericParameterDef::new("T"))]);

        assert_eq!(outcomes(&match_types(&old, &new)), vec!["Acme.Box=Acme.Box`1"]);
    }

    #[test]
    fn test_generic_and_plain_types_coexist() {
        let both = types(vec![
            TypeDef::class("Acme", "Box"),
            TypeDef::class("Acme", "Box").with_generic(GenericParameterDef::new("T")),
        ]);

        assert_eq!(outcomes(&match_types(&both, &both)), vec!["=Acme.Box", "=Acme.Box`1"]);
    }

    #[test]
    fn test_ambiguous_family_not_paired() {
        let old = types(vec![TypeDef::class("Acme", "Box")]);
        let new = types(vec![
            TypeDef::class("Acme", "Box").with_generic(GenericParameterDef::new("T")),
            TypeDef::class("Acme", "Box")
                .with_generic(GenericParameterDef::new("T"))
                .with_generic(GenericParameterDef::new("U")),
        ]);

        assert_eq!(
            outcomes(&match_types(&old, &new)),
            vec!["-Acme.Box", "+Acme.Box`1", "+Acme.Box`2"]
        );
    }

    #[test]
    fn test_hidden_type_not_paired_across_arity() {
        let old = types(vec![TypeDef::class("Acme", "Box").with_accessibility(Accessibility::Internal)]);
        let new = types(vec![TypeDef::class("Acme", "Box").with_generic(GenericParameterDef::new("T"))]);

        assert_eq!(outcomes(&match_types(&old, &new)), vec!["-Acme.Box", "+Acme.Box`1"]);
    }

    #[test]
    fn test_match_members_by_signature() {
        let old = types(vec![TypeDef::class("Acme", "Calc")
            .with_member(MemberDef::method("Add", "int").with_param(ParameterDef::new("a", "int")))]);
        let new = types(vec![TypeDef::class("Acme", "Calc")
            .with_member(MemberDef::method("Add", "int").with_param(ParameterDef::new("a", "long")))]);
        let (old, new) = (old.find("Acme.Calc").unwrap(), new.find("Acme.Calc").unwrap());

        let keys: Vec<String> = match_members(old, new)
            .iter()
            .map(|pairing| match pairing {
                Pairing::Matched { old, .. } => format!("={}", old.key),
                Pairing::Removed(member) => format!("-{}", member.key),
                Pairing::Added(member) => format!("+{}", member.key),
            })
            .collect();
        assert_eq!(keys, vec!["-Add(int)", "+Add(long)"]);
    }

    #[test]
    fn test_nested_types_matched_by_path() {
        let outer = || TypeDef::class("Acme", "Outer").with_nested(TypeDef::class("", "Inner"));
        let old = types(vec![outer()]);
        let new = types(vec![outer()]);

        assert_eq!(
            outcomes(&match_types(&old, &new)),
            vec!["=Acme.Outer", "=Acme.Outer+Inner"]
        );
    }
}
