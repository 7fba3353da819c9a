//! Namespace-scoped comparison for fixture modules.
//!
//! Compatibility fixtures keep both versions of a scenario in one module:
//! `<ns>.A.*` holds the old variant and `<ns>.B.*` the new one. Folding
//! selects one variant per side and rewrites every reference to the
//! variant namespace onto `<ns>`, so the matcher sees ordinary identities.

use crate::error::CheckError;
use crate::types::{GenericParameterDef, MemberDef, TypeDef};

/// Sub-namespace holding the old variant.
pub const OLD_VARIANT: &str = "A";

/// Sub-namespace holding the new variant.
pub const NEW_VARIANT: &str = "B";

/// Select and fold the old and new variants of `namespace`.
///
/// Fails with [`CheckError::NoRelevantTypes`] when either side has no
/// types in its variant namespace.
pub fn fold_test_namespace(
    old: &[TypeDef],
    new: &[TypeDef],
    namespace: &str,
) -> Result<(Vec<TypeDef>, Vec<TypeDef>), CheckError> {
    let old_types = fold_variant(old, namespace, OLD_VARIANT);
    let new_types = fold_variant(new, namespace, NEW_VARIANT);

    if old_types.is_empty() || new_types.is_empty() {
        return Err(CheckError::NoRelevantTypes {
            namespace: namespace.to_string(),
        });
    }

    Ok((old_types, new_types))
}

fn fold_variant(types: &[TypeDef], namespace: &str, variant: &str) -> Vec<TypeDef> {
    let variant_ns = format!("{}.{}", namespace, variant);
    let from = format!("{}.", variant_ns);
    let to = format!("{}.", namespace);

    types
        .iter()
        .filter(|t| t.namespace == variant_ns || t.namespace.starts_with(&from))
        .map(|t| {
            let mut folded = t.clone();
            folded.namespace = format!("{}{}", namespace, &t.namespace[variant_ns.len()..]);
            rewrite_type(&mut folded, &from, &to);
            folded
        })
        .collect()
}

/// Replace `from` wherever it starts a type reference: at the start of
/// `name` or right after a delimiter such as `<` or `,`.
fn rewrite(name: &mut String, from: &str, to: &str) {
    if !name.contains(from) {
        return;
    }

    let mut folded = String::with_capacity(name.len());
    let mut rest = name.as_str();
    while let Some(pos) = rest.find(from) {
        folded.push_str(&rest[..pos]);
        let starts_reference = folded.chars().last().map_or(true, is_reference_delimiter);
        folded.push_str(if starts_reference { to } else { from });
        rest = &rest[pos + from.len()..];
    }
    folded.push_str(rest);
    *name = folded;
}

fn is_reference_delimiter(c: char) -> bool {
    matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | '*')
}

fn rewrite_type(def: &mut TypeDef, from: &str, to: &str) {
    if let Some(base) = def.base_type.as_mut() {
        rewrite(base, from, to);
    }
    for interface in &mut def.interfaces {
        rewrite(interface, from, to);
    }
    for generic in &mut def.generic_parameters {
        rewrite_generic(generic, from, to);
    }
    for member in &mut def.members {
        rewrite_member(member, from, to);
    }
    for nested in &mut def.nested_types {
        rewrite_type(nested, from, to);
    }
}

fn rewrite_generic(def: &mut GenericParameterDef, from: &str, to: &str) {
    for constraint in &mut def.constraints {
        rewrite(constraint, from, to);
    }
}

fn rewrite_member(def: &mut MemberDef, from: &str, to: &str) {
    if let Some(return_type) = def.return_type.as_mut() {
        rewrite(return_type, from, to);
    }
    for parameter in &mut def.parameters {
        rewrite(&mut parameter.type_name, from, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParameterDef;

    #[test]
    fn test_fold_selects_variants() {
        let module = vec![
            TypeDef::class("Tests.Methods.A", "Foo"),
            TypeDef::class("Tests.Methods.B", "Foo"),
            TypeDef::class("Tests.Methods.B", "Bar"),
            TypeDef::class("Tests.Other.A", "Foo"),
        ];

        let (old, new) = fold_test_namespace(&module, &module, "Tests.Methods").unwrap();

        assert_eq!(old.len(), 1);
        assert_eq!(old[0].full_name(), "Tests.Methods.Foo");
        let names: Vec<String> = new.iter().map(|t| t.full_name()).collect();
        assert_eq!(names, vec!["Tests.Methods.Foo", "Tests.Methods.Bar"]);
    }

    #[test]
    fn test_fold_keeps_sub_namespaces() {
        let module = vec![TypeDef::class("Tests.Methods.A.Inner", "Foo")];
        let (old, _) = fold_test_namespace(
            &module,
            &[TypeDef::class("Tests.Methods.B", "Foo")],
            "Tests.Methods",
        )
        .unwrap();
        assert_eq!(old[0].namespace, "Tests.Methods.Inner");
    }

    #[test]
    fn test_fold_rewrites_references() {
        let old = vec![TypeDef::class("Tests.Inherit.A", "Derived")
            .with_base("Tests.Inherit.A.Base")
            .with_interface("System.IComparable<Tests.Inherit.A.Derived>")
            .with_member(
                MemberDef::method("Clone", "Tests.Inherit.A.Derived")
                    .with_param(ParameterDef::new("other", "Tests.Inherit.A.Base")),
            )];
        let new = vec![TypeDef::class("Tests.Inherit.B", "Derived")];

        let (old, _) = fold_test_namespace(&old, &new, "Tests.Inherit").unwrap();
        let derived = &old[0];

        assert_eq!(derived.base_type.as_deref(), Some("Tests.Inherit.Base"));
        assert_eq!(derived.interfaces[0], "System.IComparable<Tests.Inherit.Derived>");
        assert_eq!(
            derived.members[0].return_type.as_deref(),
            Some("Tests.Inherit.Derived")
        );
        assert_eq!(derived.members[0].parameters[0].type_name, "Tests.Inherit.Base");
    }

    #[test]
    fn test_rewrite_only_at_reference_start() {
        let (from, to) = ("Tests.Inherit.A.", "Tests.Inherit.");
        let cases = [
            ("Tests.Inherit.A.Base", "Tests.Inherit.Base"),
            ("MyTests.Inherit.A.Base", "MyTests.Inherit.A.Base"),
            (
                "Dictionary<Tests.Inherit.A.Key, Tests.Inherit.A.Value>",
                "Dictionary<Tests.Inherit.Key, Tests.Inherit.Value>",
            ),
            ("Tests.Inherit.A.Base[]", "Tests.Inherit.Base[]"),
            ("List<MyTests.Inherit.A.Base>", "List<MyTests.Inherit.A.Base>"),
        ];

        for (input, expected) in cases {
            let mut name = input.to_string();
            rewrite(&mut name, from, to);
            assert_eq!(name, expected, "rewriting {}", input);
        }
    }

    #[test]
    fn test_fold_empty_side_is_error() {
        let old = vec![TypeDef::class("Tests.Methods.A", "Foo")];
        let new = vec![TypeDef::class("Tests.Methods.A", "Foo")];

        let err = fold_test_namespace(&old, &new, "Tests.Methods").unwrap_err();
        assert_eq!(
            err,
            CheckError::NoRelevantTypes {
                namespace: "Tests.Methods".to_string()
            }
        );
    }
}
