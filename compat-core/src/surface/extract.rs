//! Surface extraction: module metadata to [`Snapshot`].

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::{
    Dispatch, EnumValue, GenericParam, MemberDetail, MemberKey, MemberSurface, Parameter,
    Snapshot, TypeId, TypeSurface, Visibility,
};
use crate::error::ExtractError;
use crate::types::{GenericParameterDef, MemberDef, MemberKindDef, ParameterDef, TypeDef};

impl Snapshot {
    /// Build a snapshot from the top-level types of a module.
    ///
    /// Nested types are flattened into the arena depth-first, each under
    /// its full nesting path. Non-observable types are kept so visibility
    /// changes can be detected.
    pub fn extract(types: &[TypeDef]) -> Result<Snapshot, ExtractError> {
        let mut builder = SnapshotBuilder::default();
        for def in types {
            builder.add(def, None)?;
        }

        let snapshot = builder.finish();
        debug!(
            "Extracted {} types ({} observable)",
            snapshot.len(),
            snapshot.observable_count()
        );
        Ok(snapshot)
    }
}

#[derive(Default)]
struct SnapshotBuilder {
    types: Vec<TypeSurface>,
    by_name: BTreeMap<String, TypeId>,
}

impl SnapshotBuilder {
    fn add(&mut self, def: &TypeDef, parent: Option<TypeId>) -> Result<TypeId, ExtractError> {
        let (family_name, ceiling) = match parent {
            Some(id) => {
                let enclosing = &self.types[id.0];
                (
                    format!("{}+{}", enclosing.name, def.name),
                    enclosing.effective_visibility,
                )
            }
            None => (def.full_name(), Visibility::Public),
        };
        let name = match def.generic_parameters.len() {
            0 => family_name.clone(),
            arity => format!("{}`{}", family_name, arity),
        };

        if self.by_name.contains_key(&name) {
            return Err(ExtractError::DuplicateType { name });
        }

        let visibility = Visibility::from(def.accessibility);
        let generics = def
            .generic_parameters
            .iter()
            .map(|g| extract_generic(&name, g))
            .collect::<Result<Vec<_>, _>>()?;
        let enum_values = extract_enum_values(&name, def)?;
        let members = extract_members(&name, &def.members)?;

        let id = TypeId(self.types.len());
        self.types.push(TypeSurface {
            name: name.clone(),
            family_name,
            simple_name: def.name.clone(),
            kind: def.kind.into(),
            visibility,
            effective_visibility: visibility.min(ceiling),
            is_sealed: def.is_sealed,
            is_abstract: def.is_abstract,
            generics,
            base_type: def.base_type.clone(),
            interfaces: def.interfaces.iter().cloned().collect(),
            enum_underlying_type: def.enum_underlying_type.clone(),
            enum_values,
            members,
            parent,
            children: Vec::new(),
        });
        self.by_name.insert(name, id);

        if let Some(parent) = parent {
            self.types[parent.0].children.push(id);
        }
        for nested in &def.nested_types {
            self.add(nested, Some(id))?;
        }

        Ok(id)
    }

    fn finish(self) -> Snapshot {
        Snapshot {
            types: self.types,
            by_name: self.by_name,
        }
    }
}

fn extract_generic(type_name: &str, def: &GenericParameterDef) -> Result<GenericParam, ExtractError> {
    let mut constraints = BTreeSet::new();
    for constraint in &def.constraints {
        let constraint = constraint.trim();
        if constraint.is_empty() {
            return Err(ExtractError::MalformedConstraint {
                type_name: type_name.to_string(),
                parameter: def.name.clone(),
            });
        }
        constraints.insert(constraint.to_string());
    }

    Ok(GenericParam {
        name: def.name.clone(),
        variance: def.variance.into(),
        constraints,
    })
}

fn extract_enum_values(type_name: &str, def: &TypeDef) -> Result<Vec<EnumValue>, ExtractError> {
    let mut seen = BTreeSet::new();
    let mut values = Vec::with_capacity(def.enum_values.len());
    for value in &def.enum_values {
        if !seen.insert(value.name.as_str()) {
            return Err(ExtractError::DuplicateEnumValue {
                type_name: type_name.to_string(),
                value: value.name.clone(),
            });
        }
        values.push(EnumValue {
            name: value.name.clone(),
            value: value.value,
        });
    }
    Ok(values)
}

fn extract_members(
    type_name: &str,
    defs: &[MemberDef],
) -> Result<BTreeMap<MemberKey, MemberSurface>, ExtractError> {
    let mut members = BTreeMap::new();
    for def in defs {
        let member = extract_member(def);
        if members.contains_key(&member.key) {
            return Err(ExtractError::DuplicateMember {
                type_name: type_name.to_string(),
                member: member.key.to_string(),
            });
        }
        members.insert(member.key.clone(), member);
    }
    Ok(members)
}

fn extract_parameters(defs: &[ParameterDef]) -> Vec<Parameter> {
    defs.iter()
        .map(|p| Parameter {
            name: p.name.clone(),
            type_name: p.type_name.clone(),
            modifier: p.modifier.into(),
            default_value: p.default_value.clone(),
        })
        .collect()
}

fn extract_member(def: &MemberDef) -> MemberSurface {
    let value_type = def
        .return_type
        .clone()
        .unwrap_or_else(|| "void".to_string());
    let dispatch = Dispatch {
        is_virtual: def.is_virtual || def.is_abstract || def.is_override,
        is_abstract: def.is_abstract,
        is_override: def.is_override,
        is_sealed: def.is_sealed,
    };

    let detail = match def.kind {
        MemberKindDef::Constructor => MemberDetail::Constructor {
            parameters: extract_parameters(&def.parameters),
        },
        MemberKindDef::Method => MemberDetail::Method {
            return_type: value_type,
            parameters: extract_parameters(&def.parameters),
            generic_arity: def.generic_arity,
            dispatch,
        },
        MemberKindDef::Property => MemberDetail::Property {
            property_type: value_type,
            parameters: extract_parameters(&def.parameters),
            getter: def.getter.map(Visibility::from),
            setter: def.setter.map(Visibility::from),
            dispatch,
        },
        MemberKindDef::Field => MemberDetail::Field {
            field_type: value_type,
            is_read_only: def.is_read_only,
            constant_value: def.constant_value.clone(),
        },
        MemberKindDef::Event => MemberDetail::Event {
            handler_type: value_type,
            dispatch,
        },
    };

    let generic_arity = match detail {
        MemberDetail::Method { generic_arity, .. } => generic_arity,
        _ => 0,
    };
    let key = MemberKey {
        kind: detail.kind(),
        name: def.name.clone(),
        generic_arity,
        signature: detail
            .parameters()
            .iter()
            .map(Parameter::signature_type)
            .collect(),
    };

    MemberSurface {
        key,
        visibility: def.accessibility.into(),
        is_static: def.is_static,
        implements_contract: def.implements_contract,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{MemberKind, TypeKind};
    use crate::types::{Accessibility, ParameterModifierDef};

    #[test]
    fn test_extract_flattens_nested_types() {
        let outer = TypeDef::class("Acme", "Outer").with_nested(
            TypeDef::class("", "Middle").with_nested(TypeDef::interface("", "IInner")),
        );

        let snapshot = Snapshot::extract(&[outer]).unwrap();

        assert_eq!(snapshot.len(), 3);
        let inner = snapshot.find("Acme.Outer+Middle+IInner").unwrap();
        assert_eq!(inner.kind, TypeKind::Interface);
        assert_eq!(inner.simple_name, "IInner");

        let middle = snapshot.parent(inner).unwrap();
        assert_eq!(middle.name, "Acme.Outer+Middle");
        assert_eq!(snapshot.children(middle).count(), 1);
        assert!(snapshot.parent(middle).is_some_and(|outer| !outer.is_nested()));
    }

    #[test]
    fn test_effective_visibility_capped_by_parent() {
        let outer = TypeDef::class("Acme", "Outer")
            .with_accessibility(Accessibility::Internal)
            .with_nested(TypeDef::class("", "Inner"));

        let snapshot = Snapshot::extract(&[outer]).unwrap();
        let inner = snapshot.find("Acme.Outer+Inner").unwrap();

        assert_eq!(inner.visibility, Visibility::Public);
        assert_eq!(inner.effective_visibility, Visibility::Internal);
        assert!(!inner.is_observable());
        assert_eq!(snapshot.observable_count(), 0);
    }

    #[test]
    fn test_non_public_types_retained() {
        let hidden = TypeDef::class("Acme", "Hidden").with_accessibility(Accessibility::Private);
        let snapshot = Snapshot::extract(&[hidden]).unwrap();
        assert!(snapshot.find("Acme.Hidden").is_some());
    }

    #[test]
    fn test_generic_arity_is_part_of_identity() {
        let types = vec![
            TypeDef::class("Acme", "Box"),
            TypeDef::class("Acme", "Box").with_generic(GenericParameterDef::new("T")),
            TypeDef::class("Acme", "Box")
                .with_generic(GenericParameterDef::new("T"))
                .with_generic(GenericParameterDef::new("U"))
                .with_nested(TypeDef::class("", "Slot")),
        ];

        let snapshot = Snapshot::extract(&types).unwrap();
        let names: Vec<&str> = snapshot.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Acme.Box", "Acme.Box`1", "Acme.Box`2", "Acme.Box`2+Slot"]);

        let pair = snapshot.find("Acme.Box`2").unwrap();
        assert_eq!(pair.family_name, "Acme.Box");
        assert_eq!(snapshot.find("Acme.Box`2+Slot").unwrap().family_name, "Acme.Box`2+Slot");
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let types = vec![TypeDef::class("Acme", "Widget"), TypeDef::structure("Acme", "Widget")];
        let err = Snapshot::extract(&types).unwrap_err();
        assert_eq!(
            err,
            ExtractError::DuplicateType {
                name: "Acme.Widget".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let ty = TypeDef::class("Acme", "Widget")
            .with_member(MemberDef::method("Spin", "void").with_param(ParameterDef::new("a", "int")))
            .with_member(MemberDef::method("Spin", "long").with_param(ParameterDef::new("b", "int")));

        let err = Snapshot::extract(&[ty]).unwrap_err();
        assert!(matches!(err, ExtractError::DuplicateMember { ref member, .. } if member == "Spin(int)"));
    }

    #[test]
    fn test_overloads_distinguished_by_signature() {
        let ty = TypeDef::class("Acme", "Widget")
            .with_member(MemberDef::method("Spin", "void"))
            .with_member(MemberDef::method("Spin", "void").with_param(ParameterDef::new("a", "int")))
            .with_member(
                MemberDef::method("Spin", "void").with_param(
                    ParameterDef::new("a", "int").with_modifier(ParameterModifierDef::Ref),
                ),
            );

        let snapshot = Snapshot::extract(&[ty]).unwrap();
        let widget = snapshot.find("Acme.Widget").unwrap();
        let keys: Vec<String> = widget.members.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["Spin()", "Spin(int)", "Spin(int&)"]);
    }

    #[test]
    fn test_duplicate_enum_value_rejected() {
        let ty = TypeDef::enumeration("Acme", "Color")
            .with_enum_value("Red", 0)
            .with_enum_value("Red", 1);
        assert!(matches!(
            Snapshot::extract(&[ty]),
            Err(ExtractError::DuplicateEnumValue { .. })
        ));
    }

    #[test]
    fn test_blank_constraint_rejected() {
        let ty = TypeDef::class("Acme", "Box")
            .with_generic(GenericParameterDef::new("T").with_constraint("  "));
        assert!(matches!(
            Snapshot::extract(&[ty]),
            Err(ExtractError::MalformedConstraint { ref parameter, .. }) if parameter == "T"
        ));
    }

    #[test]
    fn test_member_detail_by_kind() {
        let ty = TypeDef::class("Acme", "Widget")
            .with_member(MemberDef::property("Size", "int").with_setter(None))
            .with_member(MemberDef::field("Count", "long").mark_read_only())
            .with_member(MemberDef::event("Changed", "System.EventHandler").mark_virtual());

        let snapshot = Snapshot::extract(&[ty]).unwrap();
        let widget = snapshot.find("Acme.Widget").unwrap();

        let kinds: Vec<MemberKind> = widget.members.keys().map(|k| k.kind).collect();
        assert_eq!(
            kinds,
            vec![MemberKind::Property, MemberKind::Field, MemberKind::Event]
        );

        for member in widget.members.values() {
            match &member.detail {
                MemberDetail::Property { getter, setter, .. } => {
                    assert_eq!(*getter, Some(Visibility::Public));
                    assert_eq!(*setter, None);
                }
                MemberDetail::Field { is_read_only, .. } => assert!(*is_read_only),
                MemberDetail::Event { dispatch, .. } => assert!(dispatch.is_virtual),
                other => panic!("unexpected member {:?}", other),
            }
        }
    }
}
