//! Data models for module metadata handed over by a metadata reader.
//!
//! These types describe an already-parsed compiled module: its types,
//! their nesting, inheritance and members. They are the input boundary of
//! the engine and carry no behavior beyond construction helpers. All
//! structs deserialize with defaults for absent fields, so a reader only
//! needs to emit what it knows.

use serde::{Deserialize, Serialize};

/// Declared accessibility as reported by the metadata reader.
///
/// Finer-grained than the comparison lattice; see
/// [`Visibility::from`](crate::surface::Visibility).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accessibility {
    #[default]
    Private,
    PrivateProtected,
    Internal,
    Protected,
    ProtectedInternal,
    Public,
}

/// Kind of a declared type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKindDef {
    #[default]
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
}

/// Kind of a declared member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberKindDef {
    #[default]
    Method,
    Constructor,
    Property,
    Field,
    Event,
}

/// Variance annotation on a generic parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VarianceDef {
    #[default]
    Invariant,
    Covariant,
    Contravariant,
}

/// Passing modifier on a parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterModifierDef {
    #[default]
    None,
    Ref,
    Out,
    In,
    Params,
}

/// A generic type parameter with its constraints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericParameterDef {
    pub name: String,
    pub variance: VarianceDef,
    /// Constraint type names plus the special `class`, `struct` and `new()`.
    pub constraints: Vec<String>,
}

impl GenericParameterDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_variance(mut self, variance: VarianceDef) -> Self {
        self.variance = variance;
        self
    }

    pub fn with_constraint(mut self, constraint: &str) -> Self {
        self.constraints.push(constraint.to_string());
        self
    }
}

/// A method, constructor or indexer parameter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterDef {
    pub name: String,
    pub type_name: String,
    pub modifier: ParameterModifierDef,
    /// Literal default; present means the parameter is optional.
    pub default_value: Option<String>,
}

impl ParameterDef {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_modifier(mut self, modifier: ParameterModifierDef) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }
}

/// A named constant of an enumeration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumValueDef {
    pub name: String,
    pub value: i64,
}

/// A member of a type.
///
/// One flat record for every member kind; fields that do not apply to a
/// kind are ignored by the extractor (e.g. `parameters` on a field).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberDef {
    pub name: String,
    pub kind: MemberKindDef,
    pub accessibility: Accessibility,
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_abstract: bool,
    pub is_override: bool,
    pub is_sealed: bool,
    /// Return type for methods, value type for properties, fields and events.
    pub return_type: Option<String>,
    pub parameters: Vec<ParameterDef>,
    pub generic_arity: u32,
    pub getter: Option<Accessibility>,
    pub setter: Option<Accessibility>,
    pub is_read_only: bool,
    pub constant_value: Option<String>,
    /// Whether implementers must supply the member to satisfy an interface
    /// contract, even though it is not marked abstract.
    pub implements_contract: bool,
}

impl MemberDef {
    fn public(name: &str, kind: MemberKindDef, return_type: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            accessibility: Accessibility::Public,
            return_type: return_type.map(str::to_string),
            ..Default::default()
        }
    }

    /// Public instance method.
    pub fn method(name: &str, return_type: &str) -> Self {
        Self::public(name, MemberKindDef::Method, Some(return_type))
    }

    /// Public instance constructor.
    pub fn constructor() -> Self {
        Self::public(".ctor", MemberKindDef::Constructor, None)
    }

    /// Public read/write property.
    pub fn property(name: &str, type_name: &str) -> Self {
        let mut member = Self::public(name, MemberKindDef::Property, Some(type_name));
        member.getter = Some(Accessibility::Public);
        member.setter = Some(Accessibility::Public);
        member
    }

    /// Public mutable field.
    pub fn field(name: &str, type_name: &str) -> Self {
        Self::public(name, MemberKindDef::Field, Some(type_name))
    }

    /// Public event.
    pub fn event(name: &str, handler_type: &str) -> Self {
        Self::public(name, MemberKindDef::Event, Some(handler_type))
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn with_param(mut self, parameter: ParameterDef) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_generic_arity(mut self, arity: u32) -> Self {
        self.generic_arity = arity;
        self
    }

    pub fn with_getter(mut self, accessibility: Option<Accessibility>) -> Self {
        self.getter = accessibility;
        self
    }

    pub fn with_setter(mut self, accessibility: Option<Accessibility>) -> Self {
        self.setter = accessibility;
        self
    }

    pub fn with_constant(mut self, value: &str) -> Self {
        self.constant_value = Some(value.to_string());
        self.is_static = true;
        self
    }

    pub fn mark_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn mark_virtual(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    /// Abstract members are implicitly virtual.
    pub fn mark_abstract(mut self) -> Self {
        self.is_abstract = true;
        self.is_virtual = true;
        self
    }

    pub fn mark_override(mut self) -> Self {
        self.is_override = true;
        self.is_virtual = true;
        self
    }

    pub fn mark_sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    pub fn mark_read_only(mut self) -> Self {
        self.is_read_only = true;
        self
    }

    pub fn mark_contract(mut self) -> Self {
        self.implements_contract = true;
        self
    }
}

/// A type definition, possibly containing nested types.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeDef {
    /// Namespace; empty for nested types and the global namespace.
    pub namespace: String,
    pub name: String,
    pub kind: TypeKindDef,
    pub accessibility: Accessibility,
    pub is_sealed: bool,
    pub is_abstract: bool,
    pub generic_parameters: Vec<GenericParameterDef>,
    pub base_type: Option<String>,
    pub interfaces: Vec<String>,
    pub enum_underlying_type: Option<String>,
    pub enum_values: Vec<EnumValueDef>,
    pub members: Vec<MemberDef>,
    pub nested_types: Vec<TypeDef>,
}

impl TypeDef {
    fn public(namespace: &str, name: &str, kind: TypeKindDef) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            kind,
            accessibility: Accessibility::Public,
            ..Default::default()
        }
    }

    /// Public class deriving from `System.Object`.
    pub fn class(namespace: &str, name: &str) -> Self {
        Self::public(namespace, name, TypeKindDef::Class).with_base("System.Object")
    }

    /// Public interface.
    pub fn interface(namespace: &str, name: &str) -> Self {
        Self::public(namespace, name, TypeKindDef::Interface)
    }

    /// Public sealed value type.
    pub fn structure(namespace: &str, name: &str) -> Self {
        let mut def = Self::public(namespace, name, TypeKindDef::Struct).with_base("System.ValueType");
        def.is_sealed = true;
        def
    }

    /// Public enumeration backed by `int`.
    pub fn enumeration(namespace: &str, name: &str) -> Self {
        let mut def = Self::public(namespace, name, TypeKindDef::Enum).with_base("System.Enum");
        def.is_sealed = true;
        def.enum_underlying_type = Some("int".to_string());
        def
    }

    /// Public delegate with the given `Invoke` signature.
    pub fn delegate(namespace: &str, name: &str, invoke: MemberDef) -> Self {
        let mut def = Self::public(namespace, name, TypeKindDef::Delegate)
            .with_base("System.MulticastDelegate")
            .with_member(MemberDef {
                name: "Invoke".to_string(),
                is_virtual: true,
                ..invoke
            });
        def.is_sealed = true;
        def
    }

    /// Fully-qualified name of a top-level type.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.base_type = Some(base.to_string());
        self
    }

    pub fn without_base(mut self) -> Self {
        self.base_type = None;
        self
    }

    pub fn with_interface(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    pub fn with_generic(mut self, parameter: GenericParameterDef) -> Self {
        self.generic_parameters.push(parameter);
        self
    }

    pub fn with_member(mut self, member: MemberDef) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_nested(mut self, nested: TypeDef) -> Self {
        self.nested_types.push(TypeDef {
            namespace: String::new(),
            ..nested
        });
        self
    }

    pub fn with_enum_value(mut self, name: &str, value: i64) -> Self {
        self.enum_values.push(EnumValueDef {
            name: name.to_string(),
            value,
        });
        self
    }

    pub fn with_underlying_type(mut self, type_name: &str) -> Self {
        self.enum_underlying_type = Some(type_name.to_string());
        self
    }

    pub fn mark_sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    pub fn mark_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

/// All top-level types of one compiled module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleDef {
    pub name: String,
    pub types: Vec<TypeDef>,
}

impl ModuleDef {
    pub fn new(name: &str, types: Vec<TypeDef>) -> Self {
        Self {
            name: name.to_string(),
            types,
        }
    }
}
