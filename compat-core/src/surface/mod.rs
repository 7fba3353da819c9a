//! Surface model: the compatibility-relevant shape of a module.
//!
//! A [`Snapshot`] is an arena of [`TypeSurface`] nodes addressed by
//! qualified name. Nested types are ordinary arena entries linked to their
//! enclosing type through [`TypeId`] indices, so the ownership tree never
//! forms reference cycles. Members are a tagged variant ([`MemberDetail`])
//! so rules can match exhaustively on kind-specific payloads.

pub mod extract;
pub mod namespace;

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::types::{Accessibility, ParameterModifierDef, TypeKindDef, VarianceDef};

pub use namespace::fold_test_namespace;

/// Ordered visibility lattice: `Private < Internal < Protected < Public`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Internal,
    Protected,
    Public,
}

impl Visibility {
    /// Whether code outside the module can see the entity.
    pub fn is_observable(self) -> bool {
        self >= Visibility::Protected
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Internal => "internal",
            Visibility::Protected => "protected",
            Visibility::Public => "public",
        }
    }
}

impl From<Accessibility> for Visibility {
    fn from(access: Accessibility) -> Self {
        match access {
            Accessibility::Private => Visibility::Private,
            Accessibility::PrivateProtected | Accessibility::Internal => Visibility::Internal,
            Accessibility::Protected | Accessibility::ProtectedInternal => Visibility::Protected,
            Accessibility::Public => Visibility::Public,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
            TypeKind::Delegate => "delegate",
        }
    }
}

impl From<TypeKindDef> for TypeKind {
    fn from(kind: TypeKindDef) -> Self {
        match kind {
            TypeKindDef::Class => TypeKind::Class,
            TypeKindDef::Interface => TypeKind::Interface,
            TypeKindDef::Struct => TypeKind::Struct,
            TypeKindDef::Enum => TypeKind::Enum,
            TypeKindDef::Delegate => TypeKind::Delegate,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
}

impl Variance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variance::Invariant => "invariant",
            Variance::Covariant => "out",
            Variance::Contravariant => "in",
        }
    }
}

impl From<VarianceDef> for Variance {
    fn from(variance: VarianceDef) -> Self {
        match variance {
            VarianceDef::Invariant => Variance::Invariant,
            VarianceDef::Covariant => Variance::Covariant,
            VarianceDef::Contravariant => Variance::Contravariant,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenericParam {
    pub name: String,
    pub variance: Variance,
    pub constraints: BTreeSet<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    pub name: String,
    pub value: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamModifier {
    None,
    Ref,
    Out,
    In,
    Params,
}

impl ParamModifier {
    /// By-reference parameters form a distinct overload from by-value ones.
    pub fn is_by_ref(self) -> bool {
        matches!(self, ParamModifier::Ref | ParamModifier::Out | ParamModifier::In)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamModifier::None => "none",
            ParamModifier::Ref => "ref",
            ParamModifier::Out => "out",
            ParamModifier::In => "in",
            ParamModifier::Params => "params",
        }
    }
}

impl From<ParameterModifierDef> for ParamModifier {
    fn from(modifier: ParameterModifierDef) -> Self {
        match modifier {
            ParameterModifierDef::None => ParamModifier::None,
            ParameterModifierDef::Ref => ParamModifier::Ref,
            ParameterModifierDef::Out => ParamModifier::Out,
            ParameterModifierDef::In => ParamModifier::In,
            ParameterModifierDef::Params => ParamModifier::Params,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    pub modifier: ParamModifier,
    pub default_value: Option<String>,
}

impl Parameter {
    pub fn is_optional(&self) -> bool {
        self.default_value.is_some()
    }

    /// Type as it participates in overload identity.
    pub fn signature_type(&self) -> String {
        if self.modifier.is_by_ref() {
            format!("{}&", self.type_name)
        } else {
            self.type_name.clone()
        }
    }
}

/// Overriding flags shared by methods, properties and events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Dispatch {
    pub is_virtual: bool,
    pub is_abstract: bool,
    pub is_override: bool,
    pub is_sealed: bool,
}

impl Dispatch {
    /// Whether a derived type may override the member.
    pub fn is_overridable(&self) -> bool {
        self.is_virtual && !self.is_sealed
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Constructor,
    Method,
    Property,
    Field,
    Event,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Constructor => "constructor",
            MemberKind::Method => "method",
            MemberKind::Property => "property",
            MemberKind::Field => "field",
            MemberKind::Event => "event",
        }
    }
}

/// Kind-specific payload of a member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemberDetail {
    Constructor {
        parameters: Vec<Parameter>,
    },
    Method {
        return_type: String,
        parameters: Vec<Parameter>,
        generic_arity: u32,
        dispatch: Dispatch,
    },
    Property {
        property_type: String,
        /// Index parameters; empty for plain properties.
        parameters: Vec<Parameter>,
        getter: Option<Visibility>,
        setter: Option<Visibility>,
        dispatch: Dispatch,
    },
    Field {
        field_type: String,
        is_read_only: bool,
        constant_value: Option<String>,
    },
    Event {
        handler_type: String,
        dispatch: Dispatch,
    },
}

impl MemberDetail {
    pub fn kind(&self) -> MemberKind {
        match self {
            MemberDetail::Constructor { .. } => MemberKind::Constructor,
            MemberDetail::Method { .. } => MemberKind::Method,
            MemberDetail::Property { .. } => MemberKind::Property,
            MemberDetail::Field { .. } => MemberKind::Field,
            MemberDetail::Event { .. } => MemberKind::Event,
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        match self {
            MemberDetail::Constructor { parameters }
            | MemberDetail::Method { parameters, .. }
            | MemberDetail::Property { parameters, .. } => parameters,
            MemberDetail::Field { .. } | MemberDetail::Event { .. } => &[],
        }
    }

    /// Return, property, field or handler type; constructors have none.
    pub fn value_type(&self) -> Option<&str> {
        match self {
            MemberDetail::Constructor { .. } => None,
            MemberDetail::Method { return_type, .. } => Some(return_type),
            MemberDetail::Property { property_type, .. } => Some(property_type),
            MemberDetail::Field { field_type, .. } => Some(field_type),
            MemberDetail::Event { handler_type, .. } => Some(handler_type),
        }
    }

    pub fn dispatch(&self) -> Option<&Dispatch> {
        match self {
            MemberDetail::Method { dispatch, .. }
            | MemberDetail::Property { dispatch, .. }
            | MemberDetail::Event { dispatch, .. } => Some(dispatch),
            MemberDetail::Constructor { .. } | MemberDetail::Field { .. } => None,
        }
    }
}

/// Identity of a member within its declaring type.
///
/// Ordering is by kind, then name, generic arity and signature, which is
/// the order members are reported in.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MemberKey {
    pub kind: MemberKind,
    pub name: String,
    pub generic_arity: u32,
    pub signature: Vec<String>,
}

impl MemberKey {
    /// Whether the display form carries a parameter list.
    fn has_parameter_list(&self) -> bool {
        match self.kind {
            MemberKind::Constructor | MemberKind::Method => true,
            MemberKind::Property => !self.signature.is_empty(),
            MemberKind::Field | MemberKind::Event => false,
        }
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.generic_arity > 0 {
            write!(f, "`{}", self.generic_arity)?;
        }
        if self.has_parameter_list() {
            let (open, close) = if self.kind == MemberKind::Property {
                ('[', ']')
            } else {
                ('(', ')')
            };
            write!(f, "{}{}{}", open, self.signature.join(", "), close)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberSurface {
    pub key: MemberKey,
    pub visibility: Visibility,
    pub is_static: bool,
    pub implements_contract: bool,
    pub detail: MemberDetail,
}

impl MemberSurface {
    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn kind(&self) -> MemberKind {
        self.key.kind
    }

    pub fn is_observable(&self) -> bool {
        self.visibility.is_observable()
    }

    pub fn is_abstract(&self) -> bool {
        self.detail.dispatch().is_some_and(|d| d.is_abstract)
    }

    /// Whether every implementer of the declaring type must provide this
    /// member.
    pub fn is_obligation(&self) -> bool {
        self.is_abstract() || self.implements_contract
    }
}

/// Index of a type in its snapshot's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TypeId(pub usize);

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeSurface {
    /// Qualified name; nested types use `Outer+Inner` and generic types
    /// carry their arity, as in ``Box`1``.
    pub name: String,
    /// Qualified name without this type's own arity suffix. Shared by
    /// every arity of one generic family.
    pub family_name: String,
    pub simple_name: String,
    pub kind: TypeKind,
    /// Visibility as declared.
    pub visibility: Visibility,
    /// Declared visibility capped by every enclosing type.
    pub effective_visibility: Visibility,
    pub is_sealed: bool,
    pub is_abstract: bool,
    pub generics: Vec<GenericParam>,
    pub base_type: Option<String>,
    pub interfaces: BTreeSet<String>,
    pub enum_underlying_type: Option<String>,
    pub enum_values: Vec<EnumValue>,
    pub members: BTreeMap<MemberKey, MemberSurface>,
    pub parent: Option<TypeId>,
    pub children: Vec<TypeId>,
}

impl TypeSurface {
    pub fn is_observable(&self) -> bool {
        self.effective_visibility.is_observable()
    }

    pub fn is_nested(&self) -> bool {
        self.parent.is_some()
    }

    pub fn member(&self, key: &MemberKey) -> Option<&MemberSurface> {
        self.members.get(key)
    }

    pub fn observable_members(&self) -> impl Iterator<Item = &MemberSurface> {
        self.members.values().filter(|m| m.is_observable())
    }

    /// Whether code outside the module could already implement or derive
    /// from this type.
    pub fn is_implementable(&self) -> bool {
        if !self.is_observable() {
            return false;
        }
        match self.kind {
            TypeKind::Interface => true,
            TypeKind::Class => {
                let mut constructors = self
                    .members
                    .values()
                    .filter(|m| m.kind() == MemberKind::Constructor && !m.is_static)
                    .peekable();
                !self.is_sealed
                    && (constructors.peek().is_none() || constructors.any(|c| c.is_observable()))
            }
            TypeKind::Struct | TypeKind::Enum | TypeKind::Delegate => false,
        }
    }
}

/// Every type of one module version, flattened into an arena.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Snapshot {
    types: Vec<TypeSurface>,
    #[serde(skip)]
    by_name: BTreeMap<String, TypeId>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeSurface> {
        self.types.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<&TypeSurface> {
        self.by_name.get(name).and_then(|id| self.get(*id))
    }

    /// Types in ascending qualified-name order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeSurface> {
        self.entries().map(|(_, ty)| ty)
    }

    /// `(qualified name, type)` pairs in ascending name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &TypeSurface)> {
        self.by_name
            .iter()
            .map(|(name, id)| (name.as_str(), &self.types[id.0]))
    }

    pub fn children<'a>(&'a self, ty: &'a TypeSurface) -> impl Iterator<Item = &'a TypeSurface> + 'a {
        ty.children.iter().filter_map(|id| self.get(*id))
    }

    pub fn parent(&self, ty: &TypeSurface) -> Option<&TypeSurface> {
        ty.parent.and_then(|id| self.get(id))
    }

    pub fn observable_count(&self) -> usize {
        self.types.iter().filter(|t| t.is_observable()).count()
    }
}
