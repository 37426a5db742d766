//! Member symbols: methods, properties, events and fields.
//!
//! Methods are the authoritative unit of interface-implementation mapping;
//! properties and events are thin wrappers over their accessor methods, and
//! their mapping is derivative (it can be undefined even when every accessor
//! has one, if the accessors map into different containing declarations).
//!
//! A member whose [`MethodKind`] is `ExplicitInterfaceImplementation` was
//! declared with explicit-qualification syntax. Such members are never
//! candidates for *implicit* satisfaction of any interface other than the ones
//! listed in their explicit-implementation set.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use crate::symbols::{ModifiedType, SymbolId, TypeRef, TypeRc};

/// Reference to a [`MemberSymbol`], shared across the graph.
pub type MemberRc = Arc<MemberSymbol>;

/// A smart reference to a [`MemberSymbol`] holding a weak reference, used for
/// back-edges (override targets, explicit-implementation entries) that would
/// otherwise create reference cycles.
#[derive(Clone, Debug)]
pub struct MemberRef {
    weak_ref: Weak<MemberSymbol>,
}

impl MemberRef {
    /// Creates a new `MemberRef` from a strong reference.
    pub fn new(strong_ref: &MemberRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Gets a strong reference to the member, returning `None` if it has been
    /// dropped.
    #[must_use]
    pub fn upgrade(&self) -> Option<MemberRc> {
        self.weak_ref.upgrade()
    }

    /// Gets the id of the referenced member (if still alive).
    #[must_use]
    pub fn id(&self) -> Option<SymbolId> {
        self.upgrade().map(|m| m.id())
    }
}

impl From<MemberRc> for MemberRef {
    fn from(strong_ref: MemberRc) -> Self {
        Self::new(&strong_ref)
    }
}

/// Declared accessibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessibility {
    /// `private`
    Private,
    /// `private protected`
    ProtectedAndInternal,
    /// `internal`
    Internal,
    /// `protected`
    Protected,
    /// `protected internal`
    ProtectedOrInternal,
    /// `public`
    Public,
}

/// Semantic kind of a method symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// An ordinary named method.
    Ordinary,
    /// A member declared with explicit interface qualification.
    ExplicitInterfaceImplementation,
    /// A property getter.
    PropertyGet,
    /// A property setter.
    PropertySet,
    /// An event adder.
    EventAdd,
    /// An event remover.
    EventRemove,
    /// An instance or static constructor.
    Constructor,
}

/// By-reference passing mode of a parameter.
///
/// Ref kinds must match *exactly* for implementation matching; `ref` never
/// substitutes for `out` or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefKind {
    /// By value.
    #[default]
    None,
    /// `ref`
    Ref,
    /// `out`
    Out,
    /// `in`
    In,
}

/// A compile-time constant default value for an optional parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// Boolean constant.
    Boolean(bool),
    /// 32-bit integer constant.
    Int32(i32),
    /// 64-bit integer constant.
    Int64(i64),
    /// Double constant.
    Double(f64),
    /// String constant.
    Str(String),
    /// The null literal.
    Null,
}

/// A formal parameter of a method or indexer.
#[derive(Clone)]
pub struct ParameterSymbol {
    /// Source name of the parameter.
    pub name: String,
    /// Declared type occurrence, with modifiers.
    pub ty: ModifiedType,
    /// By-reference passing mode.
    pub ref_kind: RefKind,
    /// `true` for a `params` array parameter.
    pub is_params: bool,
    /// `true` for an optional parameter.
    pub is_optional: bool,
    /// Default value for optional parameters.
    pub default_value: Option<ConstantValue>,
}

impl ParameterSymbol {
    /// Creates a by-value parameter with no default.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: ModifiedType) -> Self {
        Self {
            name: name.into(),
            ty,
            ref_kind: RefKind::None,
            is_params: false,
            is_optional: false,
            default_value: None,
        }
    }

    /// Returns a copy of this parameter with the given ref kind.
    #[must_use]
    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }
}

/// A method symbol.
pub struct MethodSymbol {
    /// Graph-unique id of this symbol.
    pub id: SymbolId,
    /// Member name. Explicit implementations carry their qualified name.
    pub name: String,
    /// Semantic kind.
    pub kind: MethodKind,
    /// The method's own generic type parameters.
    pub type_parameters: Vec<TypeRc>,
    /// Formal parameters.
    pub parameters: Vec<ParameterSymbol>,
    /// Return type occurrence, with modifiers.
    pub return_type: ModifiedType,
    /// `true` for static members.
    pub is_static: bool,
    /// `true` if declared `virtual` (or an interface slot owner).
    pub is_virtual: bool,
    /// `true` if declared `override`.
    pub is_override: bool,
    /// Declared accessibility.
    pub accessibility: Accessibility,
    /// The containing type (weak back-edge).
    pub containing_type: TypeRef,
    /// The directly overridden method, installed once by the binder.
    pub(crate) overridden: OnceLock<MemberRef>,
    /// Interface members this method explicitly implements.
    pub explicit_implementations: Arc<boxcar::Vec<MemberRef>>,
    /// Forwarding target for synthesized bridge members; `None` for declared
    /// methods.
    pub forwards_to: Option<MemberRef>,
}

impl MethodSymbol {
    /// Returns the directly overridden method, if this method is an override
    /// and the target is still alive.
    #[must_use]
    pub fn overridden_method(&self) -> Option<MemberRc> {
        self.overridden.get().and_then(MemberRef::upgrade)
    }

    /// Returns this method's generic arity.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.type_parameters.len()
    }

    /// Returns `true` if this member was declared with explicit interface
    /// qualification (or synthesized as a bridge).
    #[must_use]
    pub fn is_explicit_implementation(&self) -> bool {
        self.kind == MethodKind::ExplicitInterfaceImplementation
    }

    /// Returns `true` if any entry of the explicit-implementation set refers
    /// to the member with the given id.
    #[must_use]
    pub fn explicitly_implements(&self, member: SymbolId) -> bool {
        self.explicit_implementations
            .iter()
            .any(|(_, entry)| entry.id() == Some(member))
    }
}

/// A property (or indexer) symbol wrapping its accessor methods.
pub struct PropertySymbol {
    /// Graph-unique id of this symbol.
    pub id: SymbolId,
    /// Member name.
    pub name: String,
    /// Declared property type occurrence.
    pub ty: ModifiedType,
    /// Indexer parameters; empty for ordinary properties.
    pub parameters: Vec<ParameterSymbol>,
    /// Getter accessor, if declared.
    pub get_method: Option<MemberRc>,
    /// Setter accessor, if declared.
    pub set_method: Option<MemberRc>,
    /// `true` for static members.
    pub is_static: bool,
    /// Declared accessibility.
    pub accessibility: Accessibility,
    /// The containing type (weak back-edge).
    pub containing_type: TypeRef,
}

impl PropertySymbol {
    /// Returns the accessor methods that exist, getter first.
    pub fn accessors(&self) -> impl Iterator<Item = &MemberRc> {
        self.get_method.iter().chain(self.set_method.iter())
    }
}

/// An event symbol wrapping its accessor methods.
pub struct EventSymbol {
    /// Graph-unique id of this symbol.
    pub id: SymbolId,
    /// Member name.
    pub name: String,
    /// Declared event (delegate) type occurrence.
    pub ty: ModifiedType,
    /// Adder accessor.
    pub add_method: Option<MemberRc>,
    /// Remover accessor.
    pub remove_method: Option<MemberRc>,
    /// `true` for static members.
    pub is_static: bool,
    /// Declared accessibility.
    pub accessibility: Accessibility,
    /// The containing type (weak back-edge).
    pub containing_type: TypeRef,
}

impl EventSymbol {
    /// Returns the accessor methods that exist, adder first.
    pub fn accessors(&self) -> impl Iterator<Item = &MemberRc> {
        self.add_method.iter().chain(self.remove_method.iter())
    }
}

/// A field symbol.
///
/// Fields never participate in interface-implementation mapping; the resolver
/// answers "no mapping" for them by pre-check.
pub struct FieldSymbol {
    /// Graph-unique id of this symbol.
    pub id: SymbolId,
    /// Member name.
    pub name: String,
    /// Declared field type occurrence.
    pub ty: ModifiedType,
    /// `true` for static fields.
    pub is_static: bool,
    /// Declared accessibility.
    pub accessibility: Accessibility,
    /// The containing type (weak back-edge).
    pub containing_type: TypeRef,
}

/// A member symbol: the closed union over every member shape in the graph.
pub enum MemberSymbol {
    /// A method.
    Method(MethodSymbol),
    /// A property or indexer.
    Property(PropertySymbol),
    /// An event.
    Event(EventSymbol),
    /// A field.
    Field(FieldSymbol),
}

impl MemberSymbol {
    /// Returns the graph-unique id of this symbol.
    #[must_use]
    pub fn id(&self) -> SymbolId {
        match self {
            MemberSymbol::Method(m) => m.id,
            MemberSymbol::Property(m) => m.id,
            MemberSymbol::Event(m) => m.id,
            MemberSymbol::Field(m) => m.id,
        }
    }

    /// Returns the member name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            MemberSymbol::Method(m) => &m.name,
            MemberSymbol::Property(m) => &m.name,
            MemberSymbol::Event(m) => &m.name,
            MemberSymbol::Field(m) => &m.name,
        }
    }

    /// Returns the containing type back-edge.
    #[must_use]
    pub fn containing_type(&self) -> &TypeRef {
        match self {
            MemberSymbol::Method(m) => &m.containing_type,
            MemberSymbol::Property(m) => &m.containing_type,
            MemberSymbol::Event(m) => &m.containing_type,
            MemberSymbol::Field(m) => &m.containing_type,
        }
    }

    /// Returns `true` for static members.
    #[must_use]
    pub fn is_static(&self) -> bool {
        match self {
            MemberSymbol::Method(m) => m.is_static,
            MemberSymbol::Property(m) => m.is_static,
            MemberSymbol::Event(m) => m.is_static,
            MemberSymbol::Field(m) => m.is_static,
        }
    }

    /// Returns the declared accessibility.
    #[must_use]
    pub fn accessibility(&self) -> Accessibility {
        match self {
            MemberSymbol::Method(m) => m.accessibility,
            MemberSymbol::Property(m) => m.accessibility,
            MemberSymbol::Event(m) => m.accessibility,
            MemberSymbol::Field(m) => m.accessibility,
        }
    }

    /// Returns the method payload, if this is a method.
    #[must_use]
    pub fn as_method(&self) -> Option<&MethodSymbol> {
        match self {
            MemberSymbol::Method(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the property payload, if this is a property.
    #[must_use]
    pub fn as_property(&self) -> Option<&PropertySymbol> {
        match self {
            MemberSymbol::Property(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the event payload, if this is an event.
    #[must_use]
    pub fn as_event(&self) -> Option<&EventSymbol> {
        match self {
            MemberSymbol::Event(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for MemberSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let container = self
            .containing_type()
            .upgrade()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "<dropped>".to_string());
        write!(f, "{container}::{}", self.name())
    }
}

impl fmt::Debug for MemberSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.id())
    }
}
