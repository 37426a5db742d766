//! Type symbols: the closed union of all type shapes in the graph.
//!
//! The kind set is fixed by the runtime's type grammar, so the union is a
//! closed enum with exhaustive matching at every consumer; a missing case is a
//! correctness bug, not an extensibility point.
//!
//! # Identity
//!
//! - A [`NamedType`]'s identity is its original definition plus its type
//!   arguments (with modifiers). Definitions own their type parameters
//!   exclusively: two independently declared generic types never share
//!   type-parameter identity even when textually identical.
//! - A [`TypeParameter`]'s identity is its [`ParamKey`]: the declaring
//!   definition's id, the parameter position, and whether the owner is a type
//!   or a method. Substitution may clone a parameter symbol (fresh [`SymbolId`])
//!   without changing its key, which is what makes independently obtained
//!   instantiations structurally equal without being reference-identical.
//! - An [`ErrorType`] placeholder is equal only to itself. It participates in
//!   equality and hashing but never matches a real implementation.
//!
//! Structural equality itself lives in [`crate::compare`]; symbols here carry
//! only the data the comparers consume.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use bitflags::bitflags;

use crate::construct::Substitution;
use crate::symbols::{LazyCell, MemberList, ModifiedType, SymbolId};

/// Reference to a [`TypeSymbol`], shared across the graph.
pub type TypeRc = Arc<TypeSymbol>;

/// A smart reference to a [`TypeSymbol`] that automatically handles weak
/// references to prevent circular reference memory leaks while providing a
/// clean API.
#[derive(Clone, Debug)]
pub struct TypeRef {
    weak_ref: Weak<TypeSymbol>,
}

impl TypeRef {
    /// Creates a new `TypeRef` from a strong reference.
    pub fn new(strong_ref: &TypeRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Creates a `TypeRef` from an existing weak reference.
    pub fn from_weak(weak_ref: Weak<TypeSymbol>) -> Self {
        Self { weak_ref }
    }

    /// Gets a strong reference to the type, returning `None` if the type has
    /// been dropped.
    #[must_use]
    pub fn upgrade(&self) -> Option<TypeRc> {
        self.weak_ref.upgrade()
    }

    /// Checks if the referenced type is still alive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }

    /// Gets the id of the referenced type (if still alive).
    #[must_use]
    pub fn id(&self) -> Option<SymbolId> {
        self.upgrade().map(|t| t.id())
    }
}

impl From<TypeRc> for TypeRef {
    fn from(strong_ref: TypeRc) -> Self {
        Self::new(&strong_ref)
    }
}

/// Declaration kind of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A class declaration.
    Class,
    /// A value-type (struct) declaration.
    Struct,
    /// An interface declaration.
    Interface,
    /// An enum declaration.
    Enum,
    /// A delegate declaration.
    Delegate,
}

/// Well-known types the comparers treat specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKind {
    /// `System.Void`
    Void,
    /// `System.Boolean`
    Boolean,
    /// `System.Char`
    Char,
    /// `System.SByte`
    I1,
    /// `System.Byte`
    U1,
    /// `System.Int16`
    I2,
    /// `System.UInt16`
    U2,
    /// `System.Int32`
    I4,
    /// `System.UInt32`
    U4,
    /// `System.Int64`
    I8,
    /// `System.UInt64`
    U8,
    /// `System.Single`
    R4,
    /// `System.Double`
    R8,
    /// `System.IntPtr`
    I,
    /// `System.UIntPtr`
    U,
    /// `System.String`
    String,
    /// `System.Object`
    Object,
    /// `dynamic` - `System.Object` at the binary level, distinguished only by
    /// comparers that keep the dynamic/object distinction significant.
    Dynamic,
    /// `System.ValueTuple` and friends; the carrier of tuple element names.
    ValueTuple,
}

impl SpecialKind {
    /// Returns `true` for the two kinds that collapse under comparers which
    /// erase the dynamic/object distinction.
    #[must_use]
    pub fn is_object_or_dynamic(&self) -> bool {
        matches!(self, SpecialKind::Object | SpecialKind::Dynamic)
    }
}

bitflags! {
    /// Declared constraints of a generic type parameter.
    ///
    /// Constraints affect implicit-implementation matching for constructed
    /// generics with modifiers, but never participate in type identity.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParamConstraints: u8 {
        /// `where T : struct`
        const VALUE_TYPE = 0b0000_0001;
        /// `where T : class`
        const REFERENCE_TYPE = 0b0000_0010;
        /// `where T : new()`
        const CONSTRUCTOR = 0b0000_0100;
    }
}

/// Whether a type parameter is owned by a type or by a method declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamOwnerKind {
    /// Owned by a generic type declaration (`Var` in signature terms).
    Type,
    /// Owned by a generic method declaration (`MVar` in signature terms).
    Method,
}

/// Structural identity of a type parameter.
///
/// Substituted copies of a parameter carry the key of the parameter they were
/// cloned from, so equality survives construction while reference identity
/// does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamKey {
    /// Is the owner a type or a method declaration?
    pub owner_kind: ParamOwnerKind,
    /// Id of the owning *definition* symbol.
    pub declaration: SymbolId,
    /// Zero-based position within the owner's parameter list.
    pub index: u32,
}

/// A generic type parameter, owned by exactly one generic declaration.
pub struct TypeParameter {
    /// Graph-unique id of this symbol.
    pub id: SymbolId,
    /// Source name of the parameter.
    pub name: String,
    /// Structural identity (owner declaration, position, owner kind).
    pub key: ParamKey,
    /// Declared constraint set.
    pub constraints: ParamConstraints,
}

/// A single dimension of a general (non-vector) array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ArrayDimension {
    /// The size of this dimension, if specified.
    pub size: Option<u32>,
    /// The lower bound of this dimension, if specified.
    pub lower_bound: Option<i32>,
}

/// An array type.
///
/// A single-dimension, zero-lower-bound vector (`T[]`) is distinguished from a
/// general rank-1 array with explicit bounds (`T[0..]`) even when the rank and
/// bounds coincide; the two are not substitutable for override or
/// implementation purposes.
pub struct ArrayType {
    /// Graph-unique id of this symbol.
    pub id: SymbolId,
    /// The element type occurrence.
    pub element: ModifiedType,
    /// Number of dimensions.
    pub rank: u32,
    /// Per-dimension sizes and lower bounds (can be shorter than `rank`).
    pub dimensions: Vec<ArrayDimension>,
    /// `true` for the single-dimension zero-lower-bound vector shape.
    pub is_vector: bool,
}

/// An unmanaged pointer type (`T*`).
pub struct PointerType {
    /// Graph-unique id of this symbol.
    pub id: SymbolId,
    /// The pointed-to type occurrence.
    pub pointee: ModifiedType,
}

/// A by-reference type (`ref T`), only valid in signature positions.
pub struct ByRefType {
    /// Graph-unique id of this symbol.
    pub id: SymbolId,
    /// The referenced type occurrence.
    pub referent: ModifiedType,
}

/// Placeholder for a malformed or unresolvable upstream type.
///
/// Participates in equality and hashing (equal only to itself) but never
/// matches any real implementation. Also handed out as the sentinel when a
/// cyclic base-type or interface-list lookup re-enters itself.
pub struct ErrorType {
    /// Graph-unique id of this symbol.
    pub id: SymbolId,
    /// Best-effort name of the unresolved type, for display.
    pub name: String,
}

/// A named type: class, struct, interface, enum or delegate, either an
/// uninstantiated generic definition or a constructed instantiation.
pub struct NamedType {
    /// Graph-unique id of this symbol.
    pub id: SymbolId,
    /// Namespace (can be empty).
    pub namespace: String,
    /// Simple name.
    pub name: String,
    /// Declaration kind.
    pub kind: TypeKind,
    /// `true` for abstract classes; concrete types must provide every
    /// interface member they declare.
    pub is_abstract: bool,
    /// Well-known kind, if this is a special type.
    pub special: Option<SpecialKind>,
    /// Element names for tuple types; `None` for non-tuples and nameless tuples.
    pub tuple_element_names: Option<Vec<Option<String>>>,
    /// Type parameters exclusively owned by this declaration.
    pub type_parameters: Vec<TypeRc>,
    /// The uninstantiated definition, or `None` if this symbol *is* the
    /// definition.
    pub(crate) original: Option<TypeRc>,
    /// Type arguments. For a definition these are its own parameters, bare;
    /// for a construction the supplied arguments with their modifiers.
    pub type_arguments: Vec<ModifiedType>,
    /// Substitution context for a constructed type; `None` for definitions.
    pub(crate) substitution: Option<Substitution>,
    /// Lazily resolved base type. The cycle sentinel is the graph's error type.
    pub(crate) base: LazyCell<Option<TypeRc>>,
    /// Lazily resolved directly-declared interface list.
    pub(crate) interfaces: LazyCell<Vec<TypeRc>>,
    /// Members appended by the binder (definitions only).
    pub(crate) declared_members: MemberList,
    /// Members substituted on demand (constructions only).
    pub(crate) substituted_members: OnceLock<MemberList>,
    /// Weak self reference, installed at creation.
    pub(crate) self_ref: OnceLock<TypeRef>,
}

impl NamedType {
    /// Returns the uninstantiated generic definition, or this type itself when
    /// it is not a construction.
    ///
    /// # Panics
    /// Never panics in practice: the self reference is installed before the
    /// symbol escapes its builder.
    #[must_use]
    pub fn original_definition(&self) -> TypeRc {
        match &self.original {
            Some(definition) => definition.clone(),
            None => self
                .self_ref
                .get()
                .and_then(TypeRef::upgrade)
                .expect("self reference installed at creation"),
        }
    }

    /// Returns the id of the uninstantiated definition.
    #[must_use]
    pub fn definition_id(&self) -> SymbolId {
        match &self.original {
            Some(definition) => definition.id(),
            None => self.id,
        }
    }

    /// Returns `true` if this symbol is an uninstantiated definition.
    #[must_use]
    pub fn is_definition(&self) -> bool {
        self.original.is_none()
    }

    /// Returns `true` if this declaration has type parameters.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    /// Returns `true` for interface declarations.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Resolves and returns the base type.
    ///
    /// Returns `Some` error placeholder if the lookup is cyclic, `None` for
    /// root types.
    #[must_use]
    pub fn base_type(&self) -> Option<TypeRc> {
        self.base.get()
    }

    /// Resolves and returns the directly-declared interface list.
    ///
    /// A cyclic lookup observes an empty list rather than recursing.
    #[must_use]
    pub fn interfaces(&self) -> Vec<TypeRc> {
        self.interfaces.get()
    }

    /// Returns this type's members.
    ///
    /// For a definition these are the members the binder appended; for a
    /// construction they are computed on first access by substituting the
    /// definition's member signatures, then cached for the lifetime of the
    /// symbol.
    #[must_use]
    pub fn members(&self) -> MemberList {
        match &self.substitution {
            None => self.declared_members.clone(),
            Some(substitution) => self
                .substituted_members
                .get_or_init(|| crate::construct::substitute_members(self, substitution))
                .clone(),
        }
    }

    /// Returns the type parameter at `index`, if any.
    #[must_use]
    pub fn type_parameter(&self, index: usize) -> Option<TypeRc> {
        self.type_parameters.get(index).cloned()
    }

    /// Returns the namespace-qualified name of this type.
    #[must_use]
    pub fn fully_qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Returns a weak reference to this symbol.
    pub(crate) fn self_ref(&self) -> TypeRef {
        self.self_ref
            .get()
            .cloned()
            .expect("self reference installed at creation")
    }
}

/// Field bundle for [`NamedType::create`]; the creation sites (graph
/// factories, builders, substitution) each fill a different subset.
pub(crate) struct NamedInit {
    pub id: SymbolId,
    pub namespace: String,
    pub name: String,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub special: Option<SpecialKind>,
    pub tuple_element_names: Option<Vec<Option<String>>>,
    pub type_parameters: Vec<TypeRc>,
    pub original: Option<TypeRc>,
    pub type_arguments: Vec<ModifiedType>,
    pub substitution: Option<Substitution>,
    pub base: LazyCell<Option<TypeRc>>,
    pub interfaces: LazyCell<Vec<TypeRc>>,
}

impl NamedType {
    /// Creates a named-type symbol and installs its weak self reference.
    pub(crate) fn create(init: NamedInit) -> TypeRc {
        Arc::new_cyclic(|weak| {
            let named = NamedType {
                id: init.id,
                namespace: init.namespace,
                name: init.name,
                kind: init.kind,
                is_abstract: init.is_abstract,
                special: init.special,
                tuple_element_names: init.tuple_element_names,
                type_parameters: init.type_parameters,
                original: init.original,
                type_arguments: init.type_arguments,
                substitution: init.substitution,
                base: init.base,
                interfaces: init.interfaces,
                declared_members: Arc::new(boxcar::Vec::new()),
                substituted_members: OnceLock::new(),
                self_ref: OnceLock::new(),
            };
            let _ = named
                .self_ref
                .set(TypeRef::from_weak(weak.clone()));
            TypeSymbol::Named(named)
        })
    }
}

/// A type symbol: the closed union over every type shape in the graph.
pub enum TypeSymbol {
    /// A named type (class/struct/interface/enum/delegate).
    Named(NamedType),
    /// An array type.
    Array(ArrayType),
    /// A generic type parameter.
    Parameter(TypeParameter),
    /// An unmanaged pointer type.
    Pointer(PointerType),
    /// A by-reference type.
    ByRef(ByRefType),
    /// A malformed/unresolved placeholder.
    Error(ErrorType),
}

impl TypeSymbol {
    /// Returns the graph-unique id of this symbol.
    #[must_use]
    pub fn id(&self) -> SymbolId {
        match self {
            TypeSymbol::Named(t) => t.id,
            TypeSymbol::Array(t) => t.id,
            TypeSymbol::Parameter(t) => t.id,
            TypeSymbol::Pointer(t) => t.id,
            TypeSymbol::ByRef(t) => t.id,
            TypeSymbol::Error(t) => t.id,
        }
    }

    /// Returns the named-type payload, if this is a named type.
    #[must_use]
    pub fn as_named(&self) -> Option<&NamedType> {
        match self {
            TypeSymbol::Named(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the array payload, if this is an array type.
    #[must_use]
    pub fn as_array(&self) -> Option<&ArrayType> {
        match self {
            TypeSymbol::Array(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the type-parameter payload, if this is a type parameter.
    #[must_use]
    pub fn as_parameter(&self) -> Option<&TypeParameter> {
        match self {
            TypeSymbol::Parameter(t) => Some(t),
            _ => None,
        }
    }

    /// Returns `true` if this is the error placeholder.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, TypeSymbol::Error(_))
    }

    /// Returns `true` if this is an interface declaration or instantiation.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.as_named().is_some_and(NamedType::is_interface)
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSymbol::Named(t) => {
                write!(f, "{}", t.fully_qualified_name())?;
                if !t.type_arguments.is_empty() && !t.is_definition() {
                    write!(f, "<")?;
                    for (i, arg) in t.type_arguments.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeSymbol::Array(t) => {
                write!(f, "{}", t.element)?;
                if t.is_vector {
                    write!(f, "[]")
                } else {
                    write!(f, "[{}]", ",".repeat((t.rank as usize).saturating_sub(1)))
                }
            }
            TypeSymbol::Parameter(t) => write!(f, "{}", t.name),
            TypeSymbol::Pointer(t) => write!(f, "{}*", t.pointee),
            TypeSymbol::ByRef(t) => write!(f, "ref {}", t.referent),
            TypeSymbol::Error(t) => write!(f, "!{}", t.name),
        }
    }
}

impl fmt::Debug for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.id())
    }
}
