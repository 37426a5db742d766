//! Symbol model for CLR-style type systems.
//!
//! This module provides the immutable symbol graph at the heart of the crate:
//! type symbols (named types, arrays, type parameters, pointers, by-refs and
//! error placeholders), member symbols (methods, properties, events, fields),
//! the custom-modifier model, and the builders a binder collaborator uses to
//! assemble a graph.
//!
//! # Key Components
//!
//! - [`TypeSymbol`] / [`NamedType`] - The closed type-symbol union and its main variant
//! - [`MemberSymbol`] / [`MethodSymbol`] - The closed member-symbol union
//! - [`ModifiedType`] / [`CustomModifier`] - Type occurrences with binary-significant qualifiers
//! - [`TypeBuilder`] / [`MethodBuilder`] - Construction API for the binder collaborator
//! - [`LazyCell`] - Cycle-breaking write-once cell for base-type/interface thunks
//!
//! # Sharing Discipline
//!
//! All symbols are created once and are immutable thereafter. Strong references
//! ([`TypeRc`], [`MemberRc`]) flow downward through the graph; back-references
//! (a member's containing type, an override target) are weak ([`TypeRef`],
//! [`MemberRef`]) to prevent circular reference memory leaks, mirroring the
//! ownership shape of a loaded assembly's type tree.

mod builder;
mod lazy;
mod members;
mod modifiers;
mod types;

use std::fmt;
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

pub use builder::{EventBuilder, MethodBuilder, PropertyBuilder, TypeBuilder};
pub use lazy::LazyCell;
pub use members::{
    Accessibility, ConstantValue, EventSymbol, FieldSymbol, MemberRc, MemberRef, MemberSymbol,
    MethodKind, MethodSymbol, ParameterSymbol, PropertySymbol, RefKind,
};
pub use modifiers::{CustomModifier, ModifiedType, Nullability};
pub use types::{
    ArrayDimension, ArrayType, ByRefType, ErrorType, NamedType, ParamConstraints, ParamKey,
    ParamOwnerKind, PointerType, SpecialKind, TypeKind, TypeParameter, TypeRc, TypeRef, TypeSymbol,
};

pub(crate) use types::NamedInit;

/// A graph-unique symbol identifier.
///
/// Every type and member symbol is assigned an id from its owning graph's
/// [`IdAllocator`] at creation time. Ids are the keys for all memoized derived
/// data (implementation map, bridge set, tuple definitions); they carry no
/// structural meaning and are never reused within a graph.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    /// Creates a symbol id from a raw 32-bit value.
    #[must_use]
    pub fn new(value: u32) -> Self {
        SymbolId(value)
    }

    /// Returns the raw id value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId(0x{:08X})", self.0)
    }
}

/// Shared, lock-free allocator of [`SymbolId`]s for one symbol graph.
///
/// Cloning the allocator yields a handle to the same counter, so substitution
/// contexts captured inside lazy thunks can mint fresh ids for the symbols
/// they create without holding a reference to the whole graph.
#[derive(Clone, Default)]
pub struct IdAllocator(Arc<AtomicU32>);

impl IdAllocator {
    /// Creates a new allocator starting at id 1 (0 is reserved as a null id).
    #[must_use]
    pub fn new() -> Self {
        IdAllocator(Arc::new(AtomicU32::new(1)))
    }

    /// Allocates the next unique id.
    pub fn next(&self) -> SymbolId {
        SymbolId(self.0.fetch_add(1, Ordering::Relaxed))
    }
}

/// A vector that holds a list of member symbols, shared across threads.
pub type MemberList = Arc<boxcar::Vec<MemberRc>>;
