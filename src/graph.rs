//! Per-session symbol graph: id allocation, primitives, and memoized caches.
//!
//! A [`SymbolGraph`] owns every piece of mutable state in the crate. All of it
//! is *derived* data with idempotent, write-once-per-key publication: the
//! implementation-mapping cache, the synthesized-bridge set and the seeded
//! primitive types. Symbol nodes themselves are immutable and shared read-only
//! across threads without locking.
//!
//! One graph corresponds to one compilation/analysis session; independent runs
//! get independent graphs and caches, and no process-wide state survives
//! between them.
//!
//! # Thread Safety
//!
//! The graph is designed for high-concurrency resolution:
//! - Concurrent hash maps (`DashMap`) for the memo caches
//! - Lock-free append lists (`boxcar::Vec`) for bridge sets
//! - Atomic operations for id generation
//! - No blocking operations during lookup beyond short shard locks
//!
//! If two threads race to compute the same mapping, both perform the pure
//! computation redundantly and exactly one result is published; every reader
//! observes the published value thereafter.

use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use dashmap::DashMap;

use crate::compare::TypeComparer;
use crate::diagnostics::Diagnostics;
use crate::symbols::{
    ArrayDimension, ArrayType, ByRefType, ErrorType, IdAllocator, LazyCell, MemberList, MemberRc,
    ModifiedType, NamedInit, NamedType, ParamConstraints, ParamKey, ParamOwnerKind, PointerType,
    SpecialKind, SymbolId, TypeKind, TypeParameter, TypeRc, TypeSymbol,
};

/// Cooperative cancellation handle for bulk operations.
///
/// Cloning yields a handle to the same flag. Cancellation is observed at
/// coarse granularity (once per type processed); an operation that observes
/// the flag returns [`crate::Error::Cancelled`] and leaves no partially
/// populated cache entry behind.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a fresh, unsignalled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation to every holder of this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns `true` once [`CancellationToken::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The central per-session symbol graph.
///
/// Hands out [`SymbolId`]s, seeds the well-known primitive types, owns the
/// factories for structural types (arrays, pointers, by-refs, tuples, error
/// placeholders) and carries the memoized derived state of resolution.
pub struct SymbolGraph {
    pub(crate) ids: IdAllocator,
    diagnostics: Arc<Diagnostics>,
    primitives: HashMap<SpecialKind, TypeRc>,
    error: TypeRc,
    /// Memoized `(implementing type, interface member) -> implementation`.
    pub(crate) implementations: DashMap<(SymbolId, SymbolId), Option<MemberRc>>,
    /// Synthesized bridge members, at most one per `(type, interface member)`.
    pub(crate) bridges: DashMap<(SymbolId, SymbolId), MemberRc>,
    /// Per-type view of the synthesized bridge members.
    pub(crate) bridge_lists: DashMap<SymbolId, MemberList>,
    /// Lazily seeded tuple definitions, one per arity.
    tuple_definitions: DashMap<usize, TypeRc>,
}

impl Default for SymbolGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolGraph {
    /// Creates a new graph with the well-known primitive types seeded.
    #[must_use]
    pub fn new() -> Self {
        let ids = IdAllocator::new();

        let error = Arc::new(TypeSymbol::Error(ErrorType {
            id: ids.next(),
            name: "<unresolved>".to_string(),
        }));

        let mut primitives = HashMap::new();
        for (kind, namespace, name, type_kind) in Self::PRIMITIVE_SEED {
            let symbol = NamedType::create(NamedInit {
                id: ids.next(),
                namespace: (*namespace).to_string(),
                name: (*name).to_string(),
                kind: *type_kind,
                is_abstract: false,
                special: Some(*kind),
                tuple_element_names: None,
                type_parameters: Vec::new(),
                original: None,
                type_arguments: Vec::new(),
                substitution: None,
                base: LazyCell::ready(None),
                interfaces: LazyCell::ready(Vec::new()),
            });
            primitives.insert(*kind, symbol);
        }

        Self {
            ids,
            diagnostics: Arc::new(Diagnostics::new()),
            primitives,
            error,
            implementations: DashMap::new(),
            bridges: DashMap::new(),
            bridge_lists: DashMap::new(),
            tuple_definitions: DashMap::new(),
        }
    }

    const PRIMITIVE_SEED: &'static [(SpecialKind, &'static str, &'static str, TypeKind)] = &[
        (SpecialKind::Void, "System", "Void", TypeKind::Struct),
        (SpecialKind::Boolean, "System", "Boolean", TypeKind::Struct),
        (SpecialKind::Char, "System", "Char", TypeKind::Struct),
        (SpecialKind::I1, "System", "SByte", TypeKind::Struct),
        (SpecialKind::U1, "System", "Byte", TypeKind::Struct),
        (SpecialKind::I2, "System", "Int16", TypeKind::Struct),
        (SpecialKind::U2, "System", "UInt16", TypeKind::Struct),
        (SpecialKind::I4, "System", "Int32", TypeKind::Struct),
        (SpecialKind::U4, "System", "UInt32", TypeKind::Struct),
        (SpecialKind::I8, "System", "Int64", TypeKind::Struct),
        (SpecialKind::U8, "System", "UInt64", TypeKind::Struct),
        (SpecialKind::R4, "System", "Single", TypeKind::Struct),
        (SpecialKind::R8, "System", "Double", TypeKind::Struct),
        (SpecialKind::I, "System", "IntPtr", TypeKind::Struct),
        (SpecialKind::U, "System", "UIntPtr", TypeKind::Struct),
        (SpecialKind::String, "System", "String", TypeKind::Class),
        (SpecialKind::Object, "System", "Object", TypeKind::Class),
        (SpecialKind::Dynamic, "", "dynamic", TypeKind::Class),
    ];

    /// Returns the shared diagnostics sink of this graph.
    #[must_use]
    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    /// Returns the seeded symbol for a well-known primitive type.
    ///
    /// # Panics
    /// Panics if `kind` is [`SpecialKind::ValueTuple`]; tuples are per-arity
    /// and created through [`SymbolGraph::tuple_of`].
    #[must_use]
    pub fn primitive(&self, kind: SpecialKind) -> TypeRc {
        self.primitives
            .get(&kind)
            .cloned()
            .expect("primitive kinds are seeded at graph creation")
    }

    /// Returns the shared error/unresolved placeholder of this graph.
    ///
    /// This is the sentinel observed by cyclic base-type lookups.
    #[must_use]
    pub fn error_type(&self) -> TypeRc {
        self.error.clone()
    }

    /// Creates a fresh, distinct error placeholder for a specific malformed
    /// upstream construct. Each placeholder is equal only to itself.
    #[must_use]
    pub fn fresh_error_type(&self, name: impl Into<String>) -> TypeRc {
        Arc::new(TypeSymbol::Error(ErrorType {
            id: self.ids.next(),
            name: name.into(),
        }))
    }

    /// Creates a single-dimension, zero-lower-bound vector type (`T[]`).
    #[must_use]
    pub fn vector_of(&self, element: ModifiedType) -> TypeRc {
        Arc::new(TypeSymbol::Array(ArrayType {
            id: self.ids.next(),
            element,
            rank: 1,
            dimensions: Vec::new(),
            is_vector: true,
        }))
    }

    /// Creates a general array type with explicit rank and per-dimension
    /// bounds. Even at rank 1 this is distinct from [`SymbolGraph::vector_of`].
    #[must_use]
    pub fn array_of(
        &self,
        element: ModifiedType,
        rank: u32,
        dimensions: Vec<ArrayDimension>,
    ) -> TypeRc {
        Arc::new(TypeSymbol::Array(ArrayType {
            id: self.ids.next(),
            element,
            rank,
            dimensions,
            is_vector: false,
        }))
    }

    /// Creates an unmanaged pointer type (`T*`).
    #[must_use]
    pub fn pointer_to(&self, pointee: ModifiedType) -> TypeRc {
        Arc::new(TypeSymbol::Pointer(PointerType {
            id: self.ids.next(),
            pointee,
        }))
    }

    /// Creates a by-reference type (`ref T`).
    #[must_use]
    pub fn by_ref_of(&self, referent: ModifiedType) -> TypeRc {
        Arc::new(TypeSymbol::ByRef(ByRefType {
            id: self.ids.next(),
            referent,
        }))
    }

    /// Creates a tuple type over the given element occurrences, optionally
    /// carrying element names.
    ///
    /// Tuple instantiations of the same arity share one underlying generic
    /// definition per graph, so structural equality behaves like any other
    /// constructed type; element names are carried on the instantiation and
    /// compared only by name-sensitive comparers.
    ///
    /// # Errors
    /// Returns [`crate::Error::ArityMismatch`] if `names` is present with a
    /// different length than `elements`.
    pub fn tuple_of(
        &self,
        elements: Vec<ModifiedType>,
        names: Option<Vec<Option<String>>>,
    ) -> crate::Result<TypeRc> {
        if let Some(names) = &names {
            if names.len() != elements.len() {
                return Err(crate::Error::ArityMismatch {
                    expected: elements.len(),
                    actual: names.len(),
                });
            }
        }
        let definition = self.tuple_definition(elements.len());
        crate::construct::construct_named(self, &definition, elements, names)
    }

    /// Returns the three named comparers as first-class values, for use by
    /// downstream overload-resolution and diagnostics code.
    #[must_use]
    pub fn comparers(&self) -> [TypeComparer; 3] {
        [
            TypeComparer::CONSIDER_EVERYTHING,
            TypeComparer::IGNORE_MODIFIERS_AND_ARRAY_BOUNDS,
            TypeComparer::IGNORE_DYNAMIC_TUPLE_NAMES_NULLABILITY,
        ]
    }

    /// Gets or lazily seeds the `System.ValueTuple` definition for `arity`.
    fn tuple_definition(&self, arity: usize) -> TypeRc {
        if let Some(existing) = self.tuple_definitions.get(&arity) {
            return existing.clone();
        }

        let definition_id = self.ids.next();
        let type_parameters: Vec<TypeRc> = (0..arity)
            .map(|index| {
                Arc::new(TypeSymbol::Parameter(TypeParameter {
                    id: self.ids.next(),
                    name: format!("T{}", index + 1),
                    key: ParamKey {
                        owner_kind: ParamOwnerKind::Type,
                        declaration: definition_id,
                        index: index as u32,
                    },
                    constraints: ParamConstraints::empty(),
                }))
            })
            .collect();
        let type_arguments = type_parameters
            .iter()
            .map(|p| ModifiedType::bare(p.clone()))
            .collect();

        let definition = NamedType::create(NamedInit {
            id: definition_id,
            namespace: "System".to_string(),
            name: format!("ValueTuple`{arity}"),
            kind: TypeKind::Struct,
            is_abstract: false,
            special: Some(SpecialKind::ValueTuple),
            tuple_element_names: None,
            type_parameters,
            original: None,
            type_arguments,
            substitution: None,
            base: LazyCell::ready(None),
            interfaces: LazyCell::ready(Vec::new()),
        });

        // First writer wins; racing seeds agree structurally anyway.
        self.tuple_definitions
            .entry(arity)
            .or_insert(definition)
            .clone()
    }

    /// Returns the set of bridge members synthesized for `ty` so far.
    ///
    /// The set is unordered; consumers wanting reproducible output should sort
    /// by name and signature themselves.
    #[must_use]
    pub fn synthesized_bridge_members(&self, ty: &TypeRc) -> Vec<MemberRc> {
        self.bridge_lists
            .get(&ty.id())
            .map(|list| list.iter().map(|(_, member)| member.clone()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_token_is_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_primitives_are_seeded_once() {
        let graph = SymbolGraph::new();
        let a = graph.primitive(SpecialKind::I4);
        let b = graph.primitive(SpecialKind::I4);
        assert_eq!(a.id(), b.id());

        let named = a.as_named().unwrap();
        assert_eq!(named.name, "Int32");
        assert_eq!(named.namespace, "System");
        assert_eq!(named.special, Some(SpecialKind::I4));
    }

    #[test]
    fn test_independent_graphs_share_nothing() {
        let first = SymbolGraph::new();
        let second = SymbolGraph::new();

        // Ids restart per graph; primitives are distinct symbols.
        let a = first.primitive(SpecialKind::Object);
        let b = second.primitive(SpecialKind::Object);
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_tuple_definitions_shared_per_arity() {
        let graph = SymbolGraph::new();
        let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));
        let string = ModifiedType::bare(graph.primitive(SpecialKind::String));

        let first = graph
            .tuple_of(vec![int32.clone(), string.clone()], None)
            .unwrap();
        let second = graph.tuple_of(vec![int32, string], None).unwrap();

        let x = first.as_named().unwrap();
        let y = second.as_named().unwrap();
        assert_eq!(x.definition_id(), y.definition_id());
        assert!(crate::compare::TypeComparer::CONSIDER_EVERYTHING.equal(&first, &second));
    }

    #[test]
    fn test_tuple_name_arity_checked() {
        let graph = SymbolGraph::new();
        let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));
        let result = graph.tuple_of(vec![int32], Some(vec![None, None]));
        assert!(matches!(
            result,
            Err(crate::Error::ArityMismatch {
                expected: 1,
                actual: 2
            })
        ));
    }
}
