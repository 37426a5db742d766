//! Equivalence engine: configurable equality relations over types and signatures.
//!
//! Binary dispatch, source-level overload identity and display identity each
//! care about a different subset of a type occurrence's facets. This module
//! exposes a family of comparers, each a total predicate over two types (or
//! signatures), parameterized by which of {custom modifiers, array
//! sizes/lower bounds, dynamic-vs-object, tuple element names, nullability}
//! are significant.
//!
//! # Key Components
//!
//! - [`TypeComparison`] - The flag set selecting significant facets
//! - [`TypeComparer`] - A comparer over the flag set, with consistent hashing
//! - [`TypeComparer::CONSIDER_EVERYTHING`] - Exact display/binary identity
//! - [`TypeComparer::IGNORE_MODIFIERS_AND_ARRAY_BOUNDS`] - The relation binary
//!   dispatch actually distinguishes; used throughout the resolver and the
//!   unification checker
//! - [`TypeComparer::IGNORE_DYNAMIC_TUPLE_NAMES_NULLABILITY`] - Erases the
//!   source-only facets (`dynamic`, tuple names, nullability)
//!
//! # Contract
//!
//! Every comparer is reflexive, symmetric and transitive over acyclic type
//! graphs, and every hash function is consistent with its comparer:
//! equal-by-this-relation implies equal hash.

use std::hash::{Hash, Hasher};

use bitflags::bitflags;

use crate::symbols::{
    MethodSymbol, ModifiedType, ParamOwnerKind, TypeParameter, TypeSymbol,
};

bitflags! {
    /// Facets of a type occurrence a comparer treats as significant.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeComparison: u8 {
        /// Custom modifier lists are significant.
        const CUSTOM_MODIFIERS = 0b0000_0001;
        /// Array sizes and lower bounds (beyond rank and vector-ness) are
        /// significant.
        const ARRAY_BOUNDS = 0b0000_0010;
        /// `dynamic` and `System.Object` are distinct.
        const DYNAMIC_VS_OBJECT = 0b0000_0100;
        /// Tuple element names are significant.
        const TUPLE_NAMES = 0b0000_1000;
        /// Nullability annotations are significant.
        const NULLABILITY = 0b0001_0000;
    }
}

/// A total equality relation over type symbols, parameterized by a
/// [`TypeComparison`] flag set, together with a consistent hash function.
///
/// Comparers are cheap `Copy` values; the three named relations the rest of
/// the system uses are exposed as associated constants and as first-class
/// values through [`crate::SymbolGraph::comparers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeComparer {
    flags: TypeComparison,
}

impl TypeComparer {
    /// Exact identity: every facet is significant. Used for display identity
    /// and binary signature identity.
    pub const CONSIDER_EVERYTHING: TypeComparer = TypeComparer {
        flags: TypeComparison::all(),
    };

    /// Custom modifiers and array size/bound metadata are erased; arrays
    /// collapse to rank and vector-ness. This is the relation binary dispatch
    /// distinguishes, used throughout implementation resolution and
    /// unification.
    pub const IGNORE_MODIFIERS_AND_ARRAY_BOUNDS: TypeComparer = TypeComparer {
        flags: TypeComparison::DYNAMIC_VS_OBJECT
            .union(TypeComparison::TUPLE_NAMES)
            .union(TypeComparison::NULLABILITY),
    };

    /// `dynamic` equals `object`, tuple element names and nullability
    /// annotations are erased; modifiers and array bounds stay significant.
    pub const IGNORE_DYNAMIC_TUPLE_NAMES_NULLABILITY: TypeComparer = TypeComparer {
        flags: TypeComparison::CUSTOM_MODIFIERS.union(TypeComparison::ARRAY_BOUNDS),
    };

    /// Creates a comparer over an arbitrary flag set.
    #[must_use]
    pub const fn new(flags: TypeComparison) -> Self {
        Self { flags }
    }

    /// Returns the flag set of this comparer.
    #[must_use]
    pub const fn flags(&self) -> TypeComparison {
        self.flags
    }

    /// Tests two bare type symbols for equality under this comparer.
    #[must_use]
    pub fn equal(&self, a: &TypeSymbol, b: &TypeSymbol) -> bool {
        match (a, b) {
            (TypeSymbol::Named(x), TypeSymbol::Named(y)) => {
                if x.definition_id() != y.definition_id() {
                    // Cross-definition equality exists only for the
                    // dynamic/object collapse.
                    return !self.flags.contains(TypeComparison::DYNAMIC_VS_OBJECT)
                        && x.special.is_some_and(|s| s.is_object_or_dynamic())
                        && y.special.is_some_and(|s| s.is_object_or_dynamic());
                }
                if x.type_arguments.len() != y.type_arguments.len() {
                    return false;
                }
                if self.flags.contains(TypeComparison::TUPLE_NAMES)
                    && x.tuple_element_names != y.tuple_element_names
                {
                    return false;
                }
                x.type_arguments
                    .iter()
                    .zip(y.type_arguments.iter())
                    .all(|(xa, ya)| self.equal_modified(xa, ya))
            }
            (TypeSymbol::Parameter(x), TypeSymbol::Parameter(y)) => Self::params_equal(x, y),
            (TypeSymbol::Array(x), TypeSymbol::Array(y)) => {
                x.is_vector == y.is_vector
                    && x.rank == y.rank
                    && self.equal_modified(&x.element, &y.element)
                    && (!self.flags.contains(TypeComparison::ARRAY_BOUNDS)
                        || x.dimensions == y.dimensions)
            }
            (TypeSymbol::Pointer(x), TypeSymbol::Pointer(y)) => {
                self.equal_modified(&x.pointee, &y.pointee)
            }
            (TypeSymbol::ByRef(x), TypeSymbol::ByRef(y)) => {
                self.equal_modified(&x.referent, &y.referent)
            }
            (TypeSymbol::Error(x), TypeSymbol::Error(y)) => x.id == y.id,
            _ => false,
        }
    }

    /// Tests two type occurrences (type plus modifiers plus nullability) for
    /// equality under this comparer.
    #[must_use]
    pub fn equal_modified(&self, a: &ModifiedType, b: &ModifiedType) -> bool {
        if self.flags.contains(TypeComparison::NULLABILITY) && a.nullability != b.nullability {
            return false;
        }
        if self.flags.contains(TypeComparison::CUSTOM_MODIFIERS) {
            if a.modifiers.len() != b.modifiers.len() {
                return false;
            }
            let modifiers_match = a.modifiers.iter().zip(b.modifiers.iter()).all(|(am, bm)| {
                am.required == bm.required && self.equal(&am.modifier_type, &bm.modifier_type)
            });
            if !modifiers_match {
                return false;
            }
        }
        self.equal(&a.ty, &b.ty)
    }

    /// Computes a hash of a bare type symbol consistent with [`Self::equal`].
    #[must_use]
    pub fn hash_type(&self, ty: &TypeSymbol) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.hash_type_into(ty, &mut hasher);
        hasher.finish()
    }

    /// Computes a hash of a type occurrence consistent with
    /// [`Self::equal_modified`].
    #[must_use]
    pub fn hash_modified(&self, occurrence: &ModifiedType) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.hash_modified_into(occurrence, &mut hasher);
        hasher.finish()
    }

    /// Tests two method signatures for equality under this comparer.
    ///
    /// A signature is the generic arity, the parameter list (ref kinds exact,
    /// types under this comparer) and the return type. Names, staticness and
    /// accessibility are the caller's concern.
    #[must_use]
    pub fn same_signature(&self, a: &MethodSymbol, b: &MethodSymbol) -> bool {
        if a.arity() != b.arity() || a.parameters.len() != b.parameters.len() {
            return false;
        }
        let parameters_match = a
            .parameters
            .iter()
            .zip(b.parameters.iter())
            .all(|(ap, bp)| ap.ref_kind == bp.ref_kind && self.equal_modified(&ap.ty, &bp.ty));
        parameters_match && self.equal_modified(&a.return_type, &b.return_type)
    }

    /// Type parameters compare by structural key. Method-owned parameters of
    /// different methods additionally match positionally, so signatures of
    /// generic methods can be related across declarations.
    fn params_equal(x: &TypeParameter, y: &TypeParameter) -> bool {
        x.key == y.key
            || (x.key.owner_kind == ParamOwnerKind::Method
                && y.key.owner_kind == ParamOwnerKind::Method
                && x.key.index == y.key.index)
    }

    fn hash_type_into(&self, ty: &TypeSymbol, hasher: &mut impl Hasher) {
        match ty {
            TypeSymbol::Named(t) => {
                hasher.write_u8(1);
                if !self.flags.contains(TypeComparison::DYNAMIC_VS_OBJECT)
                    && t.special.is_some_and(|s| s.is_object_or_dynamic())
                {
                    // Object and dynamic must collapse to the same bucket.
                    hasher.write_u8(0xD0);
                    return;
                }
                t.definition_id().hash(hasher);
                if self.flags.contains(TypeComparison::TUPLE_NAMES) {
                    t.tuple_element_names.hash(hasher);
                }
                for arg in &t.type_arguments {
                    self.hash_modified_into(arg, hasher);
                }
            }
            TypeSymbol::Parameter(t) => {
                hasher.write_u8(2);
                match t.key.owner_kind {
                    // Method params hash positionally, matching `params_equal`.
                    ParamOwnerKind::Method => {
                        hasher.write_u8(1);
                        hasher.write_u32(t.key.index);
                    }
                    ParamOwnerKind::Type => {
                        hasher.write_u8(0);
                        t.key.hash(hasher);
                    }
                }
            }
            TypeSymbol::Array(t) => {
                hasher.write_u8(3);
                hasher.write_u8(u8::from(t.is_vector));
                hasher.write_u32(t.rank);
                self.hash_modified_into(&t.element, hasher);
                if self.flags.contains(TypeComparison::ARRAY_BOUNDS) {
                    t.dimensions.hash(hasher);
                }
            }
            TypeSymbol::Pointer(t) => {
                hasher.write_u8(4);
                self.hash_modified_into(&t.pointee, hasher);
            }
            TypeSymbol::ByRef(t) => {
                hasher.write_u8(5);
                self.hash_modified_into(&t.referent, hasher);
            }
            TypeSymbol::Error(t) => {
                hasher.write_u8(6);
                t.id.hash(hasher);
            }
        }
    }

    fn hash_modified_into(&self, occurrence: &ModifiedType, hasher: &mut impl Hasher) {
        if self.flags.contains(TypeComparison::NULLABILITY) {
            occurrence.nullability.hash(hasher);
        }
        if self.flags.contains(TypeComparison::CUSTOM_MODIFIERS) {
            hasher.write_usize(occurrence.modifiers.len());
            for modifier in &occurrence.modifiers {
                hasher.write_u8(u8::from(modifier.required));
                self.hash_type_into(&modifier.modifier_type, hasher);
            }
        }
        self.hash_type_into(&occurrence.ty, hasher);
    }
}
