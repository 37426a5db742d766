//! Convenient re-exports of the most commonly used types.
//!
//! This module provides a curated selection of the most frequently used types
//! from across the library, allowing for convenient glob imports.
//!
//! # Example
//!
//! ```rust
//! use dotsym::prelude::*;
//!
//! let graph = SymbolGraph::new();
//! let int32 = graph.primitive(SpecialKind::I4);
//! let array = graph.vector_of(ModifiedType::bare(int32));
//! assert!(TypeComparer::CONSIDER_EVERYTHING.equal(&array, &array));
//! ```

pub use crate::compare::{TypeComparer, TypeComparison};
pub use crate::diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics};
pub use crate::symbols::{
    Accessibility, ArrayDimension, ConstantValue, CustomModifier, EventBuilder, MemberRc,
    MemberRef, MemberSymbol, MethodBuilder, MethodKind, ModifiedType, Nullability,
    ParamConstraints, ParamKey, ParamOwnerKind, ParameterSymbol, PropertyBuilder, RefKind,
    SpecialKind, SymbolId, TypeBuilder, TypeKind, TypeRc, TypeRef, TypeSymbol,
};
pub use crate::{CancellationToken, Error, Result, SymbolGraph, UnificationConflict};
