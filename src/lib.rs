// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]

//! # dotsym
//!
//! An immutable, thread-safe symbol graph and interface-implementation
//! resolver for CLR-style type systems.
//!
//! `dotsym` models the type and member symbols a language front end works
//! with: named types (generic definitions and their instantiations), arrays,
//! pointers, by-refs, type parameters and error placeholders, plus methods,
//! properties, events and fields. On top of the symbol model it implements
//! the analyses that make the model useful:
//!
//! - **Generic construction** - substitute type arguments through member
//!   signatures, base types and interface lists, with correct custom-modifier
//!   concatenation and lazily substituted members
//! - **Configurable equivalence** - a family of comparers over {custom
//!   modifiers, array bounds, `dynamic` vs `object`, tuple names,
//!   nullability}, each with a consistent hash
//! - **Interface-implementation resolution** - reconcile source-level rules
//!   (explicit wins, implicit by public name and signature) with binary-level
//!   dispatch (modifier-insensitive, override-remapped), memoized per graph
//! - **Bridge synthesis** - forwarding members where source and binary
//!   dispatch disagree, built in parallel with cooperative cancellation
//! - **Unification checking** - detect interface lists whose generic
//!   instantiations collide under some substitution
//!
//! ## Quick Start
//!
//! ```rust
//! use dotsym::prelude::*;
//!
//! let graph = SymbolGraph::new();
//!
//! let iface = TypeBuilder::new(&graph, "Demo", "IRun")
//!     .kind(TypeKind::Interface)
//!     .build();
//! let slot = MethodBuilder::new(&graph, &iface, "Run").virtual_method().build();
//!
//! let runner = TypeBuilder::new(&graph, "Demo", "Runner")
//!     .implements(iface.clone())
//!     .build();
//! let body = MethodBuilder::new(&graph, &runner, "Run").virtual_method().build();
//!
//! let found = graph.find_implementation_for_interface_member(&runner, &slot);
//! assert_eq!(found.map(|m| m.id()), Some(body.id()));
//! ```
//!
//! ## Architecture
//!
//! The crate is organized into a few key modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`symbols`] - The immutable symbol model and its builders
//! - [`compare`] - The configurable equivalence comparers
//! - [`diagnostics`] - The shared, lock-free diagnostics sink
//! - [`Error`] and [`Result`] - Contract-violation and cancellation errors
//!
//! Symbols are created once (by the builders or by generic construction) and
//! never mutated afterwards; everything derived - substituted members, base
//! and interface edges, implementation mappings, bridges - is computed
//! lazily and published write-once, so a [`SymbolGraph`] can be shared
//! freely across threads.
//!
//! ## Error Handling
//!
//! Data-driven conditions (an unimplemented interface slot, an ambiguous
//! implicit candidate set, a unifiable interface list) never abort analysis:
//! they produce a diagnostic through [`SymbolGraph::diagnostics`] and a
//! sentinel result, so the rest of a program can still be analyzed.
//! [`Error`] covers only contract violations at the API boundary and
//! cooperative cancellation:
//!
//! ```rust
//! use dotsym::prelude::*;
//!
//! let graph = SymbolGraph::new();
//! let int32 = graph.primitive(SpecialKind::I4);
//! match graph.construct(&int32, vec![]) {
//!     Err(Error::NotAGenericDefinition(id)) => assert_eq!(id, int32.id()),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

pub mod compare;
pub mod diagnostics;
pub mod prelude;
pub mod symbols;

mod construct;
mod error;
mod graph;
mod resolve;

pub use error::Error;
pub use graph::{CancellationToken, SymbolGraph};
pub use resolve::UnificationConflict;
pub use symbols::{
    EventBuilder, MethodBuilder, ModifiedType, PropertyBuilder, SpecialKind, TypeBuilder, TypeKind,
};

/// The crate-wide result type; all fallible operations return it.
pub type Result<T> = std::result::Result<T, Error>;
