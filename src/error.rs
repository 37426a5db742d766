use thiserror::Error;

use crate::symbols::SymbolId;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Data-driven conditions (a missing interface implementation, an ambiguous implicit
/// candidate set, unifiable interface instantiations) are deliberately *not* errors:
/// the resolver and unification checker return optional/sentinel results and report
/// through the [`crate::diagnostics::Diagnostics`] sink so analysis of the rest of a
/// program can continue. This enum covers the remaining failure modes: contract
/// violations at the API boundary and cooperative cancellation.
///
/// # Error Categories
///
/// ## Contract Violations
/// - [`Error::ArityMismatch`] - Wrong number of type arguments passed to `construct`
/// - [`Error::NotAGenericDefinition`] - `construct` called on a non-generic or already
///   constructed type
///
/// ## Cancellation
/// - [`Error::Cancelled`] - A bulk operation observed its cancellation token
///
/// ## General
/// - [`Error::TypeError`] - General symbol-graph operation error
#[derive(Error, Debug)]
pub enum Error {
    /// Wrong number of type arguments supplied to a generic construction.
    ///
    /// `construct` requires exactly one argument per type parameter of the
    /// generic definition. This is a programming-contract failure, not a
    /// data-driven condition: callers are expected to have validated arity.
    #[error("Generic construction arity mismatch - expected {expected}, got {actual}")]
    ArityMismatch {
        /// Number of type parameters on the generic definition
        expected: usize,
        /// Number of type arguments actually supplied
        actual: usize,
    },

    /// `construct` was invoked on a symbol that is not an uninstantiated generic
    /// named-type definition.
    ///
    /// Only generic definitions (named types with type parameters and no
    /// original definition of their own) can be constructed. The associated
    /// [`SymbolId`] identifies the offending symbol.
    #[error("Symbol {0} is not a generic definition and cannot be constructed")]
    NotAGenericDefinition(SymbolId),

    /// A bulk operation was abandoned because its cancellation token was signalled.
    ///
    /// Cancellation is checked at coarse granularity (once per type processed),
    /// and no partially populated cache entry is observable afterwards.
    #[error("Operation was cancelled")]
    Cancelled,

    /// General error during symbol-graph usage.
    ///
    /// Covers miscellaneous operations that can fail, such as upgrading a
    /// dangling weak symbol reference where a live symbol was required.
    #[error("{0}")]
    TypeError(String),
}
