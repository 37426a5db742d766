//! Diagnostics collection for symbol-graph analysis.
//!
//! This module provides types for collecting and reporting diagnostic messages
//! during interface-implementation resolution and unification checking. The
//! resolver never aborts on data-driven issues (missing implementations,
//! ambiguous candidates, unifiable interface instantiations); it records a
//! diagnostic and returns a sentinel result so the rest of analysis can proceed.
//!
//! # Architecture
//!
//! The diagnostics system is shared across the analysis pipeline:
//! - **Resolver**: Reports unimplemented and ambiguous interface members
//! - **Unification checker**: Reports unifiable generic interface instantiations
//! - **Construction**: Reports malformed upstream signatures
//!
//! The [`Diagnostics`] container uses `boxcar::Vec` for thread-safe, lock-free
//! append operations, allowing diagnostics to be collected from parallel
//! resolution without synchronization overhead.
//!
//! # Key Components
//!
//! - [`Diagnostics`] - Thread-safe container for diagnostic entries
//! - [`Diagnostic`] - Individual diagnostic entry with severity and context
//! - [`DiagnosticSeverity`] - Severity level (Info, Warning, Error)
//! - [`DiagnosticCategory`] - Category of the diagnostic source
//!
//! # Thread Safety
//!
//! All types in this module are [`Send`] and [`Sync`]. Multiple threads can
//! safely add diagnostics simultaneously without coordination.

use std::fmt;

use crate::symbols::SymbolId;

/// Severity level of a diagnostic entry.
///
/// Determines how the diagnostic should be treated and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Informational message, not indicating a problem.
    Info,

    /// Warning about a suspicious but legal construct.
    ///
    /// Analysis continues and the reported mapping remains usable.
    Warning,

    /// Error indicating an invalid declaration.
    ///
    /// Resolution of the affected member returns a sentinel result, but
    /// analysis of other members continues.
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Info => write!(f, "INFO"),
            DiagnosticSeverity::Warning => write!(f, "WARN"),
            DiagnosticSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// Category indicating the source or type of diagnostic.
///
/// Helps classify diagnostics for filtering and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// Issues found while resolving interface implementations.
    ///
    /// Examples: no candidate implementation, ambiguous implicit candidates.
    Resolution,

    /// Unifiable generic interface instantiations in a type's interface list.
    Unification,

    /// Issues with generic construction or substitution.
    ///
    /// Examples: malformed upstream signatures replaced by error placeholders.
    Construction,

    /// General issues not fitting other categories.
    General,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Resolution => write!(f, "Resolution"),
            DiagnosticCategory::Unification => write!(f, "Unification"),
            DiagnosticCategory::Construction => write!(f, "Construction"),
            DiagnosticCategory::General => write!(f, "General"),
        }
    }
}

/// A single diagnostic entry with context information.
///
/// Contains the severity, category, message, and optional symbol identifiers
/// for a diagnostic reported during analysis.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level of this diagnostic.
    pub severity: DiagnosticSeverity,

    /// Category indicating the source of this diagnostic.
    pub category: DiagnosticCategory,

    /// Human-readable description of the issue.
    pub message: String,

    /// Optional type symbol related to the issue.
    pub type_id: Option<SymbolId>,

    /// Optional member symbol related to the issue.
    pub member_id: Option<SymbolId>,
}

impl Diagnostic {
    /// Creates a new diagnostic entry.
    ///
    /// # Arguments
    ///
    /// * `severity` - Severity level of the diagnostic
    /// * `category` - Category of the diagnostic source
    /// * `message` - Human-readable description
    pub fn new(
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            type_id: None,
            member_id: None,
        }
    }

    /// Adds the related type symbol to the diagnostic.
    #[must_use]
    pub fn with_type(mut self, id: SymbolId) -> Self {
        self.type_id = Some(id);
        self
    }

    /// Adds the related member symbol to the diagnostic.
    #[must_use]
    pub fn with_member(mut self, id: SymbolId) -> Self {
        self.member_id = Some(id);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;
        if let Some(ty) = self.type_id {
            write!(f, " (type {ty})")?;
        }
        if let Some(member) = self.member_id {
            write!(f, " (member {member})")?;
        }
        Ok(())
    }
}

/// Thread-safe container for diagnostic entries.
///
/// Uses `boxcar::Vec` internally for lock-free concurrent appends. A single
/// instance is shared (via `Arc`) between the resolver, the unification
/// checker and the consuming front end.
#[derive(Default)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates a new, empty diagnostics container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Adds a diagnostic entry to the container.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Adds an informational diagnostic with the given category and message.
    pub fn info(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(DiagnosticSeverity::Info, category, message));
    }

    /// Adds a warning diagnostic with the given category and message.
    pub fn warning(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Warning,
            category,
            message,
        ));
    }

    /// Adds an error diagnostic with the given category and message.
    pub fn error(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Error,
            category,
            message,
        ));
    }

    /// Returns an iterator over all collected diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, entry)| entry)
    }

    /// Returns the total number of collected diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.count()
    }

    /// Returns `true` if no diagnostics have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if any collected diagnostic has [`DiagnosticSeverity::Error`].
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Returns the number of collected diagnostics with [`DiagnosticSeverity::Error`].
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .count()
    }
}
