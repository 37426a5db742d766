//! Custom-modifier model for type occurrences.
//!
//! A custom modifier is a binary-significant qualifier attached to one
//! occurrence of a type in a signature (`modreq`/`modopt` in metadata terms).
//! Modifiers never affect source-level overload identity, but they distinguish
//! otherwise identical signatures for binary dispatch and for unification of
//! generic interface instantiations.
//!
//! Modifier lists are ordered **innermost-first**: index 0 is the modifier
//! closest to the type. Generic substitution concatenates the modifiers of the
//! type-parameter occurrence *after* the modifiers already carried by the
//! supplied argument, so the argument's own modifiers stay closest to the type.

use crate::symbols::types::TypeRc;

/// Nullability annotation carried by a type occurrence.
///
/// Only significant to comparers that include nullability in the relation;
/// erased everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Nullability {
    /// No annotation (oblivious context).
    #[default]
    None,
    /// Explicitly not annotated (`T` in an annotated context).
    NotAnnotated,
    /// Annotated (`T?`).
    Annotated,
}

/// A single custom modifier attached to a type occurrence.
#[derive(Clone)]
pub struct CustomModifier {
    /// Is this modifier required or optional?
    ///
    /// All required modifiers at a position must be satisfied for binary
    /// compatibility; optional modifiers never block compatibility.
    pub required: bool,
    /// The modifier type to apply.
    pub modifier_type: TypeRc,
}

impl CustomModifier {
    /// Creates a required modifier (`modreq`).
    #[must_use]
    pub fn required(modifier_type: TypeRc) -> Self {
        Self {
            required: true,
            modifier_type,
        }
    }

    /// Creates an optional modifier (`modopt`).
    #[must_use]
    pub fn optional(modifier_type: TypeRc) -> Self {
        Self {
            required: false,
            modifier_type,
        }
    }
}

impl std::fmt::Debug for CustomModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.required { "modreq" } else { "modopt" };
        write!(f, "{kind}({})", self.modifier_type)
    }
}

/// A type occurrence: a type together with its ordered custom-modifier list
/// and nullability annotation.
///
/// This is the unit type arguments, parameter types, return types and array
/// element types are expressed in. Two occurrences with different modifier
/// lists are never equal under the everything-sensitive comparer but may be
/// equal under modifier-insensitive comparison.
#[derive(Clone, Debug)]
pub struct ModifiedType {
    /// The underlying type.
    pub ty: TypeRc,
    /// Ordered custom modifiers, innermost (closest to the type) first.
    pub modifiers: Vec<CustomModifier>,
    /// Nullability annotation of this occurrence.
    pub nullability: Nullability,
}

impl ModifiedType {
    /// Creates an occurrence with no modifiers and no nullability annotation.
    #[must_use]
    pub fn bare(ty: TypeRc) -> Self {
        Self {
            ty,
            modifiers: Vec::new(),
            nullability: Nullability::None,
        }
    }

    /// Creates an occurrence carrying the given modifier list, innermost first.
    #[must_use]
    pub fn with_modifiers(ty: TypeRc, modifiers: Vec<CustomModifier>) -> Self {
        Self {
            ty,
            modifiers,
            nullability: Nullability::None,
        }
    }

    /// Returns a copy of this occurrence with the given nullability annotation.
    #[must_use]
    pub fn annotated(mut self, nullability: Nullability) -> Self {
        self.nullability = nullability;
        self
    }

    /// Returns `true` if this occurrence carries no custom modifiers.
    #[must_use]
    pub fn is_unmodified(&self) -> bool {
        self.modifiers.is_empty()
    }
}

impl std::fmt::Display for ModifiedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ty)?;
        // Render outermost-last to match the innermost-first storage order.
        for modifier in &self.modifiers {
            let kind = if modifier.required { "modreq" } else { "modopt" };
            write!(f, " {kind}({})", modifier.modifier_type)?;
        }
        if self.nullability == Nullability::Annotated {
            write!(f, "?")?;
        }
        Ok(())
    }
}
