//! Unification checking over a generic declaration's interface list.
//!
//! Two instantiations of the same generic interface in one type's interface
//! list are illegal when some substitution of the declaring type's own
//! parameters makes them identical at runtime: dispatch would have two entries
//! for one slot. The check unifies instantiation pairs over the declaration's
//! parameters as variables, using the runtime notion of identity (custom
//! modifier lists significant, array bounds / tuple names / `dynamic` not).

use std::collections::{HashMap, HashSet};

use crate::compare::TypeComparer;
use crate::diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity};
use crate::resolve::all_interfaces;
use crate::symbols::{ModifiedType, ParamKey, SymbolId, TypeRc, TypeSymbol};
use crate::SymbolGraph;

/// A pair of interface instantiations that can unify under some substitution
/// of the declaring type's parameters.
#[derive(Debug, Clone)]
pub struct UnificationConflict {
    /// One of the two unifiable instantiations.
    pub first: TypeRc,
    /// The other instantiation.
    pub second: TypeRc,
}

impl SymbolGraph {
    /// Checks `ty`'s full interface set for pairs of instantiations of one
    /// generic interface that can unify over `ty`'s own type parameters.
    ///
    /// Every positive is reported as an error diagnostic against `ty` and
    /// returned; an empty result means the interface list is sound.
    #[must_use]
    pub fn check_interface_unification(&self, ty: &TypeRc) -> Vec<UnificationConflict> {
        let Some(named) = ty.as_named() else {
            return Vec::new();
        };
        let variables: HashSet<ParamKey> = named
            .type_parameters
            .iter()
            .filter_map(|parameter| parameter.as_parameter().map(|p| p.key))
            .collect();

        let mut groups: HashMap<SymbolId, Vec<TypeRc>> = HashMap::new();
        for iface in all_interfaces(ty) {
            if let Some(iface_named) = iface.as_named() {
                if iface_named.is_generic() {
                    groups
                        .entry(iface_named.definition_id())
                        .or_default()
                        .push(iface.clone());
                }
            }
        }

        let mut conflicts = Vec::new();
        for group in groups.values() {
            for (index, first) in group.iter().enumerate() {
                for second in &group[index + 1..] {
                    if can_unify(first, second, &variables) {
                        self.diagnostics().push(
                            Diagnostic::new(
                                DiagnosticSeverity::Error,
                                DiagnosticCategory::Unification,
                                format!(
                                    "{first} and {second} can unify for some substitution of the type parameters of {ty}"
                                ),
                            )
                            .with_type(ty.id()),
                        );
                        conflicts.push(UnificationConflict {
                            first: first.clone(),
                            second: second.clone(),
                        });
                    }
                }
            }
        }
        conflicts
    }
}

fn can_unify(first: &TypeRc, second: &TypeRc, variables: &HashSet<ParamKey>) -> bool {
    let (Some(x), Some(y)) = (first.as_named(), second.as_named()) else {
        return false;
    };
    if x.definition_id() != y.definition_id()
        || x.type_arguments.len() != y.type_arguments.len()
    {
        return false;
    }
    let mut bindings = HashMap::new();
    x.type_arguments
        .iter()
        .zip(y.type_arguments.iter())
        .all(|(xa, ya)| unify_occurrence(xa, ya, variables, &mut bindings))
}

fn unify_occurrence(
    a: &ModifiedType,
    b: &ModifiedType,
    variables: &HashSet<ParamKey>,
    bindings: &mut HashMap<ParamKey, TypeRc>,
) -> bool {
    // Modifier lists are significant for runtime identity; they must agree
    // exactly before the underlying types can unify.
    if a.modifiers.len() != b.modifiers.len() {
        return false;
    }
    let modifiers_agree = a.modifiers.iter().zip(b.modifiers.iter()).all(|(am, bm)| {
        am.required == bm.required
            && TypeComparer::CONSIDER_EVERYTHING.equal(&am.modifier_type, &bm.modifier_type)
    });
    if !modifiers_agree {
        return false;
    }
    unify(&a.ty, &b.ty, variables, bindings)
}

fn unify(
    a: &TypeRc,
    b: &TypeRc,
    variables: &HashSet<ParamKey>,
    bindings: &mut HashMap<ParamKey, TypeRc>,
) -> bool {
    if let Some(param) = a.as_parameter() {
        if variables.contains(&param.key) {
            return bind(param.key, b, bindings);
        }
    }
    if let Some(param) = b.as_parameter() {
        if variables.contains(&param.key) {
            return bind(param.key, a, bindings);
        }
    }

    match (&**a, &**b) {
        (TypeSymbol::Named(x), TypeSymbol::Named(y)) => {
            // Runtime identity erases the dynamic/object distinction.
            let collapse = x.special.is_some_and(|s| s.is_object_or_dynamic())
                && y.special.is_some_and(|s| s.is_object_or_dynamic());
            if !collapse && x.definition_id() != y.definition_id() {
                return false;
            }
            if x.type_arguments.len() != y.type_arguments.len() {
                return false;
            }
            x.type_arguments
                .iter()
                .zip(y.type_arguments.iter())
                .all(|(xa, ya)| unify_occurrence(xa, ya, variables, bindings))
        }
        (TypeSymbol::Parameter(x), TypeSymbol::Parameter(y)) => x.key == y.key,
        (TypeSymbol::Array(x), TypeSymbol::Array(y)) => {
            // Bounds are not part of runtime identity; rank and vector-ness are.
            x.is_vector == y.is_vector
                && x.rank == y.rank
                && unify_occurrence(&x.element, &y.element, variables, bindings)
        }
        (TypeSymbol::Pointer(x), TypeSymbol::Pointer(y)) => {
            unify_occurrence(&x.pointee, &y.pointee, variables, bindings)
        }
        (TypeSymbol::ByRef(x), TypeSymbol::ByRef(y)) => {
            unify_occurrence(&x.referent, &y.referent, variables, bindings)
        }
        (TypeSymbol::Error(x), TypeSymbol::Error(y)) => x.id == y.id,
        _ => false,
    }
}

fn bind(key: ParamKey, value: &TypeRc, bindings: &mut HashMap<ParamKey, TypeRc>) -> bool {
    if occurs(key, value) {
        return false;
    }
    if let Some(existing) = bindings.get(&key) {
        return TypeComparer::IGNORE_MODIFIERS_AND_ARRAY_BOUNDS.equal(existing, value);
    }
    bindings.insert(key, value.clone());
    true
}

/// Occurs check: a variable can never unify with a type containing itself.
fn occurs(key: ParamKey, ty: &TypeRc) -> bool {
    match &**ty {
        TypeSymbol::Parameter(param) => param.key == key,
        TypeSymbol::Named(named) => named
            .type_arguments
            .iter()
            .any(|argument| occurs(key, &argument.ty)),
        TypeSymbol::Array(array) => occurs(key, &array.element.ty),
        TypeSymbol::Pointer(pointer) => occurs(key, &pointer.pointee.ty),
        TypeSymbol::ByRef(by_ref) => occurs(key, &by_ref.referent.ty),
        TypeSymbol::Error(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{ParamOwnerKind, SpecialKind};

    #[test]
    fn test_occurs_check_rejects_self_reference() {
        let graph = SymbolGraph::new();
        let definition = crate::symbols::TypeBuilder::new(&graph, "Demo", "Wrap`1")
            .type_param("T")
            .build();
        let param = definition.as_named().unwrap().type_parameter(0).unwrap();
        let key = param.as_parameter().unwrap().key;
        assert_eq!(key.owner_kind, ParamOwnerKind::Type);

        let nested = graph
            .construct(&definition, vec![ModifiedType::bare(param.clone())])
            .unwrap();
        assert!(occurs(key, &nested));

        let closed = graph
            .construct(
                &definition,
                vec![ModifiedType::bare(graph.primitive(SpecialKind::I4))],
            )
            .unwrap();
        assert!(!occurs(key, &closed));
    }

    #[test]
    fn test_binding_consistency() {
        let graph = SymbolGraph::new();
        let int32 = graph.primitive(SpecialKind::I4);
        let string = graph.primitive(SpecialKind::String);
        let key = ParamKey {
            owner_kind: ParamOwnerKind::Type,
            declaration: int32.id(),
            index: 0,
        };

        let mut bindings = HashMap::new();
        assert!(bind(key, &int32, &mut bindings));
        assert!(bind(key, &int32, &mut bindings));
        assert!(!bind(key, &string, &mut bindings));
    }
}
