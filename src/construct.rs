//! Generic construction: substituting type arguments for type parameters.
//!
//! `construct` takes an uninstantiated generic definition and an argument
//! list and produces a new named-type symbol whose members, base type and
//! interface list are obtained by substituting parameters for arguments
//! throughout the definition's signatures. Member substitution is performed
//! lazily on first access and cached for the lifetime of the symbol; base and
//! interface edges go through the same cycle-tolerant cells as declared types.
//!
//! # Modifier Concatenation
//!
//! Custom modifiers attached to a type-parameter *occurrence* in the
//! definition are concatenated with the modifiers already present on the
//! supplied argument. Lists are stored innermost-first, and the argument's own
//! modifiers stay closest to the type, so the occurrence's modifiers append
//! after them. Concatenation is order-preserving and idempotent: substituting
//! an already-closed argument again changes nothing, so repeated construction
//! never duplicates or drops modifiers.
//!
//! # Identity
//!
//! Construction always returns a fresh symbol; equality between constructions
//! is structural (see [`crate::compare`]), never reference identity. This is
//! what gives independently obtained instantiations alpha-renaming
//! independence: substituted type-parameter symbols are fresh objects carrying
//! the structural key of the parameter they were cloned from.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::error::Error;
use crate::symbols::{
    CustomModifier, EventSymbol, FieldSymbol, IdAllocator, LazyCell, MemberList, MemberRc,
    MemberSymbol, MethodSymbol, ModifiedType, NamedInit, NamedType, Nullability, ParameterSymbol,
    PropertySymbol, SymbolId, TypeParameter, TypeRc, TypeRef, TypeSymbol,
};
use crate::{Result, SymbolGraph};

impl SymbolGraph {
    /// Constructs a generic definition with the given type arguments.
    ///
    /// Requires exactly one argument per type parameter. The result is a new
    /// symbol whose original definition is `definition` and whose type
    /// arguments are `type_arguments`; constructing twice with structurally
    /// equal arguments yields structurally equal (not reference-equal)
    /// results.
    ///
    /// # Errors
    /// - [`Error::NotAGenericDefinition`] if `definition` is not an
    ///   uninstantiated generic named type
    /// - [`Error::ArityMismatch`] if the argument count differs from the
    ///   definition's parameter count
    pub fn construct(
        &self,
        definition: &TypeRc,
        type_arguments: Vec<ModifiedType>,
    ) -> Result<TypeRc> {
        construct_named(self, definition, type_arguments, None)
    }
}

/// Shared entry point for `construct` and tuple creation.
pub(crate) fn construct_named(
    graph: &SymbolGraph,
    definition: &TypeRc,
    type_arguments: Vec<ModifiedType>,
    tuple_element_names: Option<Vec<Option<String>>>,
) -> Result<TypeRc> {
    construct_inner(
        definition,
        type_arguments,
        &graph.ids,
        &graph.error_type(),
        tuple_element_names,
    )
}

/// Graph-independent construction; lazy thunks capture only what they need so
/// substitution can run inside cells without a graph reference.
fn construct_inner(
    definition: &TypeRc,
    type_arguments: Vec<ModifiedType>,
    ids: &IdAllocator,
    error: &TypeRc,
    tuple_element_names: Option<Vec<Option<String>>>,
) -> Result<TypeRc> {
    let named = match definition.as_named() {
        Some(named) if named.is_definition() && named.is_generic() => named,
        _ => return Err(Error::NotAGenericDefinition(definition.id())),
    };
    if type_arguments.len() != named.type_parameters.len() {
        return Err(Error::ArityMismatch {
            expected: named.type_parameters.len(),
            actual: type_arguments.len(),
        });
    }

    let substitution = Substitution::new(
        &named.type_parameters,
        &type_arguments,
        ids.clone(),
        error.clone(),
    );

    let base_definition = definition.clone();
    let base_substitution = substitution.clone();
    let base = LazyCell::suspended(Some(error.clone()), move || {
        base_definition
            .as_named()
            .and_then(NamedType::base_type)
            .map(|base_type| base_substitution.apply_bare(&base_type))
    });

    let interfaces_definition = definition.clone();
    let interfaces_substitution = substitution.clone();
    let interfaces = LazyCell::suspended(Vec::new(), move || {
        interfaces_definition
            .as_named()
            .map(NamedType::interfaces)
            .unwrap_or_default()
            .iter()
            .map(|iface| interfaces_substitution.apply_bare(iface))
            .collect()
    });

    Ok(NamedType::create(NamedInit {
        id: ids.next(),
        namespace: named.namespace.clone(),
        name: named.name.clone(),
        kind: named.kind,
        is_abstract: named.is_abstract,
        special: named.special,
        tuple_element_names: tuple_element_names.or_else(|| named.tuple_element_names.clone()),
        type_parameters: named.type_parameters.clone(),
        original: Some(definition.clone()),
        type_arguments,
        substitution: Some(substitution),
        base,
        interfaces,
    }))
}

/// An immutable parameter-to-argument mapping, cheap to clone and safe to
/// capture inside lazy thunks.
#[derive(Clone)]
pub(crate) struct Substitution {
    map: Arc<HashMap<crate::symbols::ParamKey, ModifiedType>>,
    ids: IdAllocator,
    error: TypeRc,
}

impl Substitution {
    pub(crate) fn new(
        parameters: &[TypeRc],
        arguments: &[ModifiedType],
        ids: IdAllocator,
        error: TypeRc,
    ) -> Self {
        let mut map = HashMap::with_capacity(parameters.len());
        for (parameter, argument) in parameters.iter().zip(arguments.iter()) {
            if let Some(param) = parameter.as_parameter() {
                map.insert(param.key, argument.clone());
            }
        }
        Self {
            map: Arc::new(map),
            ids,
            error,
        }
    }

    /// Returns a substitution extended with additional parameter mappings.
    fn extended(&self, additions: Vec<(crate::symbols::ParamKey, ModifiedType)>) -> Self {
        if additions.is_empty() {
            return self.clone();
        }
        let mut map = (*self.map).clone();
        map.extend(additions);
        Self {
            map: Arc::new(map),
            ids: self.ids.clone(),
            error: self.error.clone(),
        }
    }

    /// Applies the substitution to a type occurrence.
    ///
    /// For a substituted type-parameter occurrence the occurrence's modifiers
    /// append after the argument's own (innermost-first storage keeps the
    /// argument's modifiers closest to the type), and the occurrence's
    /// nullability annotation wins when present.
    pub(crate) fn apply_occurrence(&self, occurrence: &ModifiedType) -> ModifiedType {
        let occurrence_modifiers = || -> Vec<CustomModifier> {
            occurrence
                .modifiers
                .iter()
                .map(|modifier| CustomModifier {
                    required: modifier.required,
                    modifier_type: self.apply_bare(&modifier.modifier_type),
                })
                .collect()
        };

        if let Some(param) = occurrence.ty.as_parameter() {
            if let Some(argument) = self.map.get(&param.key) {
                let mut modifiers = argument.modifiers.clone();
                modifiers.extend(occurrence_modifiers());
                let nullability = if occurrence.nullability == Nullability::None {
                    argument.nullability
                } else {
                    occurrence.nullability
                };
                return ModifiedType {
                    ty: argument.ty.clone(),
                    modifiers,
                    nullability,
                };
            }
        }

        ModifiedType {
            ty: self.apply_bare(&occurrence.ty),
            modifiers: occurrence_modifiers(),
            nullability: occurrence.nullability,
        }
    }

    /// Applies the substitution to a bare type reference (base types and
    /// interface-list entries; modifiers cannot occur in these positions).
    pub(crate) fn apply_bare(&self, ty: &TypeRc) -> TypeRc {
        match &**ty {
            TypeSymbol::Parameter(param) => self
                .map
                .get(&param.key)
                .map(|argument| argument.ty.clone())
                .unwrap_or_else(|| ty.clone()),
            TypeSymbol::Named(named) => {
                if named.is_definition() {
                    return ty.clone();
                }
                let Some(original) = named.original.clone() else {
                    return ty.clone();
                };
                let arguments = named
                    .type_arguments
                    .iter()
                    .map(|argument| self.apply_occurrence(argument))
                    .collect();
                construct_inner(
                    &original,
                    arguments,
                    &self.ids,
                    &self.error,
                    named.tuple_element_names.clone(),
                )
                .unwrap_or_else(|_| self.error.clone())
            }
            TypeSymbol::Array(array) => Arc::new(TypeSymbol::Array(crate::symbols::ArrayType {
                id: self.ids.next(),
                element: self.apply_occurrence(&array.element),
                rank: array.rank,
                dimensions: array.dimensions.clone(),
                is_vector: array.is_vector,
            })),
            TypeSymbol::Pointer(pointer) => {
                Arc::new(TypeSymbol::Pointer(crate::symbols::PointerType {
                    id: self.ids.next(),
                    pointee: self.apply_occurrence(&pointer.pointee),
                }))
            }
            TypeSymbol::ByRef(by_ref) => Arc::new(TypeSymbol::ByRef(crate::symbols::ByRefType {
                id: self.ids.next(),
                referent: self.apply_occurrence(&by_ref.referent),
            })),
            TypeSymbol::Error(_) => ty.clone(),
        }
    }
}

/// Substitutes the definition's members for a constructed type. Called once
/// per constructed symbol from the member cache.
pub(crate) fn substitute_members(owner: &NamedType, substitution: &Substitution) -> MemberList {
    let definition = owner.original_definition();
    let source = definition
        .as_named()
        .map(NamedType::members)
        .unwrap_or_else(|| Arc::new(boxcar::Vec::new()));

    let owner_ref = owner.self_ref();
    let members = boxcar::Vec::new();
    let mut method_map: HashMap<SymbolId, MemberRc> = HashMap::new();

    // Methods first, so property/event wrappers can share the substituted
    // accessor symbols.
    for (_, member) in source.iter() {
        if let MemberSymbol::Method(method) = &**member {
            let substituted: MemberRc = Arc::new(MemberSymbol::Method(substitute_method(
                method,
                substitution,
                &owner_ref,
            )));
            method_map.insert(member.id(), substituted.clone());
            members.push(substituted);
        }
    }

    for (_, member) in source.iter() {
        match &**member {
            MemberSymbol::Method(_) => {}
            MemberSymbol::Property(property) => {
                let resolve = |accessor: &Option<MemberRc>| {
                    accessor
                        .as_ref()
                        .and_then(|a| method_map.get(&a.id()).cloned())
                };
                members.push(Arc::new(MemberSymbol::Property(PropertySymbol {
                    id: substitution.ids.next(),
                    name: property.name.clone(),
                    ty: substitution.apply_occurrence(&property.ty),
                    parameters: substitute_parameters(&property.parameters, substitution),
                    get_method: resolve(&property.get_method),
                    set_method: resolve(&property.set_method),
                    is_static: property.is_static,
                    accessibility: property.accessibility,
                    containing_type: owner_ref.clone(),
                })));
            }
            MemberSymbol::Event(event) => {
                let resolve = |accessor: &Option<MemberRc>| {
                    accessor
                        .as_ref()
                        .and_then(|a| method_map.get(&a.id()).cloned())
                };
                members.push(Arc::new(MemberSymbol::Event(EventSymbol {
                    id: substitution.ids.next(),
                    name: event.name.clone(),
                    ty: substitution.apply_occurrence(&event.ty),
                    add_method: resolve(&event.add_method),
                    remove_method: resolve(&event.remove_method),
                    is_static: event.is_static,
                    accessibility: event.accessibility,
                    containing_type: owner_ref.clone(),
                })));
            }
            MemberSymbol::Field(field) => {
                members.push(Arc::new(MemberSymbol::Field(FieldSymbol {
                    id: substitution.ids.next(),
                    name: field.name.clone(),
                    ty: substitution.apply_occurrence(&field.ty),
                    is_static: field.is_static,
                    accessibility: field.accessibility,
                    containing_type: owner_ref.clone(),
                })));
            }
        }
    }

    Arc::new(members)
}

fn substitute_method(
    method: &MethodSymbol,
    substitution: &Substitution,
    owner_ref: &TypeRef,
) -> MethodSymbol {
    // Fresh symbols for the method's own type parameters. They keep the
    // structural key of the originals, so signatures stay equal across
    // independently obtained instantiations while the symbols themselves are
    // distinct objects.
    let mut additions = Vec::new();
    let type_parameters: Vec<TypeRc> = method
        .type_parameters
        .iter()
        .map(|parameter| match parameter.as_parameter() {
            Some(param) => {
                let fresh: TypeRc = Arc::new(TypeSymbol::Parameter(TypeParameter {
                    id: substitution.ids.next(),
                    name: param.name.clone(),
                    key: param.key,
                    constraints: param.constraints,
                }));
                additions.push((param.key, ModifiedType::bare(fresh.clone())));
                fresh
            }
            None => parameter.clone(),
        })
        .collect();
    let extended = substitution.extended(additions);

    let overridden = OnceLock::new();
    if let Some(target) = method.overridden.get() {
        let _ = overridden.set(target.clone());
    }

    MethodSymbol {
        id: extended.ids.next(),
        name: method.name.clone(),
        kind: method.kind,
        type_parameters,
        parameters: substitute_parameters(&method.parameters, &extended),
        return_type: extended.apply_occurrence(&method.return_type),
        is_static: method.is_static,
        is_virtual: method.is_virtual,
        is_override: method.is_override,
        accessibility: method.accessibility,
        containing_type: owner_ref.clone(),
        overridden,
        explicit_implementations: method.explicit_implementations.clone(),
        forwards_to: method.forwards_to.clone(),
    }
}

fn substitute_parameters(
    parameters: &[ParameterSymbol],
    substitution: &Substitution,
) -> Vec<ParameterSymbol> {
    parameters
        .iter()
        .map(|parameter| ParameterSymbol {
            name: parameter.name.clone(),
            ty: substitution.apply_occurrence(&parameter.ty),
            ref_kind: parameter.ref_kind,
            is_params: parameter.is_params,
            is_optional: parameter.is_optional,
            default_value: parameter.default_value.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::TypeComparer;
    use crate::symbols::{SpecialKind, TypeBuilder, TypeKind};

    fn generic_definition(graph: &SymbolGraph, name: &str) -> TypeRc {
        TypeBuilder::new(graph, "Demo", name)
            .kind(TypeKind::Class)
            .type_param("T")
            .build()
    }

    #[test]
    fn test_construct_checks_arity() {
        let graph = SymbolGraph::new();
        let definition = generic_definition(&graph, "Wrapper`1");
        let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));

        let err = graph
            .construct(&definition, vec![int32.clone(), int32])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ArityMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_construct_rejects_non_definitions() {
        let graph = SymbolGraph::new();
        let definition = generic_definition(&graph, "Wrapper`1");
        let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));
        let constructed = graph.construct(&definition, vec![int32.clone()]).unwrap();

        let err = graph.construct(&constructed, vec![int32.clone()]).unwrap_err();
        assert!(matches!(err, Error::NotAGenericDefinition(_)));

        let err = graph
            .construct(&graph.primitive(SpecialKind::I4), vec![int32])
            .unwrap_err();
        assert!(matches!(err, Error::NotAGenericDefinition(_)));
    }

    #[test]
    fn test_round_trip_identity() {
        let graph = SymbolGraph::new();
        let definition = generic_definition(&graph, "Wrapper`1");
        let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));

        let first = graph.construct(&definition, vec![int32]).unwrap();
        let second = graph
            .construct(
                &definition,
                first.as_named().unwrap().type_arguments.clone(),
            )
            .unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(TypeComparer::CONSIDER_EVERYTHING.equal(&first, &second));
    }

    #[test]
    fn test_substituting_closed_argument_is_idempotent() {
        let graph = SymbolGraph::new();
        let definition = generic_definition(&graph, "Wrapper`1");
        let modifier = crate::symbols::CustomModifier::optional(graph.primitive(SpecialKind::I8));
        let modified_int = ModifiedType::with_modifiers(
            graph.primitive(SpecialKind::I4),
            vec![modifier],
        );

        let once = graph.construct(&definition, vec![modified_int]).unwrap();
        let again = graph
            .construct(&definition, once.as_named().unwrap().type_arguments.clone())
            .unwrap();

        let args = &again.as_named().unwrap().type_arguments;
        assert_eq!(args[0].modifiers.len(), 1);
        assert!(TypeComparer::CONSIDER_EVERYTHING.equal(&once, &again));
    }
}
