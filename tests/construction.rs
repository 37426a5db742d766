//! Generic construction and substitution scenarios: modifier concatenation,
//! round-trip identity, alpha-renaming independence, member substitution and
//! comparer independence.

use std::sync::Arc;

use dotsym::prelude::*;

/// `Wrap<T>` with a method `T Pass(T value)` and a property `T Item { get; }`.
fn wrap_definition(graph: &SymbolGraph) -> TypeRc {
    let definition = TypeBuilder::new(graph, "Demo", "Wrap`1")
        .type_param("T")
        .build();
    let t = definition.as_named().unwrap().type_parameter(0).unwrap();
    let _pass = MethodBuilder::new(graph, &definition, "Pass")
        .param(ParameterSymbol::new("value", ModifiedType::bare(t.clone())))
        .returns(ModifiedType::bare(t.clone()))
        .build();
    let _item = PropertyBuilder::new(graph, &definition, "Item", ModifiedType::bare(t))
        .getter()
        .build();
    definition
}

fn method_named(ty: &TypeRc, name: &str) -> MemberRc {
    ty.as_named()
        .unwrap()
        .members()
        .iter()
        .map(|(_, member)| member.clone())
        .find(|member| member.name() == name && member.as_method().is_some())
        .unwrap()
}

#[test]
fn occurrence_modifiers_append_after_argument_modifiers() {
    let graph = SymbolGraph::new();
    let inner_marker = graph.primitive(SpecialKind::I1);
    let outer_marker = graph.primitive(SpecialKind::I8);

    // The definition's member mentions `T modopt(outer)`.
    let definition = TypeBuilder::new(&graph, "Demo", "Cell`1")
        .type_param("T")
        .build();
    let t = definition.as_named().unwrap().type_parameter(0).unwrap();
    let _store = MethodBuilder::new(&graph, &definition, "Store")
        .param(ParameterSymbol::new(
            "value",
            ModifiedType::with_modifiers(t, vec![CustomModifier::optional(outer_marker.clone())]),
        ))
        .build();

    // The argument arrives already carrying `modopt(inner)`.
    let argument = ModifiedType::with_modifiers(
        graph.primitive(SpecialKind::I4),
        vec![CustomModifier::optional(inner_marker.clone())],
    );
    let closed = graph.construct(&definition, vec![argument]).unwrap();

    let store = method_named(&closed, "Store");
    let parameter = &store.as_method().unwrap().parameters[0];
    // Innermost-first: the argument's own modifier stays closest to the type.
    assert_eq!(parameter.ty.modifiers.len(), 2);
    assert_eq!(parameter.ty.modifiers[0].modifier_type.id(), inner_marker.id());
    assert_eq!(parameter.ty.modifiers[1].modifier_type.id(), outer_marker.id());
}

#[test]
fn substitution_is_idempotent_over_closed_arguments() {
    let graph = SymbolGraph::new();
    let definition = wrap_definition(&graph);
    let marker = graph.primitive(SpecialKind::I8);
    let argument = ModifiedType::with_modifiers(
        graph.primitive(SpecialKind::I4),
        vec![CustomModifier::required(marker)],
    );

    let once = graph.construct(&definition, vec![argument]).unwrap();
    let again = graph
        .construct(&definition, once.as_named().unwrap().type_arguments.clone())
        .unwrap();

    assert!(TypeComparer::CONSIDER_EVERYTHING.equal(&once, &again));
    let first = method_named(&once, "Pass");
    let second = method_named(&again, "Pass");
    assert!(TypeComparer::CONSIDER_EVERYTHING
        .same_signature(first.as_method().unwrap(), second.as_method().unwrap()));
    // No modifier duplication on the re-substituted signature.
    assert_eq!(second.as_method().unwrap().parameters[0].ty.modifiers.len(), 1);
}

#[test]
fn independent_constructions_are_equal_but_not_identical() {
    let graph = SymbolGraph::new();
    let definition = wrap_definition(&graph);
    let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));

    let first = graph.construct(&definition, vec![int32.clone()]).unwrap();
    let second = graph.construct(&definition, vec![int32]).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_ne!(first.id(), second.id());
    for comparer in graph.comparers() {
        assert!(comparer.equal(&first, &second));
        assert_eq!(comparer.hash_type(&first), comparer.hash_type(&second));
    }
}

#[test]
fn substituted_method_type_parameters_keep_structural_identity() {
    let graph = SymbolGraph::new();

    // `Seq<T>` with a generic method `U Map<U>(T input)`.
    let definition = TypeBuilder::new(&graph, "Demo", "Seq`1")
        .type_param("T")
        .build();
    let t = definition.as_named().unwrap().type_parameter(0).unwrap();
    let mut builder = MethodBuilder::new(&graph, &definition, "Map");
    let u = builder.add_type_param("U");
    let _map = builder
        .param(ParameterSymbol::new("input", ModifiedType::bare(t)))
        .returns(ModifiedType::bare(u))
        .build();

    let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));
    let first = graph.construct(&definition, vec![int32.clone()]).unwrap();
    let second = graph.construct(&definition, vec![int32]).unwrap();

    let first_map = method_named(&first, "Map");
    let second_map = method_named(&second, "Map");
    let first_map = first_map.as_method().unwrap();
    let second_map = second_map.as_method().unwrap();

    // Fresh parameter symbols per instantiation, equal by structural key.
    assert!(!Arc::ptr_eq(
        &first_map.type_parameters[0],
        &second_map.type_parameters[0]
    ));
    assert!(TypeComparer::CONSIDER_EVERYTHING.equal(
        &first_map.type_parameters[0],
        &second_map.type_parameters[0]
    ));
    assert!(TypeComparer::CONSIDER_EVERYTHING.same_signature(first_map, second_map));
}

#[test]
fn substituted_property_accessors_are_rewired() {
    let graph = SymbolGraph::new();
    let definition = wrap_definition(&graph);
    let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));
    let closed = graph.construct(&definition, vec![int32]).unwrap();

    let members = closed.as_named().unwrap().members();
    let property = members
        .iter()
        .find_map(|(_, member)| member.as_property().map(|_| member.clone()))
        .unwrap();
    let getter = property.as_property().unwrap().get_method.clone().unwrap();

    // The wrapper points at the substituted accessor, not the definition's.
    let in_list = members.iter().any(|(_, member)| member.id() == getter.id());
    assert!(in_list);
    assert_eq!(
        getter.as_method().unwrap().return_type.ty.id(),
        graph.primitive(SpecialKind::I4).id()
    );
    assert_eq!(getter.containing_type().id(), Some(closed.id()));
}

#[test]
fn base_and_interfaces_are_substituted() {
    use std::sync::Mutex;

    let graph = Arc::new(SymbolGraph::new());

    let iface_definition = TypeBuilder::new(&graph, "Demo", "IReadable`1")
        .kind(TypeKind::Interface)
        .type_param("T")
        .build();
    let base_definition = TypeBuilder::new(&graph, "Demo", "Collection`1")
        .type_param("T")
        .build();

    // `List<T> : Collection<T>, IReadable<T>`. The edges mention List's own
    // parameter, so they go through lazy thunks resolved after creation.
    let slot: Arc<Mutex<Option<TypeRc>>> = Arc::new(Mutex::new(None));
    fn own_param(slot: &Arc<Mutex<Option<TypeRc>>>) -> Option<ModifiedType> {
        let list = slot.lock().unwrap().clone()?;
        let named = list.as_named()?;
        Some(ModifiedType::bare(named.type_parameter(0)?))
    }
    let list = TypeBuilder::new(&graph, "Demo", "List`1")
        .type_param("T")
        .base_lazy({
            let graph = Arc::clone(&graph);
            let base_definition = base_definition.clone();
            let slot = Arc::clone(&slot);
            move || {
                let t = own_param(&slot)?;
                graph.construct(&base_definition, vec![t]).ok()
            }
        })
        .implements_lazy({
            let graph = Arc::clone(&graph);
            let iface_definition = iface_definition.clone();
            let slot = Arc::clone(&slot);
            move || {
                own_param(&slot)
                    .and_then(|t| graph.construct(&iface_definition, vec![t]).ok())
                    .into_iter()
                    .collect()
            }
        })
        .build();
    *slot.lock().unwrap() = Some(list.clone());

    // Open edges mention the parameter itself.
    let open_base = list.as_named().unwrap().base_type().unwrap();
    assert_eq!(
        open_base.as_named().unwrap().definition_id(),
        base_definition.id()
    );
    assert!(open_base.as_named().unwrap().type_arguments[0]
        .ty
        .as_parameter()
        .is_some());

    // Constructing List<int> substitutes both edges.
    let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));
    let closed = graph.construct(&list, vec![int32.clone()]).unwrap();

    let expected_base = graph
        .construct(&base_definition, vec![int32.clone()])
        .unwrap();
    let closed_base = closed.as_named().unwrap().base_type().unwrap();
    assert!(TypeComparer::CONSIDER_EVERYTHING.equal(&closed_base, &expected_base));

    let expected_iface = graph.construct(&iface_definition, vec![int32]).unwrap();
    let interfaces = closed.as_named().unwrap().interfaces();
    assert_eq!(interfaces.len(), 1);
    assert!(TypeComparer::CONSIDER_EVERYTHING.equal(&interfaces[0], &expected_iface));
}

#[test]
fn tuple_names_are_erased_only_by_name_insensitive_comparers() {
    let graph = SymbolGraph::new();
    let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));
    let string = ModifiedType::bare(graph.primitive(SpecialKind::String));

    let named = graph
        .tuple_of(
            vec![int32.clone(), string.clone()],
            Some(vec![Some("count".to_string()), Some("label".to_string())]),
        )
        .unwrap();
    let nameless = graph.tuple_of(vec![int32, string], None).unwrap();

    assert!(!TypeComparer::CONSIDER_EVERYTHING.equal(&named, &nameless));
    let insensitive = TypeComparer::IGNORE_DYNAMIC_TUPLE_NAMES_NULLABILITY;
    assert!(insensitive.equal(&named, &nameless));
    assert_eq!(
        insensitive.hash_type(&named),
        insensitive.hash_type(&nameless)
    );
}

#[test]
fn construction_contract_violations_are_errors() {
    let graph = SymbolGraph::new();
    let definition = wrap_definition(&graph);
    let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));

    assert!(matches!(
        graph.construct(&definition, vec![]),
        Err(Error::ArityMismatch {
            expected: 1,
            actual: 0
        })
    ));

    let non_generic = TypeBuilder::new(&graph, "Demo", "Plain").build();
    assert!(matches!(
        graph.construct(&non_generic, vec![int32]),
        Err(Error::NotAGenericDefinition(_))
    ));
}
