//! Unification checking over generic interface lists.

use std::sync::{Arc, Mutex};

use dotsym::prelude::*;

/// `IBox<T>` interface definition.
fn box_interface(graph: &SymbolGraph) -> TypeRc {
    TypeBuilder::new(graph, "Demo", "IBox`1")
        .kind(TypeKind::Interface)
        .type_param("T")
        .build()
}

/// Builds a generic class whose interface list is produced from its own type
/// parameters by `make`, run lazily after the declaration exists.
fn class_implementing(
    graph: &Arc<SymbolGraph>,
    name: &str,
    arity: usize,
    make: impl FnOnce(&SymbolGraph, Vec<ModifiedType>) -> Vec<TypeRc> + Send + 'static,
) -> TypeRc {
    let slot: Arc<Mutex<Option<TypeRc>>> = Arc::new(Mutex::new(None));
    let mut builder = TypeBuilder::new(graph, "Demo", name);
    for index in 0..arity {
        builder = builder.type_param(format!("T{index}"));
    }
    let declaration = builder
        .implements_lazy({
            let graph = Arc::clone(graph);
            let slot = Arc::clone(&slot);
            move || {
                let Some(declaration) = slot.lock().unwrap().clone() else {
                    return Vec::new();
                };
                let Some(named) = declaration.as_named() else {
                    return Vec::new();
                };
                let params = named
                    .type_parameters
                    .iter()
                    .map(|p| ModifiedType::bare(p.clone()))
                    .collect();
                make(&graph, params)
            }
        })
        .build();
    *slot.lock().unwrap() = Some(declaration.clone());
    declaration
}

#[test]
fn two_parameters_of_one_interface_unify() {
    let graph = Arc::new(SymbolGraph::new());
    let ibox = box_interface(&graph);

    // `Both<T0, T1> : IBox<T0>, IBox<T1>` collides when T0 == T1.
    let both = class_implementing(&graph, "Both`2", 2, {
        let ibox = ibox.clone();
        move |graph, params| {
            params
                .into_iter()
                .map(|p| graph.construct(&ibox, vec![p]).unwrap())
                .collect()
        }
    });

    let conflicts = graph.check_interface_unification(&both);
    assert_eq!(conflicts.len(), 1);
    assert!(graph.diagnostics().has_errors());
    assert!(graph
        .diagnostics()
        .iter()
        .any(|d| d.category == DiagnosticCategory::Unification && d.type_id == Some(both.id())));
}

#[test]
fn parameter_and_closed_argument_unify() {
    let graph = Arc::new(SymbolGraph::new());
    let ibox = box_interface(&graph);

    // `Half<T0> : IBox<T0>, IBox<int>` collides when T0 == int.
    let half = class_implementing(&graph, "Half`1", 1, {
        let ibox = ibox.clone();
        move |graph, params| {
            let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));
            vec![
                graph.construct(&ibox, params).unwrap(),
                graph.construct(&ibox, vec![int32]).unwrap(),
            ]
        }
    });

    assert_eq!(graph.check_interface_unification(&half).len(), 1);
}

#[test]
fn distinct_closed_arguments_do_not_unify() {
    let graph = Arc::new(SymbolGraph::new());
    let ibox = box_interface(&graph);

    let fine = class_implementing(&graph, "Fine", 0, {
        let ibox = ibox.clone();
        move |graph, _params| {
            let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));
            let string = ModifiedType::bare(graph.primitive(SpecialKind::String));
            vec![
                graph.construct(&ibox, vec![int32]).unwrap(),
                graph.construct(&ibox, vec![string]).unwrap(),
            ]
        }
    });

    assert!(graph.check_interface_unification(&fine).is_empty());
    assert!(!graph.diagnostics().has_errors());
}

#[test]
fn modifier_mismatch_blocks_unification() {
    let graph = Arc::new(SymbolGraph::new());
    let ibox = box_interface(&graph);

    // One occurrence modified, the other not: runtime identity keeps them
    // apart for every substitution.
    let skewed = class_implementing(&graph, "Skewed`1", 1, {
        let ibox = ibox.clone();
        move |graph, params| {
            let marker = graph.primitive(SpecialKind::I8);
            let modified = ModifiedType::with_modifiers(
                graph.primitive(SpecialKind::I4),
                vec![CustomModifier::optional(marker)],
            );
            vec![
                graph.construct(&ibox, params).unwrap(),
                graph.construct(&ibox, vec![modified]).unwrap(),
            ]
        }
    });
    assert!(graph.check_interface_unification(&skewed).is_empty());
}

#[test]
fn matching_modifiers_unify() {
    let graph = Arc::new(SymbolGraph::new());
    let ibox = box_interface(&graph);

    // Both occurrences carry the same modifier; the variables underneath can
    // still be driven together.
    let matched = class_implementing(&graph, "Matched`2", 2, {
        let ibox = ibox.clone();
        move |graph, params| {
            let marker = graph.primitive(SpecialKind::I8);
            params
                .into_iter()
                .map(|p| {
                    let modified = ModifiedType::with_modifiers(
                        p.ty,
                        vec![CustomModifier::optional(marker.clone())],
                    );
                    graph.construct(&ibox, vec![modified]).unwrap()
                })
                .collect()
        }
    });
    assert_eq!(graph.check_interface_unification(&matched).len(), 1);
}

#[test]
fn occurs_check_blocks_self_referential_unification() {
    let graph = Arc::new(SymbolGraph::new());
    let ibox = box_interface(&graph);
    let wrap = TypeBuilder::new(&graph, "Demo", "Wrap`1")
        .type_param("W")
        .build();

    // `Nested<T0> : IBox<T0>, IBox<Wrap<T0>>`: T0 can never equal Wrap<T0>.
    let nested = class_implementing(&graph, "Nested`1", 1, {
        let ibox = ibox.clone();
        move |graph, params| {
            let param = params[0].clone();
            let wrapped = ModifiedType::bare(graph.construct(&wrap, vec![param.clone()]).unwrap());
            vec![
                graph.construct(&ibox, vec![param]).unwrap(),
                graph.construct(&ibox, vec![wrapped]).unwrap(),
            ]
        }
    });
    assert!(graph.check_interface_unification(&nested).is_empty());
}

#[test]
fn interfaces_inherited_through_bases_participate() {
    let graph = Arc::new(SymbolGraph::new());
    let ibox = box_interface(&graph);

    // The base contributes IBox<int>; the derived declaration adds IBox<T0>.
    let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));
    let base = TypeBuilder::new(&graph, "Demo", "IntHolder")
        .implements(graph.construct(&ibox, vec![int32]).unwrap())
        .build();

    let slot: Arc<Mutex<Option<TypeRc>>> = Arc::new(Mutex::new(None));
    let derived = TypeBuilder::new(&graph, "Demo", "Mixed`1")
        .type_param("T0")
        .base(base)
        .implements_lazy({
            let graph = Arc::clone(&graph);
            let ibox = ibox.clone();
            let slot = Arc::clone(&slot);
            move || {
                let Some(declaration) = slot.lock().unwrap().clone() else {
                    return Vec::new();
                };
                let param = declaration
                    .as_named()
                    .and_then(|named| named.type_parameter(0))
                    .map(ModifiedType::bare);
                param
                    .and_then(|p| graph.construct(&ibox, vec![p]).ok())
                    .into_iter()
                    .collect()
            }
        })
        .build();
    *slot.lock().unwrap() = Some(derived.clone());

    assert_eq!(graph.check_interface_unification(&derived).len(), 1);
}
