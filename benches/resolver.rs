//! Benchmarks for the symbol graph's hot paths:
//! - Generic construction and member substitution
//! - Comparer equality and hashing over deep types
//! - Interface-implementation resolution, cold and memoized
//! - Parallel bridge synthesis over a wide type set

extern crate dotsym;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use dotsym::prelude::*;
use std::hint::black_box;

/// `IOp<T> { void Apply(T value); }` plus `depth` classes implementing
/// `IOp<int>` through a base chain, each with its own `Apply(int)`.
fn build_scene(depth: usize) -> (SymbolGraph, Vec<TypeRc>, MemberRc) {
    let graph = SymbolGraph::new();
    let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));

    let iop = TypeBuilder::new(&graph, "Bench", "IOp`1")
        .kind(TypeKind::Interface)
        .type_param("T")
        .build();
    let t = iop.as_named().unwrap().type_parameter(0).unwrap();
    let _slot = MethodBuilder::new(&graph, &iop, "Apply")
        .param(ParameterSymbol::new("value", ModifiedType::bare(t)))
        .virtual_method()
        .build();

    let closed = graph.construct(&iop, vec![int32.clone()]).unwrap();
    let slot = closed
        .as_named()
        .unwrap()
        .members()
        .iter()
        .next()
        .map(|(_, member)| member.clone())
        .unwrap();

    let mut types = Vec::with_capacity(depth);
    let mut base: Option<TypeRc> = None;
    for index in 0..depth {
        let mut builder = TypeBuilder::new(&graph, "Bench", format!("Level{index}"))
            .implements(closed.clone());
        if let Some(parent) = &base {
            builder = builder.base(parent.clone());
        }
        let ty = builder.build();
        let _body = MethodBuilder::new(&graph, &ty, "Apply")
            .param(ParameterSymbol::new("value", int32.clone()))
            .build();
        base = Some(ty.clone());
        types.push(ty);
    }
    (graph, types, slot)
}

fn bench_construct(c: &mut Criterion) {
    let graph = SymbolGraph::new();
    let definition = TypeBuilder::new(&graph, "Bench", "Wrap`1")
        .type_param("T")
        .build();
    let t = definition.as_named().unwrap().type_parameter(0).unwrap();
    for index in 0..8 {
        let _method = MethodBuilder::new(&graph, &definition, format!("M{index}"))
            .param(ParameterSymbol::new("value", ModifiedType::bare(t.clone())))
            .returns(ModifiedType::bare(t.clone()))
            .build();
    }
    let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));

    c.bench_function("construct_with_member_substitution", |b| {
        b.iter(|| {
            let closed = graph
                .construct(black_box(&definition), vec![int32.clone()])
                .unwrap();
            // Force the lazy member substitution.
            black_box(closed.as_named().unwrap().members().count())
        });
    });
}

fn bench_compare(c: &mut Criterion) {
    let graph = SymbolGraph::new();
    let definition = TypeBuilder::new(&graph, "Bench", "Deep`1")
        .type_param("T")
        .build();

    // Nest Deep<Deep<...<int>...>> eight levels down.
    let mut argument = ModifiedType::bare(graph.primitive(SpecialKind::I4));
    for _ in 0..8 {
        argument = ModifiedType::bare(graph.construct(&definition, vec![argument]).unwrap());
    }
    let left = argument.ty.clone();
    let right = {
        let mut argument = ModifiedType::bare(graph.primitive(SpecialKind::I4));
        for _ in 0..8 {
            argument = ModifiedType::bare(graph.construct(&definition, vec![argument]).unwrap());
        }
        argument.ty
    };

    c.bench_function("compare_deep_nested", |b| {
        b.iter(|| {
            let comparer = TypeComparer::CONSIDER_EVERYTHING;
            black_box(comparer.equal(black_box(&left), black_box(&right)))
        });
    });
    c.bench_function("hash_deep_nested", |b| {
        b.iter(|| {
            let comparer = TypeComparer::IGNORE_MODIFIERS_AND_ARRAY_BOUNDS;
            black_box(comparer.hash_type(black_box(&left)))
        });
    });
}

fn bench_resolution(c: &mut Criterion) {
    c.bench_function("resolve_cold", |b| {
        b.iter_batched(
            || build_scene(16),
            |(graph, types, slot)| {
                let leaf = types.last().unwrap();
                black_box(graph.find_implementation_for_interface_member(leaf, &slot))
            },
            BatchSize::SmallInput,
        );
    });

    let (graph, types, slot) = build_scene(16);
    let leaf = types.last().unwrap().clone();
    // Populate the cache once.
    let _ = graph.find_implementation_for_interface_member(&leaf, &slot);
    c.bench_function("resolve_memoized", |b| {
        b.iter(|| {
            black_box(graph.find_implementation_for_interface_member(black_box(&leaf), &slot))
        });
    });
}

fn bench_bridges(c: &mut Criterion) {
    c.bench_function("synthesize_all_bridges", |b| {
        b.iter_batched(
            || build_scene(64),
            |(graph, types, _slot)| {
                let token = CancellationToken::new();
                graph.synthesize_all_bridges(&types, &token).unwrap();
                black_box(graph.diagnostics().len())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_construct,
    bench_compare,
    bench_resolution,
    bench_bridges
);
criterion_main!(benches);
