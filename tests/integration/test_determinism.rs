use bindplan::config::ResolutionConfig;
use bindplan::{
    DeclKind, DeclarationGraph, DeclarationGraphBuilder, DeclarationSpec, RawAnnotation,
    RunContext, resolve,
};
use std::sync::Arc;

/// A few hundred declarations spread over several modules, with alias chains,
/// relocations and some deliberate errors.
fn wide_graph(with_errors: bool) -> DeclarationGraph {
    let mut builder = DeclarationGraphBuilder::new();
    let modules = ["m0", "m1", "m2", "m3", "m4"];
    for (i, module) in modules.iter().enumerate() {
        let annotations = if i % 2 == 0 {
            vec![RawAnnotation::new("visible")]
        } else {
            Vec::new()
        };
        builder.add_module(*module, annotations).unwrap();
    }

    for (i, module) in modules.iter().enumerate() {
        for n in 0..40 {
            let name = format!("{module}::Type{n}");
            builder
                .add_declaration(DeclarationSpec::new(&name, DeclKind::Struct, *module))
                .unwrap();

            let next = modules[(i + 1) % modules.len()];
            let alias = DeclarationSpec::alias(format!("{next}::Alias{i}_{n}"), next, &name);
            let alias = match n % 4 {
                0 => alias.annotate("visible"),
                1 if i == 0 => alias.annotate("expose_here"),
                2 => alias.annotate("encourage"),
                _ => alias,
            };
            builder.add_declaration(alias).unwrap();
        }
    }

    if with_errors {
        builder
            .add_declaration(DeclarationSpec::alias("m2::Spin", "m2", "m3::Spun").annotate("visible"))
            .unwrap();
        builder
            .add_declaration(DeclarationSpec::alias("m3::Spun", "m3", "m2::Spin"))
            .unwrap();
        builder
            .add_declaration(DeclarationSpec::alias("m4::Lost", "m4", "m9::Nothing").annotate("visible"))
            .unwrap();
        builder
            .add_declaration(
                DeclarationSpec::new("m1::Torn", DeclKind::Function, "m1")
                    .annotate("visible")
                    .annotate("hidden"),
            )
            .unwrap();
    }

    builder.build().unwrap()
}

fn with_threads(graph: &Arc<DeclarationGraph>, threads: usize) -> RunContext {
    RunContext::from_shared(
        Arc::clone(graph),
        ResolutionConfig {
            parallel_threads: threads,
            ..ResolutionConfig::default()
        },
    )
}

#[test]
fn test_plan_is_identical_across_thread_counts() {
    let graph = Arc::new(wide_graph(false));
    let baseline = resolve(&with_threads(&graph, 1)).unwrap();
    assert!(!baseline.is_empty());

    for threads in [2, 4, 8] {
        for _ in 0..3 {
            let plan = resolve(&with_threads(&graph, threads)).unwrap();
            assert_eq!(plan.entries(), baseline.entries(), "entries differ at {threads} threads");
            assert_eq!(plan.modules(), baseline.modules());
            assert_eq!(plan.relocations(), baseline.relocations());
            assert_eq!(plan.warnings(), baseline.warnings());
        }
    }
}

#[test]
fn test_error_list_is_identical_across_thread_counts() {
    let graph = Arc::new(wide_graph(true));
    let baseline = resolve(&with_threads(&graph, 1)).unwrap_err();
    assert_eq!(baseline.errors.len(), 3);

    for threads in [2, 4, 8] {
        let err = resolve(&with_threads(&graph, threads)).unwrap_err();
        assert_eq!(err, baseline);
    }
}
