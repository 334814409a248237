use bindplan::config::ResolutionConfig;
use bindplan::modules::ImportOrigin;
use bindplan::{
    DeclKind, DeclarationGraphBuilder, DeclarationSpec, ExposureKind, ResolveError, RunContext,
    Warning, resolve,
};

fn context(builder: DeclarationGraphBuilder) -> RunContext {
    RunContext::new(builder.build().unwrap(), ResolutionConfig::default())
}

fn two_modules() -> DeclarationGraphBuilder {
    let mut builder = DeclarationGraphBuilder::new();
    builder.add_module("A", vec![]).unwrap();
    builder.add_module("B", vec![]).unwrap();
    builder
}

#[test]
fn test_encouraged_alias_names_entry_across_modules() {
    let mut builder = two_modules();
    builder
        .add_declaration(DeclarationSpec::new("A::Base", DeclKind::Struct, "A"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("B::Alias", "B", "A::Base").annotate("visible"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("B::Alias2", "B", "A::Base").annotate("encourage"))
        .unwrap();

    let ctx = context(builder);
    let plan = resolve(&ctx).unwrap();
    let graph = ctx.graph();
    let a = graph.module_named("A").unwrap();
    let b = graph.module_named("B").unwrap();

    assert_eq!(plan.len(), 1, "one entry per canonical declaration");
    let entry = plan.entry_named("A::Base").unwrap();
    assert_eq!(entry.external_name, "Alias2");
    assert_eq!(entry.emission_module, a);
    assert_eq!(entry.named_by, graph.lookup("B::Alias2"));
    assert_eq!(entry.forwarded.len(), 1);
    assert_eq!(entry.forwarded[0].name, "Alias");

    let imports = plan.imports_of(b);
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].module, a);
    assert!(matches!(imports[0].origin, ImportOrigin::Inferred { .. }));
    assert!(plan.imports_of(a).is_empty());

    // Both aliases resolve to the same entry
    for alias in ["B::Alias", "B::Alias2"] {
        let id = graph.lookup(alias).unwrap();
        assert_eq!(plan.lookup(id).unwrap().qualified_name, "A::Base");
    }
}

#[test]
fn test_expose_here_relocates_without_import() {
    let mut builder = two_modules();
    builder
        .add_declaration(DeclarationSpec::new("A::Foo", DeclKind::Struct, "A"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("B::Bar", "B", "A::Foo").annotate("expose_here"))
        .unwrap();

    let ctx = context(builder);
    let plan = resolve(&ctx).unwrap();
    let graph = ctx.graph();
    let a = graph.module_named("A").unwrap();
    let b = graph.module_named("B").unwrap();

    assert_eq!(plan.len(), 1);
    let entry = plan.entry_named("A::Foo").unwrap();
    assert_eq!(entry.emission_module, b);
    assert_eq!(entry.home_module, a);
    assert_eq!(entry.external_name, "Bar");
    assert_eq!(entry.exposure, ExposureKind::Relocated);

    assert!(plan.imports_of(b).is_empty());
    assert!(plan.imports_of(a).is_empty());
    assert_eq!(plan.emitted_in(b).count(), 1);
    assert_eq!(plan.emitted_in(a).count(), 0);

    let relocation = plan.relocations()[0];
    assert_eq!(relocation.site, b);
    assert_eq!(Some(relocation.via), graph.lookup("B::Bar"));
}

#[test]
fn test_alias_from_third_module_imports_relocation_site() {
    let mut builder = two_modules();
    builder.add_module("C", vec![]).unwrap();
    builder
        .add_declaration(DeclarationSpec::new("A::Foo", DeclKind::Struct, "A"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("B::Bar", "B", "A::Foo").annotate("expose_here"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("C::Baz", "C", "A::Foo").annotate("visible"))
        .unwrap();

    let ctx = context(builder);
    let plan = resolve(&ctx).unwrap();
    let graph = ctx.graph();
    let a = graph.module_named("A").unwrap();
    let b = graph.module_named("B").unwrap();
    let c = graph.module_named("C").unwrap();
    let baz = graph.lookup("C::Baz").unwrap();

    assert_eq!(plan.len(), 1);
    let entry = plan.entry_named("A::Foo").unwrap();
    assert_eq!(entry.emission_module, b);
    assert_eq!(entry.external_name, "Bar");
    assert_eq!(entry.forwarded.len(), 1);
    assert_eq!(entry.forwarded[0].alias, baz);
    assert_eq!(entry.forwarded[0].module, c);

    // C binds the entry where it is emitted, not where it was declared
    let imports = plan.imports_of(c);
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].module, b);
    assert_eq!(imports[0].origin, ImportOrigin::Inferred { via: baz });
    assert!(plan.imports_of(b).is_empty());
    assert!(plan.imports_of(a).is_empty());

    assert_eq!(plan.lookup(baz).unwrap().qualified_name, "A::Foo");
}

#[test]
fn test_alias_chain_deduplicates_to_one_entry() {
    let mut builder = DeclarationGraphBuilder::new();
    builder.add_module("m", vec![]).unwrap();
    builder
        .add_declaration(DeclarationSpec::new("Target", DeclKind::Struct, "m").annotate("visible"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("First", "m", "Target").annotate("visible"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("Second", "m", "First").annotate("visible"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("Third", "m", "Second").annotate("visible"))
        .unwrap();

    let plan = resolve(&context(builder)).unwrap();
    assert_eq!(plan.len(), 1);
    let entry = &plan.entries()[0];
    assert_eq!(entry.qualified_name, "Target");
    assert_eq!(entry.external_name, "Target");
    let forwarded: Vec<&str> = entry.forwarded.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(forwarded, vec!["First", "Second", "Third"]);
}

#[test]
fn test_alias_to_namespace_is_skipped() {
    let mut builder = DeclarationGraphBuilder::new();
    builder.add_module("m", vec![]).unwrap();
    builder
        .add_declaration(DeclarationSpec::new("detail", DeclKind::Namespace, "m"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("NsAlias", "m", "detail").annotate("visible"))
        .unwrap();

    let plan = resolve(&context(builder)).unwrap();
    assert!(plan.is_empty());
}

#[test]
fn test_ambiguous_encouragement() {
    let mut builder = DeclarationGraphBuilder::new();
    builder.add_module("m", vec![]).unwrap();
    builder
        .add_declaration(DeclarationSpec::new("Thing", DeclKind::Struct, "m"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("One", "m", "Thing").annotate("encourage"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("Two", "m", "Thing").annotate("encourage"))
        .unwrap();

    let err = resolve(&context(builder)).unwrap_err();
    assert_eq!(
        err.errors,
        vec![ResolveError::AmbiguousEncouragement {
            target: "Thing".to_string(),
            aliases: vec!["One".to_string(), "Two".to_string()],
        }]
    );
}

#[test]
fn test_every_error_is_collected() {
    let mut builder = DeclarationGraphBuilder::new();
    builder.add_module("m", vec![]).unwrap();
    builder
        .add_declaration(DeclarationSpec::new("Odd", DeclKind::Struct, "m").annotate("sparkly"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("Lost", "m", "Nowhere").annotate("visible"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("Loop1", "m", "Loop2").annotate("visible"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("Loop2", "m", "Loop1"))
        .unwrap();
    builder
        .add_declaration(
            DeclarationSpec::new("Torn", DeclKind::Enum, "m")
                .annotate("visible")
                .annotate("hidden"),
        )
        .unwrap();

    let err = resolve(&context(builder)).unwrap_err();
    println!("{err}");

    let codes: Vec<String> = err.errors.iter().map(|e| e.status_code()).collect();
    assert_eq!(
        codes,
        vec![
            "UNKNOWN_ANNOTATION",
            "UNRESOLVED_ALIAS",
            "CYCLIC_ALIAS",
            "CONFLICTING_VISIBILITY",
        ]
    );
    assert_eq!(err.errors_with_code("CYCLIC_ALIAS").count(), 1);
    assert!(err.to_string().contains("Loop1 -> Loop2 -> Loop1"));
}

#[test]
fn test_hidden_target_is_never_emitted() {
    let mut builder = two_modules();
    builder
        .add_declaration(DeclarationSpec::new("A::Secret", DeclKind::Function, "A").annotate("hidden"))
        .unwrap();
    builder
        .add_declaration(
            DeclarationSpec::alias("B::Reveal", "B", "A::Secret").annotate("expose_here"),
        )
        .unwrap();

    let plan = resolve(&context(builder)).unwrap();
    assert!(plan.is_empty());
    assert!(plan.relocations().is_empty());
    assert_eq!(
        plan.warnings(),
        &[Warning::AliasToHidden {
            alias: "B::Reveal".to_string(),
            target: "A::Secret".to_string(),
        }]
    );
}

#[test]
fn test_hidden_alias_does_not_expose() {
    let mut builder = DeclarationGraphBuilder::new();
    builder.add_module("m", vec![]).unwrap();
    builder
        .add_declaration(DeclarationSpec::new("api", DeclKind::Namespace, "m").annotate("visible"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::new("Impl", DeclKind::Struct, "m"))
        .unwrap();
    builder
        .add_declaration(
            DeclarationSpec::alias("api::Quiet", "m", "Impl")
                .parent("api")
                .annotate("hidden"),
        )
        .unwrap();

    let plan = resolve(&context(builder)).unwrap();
    assert!(plan.is_empty());
}
