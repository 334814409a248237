use bindplan::config::ResolutionConfig;
use bindplan::modules::ImportOrigin;
use bindplan::{
    DeclKind, DeclarationGraphBuilder, DeclarationSpec, RawAnnotation, ResolveError, RunContext,
    Warning, resolve,
};

fn context(builder: DeclarationGraphBuilder) -> RunContext {
    RunContext::new(builder.build().unwrap(), ResolutionConfig::default())
}

fn manual(code: &str) -> RawAnnotation {
    RawAnnotation::with_payload("manual", code)
}

fn import(module: &str) -> RawAnnotation {
    RawAnnotation::with_payload("import", module)
}

#[test]
fn test_manual_import_requires_declaration() {
    let mut builder = DeclarationGraphBuilder::new();
    builder.add_module("base", vec![]).unwrap();
    builder
        .add_module("user", vec![manual(r#"::pybind11::module::import("base");"#)])
        .unwrap();

    let err = resolve(&context(builder)).unwrap_err();
    assert_eq!(
        err.errors,
        vec![ResolveError::MissingImportDeclaration {
            module: "user".to_string(),
            referenced: "base".to_string(),
        }]
    );
}

#[test]
fn test_manual_import_on_namespace_with_declared_import() {
    let mut builder = DeclarationGraphBuilder::new();
    builder.add_module("base", vec![]).unwrap();
    builder.add_module("user", vec![]).unwrap();
    builder
        .add_declaration(
            DeclarationSpec::new("user_ns", DeclKind::Namespace, "user")
                .annotate_with("import", "base")
                .annotate_with("manual", r#"py::module::import( "base" );"#),
        )
        .unwrap();

    let ctx = context(builder);
    let plan = resolve(&ctx).unwrap();
    let user = ctx.graph().module_named("user").unwrap();
    let base = ctx.graph().module_named("base").unwrap();

    let imports = plan.imports_of(user);
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].module, base);
    assert_eq!(imports[0].origin, ImportOrigin::Explicit);
    assert_eq!(plan.module(user).manual_blocks[0].owner, "user_ns");
}

#[test]
fn test_manual_import_of_host_library_resolves() {
    let mut builder = DeclarationGraphBuilder::new();
    builder.add_module("base", vec![import("base_helpers")]).unwrap();
    builder.add_module("base_helpers", vec![]).unwrap();
    builder
        .add_module(
            "arrays",
            vec![
                import("base"),
                manual(
                    r#"auto np = py::module::import("numpy");
                       py::module::import("base");"#,
                ),
            ],
        )
        .unwrap();

    let ctx = context(builder);
    let plan = resolve(&ctx).expect("host library imports need no annotation");
    let arrays = ctx.graph().module_named("arrays").unwrap();

    let imported: Vec<&str> = plan
        .imports_of(arrays)
        .iter()
        .map(|i| ctx.graph().module(i.module).name.as_str())
        .collect();
    assert_eq!(imported, vec!["base"]);
    assert_eq!(
        plan.module(arrays).manual_blocks[0].references,
        vec!["numpy".to_string(), "base".to_string()]
    );
}

#[test]
fn test_manual_self_reference_needs_no_import() {
    let mut builder = DeclarationGraphBuilder::new();
    builder
        .add_module("solo", vec![manual(r#"m.attr("x") = py::module::import("solo");"#)])
        .unwrap();

    let plan = resolve(&context(builder)).unwrap();
    assert!(plan.modules()[0].imports.is_empty());
}

#[test]
fn test_dangling_import_is_an_error() {
    let mut builder = DeclarationGraphBuilder::new();
    builder.add_module("lonely", vec![import("ghost")]).unwrap();

    let err = resolve(&context(builder)).unwrap_err();
    assert_eq!(
        err.errors,
        vec![ResolveError::DanglingImport {
            module: "lonely".to_string(),
            target: "ghost".to_string(),
        }]
    );
}

#[test]
fn test_self_import_is_dropped_with_warning() {
    let mut builder = DeclarationGraphBuilder::new();
    builder.add_module("narcissus", vec![import("narcissus")]).unwrap();

    let plan = resolve(&context(builder)).unwrap();
    assert!(plan.modules()[0].imports.is_empty());
    assert_eq!(
        plan.warnings(),
        &[Warning::SelfImport {
            module: "narcissus".to_string()
        }]
    );
}

#[test]
fn test_import_cycle_is_a_warning() {
    let mut builder = DeclarationGraphBuilder::new();
    builder.add_module("left", vec![import("right")]).unwrap();
    builder.add_module("right", vec![]).unwrap();
    builder
        .add_declaration(DeclarationSpec::new("right::Thing", DeclKind::Struct, "right"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::new("left::Other", DeclKind::Struct, "left"))
        .unwrap();
    // right binds an alias to something emitted in left, which infers right -> left
    builder
        .add_declaration(
            DeclarationSpec::alias("right::OtherAlias", "right", "left::Other").annotate("encourage"),
        )
        .unwrap();

    let ctx = context(builder);
    let plan = resolve(&ctx).expect("import cycles do not invalidate a plan");
    let left = ctx.graph().module_named("left").unwrap();

    assert_eq!(plan.imports_of(ctx.graph().module_named("right").unwrap())[0].module, left);
    assert_eq!(
        plan.warnings(),
        &[Warning::ImportCycle {
            modules: vec!["left".to_string(), "right".to_string()],
        }]
    );
}

#[test]
fn test_inferred_imports_follow_traversal_order() {
    let mut builder = DeclarationGraphBuilder::new();
    builder.add_module("core", vec![]).unwrap();
    builder.add_module("extra", vec![]).unwrap();
    builder.add_module("front", vec![]).unwrap();
    builder
        .add_declaration(DeclarationSpec::new("core::Engine", DeclKind::Struct, "core").annotate("visible"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::new("extra::Plugin", DeclKind::Struct, "extra").annotate("visible"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("front::Plugin", "front", "extra::Plugin").annotate("visible"))
        .unwrap();
    builder
        .add_declaration(DeclarationSpec::alias("front::Engine", "front", "core::Engine").annotate("visible"))
        .unwrap();

    let ctx = context(builder);
    let plan = resolve(&ctx).unwrap();
    let graph = ctx.graph();
    let front = graph.module_named("front").unwrap();

    let imported: Vec<&str> = plan
        .imports_of(front)
        .iter()
        .map(|i| graph.module(i.module).name.as_str())
        .collect();
    // Entries are decided in first-touch order: core::Engine before extra::Plugin
    assert_eq!(imported, vec!["core", "extra"]);
}
