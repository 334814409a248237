use bindplan::config::ResolutionConfig;
use bindplan::modules::ImportOrigin;
use bindplan::{ExposureKind, PlanReport, RunContext, load_graph, resolve};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn load_context() -> RunContext {
    let graph = load_graph(fixture("typedefs_across_modules.json")).expect("fixture should load");
    RunContext::new(graph, ResolutionConfig::default())
}

#[test]
fn test_typedefs_across_modules_plan() {
    println!("\n=== Typedefs across modules ===");
    let ctx = load_context();
    let plan = resolve(&ctx).expect("plan should be valid");

    for entry in plan.entries() {
        println!(
            "  {} -> '{}' ({:?})",
            entry.qualified_name, entry.external_name, entry.exposure
        );
    }

    let names: Vec<&str> = plan
        .entries()
        .iter()
        .map(|e| e.qualified_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "example::nested::Definition",
            "example::nested::EncouragedFromOtherModule",
            "example::nested::ExposedInOtherModule",
        ]
    );

    let graph = ctx.graph();
    let definition_module = graph.module_named("typedefs_across_modules_definition").unwrap();
    let using_module = graph.module_named("typedefs_across_modules").unwrap();

    // Definition keeps its own name; every visible alias is forwarded to it
    let definition = plan.entry_named("example::nested::Definition").unwrap();
    assert_eq!(definition.external_name, "Definition");
    assert_eq!(definition.exposure, ExposureKind::Direct);
    assert_eq!(definition.emission_module, definition_module);
    let forwarded: Vec<&str> = definition.forwarded.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(forwarded, vec!["Alias", "AliasOfDefinition", "AliasOfAlias"]);

    let encouraged = plan
        .entry_named("example::nested::EncouragedFromOtherModule")
        .unwrap();
    assert_eq!(encouraged.external_name, "AliasToEncouraged");
    assert_eq!(encouraged.emission_module, definition_module);
    assert_eq!(
        encouraged.named_by,
        graph.lookup("AliasToEncouraged"),
        "the encouraged alias names the entry"
    );

    let exposed = plan
        .entry_named("example::nested::ExposedInOtherModule")
        .unwrap();
    assert_eq!(exposed.external_name, "ExposedHere");
    assert_eq!(exposed.exposure, ExposureKind::Relocated);
    assert_eq!(exposed.emission_module, using_module);
    assert_eq!(exposed.home_module, definition_module);
    assert_eq!(plan.relocations().len(), 1);

    assert!(plan.warnings().is_empty());
}

#[test]
fn test_typedefs_across_modules_imports() {
    let ctx = load_context();
    let plan = resolve(&ctx).unwrap();
    let graph = ctx.graph();

    let definition_module = graph.module_named("typedefs_across_modules_definition").unwrap();
    let using_module = graph.module_named("typedefs_across_modules").unwrap();

    // The explicit import wins over the inferred one for the same module
    let imports = plan.imports_of(using_module);
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].module, definition_module);
    assert_eq!(imports[0].origin, ImportOrigin::Explicit);

    assert!(plan.imports_of(definition_module).is_empty());

    let manual = &plan.module(using_module).manual_blocks;
    assert_eq!(manual.len(), 1);
    assert_eq!(
        manual[0].references,
        vec!["typedefs_across_modules_definition".to_string()]
    );
}

#[test]
fn test_typedefs_across_modules_report() {
    let ctx = load_context();
    let plan = resolve(&ctx).unwrap();
    let report = PlanReport::new(&plan, ctx.graph());

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["entries"].as_array().unwrap().len(), 3);
    assert_eq!(json["entries"][2]["exposure"], "relocated");
    assert_eq!(json["entries"][2]["emission_module"], "typedefs_across_modules");
    assert_eq!(json["relocations"][0]["via"], "ExposedHere");
    assert_eq!(
        json["modules"][1]["imports"][0]["module"],
        "typedefs_across_modules_definition"
    );
}
