use bindplan::io::{ExitCode, JsonResponse};
use bindplan::{GraphDocument, GraphError, load_graph};
use std::fs;
use tempfile::TempDir;

fn write_graph(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("graph.json");
    fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_missing_file_maps_to_io_exit_code() {
    let dir = TempDir::new().unwrap();
    let err = load_graph(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, GraphError::FileRead { .. }));
    assert_eq!(ExitCode::from_graph_error(&err), ExitCode::IoError);
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_graph(&dir, "{ \"modules\": [ ");
    let err = load_graph(&path).unwrap_err();
    assert_eq!(err.status_code(), "GRAPH_PARSE_ERROR");

    let response = JsonResponse::from_graph_error(&err);
    assert_eq!(response.exit_code, ExitCode::ParseError as u8);
}

#[test]
fn test_unknown_kind_is_rejected() {
    let json = r#"{
        "modules": [{ "name": "m" }],
        "declarations": [{ "name": "X", "kind": "concept", "module": "m" }]
    }"#;
    let err = GraphDocument::from_json(json).unwrap().into_graph().unwrap_err();
    assert_eq!(err.status_code(), "INVALID_KIND");
}

#[test]
fn test_declaration_in_unknown_module_is_rejected() {
    let json = r#"{
        "modules": [{ "name": "m" }],
        "declarations": [{ "name": "X", "kind": "struct", "module": "elsewhere" }]
    }"#;
    let err = GraphDocument::from_json(json).unwrap().into_graph().unwrap_err();
    assert!(matches!(err, GraphError::UnknownModule { .. }));
}

#[test]
fn test_namespace_parent_cycle_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_graph(
        &dir,
        r#"{
            "modules": [{ "name": "m" }],
            "declarations": [
                { "name": "outer", "kind": "namespace", "module": "m", "parent": "inner" },
                { "name": "inner", "kind": "namespace", "module": "m", "parent": "outer" },
                { "name": "inner::Thing", "kind": "struct", "module": "m", "parent": "inner",
                  "annotations": [ { "tag": "visible" } ] }
            ]
        }"#,
    );
    let err = load_graph(&path).unwrap_err();
    assert_eq!(err.status_code(), "CYCLIC_PARENT");
    assert_eq!(ExitCode::from_graph_error(&err), ExitCode::ParseError);
}

#[test]
fn test_loaded_graph_keeps_source_order() {
    let dir = TempDir::new().unwrap();
    let path = write_graph(
        &dir,
        r#"{
            "modules": [{ "name": "second" }, { "name": "first" }],
            "declarations": [
                { "name": "B", "kind": "struct", "module": "first" },
                { "name": "A", "kind": "struct", "module": "first" },
                { "name": "C", "kind": "enum", "module": "second" }
            ]
        }"#,
    );
    let graph = load_graph(&path).unwrap();

    let order: Vec<&str> = graph
        .traversal_order()
        .map(|id| graph.declaration(id).name.as_str())
        .collect();
    assert_eq!(order, vec!["C", "B", "A"]);
}
