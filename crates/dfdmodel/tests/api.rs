//! Integration tests for the public API

use dfdmodel::prelude::*;
use dfdmodel::{build_model, classify, parse};
use std::collections::BTreeSet;

const EXAMPLE: &str = "A [label=\"User\"];\nB [label=\"Web Application\"];\nA -> B;";

#[test]
fn test_declaration_yields_label() {
    let db = parse("web [label=\"Web Application\"];").unwrap();
    assert_eq!(db.label_of("web"), Some("Web Application"));
}

#[test]
fn test_label_is_trimmed() {
    let db = parse("api [label=\"  Order API  \"];").unwrap();
    assert_eq!(db.label_of("api"), Some("Order API"));
}

#[test]
fn test_edges_preserve_order_with_forward_references() {
    let db = parse(
        "c -> a;\na -> b;\nb -> c;\na [label=\"A\"];\nb [label=\"B\"];\nc [label=\"C\"];",
    )
    .unwrap();

    let edges: Vec<_> = db
        .edges()
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();
    assert_eq!(edges, vec![("c", "a"), ("a", "b"), ("b", "c")]);

    let names: Vec<_> = classify(&db)
        .dataflows(&db)
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["C to A", "A to B", "B to C"]);
}

#[test]
fn test_duplicate_edges_preserved_by_parser() {
    let db = parse("a -> b;\na -> b;").unwrap();
    assert_eq!(db.edge_count(), 2);
}

#[test]
fn test_redeclared_node_last_label_wins() {
    let db = parse("a [label=\"Old\"];\nb [label=\"B\"];\na [label=\"New\"];").unwrap();
    assert_eq!(db.node_count(), 2);
    assert_eq!(db.label_of("a"), Some("New"));
}

#[test]
fn test_first_quote_ends_label() {
    let db = parse(r#"a [label="Say \"hi\""];"#).unwrap();
    assert_eq!(db.label_of("a"), Some("Say \\"));
}

#[test]
fn test_malformed_lines_are_skipped() {
    let db = parse("digraph {\n  ]weird[\n  [label=\"no id\"];\n  just text\n}").unwrap();
    assert_eq!(db.node_count(), 0);
    assert_eq!(db.edge_count(), 0);
}

#[test]
fn test_classification_any_case_user() {
    let db = parse(
        "a [label=\"USER\"];\nb [label=\"power user\"];\nc [label=\"UsEr portal\"];\nd [label=\"Web Application\"];",
    )
    .unwrap();
    let classification = classify(&db);

    for id in ["a", "b", "c"] {
        assert_eq!(classification.role_of(id), Some(Role::Actor), "node {}", id);
    }
    assert_eq!(classification.role_of("d"), Some(Role::Process));
}

#[test]
fn test_dropped_edge_does_not_fail() {
    let model = build_model("a [label=\"User\"];\na -> ghost;\nghost -> a;").unwrap();
    assert_eq!(model.actors().len(), 1);
    assert!(model.dataflows().is_empty());
}

#[test]
fn test_example_user_to_web_application() {
    let model = build_model(EXAMPLE).unwrap();

    assert_eq!(model.actors().len(), 1);
    assert_eq!(model.actors()[0].name, "User");
    assert_eq!(model.processes().len(), 1);
    assert_eq!(model.processes()[0].name, "Web Application");
    assert_eq!(model.dataflows().len(), 1);
    assert_eq!(model.dataflows()[0].name, "User to Web Application");
    assert_eq!(model.dataflows()[0].source.role, Role::Actor);
    assert_eq!(model.dataflows()[0].target.role, Role::Process);
}

#[test]
fn test_example_only_undeclared_edge() {
    let model = build_model("X -> Y;").unwrap();
    assert!(model.actors().is_empty());
    assert!(model.processes().is_empty());
    assert!(model.dataflows().is_empty());
}

#[test]
fn test_all_role_pairings_allowed() {
    let model = build_model(
        "u [label=\"User\"];\nc [label=\"Client\"];\np [label=\"API\"];\nq [label=\"Queue\"];\nu -> c;\np -> q;\np -> u;\nu -> p;",
    )
    .unwrap();

    let pairs: Vec<_> = model
        .dataflows()
        .iter()
        .map(|f| (f.source.role, f.target.role))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (Role::Actor, Role::Actor),
            (Role::Process, Role::Process),
            (Role::Process, Role::Actor),
            (Role::Actor, Role::Process),
        ]
    );
}

#[test]
fn test_self_loop() {
    let model = build_model("w [label=\"Worker\"];\nw -> w;").unwrap();
    assert_eq!(model.dataflows()[0].name, "Worker to Worker");
}

#[test]
fn test_repeated_edges_kept_through_json() {
    let input = "A [label=\"User\"];\nB [label=\"Web Application\"];\nA -> B;\nA -> B;";
    let db = parse(input).unwrap();
    let constructed = classify(&db).dataflows(&db).len();
    assert_eq!(constructed, 2);

    let model = build_model(input).unwrap();
    assert_eq!(model.dataflows().len(), constructed);

    let json = ModelDocument::from_model(&model, &BTreeSet::new())
        .to_json()
        .unwrap();
    let reparsed = ModelDocument::from_json(&json).unwrap();
    assert_eq!(reparsed.dataflows.len(), constructed);
    assert!(reparsed
        .dataflows
        .iter()
        .all(|flow| flow.name == "User to Web Application"));
}
