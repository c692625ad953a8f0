use super::*;
use crate::detectors::DetectionEngine;
use crate::graph::{Relation, SmellyGraphBuilder};
use crate::metrics::names;
use crate::models::{MethodSpec, Type};
use std::collections::HashSet;

fn long(sig: &str) -> MethodSpec {
    MethodSpec::new(sig).with_metric(names::METHOD_LOC, 80.0)
}

fn detect(types: Vec<Type>) -> Vec<Type> {
    DetectionEngine::new(1).run(types).expect("detection").0
}

fn scenario() -> Vec<Type> {
    detect(vec![
        Type::new("A")
            .with_metric(names::NUMBER_OF_PUBLIC_ATTRIBUTES, 3.0)
            .with_method(long("m1()"))
            .with_method(long("m2()")),
        Type::new("B").with_method(long("m3()")),
        Type::new("Lonely").with_metric(names::NUMBER_OF_PUBLIC_ATTRIBUTES, 2.0),
    ])
}

fn find(types: &[Type], relations: &Vec<Relation>) -> Vec<Agglomeration> {
    let (graph, _) = SmellyGraphBuilder::new(types)
        .with_relations(relations)
        .build();
    AgglomerationFinder::new().find_all(&graph)
}

#[test]
fn test_containment_clusters() {
    let types = scenario();
    let found = find(&types, &Vec::new());

    assert_eq!(found.len(), 3);
    assert_eq!(found[0].members, vec!["A", "A::m1()", "A::m2()"]);
    assert_eq!(found[1].members, vec!["B", "B::m3()"]);
    assert_eq!(found[2].members, vec!["Lonely"]);

    assert_eq!(found[0].types, 1);
    assert_eq!(found[0].methods, 2);
    assert_eq!(found[0].smell_histogram.get(&SmellKind::LongMethod), Some(&2));
    assert_eq!(
        found[0].smell_histogram.get(&SmellKind::ClassDataShouldBePrivate),
        Some(&1)
    );
    assert_eq!(found[1].smelly_members, 1);
    assert!(found[1].relation_kinds.contains(&RelationKind::Contains));
    assert!(found[2].relation_kinds.is_empty());
}

#[test]
fn test_partition_is_total() {
    let types = scenario();
    let relations = vec![Relation::new("A::m1()", "B::m3()", RelationKind::Calls)];
    let (graph, _) = SmellyGraphBuilder::new(&types)
        .with_relations(&relations)
        .build();
    let found = AgglomerationFinder::new().find_all(&graph);

    let mut seen = HashSet::new();
    for agglomeration in &found {
        for member in &agglomeration.members {
            assert!(seen.insert(member.clone()), "{} in two clusters", member);
        }
    }
    let all: HashSet<String> = graph.nodes().map(|n| n.id.clone()).collect();
    assert_eq!(seen, all);
    assert_eq!(found.iter().map(|a| a.size).sum::<usize>(), graph.node_count());
}

#[test]
fn test_coupling_joins_clusters() {
    let types = scenario();
    let relations = vec![Relation::new("A::m1()", "B::m3()", RelationKind::Calls)];
    let found = find(&types, &relations);

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].size, 5);
    assert!(found[0].contains("B::m3()"));
    assert!(found[0].relation_kinds.contains(&RelationKind::Calls));
}

#[test]
fn test_empty_graph() {
    let found = AgglomerationFinder::new().find_all(&SmellyGraph::new());
    assert!(found.is_empty());

    let report = AgglomerationReport::new(found, AgglomerationPolicy::default());
    assert!(report.is_empty());
    assert_eq!(report.coverage.smelly_coverage, None);
}

#[test]
fn test_ordering_is_deterministic() {
    let build = || {
        detect(vec![
            Type::new("Zed").with_method(long("z()")),
            Type::new("Alpha").with_method(long("a()")),
            Type::new("Mid").with_method(long("m()")),
        ])
    };
    let first = find(&build(), &Vec::new());
    let second = find(&build(), &Vec::new());
    assert_eq!(first, second);

    let heads: Vec<&str> = first.iter().map(|a| a.first_member()).collect();
    assert_eq!(heads, vec!["Alpha", "Mid", "Zed"]);
}

#[test]
fn test_report_applies_min_size() {
    let types = scenario();
    let found = find(&types, &Vec::new());
    let report = AgglomerationReport::new(found, AgglomerationPolicy::new(2));

    assert_eq!(report.len(), 2);
    assert_eq!(report.coverage.total_components, 3);
    assert_eq!(report.coverage.reported_components, 2);
    assert_eq!(report.coverage.total_nodes, 6);
    assert_eq!(report.coverage.covered_nodes, 5);
    // smelly: A, A::m1(), A::m2(), B::m3(), Lonely
    assert_eq!(report.coverage.smelly_nodes, 5);
    assert_eq!(report.coverage.covered_smelly_nodes, 4);
    assert_eq!(report.coverage.largest_size, 3);
}

#[test]
fn test_policy_keeps_singletons_at_one() {
    let types = scenario();
    let report = AgglomerationReport::new(find(&types, &Vec::new()), AgglomerationPolicy::new(0));
    assert_eq!(report.min_size, 1);
    assert_eq!(report.len(), 3);
}
