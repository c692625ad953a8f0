//! End-to-end tests for smellgraph
//!
//! Each test writes a metrics document into its own temp directory, runs
//! the pipeline (or the binary) and checks the written JSON files.

use smellgraph::pipeline::Pipeline;
use smellgraph::reporters::{write_outputs, OutputOptions};
use smellgraph::SmellError;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A has two complex methods, B one; no relations between them
const TWO_CLUSTERS: &str = r#"{
    "types": [
        {
            "name": "A",
            "methods": [
                { "signature": "m1()", "metrics": { "cyclomaticComplexity": 25 } },
                { "signature": "m2()", "metrics": { "cyclomaticComplexity": 30 } },
                { "signature": "clean()", "metrics": { "methodLoc": 4 } }
            ]
        },
        {
            "name": "B",
            "methods": [
                { "signature": "m3()", "metrics": { "cyclomaticComplexity": 40 } }
            ]
        },
        {
            "name": "C",
            "methods": [ { "signature": "ok()", "metrics": { "methodLoc": 2 } } ]
        }
    ]
}"#;

fn write_metrics(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("metrics.json");
    std::fs::write(&path, content).expect("write metrics");
    path
}

fn read_json(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("read output");
    serde_json::from_str(&content).expect("valid JSON")
}

fn member_sets(report: &serde_json::Value) -> Vec<Vec<String>> {
    report["agglomerations"]
        .as_array()
        .expect("agglomerations array")
        .iter()
        .map(|a| {
            a["members"]
                .as_array()
                .expect("members array")
                .iter()
                .map(|m| m.as_str().expect("member id").to_string())
                .collect()
        })
        .collect()
}

#[test]
fn test_two_clusters_end_to_end() {
    let dir = TempDir::new().expect("temp dir");
    let metrics = write_metrics(dir.path(), TWO_CLUSTERS);

    let result = Pipeline::new()
        .with_workers(2)
        .run_path(&metrics)
        .expect("run");
    assert_eq!(result.detection.types, 3);
    assert_eq!(result.detection.smelly_methods, 3);

    let options = OutputOptions {
        smells_file: dir.path().join("smells.json"),
        agglomerations_file: dir.path().join("agglomerations.json"),
        only_smelly: false,
    };
    write_outputs(&result, &options).expect("write");

    let smells = read_json(&options.smells_file);
    let names: Vec<_> = smells
        .as_array()
        .expect("types array")
        .iter()
        .map(|t| t["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);

    let report = read_json(&options.agglomerations_file);
    assert_eq!(
        member_sets(&report),
        vec![
            vec!["A", "A::m1()", "A::m2()"],
            vec!["B", "B::m3()"],
        ]
    );
    assert_eq!(report["agglomerations"][0]["smellHistogram"]["HighComplexity"], 2);
}

#[test]
fn test_coupling_relation_merges_clusters() {
    let dir = TempDir::new().expect("temp dir");
    let doc = TWO_CLUSTERS.trim_end().trim_end_matches('}').to_string()
        + r#", "relations": [
            { "from": "A::m1()", "to": "B::m3()", "kind": "calls" },
            { "from": "A::m1()", "to": "C::ok()", "kind": "calls" }
        ] }"#;
    let metrics = write_metrics(dir.path(), &doc);

    let result = Pipeline::new().run_path(&metrics).expect("run");
    let report = result.agglomerations.expect("agglomerations collected");

    assert_eq!(report.len(), 1);
    // C::ok() is clean but joins as the far end of a coupling edge
    assert_eq!(
        report.agglomerations[0].members,
        vec!["A", "A::m1()", "A::m2()", "B", "B::m3()", "C::ok()"]
    );
    // A carries ComplexClass; B and C::ok() have no smells of their own
    assert_eq!(report.agglomerations[0].smelly_members, 4);
    assert_eq!(report.coverage.total_nodes, 6);
    assert_eq!(report.coverage.smelly_nodes, 4);
    assert_eq!(report.coverage.covered_smelly_nodes, 4);
    assert!(!report.agglomerations[0].contains("C"));
}

#[test]
fn test_duplicate_type_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let metrics = write_metrics(
        dir.path(),
        r#"{ "types": [ { "name": "A" }, { "name": "A" } ] }"#,
    );

    let err = Pipeline::new().run_path(&metrics).expect_err("duplicate type");
    let cause = err
        .chain()
        .find_map(|e| e.downcast_ref::<SmellError>())
        .expect("smell error in chain");
    assert!(matches!(cause, SmellError::DuplicateType(name) if name == "A"));
}

#[test]
fn test_empty_document() {
    let dir = TempDir::new().expect("temp dir");
    let metrics = write_metrics(dir.path(), r#"{ "types": [] }"#);

    let result = Pipeline::new().run_path(&metrics).expect("run");
    assert_eq!(result.detection.total_smells, 0);
    assert!(result.agglomerations.expect("collected").is_empty());
}

#[test]
fn test_binary_writes_outputs() {
    let dir = TempDir::new().expect("temp dir");
    let metrics = write_metrics(dir.path(), TWO_CLUSTERS);
    let smells_file = dir.path().join("out/smells.json");
    let agglomerations_file = dir.path().join("out/agglomerations.json");

    let output = Command::new(env!("CARGO_BIN_EXE_smellgraph"))
        .current_dir(dir.path())
        .arg(&metrics)
        .arg("--smells-file")
        .arg(&smells_file)
        .arg("--agglomerations-file")
        .arg(&agglomerations_file)
        .arg("--only-smelly")
        .args(["--workers", "1", "--log-level", "warn"])
        .env_remove("RUST_LOG")
        .env_remove("SMELLGRAPH_CONFIG")
        .output()
        .expect("run binary");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Agglomerations: 2"));

    let smells = read_json(&smells_file);
    assert_eq!(smells.as_array().map(Vec::len), Some(2));
    assert_eq!(smells[0]["methods"].as_array().map(Vec::len), Some(2));
    assert_eq!(member_sets(&read_json(&agglomerations_file)).len(), 2);
}

#[test]
fn test_binary_respects_config_file() {
    let dir = TempDir::new().expect("temp dir");
    let metrics = write_metrics(dir.path(), TWO_CLUSTERS);
    std::fs::write(
        dir.path().join("smellgraph.toml"),
        "[agglomeration]\nmin_size = 3\n\n[detectors.high-complexity]\nenabled = true\n",
    )
    .expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_smellgraph"))
        .current_dir(dir.path())
        .arg(&metrics)
        .env_remove("RUST_LOG")
        .env_remove("SMELLGRAPH_CONFIG")
        .output()
        .expect("run binary");
    assert!(output.status.success());

    let report = read_json(&dir.path().join("agglomerations.json"));
    assert_eq!(report["minSize"], 3);
    assert_eq!(member_sets(&report), vec![vec!["A", "A::m1()", "A::m2()"]]);
}

#[test]
fn test_binary_fails_on_missing_input() {
    let dir = TempDir::new().expect("temp dir");
    let output = Command::new(env!("CARGO_BIN_EXE_smellgraph"))
        .current_dir(dir.path())
        .arg(dir.path().join("missing.json"))
        .env_remove("SMELLGRAPH_CONFIG")
        .output()
        .expect("run binary");

    assert!(!output.status.success());
    assert!(!dir.path().join("smells.json").exists());
}
