//! End-to-end tests for `probemapper layouts` command.

use tempfile::TempDir;

mod fixtures;
use fixtures::*;

const CATALOG: &str = r#"
[[omnetics]]
probe_type = "cambridge"
connector = "assy-4"
pins = [3, 1, 0, 2]

[[intan]]
name = "intan4"
pins = [0, 1, 2, 3]
"#;

#[test]
fn test_layouts_list() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["layouts"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("Omnetics connectors (4):"));
    assert!(stdout.contains("neuronexus-H64LP"));
    assert!(stdout.contains("Intan headstages (3):"));
    assert!(stdout.contains("intan32"));
}

#[test]
fn test_layouts_json() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["layouts", "--json"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let result: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("Should parse JSON output");
    let omnetics = result["omnetics"].as_array().unwrap();
    assert_eq!(omnetics.len(), 4);
    assert_eq!(omnetics[0]["key"], "neuronexus-H16");
    assert_eq!(omnetics[0]["name"], "neuronexus_H16");
    assert_eq!(omnetics[0]["channels"], 16);

    let sizes: Vec<u64> = result["intan"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["channels"].as_u64().unwrap())
        .collect();
    assert_eq!(sizes, vec![16, 32, 64]);
}

#[test]
fn test_layouts_filter() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["layouts", "--filter", "H64", "--json"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let result: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let keys: Vec<&str> = result["omnetics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["neuronexus-H64", "neuronexus-H64LP"]);
    assert_eq!(result["intan"].as_array().unwrap().len(), 0);
}

#[test]
fn test_layouts_filter_no_match() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["layouts", "--filter", "^nothing$"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No layouts match filter"));
}

#[test]
fn test_layouts_invalid_regex() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["layouts", "--filter", "(unclosed"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid regex pattern"));
}

#[test]
fn test_layouts_show() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["layouts", "--show", "neuronexus-h16"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("neuronexus_H16 (16 channels)"));
}

#[test]
fn test_layouts_show_json() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["layouts", "--show", "intan16", "--json"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let result: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(result["name"], "intan16");
    assert_eq!(result["pins"].as_array().unwrap().len(), 16);
}

#[test]
fn test_layouts_show_unknown() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(temp_dir.path(), &["layouts", "--show", "intan128"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = stderr(&output);
    assert!(stderr.contains("Unknown layout 'intan128'"));
    assert!(stderr.contains("neuronexus-H32"));
}

#[test]
fn test_layouts_with_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = write_file(temp_dir.path(), "catalog.toml", CATALOG);
    let output = run(
        temp_dir.path(),
        &["layouts", "--catalog", catalog.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("Omnetics connectors (5):"));
    assert!(stdout.contains("cambridge-ASSY-4"));
    assert!(stdout.contains("intan4"));
}

#[test]
fn test_catalog_cannot_replace_builtin() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = write_file(
        temp_dir.path(),
        "catalog.toml",
        "[[intan]]\npins = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]\n",
    );
    let output = run(
        temp_dir.path(),
        &["layouts", "--catalog", catalog.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("already registered"));
}

#[test]
fn test_map_with_catalog_layouts() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = write_file(temp_dir.path(), "catalog.toml", CATALOG);
    let output = run(
        temp_dir.path(),
        &[
            "map",
            "--catalog",
            catalog.to_str().unwrap(),
            "--probe-type",
            "Cambridge",
            "--connector",
            "assy-4",
            "--probe-name",
            "tiny",
            "--channel-map",
            "0-3",
            "--chan-per-shank",
            "2,2",
            "--dry-run",
            "--json",
        ],
    );
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let result: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(result["intan_layout"], "intan4");
    assert_eq!(result["orientations"][0]["channels"], serde_json::json!([2, 1, 3, 0]));
    assert_eq!(result["orientations"][1]["channels"], serde_json::json!([1, 2, 0, 3]));
    assert_eq!(
        result["orientations"][0]["shanks"],
        serde_json::json!([[2, 1], [3, 0]])
    );
}
