//! Tests for the end-to-end transformation from NDJSON statements to XML.

use nta_builder::*;
use std::io::Write;

fn write_trace(dir: &tempfile::TempDir, filename: &str, lines: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join(filename);
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

#[test]
fn test_transform_file_writes_xml() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_trace(
        &dir,
        "counter.ndjson",
        &[
            r#"{"kind": "global_declaration", "expr": "int x = 0;"}"#,
            r#"{"kind": "test", "expr": "x < 10"}"#,
            r#"{"kind": "update", "expr": "x := x + 1"}"#,
            r#"{"kind": "update", "expr": "x := x * 2"}"#,
        ],
    );

    let config = TransformConfig::builder()
        .output(dir.path().join("counter"))
        .template_name("Counter")
        .location_prefix("S")
        .initial_comment("counter.ndjson")
        .build()
        .unwrap();

    let outcome = transform_file(&config, &input).unwrap();
    assert_eq!(outcome.xml_path, dir.path().join("counter.xml"));
    assert_eq!(outcome.locations, 3);
    assert_eq!(outcome.edges, 2);
    assert_eq!(outcome.snapshot_path, None);

    let xml = std::fs::read_to_string(&outcome.xml_path).unwrap();
    assert!(xml.contains("<declaration>\nint x = 0;\n</declaration>"));
    assert!(xml.contains("<name>Counter</name>"));
    assert!(xml.contains("<label kind=\"comments\">counter.ndjson</label>"));
    assert!(xml.contains("<init ref=\"S_0\"/>"));
    assert!(xml.contains(concat!(
        "<source ref=\"S_0\"/>\n",
        "<target ref=\"S_1\"/>\n",
        "<label kind=\"guard\">x &lt; 10</label>\n",
        "<label kind=\"assignment\">x := x + 1</label>\n",
    )));
    assert!(xml.contains(concat!(
        "<source ref=\"S_1\"/>\n",
        "<target ref=\"S_2\"/>\n",
        "<label kind=\"assignment\">x := x * 2</label>\n",
    )));
    assert!(xml.contains("Process1 =  Counter();"));
}

#[cfg(feature = "snapshot")]
#[test]
fn test_transform_with_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = TransformConfig::builder()
        .output(dir.path().join("model"))
        .snapshot(true)
        .build()
        .unwrap();

    let outcome = run_transformation(&config, &[Statement::update("y := 1")]).unwrap();
    let snapshot = outcome.snapshot_path.unwrap();
    assert_eq!(snapshot, dir.path().join("model.uppaal"));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&snapshot).unwrap()).unwrap();
    assert_eq!(value["name"], "nta");
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = TransformConfig::from(dir.path().join("out"));
    let err = transform_file(&config, &dir.path().join("absent.ndjson")).unwrap_err();
    assert!(matches!(err, Error::Statement(StatementError::NotFound(_))));
}

#[test]
fn test_empty_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_trace(&dir, "empty.ndjson", &["", "   "]);
    let err = load_statements(&input).unwrap_err();
    assert!(matches!(err, StatementError::Empty(_)));
}

#[test]
fn test_invalid_statement_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_trace(
        &dir,
        "bad.ndjson",
        &[r#"{"kind": "update", "expr": "a := 1"}"#, r#"{"kind": "update"}"#],
    );
    let err = load_statements(&input).unwrap_err();
    assert!(matches!(err, StatementError::InvalidJson { line: 2, .. }));
}

#[test]
fn test_unwritable_output_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = TransformConfig::from(dir.path().join("no_such_dir").join("out"));
    let err = run_transformation(&config, &[Statement::update("a := 1")]).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_concurrent_runs_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let mut handles = Vec::new();
    for i in 0..4 {
        let lines: Vec<String> = (0..=i)
            .map(|n| format!(r#"{{"kind": "update", "expr": "x := {n}"}}"#))
            .collect();
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let input = write_trace(&dir, &format!("run{i}.ndjson"), &lines);
        let config = TransformConfig::from(dir.path().join(format!("run{i}")));
        handles.push((i, spawn_transformation(config, input).unwrap()));
    }

    for (i, handle) in handles {
        let outcome = handle.join().unwrap().unwrap();
        assert_eq!(outcome.locations, i + 2);
        let xml = std::fs::read_to_string(&outcome.xml_path).unwrap();
        // Every run numbers its own locations from zero.
        assert!(xml.contains("<init ref=\"Location_0\"/>"));
        assert!(xml.contains("Process1 =  Process();"));
    }
}
