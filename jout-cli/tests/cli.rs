use predicates::prelude::*;
use serde_json::Value;
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
    input: PathBuf,
}

fn build_workspace(rows: &[&str]) -> Result<Workspace, Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("input.ndjson");
    let mut file = fs::File::create(&input)?;
    for row in rows {
        writeln!(file, "{}", row)?;
    }
    Ok(Workspace { dir, input })
}

fn write_config(ws: &Workspace, body: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = ws.dir.path().join("assembly.toml");
    fs::write(&path, body)?;
    Ok(path)
}

const GROUPED_FILE_CONFIG: &str = r#"
mode = "write-file"
generation = "group-loop"
block_name = "result"

[[fields]]
source_field = "id"
element_name = "id"

[[key_fields]]
source_field = "key"
"#;

#[test]
fn run_writes_one_part_file_per_chunk() -> Result<(), Box<dyn Error>> {
    let ws = build_workspace(&[
        r#"{"key":"A","id":1}"#,
        r#"{"key":"A","id":2}"#,
        r#"{"key":"B","id":3}"#,
    ])?;
    let config = write_config(&ws, GROUPED_FILE_CONFIG)?;
    let output = ws.dir.path().join("docs.json");

    assert_cmd::Command::cargo_bin("jout")?
        .args([
            "run",
            ws.input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("3 rows in, 2 chunks out"));

    let first = fs::read_to_string(ws.dir.path().join("docs_0000.json"))?;
    assert_eq!(first, r#"{"result":[{"id":1},{"id":2}]}"#);
    let second = fs::read_to_string(ws.dir.path().join("docs_0001.json"))?;
    assert_eq!(second, r#"{"result":{"id":3}}"#);
    Ok(())
}

#[test]
fn run_append_mode_uses_a_single_file() -> Result<(), Box<dyn Error>> {
    let ws = build_workspace(&[
        r#"{"key":"A","id":1}"#,
        r#"{"key":"B","id":2}"#,
    ])?;
    let config = write_config(&ws, GROUPED_FILE_CONFIG)?;
    let output = ws.dir.path().join("docs.json");

    assert_cmd::Command::cargo_bin("jout")?
        .args([
            "run",
            ws.input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--append",
        ])
        .assert()
        .success();

    let combined = fs::read_to_string(&output)?;
    assert_eq!(combined, r#"{"result":{"id":1}}{"result":{"id":2}}"#);
    Ok(())
}

#[test]
fn run_emits_pagination_rows_to_stdout() -> Result<(), Box<dyn Error>> {
    let ws = build_workspace(&[
        r#"{"key":"A","id":1}"#,
        r#"{"key":"A","id":2}"#,
        r#"{"key":"B","id":3}"#,
    ])?;
    let config = write_config(
        &ws,
        r#"
mode = "emit-value"
generation = "group-loop"
value_field = "doc"
size_field = "bytes"
page_start_field = "start"
page_end_field = "end"

[[fields]]
source_field = "id"
element_name = "id"

[[key_fields]]
source_field = "key"
"#,
    )?;

    let output = assert_cmd::Command::cargo_bin("jout")?
        .args([
            "run",
            ws.input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let rows: Vec<Value> = String::from_utf8(output)?
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0]["key"], "A");
    assert_eq!(rows[0]["doc"], r#"[{"id":1},{"id":2}]"#);
    assert_eq!(rows[0]["start"], 1);
    assert_eq!(rows[0]["end"], 2);
    assert_eq!(
        rows[0]["bytes"].as_i64().unwrap(),
        r#"[{"id":1},{"id":2}]"#.len() as i64
    );

    assert_eq!(rows[1]["key"], "B");
    assert_eq!(rows[1]["start"], 3);
    assert_eq!(rows[1]["end"], 3);
    Ok(())
}

#[test]
fn run_without_output_fails_when_config_writes_files() -> Result<(), Box<dyn Error>> {
    let ws = build_workspace(&[r#"{"key":"A","id":1}"#])?;
    let config = write_config(&ws, GROUPED_FILE_CONFIG)?;

    assert_cmd::Command::cargo_bin("jout")?
        .args([
            "run",
            ws.input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
    Ok(())
}

#[test]
fn run_reports_missing_fields_by_name() -> Result<(), Box<dyn Error>> {
    let ws = build_workspace(&[r#"{"key":"A","id":1}"#])?;
    let config = write_config(
        &ws,
        r#"
mode = "emit-value"
generation = "flat"
value_field = "doc"

[[fields]]
source_field = "ghost"
element_name = "ghost"
"#,
    )?;

    assert_cmd::Command::cargo_bin("jout")?
        .args([
            "run",
            ws.input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
    Ok(())
}

#[test]
fn schema_infers_kinds_from_first_record() -> Result<(), Box<dyn Error>> {
    let ws = build_workspace(&[r#"{"id":1,"name":"a","score":1.5,"ok":true}"#])?;

    let output = assert_cmd::Command::cargo_bin("jout")?
        .args(["schema", ws.input.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output)?;
    assert!(stdout.contains(r#"name = "id""#));
    assert!(stdout.contains(r#"kind = "int""#));
    assert!(stdout.contains(r#"kind = "float""#));
    assert!(stdout.contains(r#"kind = "bool""#));
    assert!(stdout.contains(r#"kind = "text""#));
    Ok(())
}

#[test]
fn fragment_fields_embed_nested_json() -> Result<(), Box<dyn Error>> {
    let ws = build_workspace(&[r#"{"key":"A","payload":{"x":1}}"#])?;
    let config = write_config(
        &ws,
        r#"
mode = "emit-value"
generation = "flat"
value_field = "doc"

[[fields]]
source_field = "payload"
element_name = "payload"
json_fragment = true
"#,
    )?;

    let output = assert_cmd::Command::cargo_bin("jout")?
        .args([
            "run",
            ws.input.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let row: Value = serde_json::from_str(String::from_utf8(output)?.lines().next().unwrap())?;
    assert_eq!(row["doc"], r#"{"payload":{"x":1}}"#);
    Ok(())
}
