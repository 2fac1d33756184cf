use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn toon() -> Command {
    Command::cargo_bin("toon").expect("binary builds")
}

#[test]
fn encodes_json_from_stdin() {
    toon()
        .write_stdin(r#"{"id": 1, "name": "Alice"}"#)
        .assert()
        .success()
        .stdout("id: 1\nname: Alice\n");
}

#[test]
fn decodes_toon_from_stdin() {
    toon()
        .write_stdin("id: 1\nname: Alice")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Alice\""));
}

#[test]
fn mode_detected_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("users.json");
    fs::write(&json_path, r#"[{"id":1,"name":"Alice"},{"id":2,"name":"Bob"}]"#).unwrap();

    toon()
        .arg(json_path.to_str().unwrap())
        .assert()
        .success()
        .stdout("[2]{id,name}:\n  1,Alice\n  2,Bob\n");
}

#[test]
fn round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("data.json");
    let toon_path = dir.path().join("data.toon");
    fs::write(&json_path, r#"{"tags":["a","b,c"],"count":2}"#).unwrap();

    toon()
        .arg(json_path.to_str().unwrap())
        .arg("-o")
        .arg(toon_path.to_str().unwrap())
        .assert()
        .success();

    let output = toon()
        .arg(toon_path.to_str().unwrap())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let decoded: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        decoded,
        serde_json::json!({"tags": ["a", "b,c"], "count": 2})
    );
}

#[test]
fn forced_decode_mode() {
    toon()
        .arg("-d")
        .write_stdin("[3]: 1,2,3")
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));
}

#[test]
fn strict_count_mismatch_fails() {
    toon()
        .arg("-d")
        .write_stdin("[3]: 1,2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("declares 3 items but found 2"));
}

#[test]
fn lenient_count_mismatch_warns() {
    toon()
        .arg("-d")
        .arg("--no-strict")
        .write_stdin("[3]: 1,2")
        .assert()
        .success()
        .stderr(predicate::str::contains("WARN"));
}

#[test]
fn pipe_delimiter_option() {
    toon()
        .arg("-e")
        .arg("--delimiter")
        .arg("|")
        .write_stdin(r#"{"tags":["a","b","c"]}"#)
        .assert()
        .success()
        .stdout("tags[3|]: a|b|c\n");
}

#[test]
fn stats_reported_on_stderr() {
    toon()
        .arg("--stats")
        .write_stdin(r#"{"id": 1}"#)
        .assert()
        .success()
        .stderr(predicate::str::contains("STATS"));
}
