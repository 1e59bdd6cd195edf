use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar_with_env(vars: &[(&str, &str)]) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_fitrankd");
    let mut cmd = Command::new(exe);
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .env_remove("FITRANK_MAX_BATCH_ITEMS")
        .env_remove("FITRANK_LOG");
    for (k, v) in vars {
        cmd.env(k, v);
    }
    let mut child = cmd.spawn().expect("spawn fitrankd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn classify_many_over_limit_returns_deterministic_rejection() {
    let (mut child, mut stdin, mut reader) =
        spawn_sidecar_with_env(&[("FITRANK_MAX_BATCH_ITEMS", "3")]);

    let items: Vec<serde_json::Value> = (0..4)
        .map(|_| json!({ "code": "PULL_UPS", "resultValue": "20" }))
        .collect();
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "limit",
        "grading.classifyMany",
        json!({ "items": items }),
    );
    assert_eq!(result["limitExceeded"], true);
    assert_eq!(result["rejected"], 4);
    assert!(result.get("results").is_none());
    let errors = result["errors"].as_array().cloned().unwrap_or_default();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["code"], "too_many_items");

    let records: Vec<serde_json::Value> = (0..4)
        .map(|_| json!({ "code": "PULL_UPS", "resultValue": "20" }))
        .collect();
    let annotate = request_ok(
        &mut stdin,
        &mut reader,
        "limit-records",
        "results.annotate",
        json!({ "records": records }),
    );
    assert_eq!(annotate["limitExceeded"], true);

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn classify_many_at_limit_grades_every_item() {
    let (mut child, mut stdin, mut reader) =
        spawn_sidecar_with_env(&[("FITRANK_MAX_BATCH_ITEMS", "3")]);

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "at-limit",
        "grading.classifyMany",
        json!({ "items": [
            { "code": "PULL_UPS", "resultValue": "23" },
            { "code": "PULL_UPS", "resultValue": "19" },
            { "code": "PULL_UPS", "resultValue": "10" }
        ] }),
    );
    let labels: Vec<&str> = result["results"]
        .as_array()
        .expect("results")
        .iter()
        .map(|r| r["result"].as_str().unwrap_or(""))
        .collect();
    assert_eq!(labels, ["Giỏi", "Khá", "Chưa đạt"]);
    assert!(result.get("limitExceeded").is_none());

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn classify_many_reports_bad_items_by_index() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar_with_env(&[]);

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "mixed",
        "grading.classifyMany",
        json!({ "items": [
            { "code": "RUN_60M", "resultValue": "7.8" },
            "not an object",
            { "resultValue": "5" },
            { "code": "LONG_JUMP", "resultValue": "4.3" }
        ] }),
    );
    let results = result["results"].as_array().expect("results");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["index"], 0);
    assert_eq!(results[1]["index"], 3);
    assert_eq!(results[1]["result"], "Khá");

    assert_eq!(result["rejected"], 2);
    let errors = result["errors"].as_array().expect("errors");
    assert_eq!(errors[0]["index"], 1);
    assert_eq!(errors[1]["index"], 2);
    assert!(errors.iter().all(|e| e["code"] == "bad_params"));

    drop(stdin);
    let _ = child.wait();
}
