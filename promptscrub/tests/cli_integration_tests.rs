// promptscrub/tests/cli_integration_tests.rs
//! Command-line integration tests for the `promptscrub` binary.
//!
//! Each test runs the binary in a fresh temporary directory with `HOME` and
//! the config directory pointed there too, so no user configuration or
//! `.env` file leaks in. Model environment variables are removed; tests that
//! need a model start a `mockito` server.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn promptscrub(sandbox: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("promptscrub").unwrap();
    cmd.current_dir(sandbox.path())
        .env("HOME", sandbox.path())
        .env("XDG_CONFIG_HOME", sandbox.path().join(".config"))
        .env_remove("PROMPTSCRUB_MODEL_ENDPOINT")
        .env_remove("PROMPTSCRUB_MODEL_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_redact_stdin_with_defaults() -> Result<()> {
    let sandbox = TempDir::new()?;
    promptscrub(&sandbox)
        .args(["redact", "--no-summary"])
        .write_stdin("Email: A@B.COM, call 555-123-4567\n")
        .assert()
        .success()
        .stdout("Email: [email@gmail.com], call [PHONE NUMBER]\n");
    Ok(())
}

#[test]
fn test_redact_without_matches_is_identity() -> Result<()> {
    let sandbox = TempDir::new()?;
    promptscrub(&sandbox)
        .args(["--quiet", "redact"])
        .write_stdin("hello world")
        .assert()
        .success()
        .stdout("hello world\n")
        .stderr("");
    Ok(())
}

#[test]
fn test_redact_file_to_file_with_placeholder_override() -> Result<()> {
    let sandbox = TempDir::new()?;
    let input = sandbox.path().join("prompt.txt");
    let output = sandbox.path().join("scrubbed.txt");
    fs::write(&input, "Write to ops@corp.io from 10.0.0.1\n")?;

    promptscrub(&sandbox)
        .args(["redact", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--placeholder", "email=<mail>"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Detected 2 entit(ies)."));

    assert_eq!(fs::read_to_string(&output)?, "Write to <mail> from [ran.ran.ip.addr]\n");
    Ok(())
}

#[test]
fn test_redact_uses_config_file() -> Result<()> {
    let sandbox = TempDir::new()?;
    let config = sandbox.path().join("custom.yaml");
    fs::write(
        &config,
        r#"
placeholders:
  TICKET: "[TICKET-ID]"
detectors:
  disabled: [EMAIL]
  custom:
    - category: ticket
      pattern: 'TCK-\d{4}'
      confidence: 0.9
"#,
    )?;

    promptscrub(&sandbox)
        .args(["--quiet", "redact", "--config"])
        .arg(&config)
        .write_stdin("TCK-0042 from ops@corp.io")
        .assert()
        .success()
        .stdout("[TICKET-ID] from ops@corp.io\n");
    Ok(())
}

#[test]
fn test_working_directory_config_is_picked_up() -> Result<()> {
    let sandbox = TempDir::new()?;
    fs::write(
        sandbox.path().join("promptscrub.yaml"),
        "placeholders:\n  IP_ADDRESS: \"<ip>\"\n",
    )?;

    promptscrub(&sandbox)
        .args(["--quiet", "redact"])
        .write_stdin("host 192.168.1.20")
        .assert()
        .success()
        .stdout("host <ip>\n");
    Ok(())
}

#[test]
fn test_invalid_config_fails() -> Result<()> {
    let sandbox = TempDir::new()?;
    let config = sandbox.path().join("bad.yaml");
    fs::write(&config, "min_confidence: 7\n")?;

    promptscrub(&sandbox)
        .args(["redact", "--config"])
        .arg(&config)
        .write_stdin("anything")
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_confidence"));
    Ok(())
}

#[test]
fn test_min_confidence_flag_filters_dates() -> Result<()> {
    let sandbox = TempDir::new()?;
    promptscrub(&sandbox)
        .args(["--quiet", "redact", "--min-confidence", "0.8"])
        .write_stdin("due 3/4/25, mail a@b.com")
        .assert()
        .success()
        .stdout("due 3/4/25, mail [email@gmail.com]\n");
    Ok(())
}

#[test]
fn test_normalize_flag_strips_editor_markup() -> Result<()> {
    let sandbox = TempDir::new()?;
    promptscrub(&sandbox)
        .args(["--quiet", "redact", "--normalize"])
        .write_stdin("  a@b.com<br class=\"ProseMirror-trailingBreak\">\r\n")
        .assert()
        .success()
        .stdout("[email@gmail.com]\n");
    Ok(())
}

#[test]
fn test_scan_json_lists_entities() -> Result<()> {
    let sandbox = TempDir::new()?;
    let output = promptscrub(&sandbox)
        .args(["scan", "--json"])
        .write_stdin("Reach me at a@b.com")
        .output()?;
    assert!(output.status.success());

    let entities: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        entities,
        serde_json::json!([{"category": "EMAIL", "text": "a@b.com", "confidence": 0.98}])
    );
    Ok(())
}

#[test]
fn test_scan_table_shows_replacements() -> Result<()> {
    let sandbox = TempDir::new()?;
    promptscrub(&sandbox)
        .arg("scan")
        .write_stdin("Reach me at a@b.com")
        .assert()
        .success()
        .stdout(predicate::str::contains("EMAIL").and(predicate::str::contains("[email@gmail.com]")));
    Ok(())
}

#[test]
fn test_check_model_without_endpoint_fails() -> Result<()> {
    let sandbox = TempDir::new()?;
    promptscrub(&sandbox)
        .arg("check-model")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No model endpoint configured"));
    Ok(())
}

#[test]
fn test_check_model_reports_entities() -> Result<()> {
    let sandbox = TempDir::new()?;
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/")
        .match_header("authorization", "Bearer sekret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"entity": "B-PER", "score": 0.99, "word": "John", "start": 18, "end": 22},
                {"entity": "I-PER", "score": 0.98, "word": " Doe", "start": 22, "end": 26}
            ]"#,
        )
        .create();

    promptscrub(&sandbox)
        .args(["check-model", "--model-endpoint"])
        .arg(server.url())
        .env("PROMPTSCRUB_MODEL_TOKEN", "sekret")
        .assert()
        .success()
        .stdout(predicate::str::contains("PER\tJohn Doe\t0.98"))
        .stderr(predicate::str::contains("2 token prediction(s), 1 entit(ies)"));
    Ok(())
}

#[test]
fn test_check_model_reports_endpoint_failure() -> Result<()> {
    let sandbox = TempDir::new()?;
    let mut server = mockito::Server::new();
    let _mock = server.mock("POST", "/").with_status(503).create();

    promptscrub(&sandbox)
        .arg("check-model")
        .env("PROMPTSCRUB_MODEL_ENDPOINT", server.url())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Model failed to load"));
    Ok(())
}

#[test]
fn test_redact_survives_broken_model() -> Result<()> {
    let sandbox = TempDir::new()?;
    let mut server = mockito::Server::new();
    let _mock = server.mock("POST", "/").with_status(500).create();

    promptscrub(&sandbox)
        .args(["redact", "--model-endpoint"])
        .arg(server.url())
        .write_stdin("Reach me at a@b.com")
        .assert()
        .success()
        .stdout("Reach me at [email@gmail.com]\n")
        .stderr(predicate::str::contains("pattern detection only"));
    Ok(())
}

#[test]
fn test_redact_warns_when_model_load_times_out() -> Result<()> {
    let sandbox = TempDir::new()?;
    // Accepts connections into the backlog but never answers them.
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let endpoint = format!("http://{}/", listener.local_addr()?);
    fs::write(
        sandbox.path().join("slow.yaml"),
        "model:\n  timeout_ms: 10000\n  load_timeout_ms: 200\n",
    )?;

    promptscrub(&sandbox)
        .args(["redact", "--config", "slow.yaml", "--model-endpoint"])
        .arg(&endpoint)
        .write_stdin("Reach me at a@b.com")
        .assert()
        .success()
        .stdout("Reach me at [email@gmail.com]\n")
        .stderr(predicate::str::contains("did not finish loading in time"));
    drop(listener);
    Ok(())
}

#[test]
fn test_config_show_prints_effective_yaml() -> Result<()> {
    let sandbox = TempDir::new()?;
    let config = sandbox.path().join("user.yaml");
    fs::write(&config, "min_confidence: 0.8\nmodel:\n  api_token: hunter2\n")?;

    promptscrub(&sandbox)
        .args(["config", "show", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("min_confidence: 0.8")
                .and(predicate::str::contains("SEX"))
                .and(predicate::str::contains("hunter2").not()),
        );
    Ok(())
}
