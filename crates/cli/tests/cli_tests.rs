//! CLI integration tests

use std::io::Write;
use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "msctl", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("CLI for Metric Sentinel"),
        "Should show app description"
    );
    assert!(stdout.contains("export"), "Should show export command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "msctl", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("msctl"), "Should show binary name");
}

/// Export against a missing config file is a startup error
#[test]
fn test_export_missing_config_fails() {
    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "msctl",
            "--",
            "--config",
            "/nonexistent/sentinel.toml",
            "export",
        ])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "missing config should fail");
    assert!(
        stderr.contains("failed to load configuration"),
        "Should report the config failure"
    );
}

/// An absurdly large --hours value is rejected instead of wrapping
#[test]
fn test_export_huge_hours_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("sentinel.toml");
    std::fs::write(
        &config_path,
        "[monitoring]\nprometheus_url = \"http://localhost:9090\"\nquery = \"up\"\n",
    )
    .unwrap();

    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "msctl",
            "--",
            "--config",
            config_path.to_str().unwrap(),
            "export",
            "--hours",
            "18446744073709551615",
        ])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "huge --hours should fail");
    assert!(
        stderr.contains("--hours is too large"),
        "Should report the overflow"
    );
}

/// End-to-end export: range query against a mock backend lands in the
/// output file, one row per point.
#[tokio::test]
async fn test_export_round_trip() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v1/query_range")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"data":{"result":[{"values":[[1717000000,"10.5"],[1717000060,"11.25"],[1717000120,"10.75"],[1717000180,"12.0"]]}]}}"#,
        )
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("sentinel.toml");
    let out_path = dir.path().join("cpu_metrics.csv");

    let mut config = std::fs::File::create(&config_path).unwrap();
    writeln!(config, "[monitoring]").unwrap();
    writeln!(config, "prometheus_url = \"{}\"", server.url()).unwrap();
    writeln!(config, "query = \"node_cpu_usage\"").unwrap();

    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "msctl",
            "--",
            "--config",
            config_path.to_str().unwrap(),
            "export",
            "--hours",
            "1",
            "--out",
            out_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "export should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Saved 4 metric points"));

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "timestamp,cpu_usage");
    assert_eq!(lines.len(), 5);
    assert!(lines[2].ends_with(",11.25"));
}
