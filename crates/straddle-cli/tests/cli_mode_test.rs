use std::process::{Command, Output};

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "sk_test_0123456789wxyz";

fn straddle() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_straddle"));
    for var in [
        "STRADDLE_API_KEY",
        "STRADDLE_ENVIRONMENT",
        "STRADDLE_BASE_URL",
        "STRADDLE_ACCOUNT_ID",
        "STRADDLE_TIMEOUT_SECS",
        "STRADDLE_MAX_RETRIES",
        "STRADDLE_STRICT",
    ] {
        command.env_remove(var);
    }
    command.env("RUST_LOG", "error");
    command
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn config_command_masks_api_key() {
    let output = straddle()
        .arg("config")
        .arg("--sandbox")
        .env("STRADDLE_API_KEY", API_KEY)
        .output()
        .expect("Failed to start straddle binary");
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains(API_KEY), "api key leaked: {stdout}");

    let resolved: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(resolved["api_key"], "****wxyz");
    assert_eq!(resolved["environment"], "sandbox");
    assert_eq!(resolved["base_url"], "https://sandbox.straddle.io");
}

#[test]
fn config_file_is_layered_under_environment() {
    let config_path = format!("{}/demos/config.yaml", env!("CARGO_MANIFEST_DIR"));

    let output = straddle()
        .arg("--config")
        .arg(&config_path)
        .arg("--output")
        .arg("yaml")
        .arg("config")
        .env("STRADDLE_MAX_RETRIES", "5")
        .output()
        .expect("Failed to start straddle binary");
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("environment: sandbox"), "{stdout}");
    assert!(stdout.contains("timeout_secs: 30"), "{stdout}");
    assert!(stdout.contains("max_retries: 5"), "{stdout}");
}

#[test]
fn missing_api_key_fails_before_any_request() {
    let output = straddle()
        .args(["reports", "customers-by-status"])
        .env("STRADDLE_BASE_URL", "http://127.0.0.1:9")
        .output()
        .expect("Failed to start straddle binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("api_key is not configured"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread")]
async fn report_command_calls_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/reports/total_customers_by_status"))
        .and(header("authorization", format!("Bearer {API_KEY}").as_str()))
        .and(header("straddle-account-id", "acct-cli"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "api_request_id": "r1", "api_request_timestamp": "2024-02-01T00:00:00Z" },
            "response_type": "object",
            "data": { "pending": 1, "review": 0, "verified": 7, "inactive": 0, "rejected": 2 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        straddle()
            .args(["reports", "customers-by-status", "--account-id", "acct-cli"])
            .env("STRADDLE_API_KEY", API_KEY)
            .env("STRADDLE_BASE_URL", base_url)
            .output()
            .expect("Failed to start straddle binary")
    })
    .await
    .expect("join blocking task");
    assert_success(&output);

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(report["verified"], 7);
    assert_eq!(report["rejected"], 2);
}
