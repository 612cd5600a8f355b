use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use xclean::credentials::DEFAULT_BEARER_TOKEN;

#[test]
fn test_cli_help_succeeds() {
    let output = cargo_bin_cmd!("xclean")
        .arg("--help")
        .output()
        .expect("run xclean");
    assert!(output.status.success(), "help should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "help should include usage text");
    assert!(stdout.contains("--dry-run"));
}

#[test]
fn test_cli_extract_writes_config() {
    let dir = tempdir().expect("tempdir");
    let output = cargo_bin_cmd!("xclean")
        .current_dir(dir.path())
        .args(["--extract", "--cookies", "ct0=abc123; auth_token=xyz789"])
        .arg("--require-auth-token")
        .arg("--no-clipboard")
        .output()
        .expect("run xclean");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let written = std::fs::read_to_string(dir.path().join("config.json")).expect("config.json");
    let value: serde_json::Value = serde_json::from_str(&written).expect("json");
    assert_eq!(
        value,
        json!({
            "ct0": "abc123",
            "csrf_token": "abc123",
            "auth_token": "xyz789",
            "bearer_token": DEFAULT_BEARER_TOKEN
        })
    );
}

#[test]
fn test_cli_extract_without_clipboard_makes_no_clipboard_claim() {
    let dir = tempdir().expect("tempdir");
    let output = cargo_bin_cmd!("xclean")
        .current_dir(dir.path())
        .args(["--extract", "--cookies", "ct0=abc123", "--no-clipboard"])
        .output()
        .expect("run xclean");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tokens saved to"));
    assert!(!stdout.contains("copied to the clipboard"));
}

#[test]
fn test_cli_extract_reads_stdin() {
    let dir = tempdir().expect("tempdir");
    let target = dir.path().join("tokens.json");
    let output = cargo_bin_cmd!("xclean")
        .args(["--extract", "--cookies", "-", "--no-clipboard", "-o"])
        .arg(&target)
        .write_stdin("lang=en; ct0=fromstdin\n")
        .output()
        .expect("run xclean");
    assert!(output.status.success());
    let written = std::fs::read_to_string(&target).expect("tokens.json");
    assert!(written.contains("\"csrf_token\": \"fromstdin\""));
    assert!(!written.contains("auth_token"));
}

#[test]
fn test_cli_extract_without_ct0_fails_without_file() {
    let dir = tempdir().expect("tempdir");
    let output = cargo_bin_cmd!("xclean")
        .current_dir(dir.path())
        .env("LANG", "en_US.UTF-8")
        .env_remove("LC_ALL")
        .env_remove("LC_MESSAGES")
        .args(["--extract", "--cookies", "auth_token=xyz789", "--no-clipboard"])
        .output()
        .expect("run xclean");
    assert_eq!(output.status.code(), Some(3));
    assert!(!dir.path().join("config.json").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ct0"));
    assert!(stderr.contains("hint"));
}

#[test]
fn test_cli_strict_extract_requires_auth_token() {
    let dir = tempdir().expect("tempdir");
    let output = cargo_bin_cmd!("xclean")
        .current_dir(dir.path())
        .args(["--extract", "--cookies", "ct0=abc123"])
        .args(["--require-auth-token", "--no-clipboard"])
        .output()
        .expect("run xclean");
    assert_eq!(output.status.code(), Some(3));
    assert!(!dir.path().join("config.json").exists());
}

#[test]
fn test_cli_create_config_writes_sample() {
    let dir = tempdir().expect("tempdir");
    let output = cargo_bin_cmd!("xclean")
        .current_dir(dir.path())
        .arg("--create-config")
        .output()
        .expect("run xclean");
    assert!(output.status.success());
    let sample = std::fs::read_to_string(dir.path().join("config_sample.json")).expect("sample");
    assert!(sample.contains("YOUR_CSRF_TOKEN_HERE"));
}

#[test]
fn test_cli_without_config_explains_next_step() {
    let dir = tempdir().expect("tempdir");
    let output = cargo_bin_cmd!("xclean")
        .current_dir(dir.path())
        .env_remove("XCLEAN_CONFIG")
        .output()
        .expect("run xclean");
    assert_eq!(output.status.code(), Some(37));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--create-config"));
}

#[test]
fn test_cli_manual_entry_ignores_config_env() {
    let dir = tempdir().expect("tempdir");
    let output = cargo_bin_cmd!("xclean")
        .current_dir(dir.path())
        .env("XCLEAN_CONFIG", dir.path().join("missing.json"))
        .args(["--manual", "--dry-run"])
        .write_stdin("\n\n\n\n")
        .output()
        .expect("run xclean");
    // Empty answers reach the prompt's own check instead of a usage error.
    assert_eq!(output.status.code(), Some(3));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Manual token input"));
}

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[cfg_attr(miri, ignore)]
#[tokio::test(flavor = "multi_thread")]
async fn test_cli_dry_run_prints_summary() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.1/account/personalization/twitter_interests.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "interested_in": [{"id": "a"}, {"id": "b"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1.1/account/personalization/p13n_preferences.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "interest_preferences": {"disabled_interests": ["b", "c"]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().expect("tempdir");
    let config_path = dir.path().join("config.json");
    std::fs::write(&config_path, r#"{"ct0": "abc123", "csrf_token": "abc123"}"#)
        .expect("write config");

    let output = cargo_bin_cmd!("xclean")
        .arg("--config")
        .arg(&config_path)
        .args(["--api-base", server.uri().as_str(), "--dry-run"])
        .output()
        .expect("run xclean");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Current interests: 2"));
    assert!(stdout.contains("Already disabled: 2"));
    assert!(stdout.contains("Total to disable: 3"));
}

#[cfg_attr(miri, ignore)]
#[tokio::test(flavor = "multi_thread")]
async fn test_cli_auth_failure_exit_code() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{}"))
        .mount(&server)
        .await;

    let dir = tempdir().expect("tempdir");
    std::fs::write(dir.path().join("config.json"), r#"{"ct0": "stale"}"#).expect("write config");

    let output = cargo_bin_cmd!("xclean")
        .current_dir(dir.path())
        .env_remove("XCLEAN_CONFIG")
        .args(["--api-base", server.uri().as_str()])
        .output()
        .expect("run xclean");

    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--extract"));
}
