//! Integration tests for the `nexperia-guest-wifi` binary.
//!
//! Argument handling runs without any router; the end-to-end cases drive
//! the binary against a wiremock double of the router's web interface.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_PATH: &str = "/function_module/login_module/login_page/logintoken_lua.lua";
const PAGE_PATH: &str = "/getpage.lua";
const DATA_PATH: &str = "/common_page/Localnet_Wlan_GuestWiFiOnOff_lua.lua";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the binary with env isolation.
///
/// Clears all `NEXPERIA_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn guest_wifi_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("nexperia-guest-wifi");
    cmd.env("HOME", "/tmp/nexperia-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/nexperia-cli-test-nonexistent")
        .env_remove("NEXPERIA_HOST")
        .env_remove("NEXPERIA_USER")
        .env_remove("NEXPERIA_PASSWORD")
        .env_remove("NEXPERIA_PROFILE")
        .env_remove("NEXPERIA_DEFAULT_PROFILE")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn router_double(enabled: bool) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("1234567"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains("action=login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PAGE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<script>_sessionTmpToken = "\x61\x62";</script>"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<ajax_response_xml_root><OBJ_GUESTWIFISWITCH_ID><Instance>\
             <ParaName>Enable</ParaName><ParaValue>{}</ParaValue>\
             </Instance></OBJ_GUESTWIFISWITCH_ID></ajax_response_xml_root>",
            u8::from(enabled)
        )))
        .mount(&server)
        .await;

    server
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let host = server.address().to_string();
    let args: Vec<String> = args.iter().map(|a| (*a).to_owned()).collect();
    tokio::task::spawn_blocking(move || {
        guest_wifi_cmd()
            .args(["--host", &host, "--user", "Admin", "--pwd", "secret"])
            .args(&args)
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    guest_wifi_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("--host")
            .and(predicate::str::contains("--user"))
            .and(predicate::str::contains("--pwd"))
            .and(predicate::str::contains("[STATE]")),
    );
}

#[test]
fn test_version_flag() {
    guest_wifi_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nexperia-guest-wifi"));
}

// ── Missing arguments ───────────────────────────────────────────────

#[test]
fn test_no_host() {
    guest_wifi_cmd()
        .args(["-u", "Admin", "-p", "secret"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("error: no host specified"));
}

#[test]
fn test_no_user() {
    guest_wifi_cmd()
        .args(["-i", "127.0.0.1:1", "-p", "secret"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("error: no user-name specified"));
}

#[test]
fn test_no_password() {
    guest_wifi_cmd()
        .args(["-i", "127.0.0.1:1", "-u", "Admin"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("error: no password specified"));
}

#[test]
fn test_missing_host_reported_before_state() {
    let output = guest_wifi_cmd().arg("bogus").output().unwrap();
    let text = combined_output(&output);
    assert!(text.contains("error: no host specified"), "got:\n{text}");
    assert!(!text.contains("Invalid state"), "got:\n{text}");
}

#[test]
fn test_unknown_profile() {
    let output = guest_wifi_cmd()
        .args(["--profile", "office", "-p", "secret"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("office"), "got:\n{text}");
}

// ── State argument ──────────────────────────────────────────────────

#[test]
fn test_invalid_state_makes_no_connection() {
    // Nothing listens on port 1; a connection attempt would report a
    // connection error instead.
    let output = guest_wifi_cmd()
        .args(["-i", "127.0.0.1:1", "-u", "Admin", "-p", "secret", "maybe"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("Invalid state: 'maybe'. Use 'On' or 'Off'"),
        "got:\n{text}"
    );
    assert!(!text.contains("connect"), "got:\n{text}");
}

#[test]
fn test_unreachable_router() {
    let output = guest_wifi_cmd()
        .args(["-i", "127.0.0.1:1", "-u", "Admin", "-p", "secret"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    let text = combined_output(&output);
    assert!(text.contains("Could not connect"), "got:\n{text}");
}

// ── End to end ──────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_show_on() {
    let server = router_double(true).await;
    let output = run_against(&server, &[]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Guest-Wifi is: on\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_off() {
    let server = router_double(false).await;
    let output = run_against(&server, &[]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Guest-Wifi is: off\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_json() {
    let server = router_double(true).await;
    let output = run_against(&server, &["-o", "json"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["enabled"], true);
    assert_eq!(value["settings"]["Enable"], 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_on_writes_once_and_prints_nothing() {
    let server = router_double(false).await;
    Mock::given(method("POST"))
        .and(path(DATA_PATH))
        .and(body_string_contains("Enable=1"))
        .and(body_string_contains("_sessionTOKEN=ab"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["ON"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(output.stdout.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_off_when_off_writes_nothing() {
    let server = router_double(false).await;
    Mock::given(method("POST"))
        .and(path(DATA_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = run_against(&server, &["Off"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_flag_logs_off() {
    let server = router_double(true).await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains("IF_LogOff=1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["--logout"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let output = run_against(&server, &[]).await;
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}
