//! End-to-end tests for the `quire` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn quire() -> Command {
    let mut cmd = Command::cargo_bin("quire").unwrap();
    cmd.env("QUIRE_TEST_MODE", "1")
        .env_remove("QUIRE_MEMOS_DIR")
        .env_remove("QUIRE_LOG_LEVEL")
        .env_remove("QUIRE_FETCH_TIMEOUT_MS")
        .env_remove("QUIRE_ANCESTOR_TRACKING")
        .env_remove("RUST_LOG");
    cmd
}

fn memo_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let memo = |uid: &str, raw: &str| fs::write(dir.path().join(format!("{uid}.md")), raw).unwrap();
    memo(
        "home",
        "---\ndisplay_time: 2024-05-01T09:30:00Z\n---\nWelcome\n![[memos/plan]]\n![[memos/plan]]",
    );
    memo(
        "plan",
        "---\ndisplay_time: 2024-04-01T12:00:00Z\n---\nShip it\n![[memos/home]]",
    );
    memo("lonely", "![[memos/nobody]]");
    dir
}

#[test]
fn test_cli_help() {
    quire()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_render_text() {
    let dir = memo_dir();
    quire()
        .args(["render", "home", "--memos-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome\n"))
        .stdout(predicate::str::contains("┌ 2024-04-01 12:00 · plan · /m/plan\n"))
        .stdout(predicate::str::contains("│ Ship it\n"))
        .stdout(predicate::str::contains(
            "│ [!] Nested Rendering Error: ![[memos/home]]\n",
        ));
}

#[test]
fn test_render_pass_tracking_rejects_second_sibling() {
    let dir = memo_dir();
    quire()
        .args(["render", "home", "--tracking", "pass", "-d"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[!] Nested Rendering Error: ![[memos/plan]]\n"));
}

#[test]
fn test_render_tracking_from_env() {
    let dir = memo_dir();
    quire()
        .env("QUIRE_ANCESTOR_TRACKING", "pass")
        .env("QUIRE_MEMOS_DIR", dir.path())
        .args(["render", "home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("![[memos/plan]]"));
}

#[test]
fn test_render_missing_embed() {
    let dir = memo_dir();
    quire()
        .args(["render", "lonely", "-d"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout("[!] Memo not found: nobody\n");
}

#[test]
fn test_render_missing_root_fails() {
    let dir = memo_dir();
    quire()
        .args(["render", "ghost", "-d"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Memo not found: ghost"));
}

#[test]
fn test_render_html_and_json() {
    let dir = memo_dir();
    quire()
        .args(["render", "home", "--format", "html", "-d"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("embedded-memo-card"));

    quire()
        .args(["render", "home", "--format", "json", "-d"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"document\""));
}

#[test]
fn test_render_with_params() {
    let dir = memo_dir();
    quire()
        .args(["render", "plan", "--params", "snippet&inline", "-d"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout("Ship it\n");
}

#[test]
fn test_snippet_and_list() {
    let dir = memo_dir();
    quire()
        .args(["snippet", "plan", "-d"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout("Ship it\n");

    quire()
        .args(["list", "-d"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("home\tWelcome\n"))
        .stdout(predicate::str::contains("plan\tShip it\n"));
}

#[test]
fn test_missing_memos_dir_is_reported() {
    quire()
        .args(["render", "home"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No memo directory configured"));
}

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    quire()
        .args(["config", "init", "--path"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config file"));
    assert!(path.exists());

    quire()
        .args(["config", "init", "--path"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    fs::write(&path, "[render]\nsnippet_length = 12\n").unwrap();
    quire()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("snippet_length = 12"));

    quire()
        .args(["config", "show", "--format", "json", "--config"])
        .arg(&path)
        .env("QUIRE_FETCH_TIMEOUT_MS", "250")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"fetch_timeout_ms\": 250"));
}
