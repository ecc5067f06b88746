//! CLI smoke tests for the blogctl binary
//!
//! Each test gets its own home directory with a file-backed SQLite store.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

fn run_blogctl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_blogctl"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute blogctl")
}

/// Writes a config rooted at a fresh temp dir and returns both.
fn temp_config() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let home = dir.path().join("home");
    let config_path = dir.path().join("blog.yaml");
    let yaml = format!(
        r#"
home_dir: "{}"
database:
  url: "sqlite://database/blog.db?mode=rwc"
logging:
  default:
    console_level: warn
    file: ""
"#,
        home.to_string_lossy().replace('\\', "/")
    );
    std::fs::write(&config_path, yaml).expect("Failed to write config");
    (dir, config_path)
}

fn blogctl_json(config: &Path, args: &[&str]) -> Value {
    let mut full = vec!["--config", config.to_str().unwrap()];
    full.extend_from_slice(args);
    let output = run_blogctl(&full);
    assert!(
        output.status.success(),
        "blogctl {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_cli_help_command() {
    let output = run_blogctl(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("blogctl"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    for sub in ["check", "migrate", "user", "post"] {
        assert!(stdout.contains(sub), "Should list '{sub}' subcommand");
    }
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_version_command() {
    let output = run_blogctl(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("blogctl"));
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_blogctl(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report an error: {stderr}");
}

#[test]
fn test_cli_missing_config_file() {
    let output = run_blogctl(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config file not found"), "{stderr}");
}

#[test]
fn test_cli_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_blogctl(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config"), "Should mention config issue: {stderr}");
}

#[test]
fn test_cli_print_config() {
    let (_dir, config) = temp_config();
    let output = run_blogctl(&["--config", config.to_str().unwrap(), "--print-config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("database:"));
    assert!(stdout.contains("blog.db"));
}

#[test]
fn test_cli_check_and_migrate() {
    let (dir, config) = temp_config();
    let cfg = config.to_str().unwrap();

    let output = run_blogctl(&["--config", cfg, "check"]);
    assert!(
        output.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Configuration check passed"));

    let output = run_blogctl(&["--config", cfg, "migrate"]);
    assert!(output.status.success());
    assert!(dir.path().join("home/database/blog.db").exists());
}

#[test]
fn test_cli_post_lifecycle() {
    let (_dir, config) = temp_config();

    let user = blogctl_json(
        &config,
        &["user", "create", "--username", "alice", "--password", "pw"],
    );
    assert_eq!(user["username"], "alice");
    assert!(user.get("password").is_none());

    let post = blogctl_json(
        &config,
        &[
            "post", "create", "--username", "alice", "--password", "pw", "--title",
            "Learning Node", "--contents", "Event loops", "--tag", "nodejs", "--tag",
            "javascript",
        ],
    );
    let id = post["id"].as_str().expect("post id").to_string();
    assert_eq!(post["author"], user["id"]);
    assert_eq!(post["tags"], serde_json::json!(["nodejs", "javascript"]));

    let by_tag = blogctl_json(&config, &["post", "list", "--tag", "nodejs"]);
    assert_eq!(by_tag.as_array().map(Vec::len), Some(1));

    let by_author = blogctl_json(&config, &["post", "list", "--author", "alice"]);
    assert_eq!(by_author[0]["id"], post["id"]);

    let updated = blogctl_json(
        &config,
        &[
            "post", "update", &id, "--username", "alice", "--password", "pw", "--title",
            "Learning Node.js",
        ],
    );
    assert_eq!(updated["title"], "Learning Node.js");
    assert_eq!(updated["contents"], "Event loops");
    assert_eq!(updated["createdAt"], post["createdAt"]);

    let cleared = blogctl_json(
        &config,
        &[
            "post", "update", &id, "--username", "alice", "--password", "pw",
            "--clear-contents",
        ],
    );
    assert!(cleared.get("contents").is_none());
    assert_eq!(cleared["title"], "Learning Node.js");

    let deleted = blogctl_json(
        &config,
        &["post", "delete", &id, "--username", "alice", "--password", "pw"],
    );
    assert_eq!(deleted["deletedCount"], 1);

    let gone = blogctl_json(&config, &["post", "get", &id]);
    assert!(gone.is_null());
}

#[test]
fn test_cli_rejects_bad_credentials() {
    let (_dir, config) = temp_config();
    let cfg = config.to_str().unwrap();
    blogctl_json(
        &config,
        &["user", "create", "--username", "bob", "--password", "right"],
    );

    let output = run_blogctl(&[
        "--config", cfg, "post", "create", "--username", "bob", "--password", "wrong",
        "--title", "Nope",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid username or password"), "{stderr}");
}

#[test]
fn test_cli_rejects_unknown_sort_field() {
    let (_dir, config) = temp_config();
    let output = run_blogctl(&[
        "--config",
        config.to_str().unwrap(),
        "post",
        "list",
        "--sort-by",
        "author",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown sort field"), "{stderr}");
}
