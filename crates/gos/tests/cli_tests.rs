//! Exit codes and output of the gos binary

use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Run gos with an isolated HOME and empty stdin
fn gos(home: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gos"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("RUST_LOG")
        .env_remove("GOS_PROGRESS_STYLE")
        .env_remove("GOS_PROGRESS_INTERVAL_MS")
        .env_remove("GOS_CLONE_DEPTH")
        .env_remove("GOS_TEMPLATE_ECHO_URL")
        .env_remove("GOS_TEMPLATE_MONGO_URL")
        .stdin(Stdio::null())
        .output()
        .unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_no_command_prints_usage_and_fails() {
    let home = TempDir::new().unwrap();
    let output = gos(&home, &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Usage"));
}

#[test]
fn test_unknown_command_fails() {
    let home = TempDir::new().unwrap();
    let output = gos(&home, &["destroy"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_and_version_succeed() {
    let home = TempDir::new().unwrap();
    assert_eq!(gos(&home, &["--help"]).status.code(), Some(0));
    assert_eq!(gos(&home, &["--version"]).status.code(), Some(0));
}

#[test]
fn test_create_without_selector_fails() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let dir = work.path().to_str().unwrap();

    let output = gos(
        &home,
        &["create", "--name", "demo", "--module", "github.com/x/demo", "--dir", dir],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No template selected"));
    assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
}

#[test]
fn test_create_with_both_selectors_fails() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let dir = work.path().to_str().unwrap();

    let output = gos(
        &home,
        &[
            "create", "--echo", "--mongo", "--name", "demo", "--module", "github.com/x/demo",
            "--dir", dir,
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("mutually exclusive"));
    assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
}

#[test]
fn test_create_without_name_on_closed_stdin_fails() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let dir = work.path().to_str().unwrap();

    let output = gos(&home, &["create", "--echo", "--dir", dir]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
}

#[test]
fn test_dry_run_prints_plan_without_touching_disk() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let dir = work.path().to_str().unwrap();

    let output = gos(
        &home,
        &[
            "create", "--echo", "--dry-run", "--name", "demo", "--module", "github.com/x/demo",
            "--dir", dir,
        ],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("golang-starter-api.git"));
    assert!(stdout.contains("run go mod tidy"));
    assert!(stdout.contains("configure:module github.com/x/demo"));
    assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_config_file_fails() {
    let home = TempDir::new().unwrap();
    let output = gos(
        &home,
        &["--config", "/nonexistent/gos.yaml", "create", "--echo", "--dry-run"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("config file not found"));
}

#[test]
fn test_config_file_overrides_template_url() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let config = home.path().join("gos.yaml");
    std::fs::write(
        &config,
        "templates:\n  echo:\n    url: https://example.com/acme/custom-echo.git\n",
    )
    .unwrap();

    let output = gos(
        &home,
        &[
            "--config",
            config.to_str().unwrap(),
            "create",
            "--echo",
            "--dry-run",
            "--name",
            "demo",
            "--module",
            "m",
            "--dir",
            work.path().to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("custom-echo"));
}

#[test]
fn test_logo_printed_unless_quiet() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let dir = work.path().to_str().unwrap();
    let args = ["create", "--echo", "--dry-run", "--name", "demo", "--module", "m", "--dir", dir];

    let output = gos(&home, &args);
    assert!(String::from_utf8_lossy(&output.stdout).contains("/____/"));

    let mut quiet = vec!["-q"];
    quiet.extend_from_slice(&args);
    let output = gos(&home, &quiet);
    assert_eq!(output.status.code(), Some(0));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("/____/"));
}

#[cfg(unix)]
fn git(dir: &std::path::Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.name=Test", "-c", "user.email=test@test.com"])
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

#[cfg(unix)]
#[test]
fn test_failing_setup_step_exits_nonzero_and_leaves_nothing() {
    let git_available = Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .status()
        .is_ok_and(|s| s.success());
    if !git_available {
        return;
    }

    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    let repo = home.path().join("starter-api");
    std::fs::create_dir_all(&repo).unwrap();
    std::fs::write(repo.join(".env.example"), "APP_KEY=\n").unwrap();
    std::fs::write(repo.join("go.mod"), "module starter\n").unwrap();
    git(&repo, &["init", "--quiet"]);
    git(&repo, &["add", "."]);
    git(&repo, &["commit", "--quiet", "-m", "Initial commit"]);

    let config = home.path().join("gos.yaml");
    std::fs::write(
        &config,
        format!(
            "templates:\n  echo:\n    url: {}\nscaffold:\n  tidy_command: [sh, -c, \"exit 1\"]\nprogress:\n  interval_ms: 10\n",
            repo.display()
        ),
    )
    .unwrap();

    let output = gos(
        &home,
        &[
            "--config",
            config.to_str().unwrap(),
            "create",
            "--echo",
            "--name",
            "demo",
            "--module",
            "github.com/x/demo",
            "--dir",
            work.path().to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("tidy-dependencies"));
    assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
}
