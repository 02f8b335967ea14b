//! End-to-end scaffolding against a local git template
//!
//! The template is a throwaway repository in a temp dir and the toolchain
//! commands are replaced with `sh` one-liners, so only `git` and `sh` are
//! needed. Tests return early when git is unavailable.

#![cfg(unix)]

use camino::{Utf8Path, Utf8PathBuf};
use gos_projects::config::TemplateConfig;
use gos_projects::git::{GitFetcher, TemplateFetcher};
use gos_projects::{Error, GosConfig, ProjectRequest, Scaffolder, SilentSink, StepKind, TemplateSource};
use std::process::Command;
use tempfile::TempDir;

const ENV_EXAMPLE: &str = "APP_NAME=starter\nAPP_KEY=\nDB_HOST=localhost\n";

fn git_available() -> bool {
    which::which("git").is_ok()
}

fn git(dir: &Utf8Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.name=Test", "-c", "user.email=test@test.com"])
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

/// Create a template repository and return its path
fn create_template_repo(root: &Utf8Path) -> Utf8PathBuf {
    let repo = root.join("templates").join("starter-api");
    std::fs::create_dir_all(repo.join("cmd")).unwrap();
    std::fs::write(repo.join(".env.example"), ENV_EXAMPLE).unwrap();
    std::fs::write(repo.join("go.mod"), "module github.com/acme/starter-api\n").unwrap();
    std::fs::write(repo.join("cmd/zoro.go"), "package main\n").unwrap();

    git(&repo, &["init", "--quiet"]);
    git(&repo, &["add", "."]);
    git(&repo, &["commit", "--quiet", "-m", "Initial commit"]);
    repo
}

fn sandbox() -> (TempDir, Utf8PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    (temp, root)
}

/// Defaults plus a `local` template, with toolchain commands stubbed out
fn local_config(repo: &Utf8Path, tidy_script: &str) -> GosConfig {
    let mut config = GosConfig::defaults().unwrap();
    config.templates.insert(
        "local".to_string(),
        TemplateConfig {
            url: repo.to_string(),
            description: None,
            branch: None,
            depth: None,
        },
    );
    config.scaffold.tidy_command = vec!["sh".into(), "-c".into(), tidy_script.into()];
    config.scaffold.entry_point = vec![
        "sh".into(),
        "-c".into(),
        "echo \"$@\" >> setup.log".into(),
        "zoro".into(),
    ];
    config.progress.interval_ms = 10;
    config
}

#[tokio::test]
async fn test_scaffold_from_local_template() {
    if !git_available() {
        return;
    }

    let (_temp, root) = sandbox();
    let repo = create_template_repo(&root);
    let work = root.join("work");
    std::fs::create_dir_all(&work).unwrap();

    let request = ProjectRequest::new("demo", "github.com/x/demo").unwrap();
    let outcome = Scaffolder::new(local_config(&repo, "exit 0"), &work)
        .with_progress(|| Box::new(SilentSink))
        .run(&request, &["local"])
        .await
        .unwrap();

    let project = work.join("demo");
    assert_eq!(outcome.project_dir, project);
    assert!(!work.join("starter-api").exists());
    assert!(!project.join(".git").exists());
    assert_eq!(std::fs::read_to_string(project.join(".env")).unwrap(), ENV_EXAMPLE);
    assert_eq!(std::fs::read_to_string(project.join(".env.test")).unwrap(), ENV_EXAMPLE);
    assert_eq!(
        std::fs::read_to_string(project.join("setup.log")).unwrap(),
        "key:generate\nconfigure:module github.com/x/demo\n"
    );
}

#[tokio::test]
async fn test_tidy_failure_removes_everything() {
    if !git_available() {
        return;
    }

    let (_temp, root) = sandbox();
    let repo = create_template_repo(&root);
    let work = root.join("work");
    std::fs::create_dir_all(&work).unwrap();

    let request = ProjectRequest::new("demo", "github.com/x/demo").unwrap();
    let err = Scaffolder::new(local_config(&repo, "exit 1"), &work)
        .with_progress(|| Box::new(SilentSink))
        .run(&request, &["local"])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Scaffold { rolled_back: true, .. }));
    assert_eq!(err.failed_step(), Some(StepKind::TidyDependencies));
    assert!(!work.join("demo").exists());
    assert!(!work.join("starter-api").exists());
    assert_eq!(std::fs::read_dir(&work).unwrap().count(), 0);
}

#[tokio::test]
async fn test_refetch_replaces_stale_clone() {
    if !git_available() {
        return;
    }

    let (_temp, root) = sandbox();
    let repo = create_template_repo(&root);
    let work = root.join("work");
    std::fs::create_dir_all(work.join("starter-api")).unwrap();
    std::fs::write(work.join("starter-api/stale.txt"), "old").unwrap();

    let source = TemplateSource::new("local", repo.as_str()).unwrap();
    let fetcher = GitFetcher::new();

    let first = fetcher.fetch(&source, &work).await.unwrap();
    let second = fetcher.fetch(&source, &work).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second.path(), work.join("starter-api"));
    assert!(!work.join("starter-api/stale.txt").exists());
    assert!(work.join("starter-api/.env.example").exists());
    assert_eq!(std::fs::read_dir(&work).unwrap().count(), 1);
}
