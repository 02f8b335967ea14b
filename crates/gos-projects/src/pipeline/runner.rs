//! Step execution against the local filesystem and processes

use super::steps::{Compensation, Step, StepKind, StepOp};
use crate::error::{Error, Result};
use async_trait::async_trait;
use camino::Utf8Path;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Where a step runs
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Directory holding the working directory
    pub base_dir: &'a Utf8Path,
    /// Current working root (the clone, or the renamed project)
    pub root: &'a Utf8Path,
}

/// Executes step descriptors
#[async_trait]
pub trait StepRunner: Send + Sync {
    /// Run one step. Failures come back as `StepFailed`.
    async fn run(&self, step: &Step, ctx: &StepContext<'_>) -> Result<()>;
}

/// Runs steps for real: filesystem calls and child processes that inherit
/// the caller's stdio
#[derive(Debug, Clone, Default)]
pub struct LocalStepRunner;

impl LocalStepRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StepRunner for LocalStepRunner {
    async fn run(&self, step: &Step, ctx: &StepContext<'_>) -> Result<()> {
        let kind = step.kind;
        debug!("Running step {}: {}", kind, step.op);

        match &step.op {
            StepOp::Rename { to } => {
                let target = ctx.base_dir.join(to);
                if tokio::fs::symlink_metadata(&target).await.is_ok() {
                    return Err(Error::step_failed(
                        kind,
                        format!("destination already exists: {}", target),
                    ));
                }
                tokio::fs::rename(ctx.root, &target)
                    .await
                    .map_err(|e| io_failure(kind, ctx.root, e))
            }
            StepOp::Enter => {
                let metadata = tokio::fs::metadata(ctx.root)
                    .await
                    .map_err(|e| io_failure(kind, ctx.root, e))?;
                if !metadata.is_dir() {
                    return Err(Error::step_failed(
                        kind,
                        format!("{} is not a directory", ctx.root),
                    ));
                }
                Ok(())
            }
            StepOp::RemoveDir { path } => {
                let target = ctx.root.join(path);
                match tokio::fs::remove_dir_all(&target).await {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(io_failure(kind, &target, e)),
                }
            }
            StepOp::Command { program, args } => run_inherited(kind, program, args, ctx.root).await,
            StepOp::CopyFile { from, to } => {
                let source = ctx.root.join(from);
                for target in to {
                    let target = ctx.root.join(target);
                    tokio::fs::copy(&source, &target)
                        .await
                        .map_err(|e| io_failure(kind, &source, e))?;
                }
                Ok(())
            }
        }
    }
}

/// Run a command in `root` with inherited stdio
async fn run_inherited(kind: StepKind, program: &str, args: &[String], root: &Utf8Path) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .current_dir(root)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::step_failed(kind, format!("command not found: {}", program))
            } else {
                Error::step_failed(kind, format!("failed to run {}: {}", program, e))
            }
        })?;

    if !status.success() {
        return Err(Error::step_failed(
            kind,
            format!("{} exited with {}", program, status),
        ));
    }

    Ok(())
}

fn io_failure(kind: StepKind, path: &Utf8Path, e: std::io::Error) -> Error {
    Error::step_failed(kind, format!("{}: {}", path, e))
}

/// Undo a completed step's side effects; missing files are fine
pub(crate) async fn compensate(compensation: &Compensation, root: &Utf8Path) -> std::io::Result<()> {
    match compensation {
        Compensation::RemoveFiles(files) => {
            for file in files {
                match tokio::fs::remove_file(root.join(file)).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(e),
                }
            }
            Ok(())
        }
    }
}
