//! Template cloning

use crate::error::{Error, Result};
use crate::types::{TemplateSource, WorkingDirectory};
use async_trait::async_trait;
use camino::Utf8Path;
use std::io::ErrorKind;
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Materializes a template into a local working directory
#[async_trait]
pub trait TemplateFetcher: Send + Sync {
    /// Fetch `source` into `base_dir/<slug>`, replacing anything already there
    async fn fetch(&self, source: &TemplateSource, base_dir: &Utf8Path)
        -> Result<WorkingDirectory>;
}

/// Fetches templates with `git clone`
#[derive(Debug, Clone, Default)]
pub struct GitFetcher;

impl GitFetcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TemplateFetcher for GitFetcher {
    /// Clone a template repository
    ///
    /// # Errors
    /// Returns error if:
    /// - Git is not installed
    /// - A stale directory cannot be removed
    /// - Clone operation fails
    async fn fetch(
        &self,
        source: &TemplateSource,
        base_dir: &Utf8Path,
    ) -> Result<WorkingDirectory> {
        let destination = base_dir.join(source.slug());
        info!("Cloning template: {} -> {}", source.url(), destination);

        tokio::fs::create_dir_all(base_dir)
            .await
            .map_err(|e| Error::fetch_failed(source.url(), e.to_string()))?;

        if remove_existing(&destination)
            .await
            .map_err(|e| {
                Error::fetch_failed(
                    source.url(),
                    format!("could not remove existing {}: {}", destination, e),
                )
            })?
        {
            info!("Removed existing directory: {}", destination);
        }

        check_git_available()?;

        let mut cmd = Command::new("git");
        cmd.arg("clone");

        let options = source.clone_options();
        if let Some(depth) = options.depth {
            cmd.arg("--depth").arg(depth.to_string());
        }

        if let Some(branch) = &options.branch {
            cmd.arg("--branch").arg(branch);
        }

        cmd.arg(source.url()).arg(destination.as_str());

        debug!("Running: git clone");
        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) => {
                discard_partial_clone(&destination).await;
                return Err(Error::fetch_failed(source.url(), e.to_string()));
            }
        };

        if !output.status.success() {
            discard_partial_clone(&destination).await;
            return Err(Error::fetch_failed(source.url(), clone_diagnostic(&output)));
        }

        info!("Template cloned successfully");
        Ok(WorkingDirectory::new(base_dir, source.slug()))
    }
}

/// Check if git is available on PATH
fn check_git_available() -> Result<()> {
    which::which("git").map(|_| ()).map_err(|_| Error::GitNotFound)
}

/// Remove whatever sits at `path`. Returns whether anything was removed.
async fn remove_existing(path: &Utf8Path) -> std::io::Result<bool> {
    let metadata = match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        tokio::fs::remove_dir_all(path).await?;
    } else {
        tokio::fs::remove_file(path).await?;
    }

    Ok(true)
}

async fn discard_partial_clone(path: &Utf8Path) {
    if let Err(e) = remove_existing(path).await {
        warn!("Could not remove partial clone at {}: {}", path, e);
    }
}

/// Captured clone output, stderr first
fn clone_diagnostic(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let text = [stderr.trim(), stdout.trim()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n");

    if text.is_empty() {
        format!("git clone exited with {}", output.status)
    } else {
        text
    }
}
