//! Scaffold orchestration: fetch, set up, roll back on failure

use super::runner::{compensate, LocalStepRunner, StepContext, StepRunner};
use super::steps::{plan, Step, StepOp};
use crate::config::GosConfig;
use crate::error::{Error, Result};
use crate::git::{GitFetcher, TemplateFetcher};
use crate::progress::{DotSink, ProgressReporter, ProgressSink};
use crate::types::{ProjectRequest, ScaffoldOutcome, TemplateSource, WorkingDirectory};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::ErrorKind;
use std::time::Duration;
use tracing::{info, warn};

/// Builds a fresh progress sink for every run
pub type ProgressFactory = Box<dyn Fn() -> Box<dyn ProgressSink> + Send + Sync>;

/// Drives a scaffold from template selection to a ready project directory
pub struct Scaffolder<F = GitFetcher, R = LocalStepRunner> {
    config: GosConfig,
    base_dir: Utf8PathBuf,
    fetcher: F,
    runner: R,
    progress: ProgressFactory,
}

impl Scaffolder {
    /// Scaffolder that clones with git, runs real commands and prints dots
    /// to stdout. Projects are created under `base_dir`.
    pub fn new(config: GosConfig, base_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            config,
            base_dir: base_dir.into(),
            fetcher: GitFetcher::new(),
            runner: LocalStepRunner::new(),
            progress: Box::new(|| Box::new(DotSink::stdout())),
        }
    }
}

impl<F, R> Scaffolder<F, R>
where
    F: TemplateFetcher,
    R: StepRunner,
{
    /// Replace the template fetcher
    pub fn with_fetcher<F2: TemplateFetcher>(self, fetcher: F2) -> Scaffolder<F2, R> {
        Scaffolder {
            config: self.config,
            base_dir: self.base_dir,
            fetcher,
            runner: self.runner,
            progress: self.progress,
        }
    }

    /// Replace the step runner
    pub fn with_runner<R2: StepRunner>(self, runner: R2) -> Scaffolder<F, R2> {
        Scaffolder {
            config: self.config,
            base_dir: self.base_dir,
            fetcher: self.fetcher,
            runner,
            progress: self.progress,
        }
    }

    /// Replace the progress renderer
    pub fn with_progress<P>(mut self, factory: P) -> Self
    where
        P: Fn() -> Box<dyn ProgressSink> + Send + Sync + 'static,
    {
        self.progress = Box::new(factory);
        self
    }

    pub fn config(&self) -> &GosConfig {
        &self.config
    }

    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// The ordered setup steps for `request`
    pub fn plan(&self, request: &ProjectRequest) -> Vec<Step> {
        plan(request, &self.config.scaffold)
    }

    /// Scaffold a project from the single selected template variant
    ///
    /// Selection is checked before any I/O happens.
    ///
    /// # Errors
    /// - `NoTemplateSelected` if not exactly one known variant is selected
    /// - `FetchFailed` / `GitNotFound` if the clone fails
    /// - `Scaffold` wrapping the failing step after rollback
    pub async fn run<S: AsRef<str>>(
        &self,
        request: &ProjectRequest,
        selected: &[S],
    ) -> Result<ScaffoldOutcome> {
        let source = self.config.select_template(selected)?;
        self.run_source(request, &source).await
    }

    /// Scaffold a project from an already resolved template
    pub async fn run_source(
        &self,
        request: &ProjectRequest,
        source: &TemplateSource,
    ) -> Result<ScaffoldOutcome> {
        info!(
            "Creating project '{}' from template '{}' ({})",
            request.project_name(),
            source.variant(),
            source.url()
        );

        let reporter = ProgressReporter::start(
            (self.progress)(),
            self.config.progress.label.clone(),
            Duration::from_millis(self.config.progress.interval_ms),
        );

        let mut workdir = match self.fetcher.fetch(source, &self.base_dir).await {
            Ok(workdir) => workdir,
            Err(e) => {
                reporter.fail().await;
                return Err(e);
            }
        };

        let steps = self.plan(request);
        match self.execute(&steps, &mut workdir).await {
            Ok(()) => {
                reporter.finish().await;
                info!("Project created at {}", workdir.path());
                Ok(ScaffoldOutcome {
                    project_dir: workdir.path(),
                    template: source.slug().to_string(),
                    steps_run: steps.len(),
                })
            }
            Err((failure, completed)) => {
                warn!("Setup failed: {}", failure);
                let rolled_back = self.rollback(&steps[..completed], &workdir).await;
                reporter.fail().await;
                Err(Error::scaffold(request.project_name(), rolled_back, failure))
            }
        }
    }

    /// Run steps in order, stopping at the first failure. On failure returns
    /// the error and how many steps had completed.
    async fn execute(
        &self,
        steps: &[Step],
        workdir: &mut WorkingDirectory,
    ) -> std::result::Result<(), (Error, usize)> {
        let total = steps.len();

        for (idx, step) in steps.iter().enumerate() {
            info!("[{}/{}] {}", idx + 1, total, step.kind.description());

            let root = workdir.path();
            let ctx = StepContext {
                base_dir: workdir.base(),
                root: &root,
            };

            if let Err(e) = self.runner.run(step, &ctx).await {
                let failure = match e {
                    Error::StepFailed { .. } => e,
                    other => Error::step_failed(step.kind, other.to_string()),
                };
                return Err((failure, idx));
            }

            if let StepOp::Rename { to } = &step.op {
                workdir.relocate(to.clone());
            }
        }

        Ok(())
    }

    /// Undo completed steps in reverse, then delete the working directory at
    /// its current location. Returns whether the directory is gone.
    async fn rollback(&self, completed: &[Step], workdir: &WorkingDirectory) -> bool {
        let root = workdir.path();
        warn!("Rolling back: removing {}", root);

        for step in completed.iter().rev() {
            if let Some(compensation) = &step.compensation {
                if let Err(e) = compensate(compensation, &root).await {
                    warn!("Could not undo step {}: {}", step.kind, e);
                }
            }
        }

        match tokio::fs::remove_dir_all(&root).await {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => {
                warn!("Could not remove {}: {}", root, e);
                false
            }
        }
    }
}
