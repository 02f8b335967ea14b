//! Setup step descriptors

use crate::config::ScaffoldConfig;
use crate::types::ProjectRequest;
use camino::Utf8PathBuf;
use std::fmt;

/// Identity of a setup step, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Rename the clone directory to the project name
    Rename,
    /// Switch the working root to the renamed directory
    EnterProject,
    /// Drop the template's version-control metadata
    RemoveVcsMetadata,
    /// Resolve and tidy dependencies
    TidyDependencies,
    /// Copy the example env file into place
    MaterializeEnv,
    /// Generate application keys
    GenerateKey,
    /// Rewrite the module namespace
    ConfigureModule,
}

impl StepKind {
    /// Every step in execution order
    pub const ALL: [StepKind; 7] = [
        Self::Rename,
        Self::EnterProject,
        Self::RemoveVcsMetadata,
        Self::TidyDependencies,
        Self::MaterializeEnv,
        Self::GenerateKey,
        Self::ConfigureModule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rename => "rename",
            Self::EnterProject => "enter-project",
            Self::RemoveVcsMetadata => "remove-vcs-metadata",
            Self::TidyDependencies => "tidy-dependencies",
            Self::MaterializeEnv => "materialize-env",
            Self::GenerateKey => "generate-key",
            Self::ConfigureModule => "configure-module",
        }
    }

    /// Human readable description for progress logs
    pub fn description(&self) -> &'static str {
        match self {
            Self::Rename => "Renaming template directory",
            Self::EnterProject => "Entering project directory",
            Self::RemoveVcsMetadata => "Removing version control metadata",
            Self::TidyDependencies => "Tidying dependencies",
            Self::MaterializeEnv => "Creating environment files",
            Self::GenerateKey => "Generating keys",
            Self::ConfigureModule => "Configuring module",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a step does. Paths are relative to the working root, except
/// `Rename` whose target is relative to the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOp {
    Rename { to: String },
    Enter,
    RemoveDir { path: Utf8PathBuf },
    Command { program: String, args: Vec<String> },
    CopyFile { from: Utf8PathBuf, to: Vec<Utf8PathBuf> },
}

impl fmt::Display for StepOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rename { to } => write!(f, "rename to {}", to),
            Self::Enter => f.write_str("enter project directory"),
            Self::RemoveDir { path } => write!(f, "remove {}", path),
            Self::Command { program, args } => {
                write!(f, "run {}", program)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
            Self::CopyFile { from, to } => {
                let targets: Vec<&str> = to.iter().map(|p| p.as_str()).collect();
                write!(f, "copy {} -> {}", from, targets.join(", "))
            }
        }
    }
}

/// Undo action for a completed step, run during rollback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// Remove files relative to the working root
    RemoveFiles(Vec<Utf8PathBuf>),
}

/// A named unit of work in the setup pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub kind: StepKind,
    pub op: StepOp,
    pub compensation: Option<Compensation>,
}

impl Step {
    pub fn new(kind: StepKind, op: StepOp) -> Self {
        Self {
            kind,
            op,
            compensation: None,
        }
    }

    pub fn with_compensation(mut self, compensation: Compensation) -> Self {
        self.compensation = Some(compensation);
        self
    }
}

/// Build the ordered setup steps for a request
pub fn plan(request: &ProjectRequest, scaffold: &ScaffoldConfig) -> Vec<Step> {
    let env_targets: Vec<Utf8PathBuf> = scaffold.env_targets.iter().map(Utf8PathBuf::from).collect();

    vec![
        Step::new(
            StepKind::Rename,
            StepOp::Rename {
                to: request.project_name().to_string(),
            },
        ),
        Step::new(StepKind::EnterProject, StepOp::Enter),
        Step::new(
            StepKind::RemoveVcsMetadata,
            StepOp::RemoveDir {
                path: Utf8PathBuf::from(&scaffold.vcs_dir),
            },
        ),
        Step::new(StepKind::TidyDependencies, command(&scaffold.tidy_command, &[])),
        Step::new(
            StepKind::MaterializeEnv,
            StepOp::CopyFile {
                from: Utf8PathBuf::from(&scaffold.env_example),
                to: env_targets.clone(),
            },
        )
        .with_compensation(Compensation::RemoveFiles(env_targets)),
        Step::new(
            StepKind::GenerateKey,
            command(&scaffold.entry_point, &[scaffold.key_generate.as_str()]),
        ),
        Step::new(
            StepKind::ConfigureModule,
            command(
                &scaffold.entry_point,
                &[scaffold.configure_module.as_str(), request.module_name()],
            ),
        ),
    ]
}

/// `base` is program followed by leading args
fn command(base: &[String], extra: &[&str]) -> StepOp {
    let (program, args) = base.split_first().map_or(("", &[][..]), |(p, rest)| (p.as_str(), rest));

    let mut all_args: Vec<String> = args.to_vec();
    all_args.extend(extra.iter().map(|s| s.to_string()));

    StepOp::Command {
        program: program.to_string(),
        args: all_args,
    }
}
