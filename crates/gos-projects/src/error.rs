//! Error types for gos-projects

use crate::pipeline::StepKind;
use thiserror::Error;

/// Result type alias using gos-projects's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Scaffolding error types
#[derive(Error, Debug)]
pub enum Error {
    /// Template identifier has no usable base name
    #[error("Invalid template source: {url}")]
    InvalidSource { url: String },

    /// Template selectors were missing, conflicting or unknown
    #[error("No template selected: {reason}")]
    NoTemplateSelected { reason: String },

    /// Cloning the template failed
    #[error("Failed to clone template {url}: {message}")]
    FetchFailed { url: String, message: String },

    /// Git command not found
    #[error("Git command not found. Please ensure git is installed and in PATH")]
    GitNotFound,

    /// A setup step failed
    #[error("Step '{step}' failed: {message}")]
    StepFailed { step: StepKind, message: String },

    /// The pipeline was aborted after a step failure
    #[error("Failed to create project '{project}': {source}")]
    Scaffold {
        project: String,
        rolled_back: bool,
        #[source]
        source: Box<Error>,
    },

    /// Project name or module name rejected
    #[error("Invalid project request: {message}")]
    InvalidRequest { message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid source error
    pub fn invalid_source(url: impl Into<String>) -> Self {
        Self::InvalidSource { url: url.into() }
    }

    /// Create a no template selected error
    pub fn no_template_selected(reason: impl Into<String>) -> Self {
        Self::NoTemplateSelected {
            reason: reason.into(),
        }
    }

    /// Create a fetch failed error
    pub fn fetch_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FetchFailed {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a step failure tagged with the step that raised it
    pub fn step_failed(step: StepKind, message: impl Into<String>) -> Self {
        Self::StepFailed {
            step,
            message: message.into(),
        }
    }

    /// Wrap a step failure once the pipeline has been rolled back
    pub fn scaffold(project: impl Into<String>, rolled_back: bool, source: Error) -> Self {
        Self::Scaffold {
            project: project.into(),
            rolled_back,
            source: Box::new(source),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// The step that failed, when this error came out of the setup pipeline
    pub fn failed_step(&self) -> Option<StepKind> {
        match self {
            Self::StepFailed { step, .. } => Some(*step),
            Self::Scaffold { source, .. } => source.failed_step(),
            _ => None,
        }
    }
}
