//! Core types for project scaffolding

use crate::error::{Error, Result};
use crate::git::resolve_slug;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// User-supplied naming parameters for a new project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    project_name: String,
    module_name: String,
}

impl ProjectRequest {
    /// Build a request, trimming both names
    ///
    /// # Errors
    /// Returns `InvalidRequest` if either name is empty after trimming
    pub fn new(project_name: impl Into<String>, module_name: impl Into<String>) -> Result<Self> {
        let project_name = project_name.into().trim().to_string();
        let module_name = module_name.into().trim().to_string();

        if project_name.is_empty() {
            return Err(Error::invalid_request("project name must not be empty"));
        }
        if module_name.is_empty() {
            return Err(Error::invalid_request("module name must not be empty"));
        }

        Ok(Self {
            project_name,
            module_name,
        })
    }

    /// Target directory name and project identity
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Module namespace written into the template
    pub fn module_name(&self) -> &str {
        &self.module_name
    }
}

/// Options passed through to `git clone`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneOptions {
    /// Shallow clone with specified depth
    #[serde(default)]
    pub depth: Option<u32>,
    /// Branch to checkout
    #[serde(default)]
    pub branch: Option<String>,
}

/// A resolved template: where to clone from and the directory name it lands in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    variant: String,
    url: String,
    slug: String,
    clone_options: CloneOptions,
}

impl TemplateSource {
    /// Resolve a template source, deriving its slug
    ///
    /// # Errors
    /// Returns `InvalidSource` if no slug can be derived from `url`
    pub fn new(variant: impl Into<String>, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let slug = resolve_slug(&url)?;
        Ok(Self {
            variant: variant.into(),
            url,
            slug,
            clone_options: CloneOptions::default(),
        })
    }

    /// Attach clone options
    pub fn with_clone_options(mut self, options: CloneOptions) -> Self {
        self.clone_options = options;
        self
    }

    /// Name of the template variant that selected this source
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Clone URL or path
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Directory name the template is cloned into
    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn clone_options(&self) -> &CloneOptions {
        &self.clone_options
    }
}

/// Location of the fetched template on disk
///
/// Starts out named after the template slug and is relocated once the
/// rename step succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDirectory {
    base: Utf8PathBuf,
    name: String,
}

impl WorkingDirectory {
    pub fn new(base: impl Into<Utf8PathBuf>, name: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            name: name.into(),
        }
    }

    /// Directory containing the working directory
    pub fn base(&self) -> &Utf8Path {
        &self.base
    }

    /// Current leaf name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full current path
    pub fn path(&self) -> Utf8PathBuf {
        self.base.join(&self.name)
    }

    /// Track a rename within the same base directory
    pub fn relocate(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }
}

/// Summary of a successful scaffold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOutcome {
    /// Final project directory
    pub project_dir: Utf8PathBuf,
    /// Slug of the template the project was created from
    pub template: String,
    /// Number of setup steps executed
    pub steps_run: usize,
}
