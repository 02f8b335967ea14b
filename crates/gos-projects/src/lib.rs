//! # gos-projects
//!
//! Scaffolding library for the gos CLI providing:
//! - Template source resolution and cloning
//! - An ordered setup pipeline with rollback on failure
//! - A concurrent progress reporter
//! - Layered configuration
//!
//! # Examples
//!
//! ```no_run
//! use gos_projects::{GosConfig, ProjectRequest, Scaffolder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GosConfig::load(None)?;
//! let request = ProjectRequest::new("demo", "github.com/x/demo")?;
//!
//! let outcome = Scaffolder::new(config, "/tmp")
//!     .run(&request, &["echo"])
//!     .await?;
//! println!("created {}", outcome.project_dir);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod git;
pub mod pipeline;
pub mod progress;
pub mod types;

pub use config::{GosConfig, ProgressStyle};
pub use error::{Error, Result};
pub use pipeline::{Scaffolder, StepKind};
pub use progress::{DotSink, ProgressOutcome, ProgressReporter, ProgressSink, SilentSink};
pub use types::{CloneOptions, ProjectRequest, ScaffoldOutcome, TemplateSource, WorkingDirectory};
