//! Setup pipeline
//!
//! The pipeline is a fixed, ordered list of [`Step`] descriptors built by
//! [`plan`] and executed one at a time by a [`StepRunner`]. The
//! [`Scaffolder`] ties it together with the template fetcher and the
//! progress reporter, and removes the working directory when a step fails.

mod orchestrator;
mod runner;
mod steps;

pub use orchestrator::{ProgressFactory, Scaffolder};
pub use runner::{LocalStepRunner, StepContext, StepRunner};
pub use steps::{plan, Compensation, Step, StepKind, StepOp};
