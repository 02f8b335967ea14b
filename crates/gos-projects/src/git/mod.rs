//! Git operations module
//!
//! Resolves template sources to directory slugs and clones them.
//!
//! # Examples
//!
//! ```no_run
//! use gos_projects::git::{GitFetcher, TemplateFetcher};
//! use gos_projects::TemplateSource;
//! use camino::Utf8Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = TemplateSource::new(
//!     "echo",
//!     "https://github.com/yaza-putu/golang-starter-api.git",
//! )?;
//! let workdir = GitFetcher::new().fetch(&source, Utf8Path::new("/tmp")).await?;
//! assert_eq!(workdir.name(), "golang-starter-api");
//! # Ok(())
//! # }
//! ```

mod clone;
mod slug;

pub use clone::{GitFetcher, TemplateFetcher};
pub use slug::resolve_slug;
