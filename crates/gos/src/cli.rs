//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// gos - Create Go API projects from starter templates
#[derive(Parser, Debug)]
#[command(name = "gos")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a gos config file (default: ~/.gos/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project from a template
    Create(CreateArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Use the Echo framework starter
    #[arg(long)]
    pub echo: bool,

    /// Use the MongoDB starter
    #[arg(long)]
    pub mongo: bool,

    /// Project name (prompted when omitted)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Go module name (prompted when omitted)
    #[arg(short, long)]
    pub module: Option<String>,

    /// Directory to create the project in (default: current directory)
    #[arg(short, long)]
    pub dir: Option<Utf8PathBuf>,

    /// Show the setup plan without cloning or running anything
    #[arg(long)]
    pub dry_run: bool,
}

impl CreateArgs {
    /// Template variants selected by flags, in declaration order
    pub fn selected_templates(&self) -> Vec<&'static str> {
        let mut selected = Vec::new();
        if self.echo {
            selected.push("echo");
        }
        if self.mongo {
            selected.push("mongo");
        }
        selected
    }
}
