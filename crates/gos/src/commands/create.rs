//! `gos create` command handler

use anyhow::{anyhow, Result};
use camino::{Utf8Path, Utf8PathBuf};
use gos_projects::{
    DotSink, GosConfig, ProgressSink, ProgressStyle, ProjectRequest, Scaffolder, SilentSink,
};

use crate::cli::CreateArgs;
use crate::output::{self, SpinnerSink};
use crate::prompt;

/// Create a new project from the selected template
pub async fn run(args: CreateArgs, config_path: Option<&Utf8Path>, quiet: bool) -> Result<()> {
    let config = GosConfig::load(config_path)?;

    // Reject bad selector combinations before asking for anything
    let source = config.select_template(&args.selected_templates())?;

    let project_name = match args.name {
        Some(name) => name,
        None => prompt::ask("Project name")?,
    };
    let module_name = match args.module {
        Some(module) => module,
        None => prompt::ask("Module name")?,
    };
    let request = ProjectRequest::new(project_name, module_name)?;

    let base_dir = match args.dir {
        Some(dir) => dir,
        None => current_dir()?,
    };
    tracing::debug!("Projects are created under {}", base_dir);

    let style = config.progress.style;
    let scaffolder = Scaffolder::new(config, base_dir).with_progress(progress_factory(style, quiet));

    if args.dry_run {
        output::header("Dry run");
        output::kv("Template", source.variant());
        output::kv("Repository", source.url());
        output::kv("Clone into", scaffolder.base_dir().join(source.slug()).as_str());
        output::kv("Project", scaffolder.base_dir().join(request.project_name()).as_str());
        println!();
        for (idx, step) in scaffolder.plan(&request).iter().enumerate() {
            println!("  {}. {}: {}", idx + 1, step.kind.description(), step.op);
        }
        return Ok(());
    }

    let outcome = scaffolder.run_source(&request, &source).await?;

    if !quiet {
        output::success(&format!(
            "Project '{}' created from {}",
            request.project_name(),
            outcome.template
        ));
        output::kv("Location", outcome.project_dir.as_str());
        output::kv("Module", request.module_name());
        println!();
        output::info(&format!("Next: cd {} && go run cmd/zoro.go", request.project_name()));
    }

    Ok(())
}

fn current_dir() -> Result<Utf8PathBuf> {
    let dir = std::env::current_dir()?;
    Utf8PathBuf::from_path_buf(dir)
        .map_err(|p| anyhow!("Current directory is not valid UTF-8: {}", p.display()))
}

fn progress_factory(
    style: ProgressStyle,
    quiet: bool,
) -> impl Fn() -> Box<dyn ProgressSink> + Send + Sync + 'static {
    move || -> Box<dyn ProgressSink> {
        if quiet {
            return Box::new(SilentSink);
        }
        match style {
            ProgressStyle::Dots => Box::new(DotSink::stdout()),
            ProgressStyle::Spinner => Box::new(SpinnerSink::new()),
        }
    }
}
