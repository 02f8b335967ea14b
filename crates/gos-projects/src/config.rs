//! Configuration loading with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (~/.gos/config.yaml, or an explicit path)
//! 3. Environment variables (GOS_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::{CloneOptions, TemplateSource};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/embedded/config/"]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "defaults.yaml";
const ENV_PREFIX: &str = "GOS_";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GosConfig {
    /// Template variants keyed by selector name
    pub templates: BTreeMap<String, TemplateConfig>,
    pub scaffold: ScaffoldConfig,
    pub progress: ProgressConfig,
}

/// A template variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Clone URL or local path
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Branch to clone instead of the remote default
    #[serde(default)]
    pub branch: Option<String>,
    /// Shallow clone depth
    #[serde(default)]
    pub depth: Option<u32>,
}

/// Template contract: the files and commands the setup steps rely on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    /// Version-control metadata directory removed from the project
    pub vcs_dir: String,
    /// Environment file copied into every target
    pub env_example: String,
    pub env_targets: Vec<String>,
    /// Dependency tidy command, program first
    pub tidy_command: Vec<String>,
    /// Template entry point, program first
    pub entry_point: Vec<String>,
    /// Entry point subcommand that generates application keys
    pub key_generate: String,
    /// Entry point subcommand that rewrites the module namespace
    pub configure_module: String,
}

/// Progress reporter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressConfig {
    pub label: String,
    pub interval_ms: u64,
    #[serde(default)]
    pub style: ProgressStyle,
}

/// How progress is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStyle {
    /// Label followed by a dot per tick
    #[default]
    Dots,
    /// Terminal spinner
    Spinner,
}

impl std::str::FromStr for ProgressStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dots" => Ok(Self::Dots),
            "spinner" => Ok(Self::Spinner),
            other => Err(Error::invalid_config(format!(
                "unknown progress style '{}', expected dots or spinner",
                other
            ))),
        }
    }
}

impl GosConfig {
    /// Load configuration with hierarchy: defaults → user file → env
    ///
    /// An explicit `path` must exist; the default user file is optional.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let mut tree = load_embedded_value(DEFAULTS_FILE)?;

        let user_file = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::invalid_config(format!(
                        "config file not found: {}",
                        path
                    )));
                }
                Some(path.to_path_buf())
            }
            None => default_config_path().filter(|p| p.exists()),
        };

        if let Some(user_file) = user_file {
            debug!("Loading config overrides from {}", user_file);
            let overlay = load_yaml_value(&user_file)?;
            merge_values(&mut tree, overlay);
        }

        let mut config: GosConfig = serde_yaml_ng::from_value(tree)?;
        config.apply_env_overrides(env_snapshot()?)?;
        config.validate()?;
        Ok(config)
    }

    /// Embedded defaults only
    pub fn defaults() -> Result<Self> {
        let config: GosConfig = serde_yaml_ng::from_value(load_embedded_value(DEFAULTS_FILE)?)?;
        Ok(config)
    }

    /// Parse a complete configuration from YAML, layered over the defaults
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let mut tree = load_embedded_value(DEFAULTS_FILE)?;
        merge_values(&mut tree, serde_yaml_ng::from_str(content)?);
        let config: GosConfig = serde_yaml_ng::from_value(tree)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `GOS_*` overrides from an environment snapshot
    pub fn apply_env_overrides<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };

            match name {
                "PROGRESS_INTERVAL_MS" => {
                    self.progress.interval_ms = value.parse().map_err(|_| {
                        Error::invalid_config(format!("{} must be a number: {}", key, value))
                    })?;
                }
                "PROGRESS_STYLE" => {
                    self.progress.style = value.parse()?;
                }
                "CLONE_DEPTH" => {
                    let depth: u32 = value.parse().map_err(|_| {
                        Error::invalid_config(format!("{} must be a number: {}", key, value))
                    })?;
                    for template in self.templates.values_mut() {
                        template.depth = Some(depth);
                    }
                }
                _ => {
                    if let Some(variant) = name
                        .strip_prefix("TEMPLATE_")
                        .and_then(|rest| rest.strip_suffix("_URL"))
                    {
                        let variant = variant.to_lowercase();
                        debug!("Template '{}' URL overridden from {}", variant, key);
                        self.templates
                            .entry(variant)
                            .and_modify(|t| t.url = value.clone())
                            .or_insert_with(|| TemplateConfig {
                                url: value.clone(),
                                description: None,
                                branch: None,
                                depth: None,
                            });
                    }
                }
            }
        }
        Ok(())
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.templates.is_empty() {
            return Err(Error::invalid_config("at least one template is required"));
        }
        for (name, template) in &self.templates {
            if template.url.trim().is_empty() {
                return Err(Error::invalid_config(format!(
                    "template '{}' has an empty url",
                    name
                )));
            }
        }
        if self.scaffold.tidy_command.is_empty() {
            return Err(Error::invalid_config("scaffold.tidy_command is empty"));
        }
        if self.scaffold.entry_point.is_empty() {
            return Err(Error::invalid_config("scaffold.entry_point is empty"));
        }
        check_relative_path("scaffold.vcs_dir", &self.scaffold.vcs_dir)?;
        check_relative_path("scaffold.env_example", &self.scaffold.env_example)?;
        if self.scaffold.env_targets.is_empty() {
            return Err(Error::invalid_config("scaffold.env_targets is empty"));
        }
        for target in &self.scaffold.env_targets {
            check_relative_path("scaffold.env_targets", target)?;
        }
        if self.progress.interval_ms == 0 {
            return Err(Error::invalid_config(
                "progress.interval_ms must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Resolve exactly one selected template variant
    ///
    /// # Errors
    /// `NoTemplateSelected` when nothing, more than one, or an unknown
    /// variant is selected
    pub fn select_template<S: AsRef<str>>(&self, selected: &[S]) -> Result<TemplateSource> {
        let name = match selected {
            [] => {
                return Err(Error::no_template_selected(format!(
                    "choose one of: {}",
                    self.template_names().join(", ")
                )))
            }
            [one] => one.as_ref(),
            many => {
                let names: Vec<&str> = many.iter().map(|s| s.as_ref()).collect();
                return Err(Error::no_template_selected(format!(
                    "template selectors are mutually exclusive, got: {}",
                    names.join(", ")
                )));
            }
        };

        let template = self.templates.get(name).ok_or_else(|| {
            Error::no_template_selected(format!(
                "unknown template '{}', choose one of: {}",
                name,
                self.template_names().join(", ")
            ))
        })?;

        Ok(TemplateSource::new(name, &template.url)?.with_clone_options(CloneOptions {
            depth: template.depth,
            branch: template.branch.clone(),
        }))
    }

    /// Configured variant names, sorted
    pub fn template_names(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }
}

/// Scaffold paths are joined onto the project root, so they must stay inside it
fn check_relative_path(field: &str, value: &str) -> Result<()> {
    let mut has_name = false;
    for component in Utf8Path::new(value).components() {
        match component {
            Utf8Component::Normal(_) => has_name = true,
            Utf8Component::CurDir => {}
            _ => {
                return Err(Error::invalid_config(format!(
                    "{} must be a relative path inside the project: {:?}",
                    field, value
                )))
            }
        }
    }
    if !has_name {
        return Err(Error::invalid_config(format!(
            "{} must name a file or directory: {:?}",
            field, value
        )));
    }
    Ok(())
}

/// Process environment as UTF-8 pairs
///
/// Unrelated variables that are not valid UTF-8 are skipped; a `GOS_*`
/// variable with such a value is a configuration error.
fn env_snapshot() -> Result<Vec<(String, String)>> {
    let mut vars = Vec::new();
    for (key, value) in env::vars_os() {
        let Ok(key) = key.into_string() else {
            continue;
        };
        match value.into_string() {
            Ok(value) => vars.push((key, value)),
            Err(_) if key.starts_with(ENV_PREFIX) => {
                return Err(Error::invalid_config(format!(
                    "{} is not valid UTF-8",
                    key
                )))
            }
            Err(_) => {}
        }
    }
    Ok(vars)
}

/// Get the user config path (~/.gos/config.yaml)
pub fn default_config_path() -> Option<Utf8PathBuf> {
    let home = env::var("HOME")
        .ok()
        .map(Utf8PathBuf::from)
        .or_else(|| dirs::home_dir().and_then(|p| Utf8PathBuf::from_path_buf(p).ok()))?;
    Some(home.join(".gos").join("config.yaml"))
}

/// Load an embedded configuration file
fn load_embedded_value(filename: &str) -> Result<Value> {
    let embedded_file = EmbeddedConfigs::get(filename).ok_or_else(|| {
        Error::invalid_config(format!("Embedded config not found: {}", filename))
    })?;

    let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
        Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", filename))
    })?;

    serde_yaml_ng::from_str(content).map_err(|e| {
        Error::invalid_config(format!(
            "Failed to parse embedded config {}: {}",
            filename, e
        ))
    })
}

/// Load a YAML file as an untyped tree
fn load_yaml_value(path: &Utf8Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    serde_yaml_ng::from_str(&content)
        .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
}

/// Deep-merge `overlay` into `base`; mappings merge, everything else replaces
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (base, overlay) => *base = overlay,
    }
}
