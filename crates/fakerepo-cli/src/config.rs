//! Optional `fakerepo.toml` configuration.
//!
//! Precedence (highest wins): command-line flags, then the config file, then
//! built-in defaults. Every key is optional.
//!
//! ```toml
//! packages = 64
//! levels = 4
//! seed = "ci-fixture"
//! delay = [1, 3]        # or a single number of seconds
//! with_turbo = true
//! with_nx = false
//! protocol = "workspace" # "yarn1" (default) or "workspace"
//! strategy = "partial-shuffle"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use fakerepo_core::{BuildTime, SelectionStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "fakerepo.toml";

/// How package manifests reference sibling workspaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyProtocol {
    /// Plain version range, `"1.0.0"`. Understood by every package manager.
    #[default]
    Yarn1,
    /// Workspace protocol, `"workspace:*"` (yarn 2+, pnpm).
    Workspace,
}

impl DependencyProtocol {
    /// Version specifier written for each dependency.
    #[must_use]
    pub const fn version_spec(self) -> &'static str {
        match self {
            Self::Yarn1 => "1.0.0",
            Self::Workspace => "workspace:*",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    #[serde(default = "default_packages")]
    pub packages: usize,
    #[serde(default = "default_levels")]
    pub levels: usize,
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub delay: Option<BuildTime>,
    #[serde(default)]
    pub with_turbo: bool,
    #[serde(default)]
    pub with_nx: bool,
    #[serde(default)]
    pub protocol: DependencyProtocol,
    #[serde(default)]
    pub strategy: SelectionStrategy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            packages: default_packages(),
            levels: default_levels(),
            seed: None,
            delay: None,
            with_turbo: false,
            with_nx: false,
            protocol: DependencyProtocol::default(),
            strategy: SelectionStrategy::default(),
        }
    }
}

const fn default_packages() -> usize {
    32
}

const fn default_levels() -> usize {
    3
}

/// Parse a config document.
///
/// # Errors
///
/// Returns an error for malformed TOML, unknown keys, or an invalid delay.
pub fn parse_config(content: &str) -> Result<GeneratorConfig> {
    let config: GeneratorConfig = toml::from_str(content)?;
    if let Some(delay) = &config.delay {
        delay.validate()?;
    }
    Ok(config)
}

/// Load the config file.
///
/// An explicit path must exist. Without one, `fakerepo.toml` in `cwd` is
/// used when present, otherwise defaults apply.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<GeneratorConfig> {
    let path: PathBuf = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("config file {} does not exist", path.display());
            }
            path.to_path_buf()
        }
        None => {
            let candidate = cwd.join(DEFAULT_CONFIG_FILE);
            if !candidate.exists() {
                return Ok(GeneratorConfig::default());
            }
            candidate
        }
    };

    debug!(path = %path.display(), "loading config");
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
