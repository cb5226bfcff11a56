pub mod completions;
pub mod generate;
pub mod plan;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ValueEnum};
use fakerepo_core::{BuildTime, GenerationRequest, SelectionStrategy};
use tracing::info;

use crate::config::{DependencyProtocol, GeneratorConfig, load_config};

/// `--strategy` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Partial Fisher-Yates shuffle of the candidate pool.
    Shuffle,
    /// Repeated draws until enough distinct candidates are found.
    Rejection,
}

impl From<StrategyArg> for SelectionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Shuffle => Self::PartialShuffle,
            StrategyArg::Rejection => Self::Rejection,
        }
    }
}

/// Flags shared by every command that generates a tree.
///
/// Every flag is optional so that unset flags fall back to the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerationArgs {
    /// Total number of packages (default: 32).
    #[arg(short, long)]
    pub packages: Option<usize>,

    /// Number of dependency levels (default: 3).
    #[arg(short, long)]
    pub levels: Option<usize>,

    /// Seed string; the same seed and options reproduce the same tree.
    #[arg(short, long)]
    pub seed: Option<String>,

    /// Build time in seconds, fixed (`3`) or a range (`2,5`).
    #[arg(short, long, value_name = "SECS|MIN,MAX")]
    pub delay: Option<BuildTime>,

    /// Also write a turbo.json pipeline.
    #[arg(short = 't', long)]
    pub with_turbo: bool,

    /// Also write an nx.json and the nx devDependency.
    #[arg(short = 'n', long)]
    pub with_nx: bool,

    /// Version specifier written for sibling dependencies.
    #[arg(long, value_enum)]
    pub protocol: Option<DependencyProtocol>,

    /// How dependency subsets are drawn.
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Config file (default: ./fakerepo.toml when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Generation settings after merging flags, config file and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGeneration {
    pub request: GenerationRequest,
    pub with_turbo: bool,
    pub with_nx: bool,
    pub protocol: DependencyProtocol,
    /// `true` when no seed was given and one was picked at random.
    pub random_seed: bool,
}

impl GenerationArgs {
    /// Load the config file relative to `cwd` and merge it with the flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded.
    pub fn resolve(&self, cwd: &Path) -> Result<ResolvedGeneration> {
        let config = load_config(self.config.as_deref(), cwd)?;
        Ok(self.merge(config))
    }

    fn merge(&self, config: GeneratorConfig) -> ResolvedGeneration {
        let (seed, random_seed) = match self.seed.clone().or(config.seed) {
            Some(seed) => (seed, false),
            None => (rand::random::<u64>().to_string(), true),
        };
        if random_seed {
            info!(seed = %seed, "no seed given, picked one");
        }

        let request = GenerationRequest {
            package_count: self.packages.unwrap_or(config.packages),
            package_levels: self.levels.unwrap_or(config.levels),
            seed,
            build_time: self.delay.or(config.delay),
            selection: self.strategy.map_or(config.strategy, SelectionStrategy::from),
        };

        ResolvedGeneration {
            request,
            with_turbo: self.with_turbo || config.with_turbo,
            with_nx: self.with_nx || config.with_nx,
            protocol: self.protocol.unwrap_or(config.protocol),
            random_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn defaults_apply_without_flags_or_file() {
        let resolved = GenerationArgs {
            seed: Some("abc".into()),
            ..GenerationArgs::default()
        }
        .merge(GeneratorConfig::default());
        assert_eq!(resolved.request, GenerationRequest::new(32, 3, "abc"));
        assert!(!resolved.random_seed);
        assert_eq!(resolved.protocol, DependencyProtocol::Yarn1);
    }

    #[test]
    fn flags_override_file() {
        let config = parse_config(
            "packages = 10\nlevels = 2\nseed = \"file\"\ndelay = 4\nprotocol = \"workspace\"\n",
        )
        .expect("parse");
        let args = GenerationArgs {
            packages: Some(20),
            seed: Some("flag".into()),
            delay: Some(BuildTime::Range(1.0, 2.0)),
            strategy: Some(StrategyArg::Rejection),
            ..GenerationArgs::default()
        };
        let resolved = args.merge(config);
        assert_eq!(resolved.request.package_count, 20);
        assert_eq!(resolved.request.package_levels, 2);
        assert_eq!(resolved.request.seed, "flag");
        assert_eq!(resolved.request.build_time, Some(BuildTime::Range(1.0, 2.0)));
        assert_eq!(resolved.request.selection, SelectionStrategy::Rejection);
        assert_eq!(resolved.protocol, DependencyProtocol::Workspace);
    }

    #[test]
    fn file_toggles_survive_unset_flags() {
        let config = parse_config("with_turbo = true\nseed = \"s\"\n").expect("parse");
        let resolved = GenerationArgs::default().merge(config);
        assert!(resolved.with_turbo);
        assert!(!resolved.with_nx);
        assert_eq!(resolved.request.seed, "s");
    }

    #[test]
    fn missing_seed_is_randomized() {
        let resolved = GenerationArgs::default().merge(GeneratorConfig::default());
        assert!(resolved.random_seed);
        assert!(resolved.request.seed.parse::<u64>().is_ok());
    }
}
