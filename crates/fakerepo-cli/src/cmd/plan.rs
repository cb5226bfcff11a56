use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use clap::Args;
use fakerepo_core::{Package, generate};
use serde::Serialize;

use crate::cmd::GenerationArgs;
use crate::output::{OutputMode, Report, field, heading, print_report};

/// Arguments for `fakerepo plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub generation: GenerationArgs,
}

#[derive(Debug, Serialize)]
struct PlanReport {
    seed: String,
    level_sizes: Vec<usize>,
    edges: usize,
    packages: Vec<Package>,
    /// Packages that can build in parallel, in build order.
    waves: Vec<Vec<String>>,
}

/// Generate a tree in memory and print it.
///
/// # Errors
///
/// Returns an error for invalid generation settings or a broken graph.
pub fn run_plan(args: &PlanArgs, output: OutputMode, cwd: &Path) -> Result<()> {
    let resolved = args.generation.resolve(cwd)?;
    let set = generate(&resolved.request)?;
    let waves = set.build_waves()?;

    let report = PlanReport {
        seed: resolved.request.seed,
        level_sizes: set.level_sizes(),
        edges: set.edge_count(),
        waves,
        packages: set.into_vec(),
    };
    print_report(output, &report)
}

impl Report for PlanReport {
    fn text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "seed={}", self.seed)?;
        for p in &self.packages {
            writeln!(
                out,
                "package={} level={} build_ms={} deps={}",
                p.name,
                p.level,
                p.build_millis,
                p.dependencies.join(",")
            )?;
        }
        for (i, wave) in self.waves.iter().enumerate() {
            writeln!(out, "wave={i} packages={}", wave.join(","))?;
        }
        Ok(())
    }

    fn pretty(&self, out: &mut dyn Write) -> io::Result<()> {
        heading(out, "Plan")?;
        field(out, "Seed", &self.seed)?;
        field(out, "Packages", self.packages.len())?;
        field(out, "Edges", self.edges)?;
        field(out, "Waves", self.waves.len())?;
        writeln!(out)?;

        heading(out, "Packages")?;
        for p in &self.packages {
            writeln!(out, "{:<20} level {}  {:>6} ms", p.name, p.level, p.build_millis)?;
            for dep in &p.dependencies {
                writeln!(out, "  -> {dep}")?;
            }
        }
        writeln!(out)?;

        heading(out, "Build waves")?;
        for (i, wave) in self.waves.iter().enumerate() {
            writeln!(out, "{i:>3}  {}", wave.join(" "))?;
        }
        Ok(())
    }
}
