use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use fakerepo_core::generate;
use serde::Serialize;

use crate::cmd::GenerationArgs;
use crate::output::{OutputMode, Report, field, heading, print_report};
use crate::writer::{WriteOptions, write_repo};

/// Arguments for `fakerepo generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory to write the repository into.
    pub destination: PathBuf,

    /// Write into a non-empty destination.
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub generation: GenerationArgs,
}

#[derive(Debug, Serialize)]
struct GenerateReport {
    destination: PathBuf,
    seed: String,
    random_seed: bool,
    packages: usize,
    level_sizes: Vec<usize>,
    edges: usize,
    files_written: usize,
    root_files: Vec<String>,
}

/// Generate a tree and write it under the destination.
///
/// # Errors
///
/// Returns an error for invalid generation settings, an occupied destination
/// without `--force`, or any I/O failure.
pub fn run_generate(
    args: &GenerateArgs,
    output: OutputMode,
    quiet: bool,
    cwd: &Path,
) -> Result<()> {
    let resolved = args.generation.resolve(cwd)?;
    let set = generate(&resolved.request)?;

    let destination = cwd.join(&args.destination);
    let options = WriteOptions {
        with_turbo: resolved.with_turbo,
        with_nx: resolved.with_nx,
        protocol: resolved.protocol,
        force: args.force,
        seed: resolved.request.seed.clone(),
    };
    let summary = write_repo(&destination, &set, &options)?;

    if quiet && !output.is_json() {
        return Ok(());
    }

    let report = GenerateReport {
        destination: summary.destination,
        seed: resolved.request.seed,
        random_seed: resolved.random_seed,
        packages: set.len(),
        level_sizes: set.level_sizes(),
        edges: set.edge_count(),
        files_written: summary.files_written,
        root_files: summary.root_files,
    };
    print_report(output, &report)
}

fn join_sizes(sizes: &[usize]) -> String {
    sizes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl Report for GenerateReport {
    fn text(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "destination={}", self.destination.display())?;
        writeln!(out, "seed={}", self.seed)?;
        writeln!(out, "packages={}", self.packages)?;
        writeln!(out, "level_sizes={}", join_sizes(&self.level_sizes))?;
        writeln!(out, "edges={}", self.edges)?;
        writeln!(out, "files_written={}", self.files_written)
    }

    fn pretty(&self, out: &mut dyn Write) -> io::Result<()> {
        heading(out, "Generated repository")?;
        field(out, "Destination", self.destination.display())?;
        if self.random_seed {
            field(out, "Seed", format_args!("{} (random)", self.seed))?;
        } else {
            field(out, "Seed", &self.seed)?;
        }
        field(out, "Packages", self.packages)?;
        field(out, "Levels", join_sizes(&self.level_sizes))?;
        field(out, "Edges", self.edges)?;
        field(out, "Files", self.files_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> GenerateReport {
        GenerateReport {
            destination: PathBuf::from("/tmp/repo"),
            seed: "abc".into(),
            random_seed: false,
            packages: 8,
            level_sizes: vec![6, 2],
            edges: 5,
            files_written: 12,
            root_files: vec!["package.json".into()],
        }
    }

    #[test]
    fn text_report_is_key_value() {
        let mut buf = Vec::new();
        report().text(&mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("seed=abc\n"));
        assert!(text.contains("level_sizes=6,2\n"));
        assert!(text.ends_with("files_written=12\n"));
    }

    #[test]
    fn pretty_report_flags_random_seed() {
        let mut buf = Vec::new();
        let random = GenerateReport {
            random_seed: true,
            ..report()
        };
        random.pretty(&mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("abc (random)"));
    }
}
