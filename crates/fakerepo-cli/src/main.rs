#![forbid(unsafe_code)]

mod cmd;
mod config;
mod output;
mod templates;
mod writer;

use std::env;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use output::{Failure, OutputMode};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "fakerepo",
    author,
    version,
    about = "fakerepo: seed-reproducible fake monorepos for build tool testing",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (default: pretty on a terminal, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        OutputMode::detect(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Generate and write a fake monorepo",
        long_about = "Generate a layered dependency tree from a seed and write it as a workspace repository.",
        after_help = "EXAMPLES:\n    # 32 packages over 3 levels\n    fakerepo generate ./repo --seed demo\n\n    # Larger tree with 2-5 second builds and turbo config\n    fakerepo generate ./repo -p 200 -l 5 -d 2,5 --with-turbo\n\n    # Overwrite an existing checkout\n    fakerepo generate ./repo --seed demo --force"
    )]
    Generate(cmd::generate::GenerateArgs),

    #[command(
        about = "Print a generated tree without writing it",
        long_about = "Generate a tree in memory and print its packages, dependencies, build times and build waves.",
        after_help = "EXAMPLES:\n    # Inspect the default tree for a seed\n    fakerepo plan --seed demo\n\n    # Emit machine-readable output\n    fakerepo plan --seed demo --format json"
    )]
    Plan(cmd::plan::PlanArgs),

    #[command(
        about = "Generate shell completions",
        long_about = "Generate shell completion scripts for fakerepo.",
        after_help = "EXAMPLES:\n    # Bash completions\n    fakerepo completions bash > ~/.local/share/bash-completion/completions/fakerepo"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("FAKEREPO_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "fakerepo=debug,info"
        } else {
            "fakerepo=info,warn"
        })
    });

    let format = env::var("FAKEREPO_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_ansi(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = cli.output_mode();
    debug!(?output, "resolved output mode");

    let result = env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Commands::Generate(ref args) => {
                cmd::generate::run_generate(args, output, cli.quiet, &cwd)
            }
            Commands::Plan(ref args) => cmd::plan::run_plan(args, output, &cwd),
            Commands::Completions(ref args) => {
                args.write(Cli::command(), &mut std::io::stdout().lock());
                Ok(())
            }
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("command failed: {err:#}");
            if let Err(render_err) = Failure::from_error(&err).print(output) {
                eprintln!("error: {err:#} ({render_err})");
            }
            ExitCode::FAILURE
        }
    }
}
