//! How command results and failures reach the terminal.
//!
//! Reports go to stdout as one JSON document, as `key=value` lines, or as
//! headed human sections. Failures go to stderr in the same mode. The mode
//! comes from `--format`/`--json`, then `FORMAT`, then whether stdout is a
//! terminal.

use std::env;
use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

use anyhow::Result;
use clap::ValueEnum;
use fakerepo_core::GenerateError;
use serde::Serialize;

/// Environment variable consulted when no format flag is given.
pub const FORMAT_ENV: &str = "FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Headed sections for people.
    Pretty,
    /// One `key=value` per line.
    Text,
    /// A single JSON document.
    Json,
}

impl OutputMode {
    /// Pick the mode for this process.
    pub fn detect(flag: Option<Self>, json: bool) -> Self {
        let from_env = env::var(FORMAT_ENV).ok();
        Self::choose(flag, json, from_env.as_deref(), io::stdout().is_terminal())
    }

    fn choose(flag: Option<Self>, json: bool, from_env: Option<&str>, tty: bool) -> Self {
        // Unknown FORMAT values are ignored rather than rejected.
        let from_env = from_env.and_then(|raw| Self::from_str(raw, true).ok());
        match (flag, json, from_env) {
            (Some(mode), _, _) => mode,
            (None, true, _) => Self::Json,
            (None, false, Some(mode)) => mode,
            (None, false, None) if tty => Self::Pretty,
            (None, false, None) => Self::Text,
        }
    }

    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// A command result that can be shown in every [`OutputMode`].
pub trait Report: Serialize {
    /// `key=value` lines for scripts.
    fn text(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Layout for people, built from [`heading`] and [`field`].
    fn pretty(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Print `report` to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be written or the report fails to
/// serialize.
pub fn print_report<R: Report>(mode: OutputMode, report: &R) -> Result<()> {
    write_report(mode, report, &mut io::stdout().lock())
}

fn write_report<R: Report>(mode: OutputMode, report: &R, out: &mut dyn Write) -> Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        OutputMode::Text => report.text(out)?,
        OutputMode::Pretty => report.pretty(out)?,
    }
    Ok(())
}

/// Section title underlined to its own width.
pub fn heading(out: &mut dyn Write, title: &str) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(title.chars().count()))
}

/// Indented `label value` line with labels padded to one column.
pub fn field(out: &mut dyn Write, label: &str, value: impl Display) -> io::Result<()> {
    writeln!(out, "  {label:<12}{value}")
}

/// What the user sees when a command fails.
#[derive(Debug, Serialize)]
pub struct Failure {
    pub message: String,
    /// Stable code for generation errors, e.g. `E1001`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl Failure {
    /// Generation errors keep their code and hint; anything else is shown
    /// with its full context chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<GenerateError>() {
            Some(generate_err) => {
                let kind = generate_err.kind();
                Self {
                    message: generate_err.to_string(),
                    code: Some(kind.code()),
                    hint: kind.hint(),
                }
            }
            None => Self {
                message: format!("{err:#}"),
                code: None,
                hint: None,
            },
        }
    }

    /// Print to stderr.
    ///
    /// # Errors
    ///
    /// Returns an error if stderr cannot be written.
    pub fn print(&self, mode: OutputMode) -> Result<()> {
        self.write(mode, &mut io::stderr().lock())
    }

    fn write(&self, mode: OutputMode, out: &mut dyn Write) -> Result<()> {
        if mode.is_json() {
            serde_json::to_writer_pretty(&mut *out, &serde_json::json!({ "error": self }))?;
            writeln!(out)?;
            return Ok(());
        }
        match self.code {
            Some(code) => writeln!(out, "error[{code}]: {}", self.message)?,
            None => writeln!(out, "error: {}", self.message)?,
        }
        if let Some(hint) = self.hint {
            writeln!(out, "  hint: {hint}")?;
        }
        Ok(())
    }
}
