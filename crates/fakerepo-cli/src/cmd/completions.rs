use std::io::Write;

use clap::{Args, Command};
use clap_complete::Shell;

/// Arguments for `fakerepo completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to write a completion script for.
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Write the completion script for `command` to `out`, registered under
    /// the command's own name.
    pub fn write(&self, mut command: Command, out: &mut dyn Write) {
        let bin = command.get_name().to_string();
        clap_complete::generate(self.shell, &mut command, bin, out);
    }
}
