//! completion command - Generate shell completion scripts

use std::io::{self, Write};

use anyhow::Result;
use clap::CommandFactory;

use crate::cli::args::{Cli, Shell};

/// Print the completion script for `shell` to stdout.
pub fn completion(shell: Shell) -> Result<()> {
    write_completion(shell, &mut io::stdout().lock())
}

fn write_completion(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(clap_complete::Shell::from(shell), &mut cmd, name, out);
    out.flush()?;
    Ok(())
}

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut out = Vec::new();
        write_completion(shell, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn bash_script_lists_subcommands() {
        let script = script(Shell::Bash);
        assert!(script.contains("fixtura"));
        assert!(script.contains("generate"));
        assert!(script.contains("inspect"));
    }

    #[test]
    fn every_shell_produces_output() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            assert!(!script(shell).is_empty());
        }
    }
}
