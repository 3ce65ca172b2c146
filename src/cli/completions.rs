//! Completions command implementation

use crate::cli::{Cli, CompletionsArgs};
use clap::CommandFactory;
use clap_complete::generate;
use std::io::{self, Write};

/// Handle `paraplan completions` command
pub fn handle_completions(args: &CompletionsArgs) {
    write_completions(args, &mut io::stdout());
}

/// Write the completion script for `args.shell` to `out`.
pub fn write_completions(args: &CompletionsArgs, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, bin_name, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap_complete::Shell;

    fn render(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(&CompletionsArgs { shell }, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_completions_bash_mentions_subcommands() {
        let script = render(Shell::Bash);
        assert!(script.contains("paraplan"));
        assert!(script.contains("schedule"));
    }

    #[test]
    fn test_completions_zsh_not_empty() {
        assert!(!render(Shell::Zsh).is_empty());
    }
}
