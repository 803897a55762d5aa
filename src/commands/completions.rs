//! Shell completions command

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::Result;

/// Generate completions for the requested shell on stdout
pub fn run(args: CompletionsArgs) -> Result<()> {
    generate_to(args.shell, &mut std::io::stdout().lock());
    Ok(())
}

fn generate_to(shell: Shell, out: &mut dyn std::io::Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "jestify", out);
}
