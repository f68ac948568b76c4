//! # Command Line Interface
//!
//! The command tree is in `cli.rs`, shared with the build script.
//! Subcommands are run by the `commands` module.

use env_logger;
#[cfg(windows)]
use colored;
use log::error;
use integerbasic::commands;
use integerbasic::commands::CommandError;

include!("cli.rs");

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    #[cfg(windows)]
    let _ = colored::control::set_virtual_terminal(true);

    let main_cmd = build_cli();
    let matches = main_cmd.clone().get_matches();

    if let Some(cmd) = matches.subcommand_matches("completions") {
        return commands::completions::generate(main_cmd,cmd);
    }

    // Analyze a program, pass it through if there are no errors
    if let Some(cmd) = matches.subcommand_matches("verify") {
        return commands::langx::verify(cmd);
    }

    if let Some(cmd) = matches.subcommand_matches("renumber") {
        return commands::langx::renumber(cmd);
    }

    if let Some(cmd) = matches.subcommand_matches("tokenize") {
        return commands::langx::tokenize(cmd);
    }

    if let Some(cmd) = matches.subcommand_matches("detokenize") {
        return commands::langx::detokenize(cmd);
    }

    if let Some(cmd) = matches.subcommand_matches("tokens") {
        return commands::langx::tokens(cmd);
    }

    error!("No subcommand was found, try `integerbasic --help`");
    return Err(Box::new(CommandError::InvalidCommand));
}
