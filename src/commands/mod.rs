//! # CLI Subcommands
//!
//! Contains modules that run the subcommands.

pub mod langx;
pub mod completions;

use std::io::Read;
use crate::DYNERR;

#[derive(thiserror::Error,Debug)]
pub enum CommandError {
    #[error("Command could not be interpreted")]
    InvalidCommand,
    #[error("One of the parameters was out of range")]
    OutOfRange,
    #[error("Input source could not be interpreted")]
    UnknownFormat
}

/// Read all of stdin as bytes, line entry is refused
fn read_piped(cmd_name: &str) -> Result<Vec<u8>,DYNERR> {
    if atty::is(atty::Stream::Stdin) {
        log::error!("line entry is not supported for `{}`, please pipe something in",cmd_name);
        return Err(Box::new(CommandError::InvalidCommand));
    }
    let mut dat = Vec::new();
    std::io::stdin().read_to_end(&mut dat)?;
    if dat.len()==0 {
        log::error!("{} did not receive any data from previous node",cmd_name);
        return Err(Box::new(CommandError::InvalidCommand));
    }
    Ok(dat)
}

/// Read all of stdin as a string, line entry is refused
fn read_piped_string(cmd_name: &str) -> Result<String,DYNERR> {
    match String::from_utf8(read_piped(cmd_name)?) {
        Ok(s) => Ok(s),
        Err(_) => {
            log::error!("the input to {} could not be interpreted as a string",cmd_name);
            Err(Box::new(CommandError::UnknownFormat))
        }
    }
}
