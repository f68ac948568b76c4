//! ## Language Analysis and Transformations

use std::io::Write;
use clap::parser::ValueSource;
use colored::Colorize;
use super::{CommandError,read_piped,read_piped_string};
use crate::grammar;
use crate::lang;
use crate::lang::Analysis;
use crate::lang::integer;
use crate::STDRESULT;

/// The config string if it was given explicitly on the command line
fn explicit_config(cmd: &clap::ArgMatches) -> Option<&String> {
    match cmd.value_source("config") {
        Some(ValueSource::CommandLine) => cmd.get_one::<String>("config"),
        _ => None
    }
}

fn externals(cmd: &clap::ArgMatches) -> Result<Vec<usize>,CommandError> {
    match cmd.try_get_many::<i64>("extern") {
        Ok(Some(ans)) => Ok(ans.map(|x| *x as usize).collect::<Vec<_>>()),
        Ok(None) => Ok(vec![]),
        Err(e) => {
            log::error!("{}",e);
            Err(CommandError::InvalidCommand)
        }
    }
}

fn required_usize(cmd: &clap::ArgMatches,key: &str) -> Result<usize,CommandError> {
    match cmd.get_one::<usize>(key) {
        Some(x) => Ok(*x),
        None => {
            log::error!("missing value for `{}`",key);
            Err(CommandError::InvalidCommand)
        }
    }
}

pub fn verify(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut analyzer = integer::diagnostics::Analyzer::new();
    if let Some(config) = explicit_config(cmd) {
        analyzer.update_config(config)?;
    }
    let doc = lang::Document::from_string(analyzer.read_stdin(),0);
    if doc.text.len()==0 {
        log::error!("verify was handed an empty string");
        return Err(Box::new(CommandError::InvalidCommand));
    }
    if cmd.get_flag("sexpr") {
        analyzer.eprint_lines_sexpr(&doc.text);
    }
    analyzer.analyze(&doc)?;
    for diag in analyzer.get_diags(&doc) {
        lang::eprint_diagnostic(&diag,&doc.text);
    }
    let [err,warn,_info] = analyzer.err_warn_info_counts();
    if warn > 0 {
        eprintln!("! {} {}",warn.to_string().bright_yellow(),"warnings".bright_yellow());
    }
    if err==0 {
        eprintln!("\u{2713} {}","Passing".green());
        if !atty::is(atty::Stream::Stdout) {
            // if not the console, pipe the code to the next node
            println!("{}",doc.text);
        }
        Ok(())
    } else {
        eprintln!("\u{2717} {} {}",err.to_string().red(),"errors".red());
        Err(Box::new(lang::Error::Syntax))
    }
}

pub fn renumber(cmd: &clap::ArgMatches) -> STDRESULT {
    let beg = required_usize(cmd,"beg")?;
    let end = required_usize(cmd,"end")?;
    let first = required_usize(cmd,"first")?;
    let step = required_usize(cmd,"step")?;
    if step==0 || beg >= end {
        log::error!("renumber parameters are out of range");
        return Err(Box::new(CommandError::OutOfRange));
    }
    let reorder = cmd.get_flag("reorder");
    let externals = externals(cmd)?;
    let program = read_piped_string("renumber")?;
    lang::verify_str(grammar::language(),&program)?;
    let mut renumberer = integer::renumber::Renumberer::new();
    renumberer.set_external_refs(externals);
    renumberer.set_flags(match reorder {true => 1, false => 0});
    let new_prog = renumberer.renumber(&program,beg,end,first,step)?;
    log::warn!("line number expressions must be manually adjusted");
    print!("{}",&new_prog);
    Ok(())
}

pub fn tokenize(cmd: &clap::ArgMatches) -> STDRESULT {
    let program = read_piped_string("tokenize")?;
    lang::verify_str(grammar::language(),&program)?;
    let mut tokenizer = integer::tokenizer::Tokenizer::new();
    let object = tokenizer.tokenize(&program)?;
    if atty::is(atty::Stream::Stdout) || cmd.get_flag("console") {
        crate::display_block(0,&object);
    } else {
        std::io::stdout().write_all(&object)?;
    }
    Ok(())
}

pub fn detokenize(cmd: &clap::ArgMatches) -> STDRESULT {
    let mut tokenizer = integer::tokenizer::Tokenizer::new();
    if let Some(config) = explicit_config(cmd) {
        tokenizer.set_config(integer::settings::parse(config)?);
    }
    let tok = read_piped("detokenize")?;
    let program = tokenizer.detokenize(&tok)?;
    for line in program.lines() {
        println!("{}",line);
    }
    Ok(())
}

pub fn tokens(cmd: &clap::ArgMatches) -> STDRESULT {
    let indent = cmd.get_one::<u16>("indent").copied();
    println!("{}",grammar::tokens::token_list_json(indent)?);
    Ok(())
}
