//! # Language Module
//!
//! Objects that want to walk a syntax tree can provide the `Navigate` trait.
//! Such objects can take some action depending on the status of `TreeCursor`.
//! Language specific operations such as tokenization are in the submodules.

pub mod linenum;
pub mod integer;

use colored::*;
use thiserror::Error;
use std::io;
use std::io::Write;
use std::str::FromStr;
use lsp_types as lsp;
use log::{debug,error};

use tree_sitter::{Language,Parser,Tree,TreeCursor,Node};
use crate::{STDRESULT,DYNERR};

pub enum Navigation {
    GotoChild,
    GotoSibling,
    GotoParentSibling,
    Exit
}

#[derive(Error,Debug)]
pub enum Error {
    #[error("Syntax error")]
    Syntax,
    #[error("Invalid Line Number")]
    LineNumber,
    #[error("Tokenization error")]
    Tokenization,
    #[error("Detokenization error")]
    Detokenization,
    #[error("Parser could not be started")]
    ParsingError,
    #[error("Path not found")]
    PathNotFound,
    #[error("Value out of range")]
    OutOfRange
}

/// Program text with optional identification
#[derive(Clone)]
pub struct Document {
    pub uri: Option<lsp::Url>,
    pub version: Option<i32>,
    pub text: String
}

impl Document {
    pub fn from_string(text: String,version: i32) -> Self {
        Self { uri: None, version: Some(version), text }
    }
    pub fn from_file_path(path: &std::path::Path) -> Result<Self,DYNERR> {
        let text = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                error!("could not read {}",path.display());
                return Err(Box::new(e));
            }
        };
        match lsp::Url::from_file_path(path) {
            Ok(uri) => Ok(Self { uri: Some(uri), version: None, text }),
            Err(_) => Err(Box::new(Error::PathNotFound))
        }
    }
}

/// Language analysis that produces diagnostics for a whole document
pub trait Analysis {
    fn analyze(&mut self,doc: &Document) -> STDRESULT;
    fn update_config(&mut self,json_str: &str) -> STDRESULT;
    fn read_stdin(&self) -> String;
    fn get_diags(&self,doc: &Document) -> Vec<lsp::Diagnostic>;
    fn err_warn_info_counts(&self) -> [usize;3];
    fn eprint_lines_sexpr(&self,program: &str);
}

pub trait Navigate {
    fn visit(&mut self,curs: &TreeCursor) -> Result<Navigation,DYNERR>;
    fn walk(&mut self,tree: &Tree) -> STDRESULT
    {
        let mut curs = tree.walk();
        let mut choice = Navigation::GotoChild;
        while !matches!(choice,Navigation::Exit)
        {
            if matches!(choice,Navigation::GotoChild) && curs.goto_first_child() {
                choice = self.visit(&curs)?;
            } else if matches!(choice,Navigation::GotoParentSibling) && curs.goto_parent() && curs.goto_next_sibling() {
                choice = self.visit(&curs)?;
            } else if matches!(choice,Navigation::GotoSibling) && curs.goto_next_sibling() {
                choice = self.visit(&curs)?;
            } else if curs.goto_next_sibling() {
                choice = self.visit(&curs)?;
            } else if curs.goto_parent() {
                choice = Navigation::GotoSibling;
            } else {
                choice = Navigation::Exit;
            }
        }
        Ok(())
    }
}

/// Parser with the language already set
pub fn new_parser(lang: &Language) -> Result<Parser,DYNERR> {
    let mut parser = Parser::new();
    match parser.set_language(lang) {
        Ok(()) => Ok(parser),
        Err(e) => {
            error!("{}",e);
            Err(Box::new(e))
        }
    }
}

/// Get text of the node, source should be a single line.
/// Returns an empty string if the source does not include the node's range.
pub fn node_text(node: &Node,source: &str) -> String {
    match source.get(node.start_position().column..node.end_position().column) {
        Some(s) => s.to_string(),
        None => String::new()
    }
}

/// Parse the node's text as a number, ignoring spaces.
pub fn node_integer<T: FromStr>(node: &Node,source: &str) -> Option<T> {
    let txt = node_text(node,source).replace(" ","");
    T::from_str(&txt).ok()
}

/// Convert a syntax tree range to an LSP range, `row` and `col` are added to the positions.
pub fn lsp_range(rng: tree_sitter::Range,row: isize,col: isize) -> lsp::Range {
    lsp::Range::new(
        lsp::Position::new((rng.start_point.row as isize + row) as u32,(rng.start_point.column as isize + col) as u32),
        lsp::Position::new((rng.end_point.row as isize + row) as u32,(rng.end_point.column as isize + col) as u32)
    )
}

/// Zero width nodes are widened to one column so they can be seen,
/// `line_len` should include the line separator.
pub fn extended_range(node: &Node,line_len: usize) -> tree_sitter::Range {
    let mut rng = node.range();
    if rng.start_byte==rng.end_byte {
        if rng.end_point.column + 1 < line_len {
            rng.end_byte += 1;
            rng.end_point.column += 1;
        } else if rng.start_point.column > 0 {
            rng.start_byte -= 1;
            rng.start_point.column -= 1;
        }
    }
    rng
}

fn offset_of(line_starts: &[usize],doc: &str,pos: &lsp::Position,row_offset: u32) -> usize {
    let row = match pos.line.checked_sub(row_offset) {
        Some(r) => r as usize,
        None => return 0
    };
    if row >= line_starts.len() {
        return doc.len();
    }
    let beg = line_starts[row];
    let end = match line_starts.get(row+1) {
        Some(next) => *next,
        None => doc.len()
    };
    match doc[beg..end].char_indices().nth(pos.character as usize) {
        Some((i,_)) => beg + i,
        None => end
    }
}

/// Apply edits to a document, positions in the edits are relative to the original document.
/// The `row_offset` is subtracted from every row in the edits.
/// Insertions at the same position are applied in the order given.
pub fn apply_edits(doc: &str,edits: &Vec<lsp::TextEdit>,row_offset: u32) -> Result<String,DYNERR> {
    let mut line_starts = vec![0];
    for (i,b) in doc.bytes().enumerate() {
        if b==b'\n' && i+1 < doc.len() {
            line_starts.push(i+1);
        }
    }
    if doc.ends_with('\n') {
        line_starts.push(doc.len());
    }
    let mut spans = Vec::new();
    for (idx,edit) in edits.iter().enumerate() {
        let beg = offset_of(&line_starts,doc,&edit.range.start,row_offset);
        let end = offset_of(&line_starts,doc,&edit.range.end,row_offset);
        if end < beg {
            error!("edit has negative extent");
            return Err(Box::new(Error::OutOfRange));
        }
        spans.push((beg,end,idx));
    }
    spans.sort_by(|a,b| b.0.cmp(&a.0).then(b.2.cmp(&a.2)));
    let mut ans = doc.to_string();
    let mut floor = doc.len();
    for (beg,end,idx) in spans {
        if end > floor {
            error!("overlapping edits");
            return Err(Box::new(Error::OutOfRange));
        }
        debug!("edit {}..{}",beg,end);
        ans.replace_range(beg..end,&edits[idx].new_text);
        floor = beg;
    }
    Ok(ans)
}

pub fn basic_diag(rng: lsp::Range,mess: &str,severity: lsp::DiagnosticSeverity) -> lsp::Diagnostic {
    lsp::Diagnostic::new(rng,Some(severity),None,None,mess.to_string(),None,None)
}

/// Print a diagnostic to stderr with the offending text highlighted
pub fn eprint_diagnostic(diag: &lsp::Diagnostic,program: &str) {
    let lines: Vec<&str> = program.lines().collect();
    let (label,color) = match diag.severity {
        Some(lsp::DiagnosticSeverity::ERROR) => ("ERROR",Color::Red),
        Some(lsp::DiagnosticSeverity::WARNING) => ("WARNING",Color::BrightYellow),
        Some(lsp::DiagnosticSeverity::INFORMATION) => ("INFO",Color::BrightBlue),
        _ => ("HINT",Color::BrightWhite)
    };
    let row = diag.range.start.line as usize;
    eprintln!("{} on line {}: {}",label.color(color).bold(),row,diag.message);
    let line = match lines.get(row) {
        Some(l) => *l,
        None => return
    };
    let chars: Vec<char> = line.chars().collect();
    let c1 = usize::min(diag.range.start.character as usize,chars.len());
    let c2 = match diag.range.end.line as usize == row {
        true => usize::min(usize::max(diag.range.end.character as usize,c1),chars.len()),
        false => chars.len()
    };
    let pre: String = chars[0..c1].iter().collect();
    let err: String = chars[c1..c2].iter().collect();
    let post: String = chars[c2..].iter().collect();
    eprintln!("  {}{}{}",pre,err.color(color).bold(),post);
}

/// Print each line and its S-expression to stderr, `skip` is the number of columns
/// of leading whitespace in the S-expression to omit.
pub fn eprint_lines_sexpr(lang: Language,program: &str,skip: usize) {
    let mut parser = match new_parser(&lang) {
        Ok(p) => p,
        Err(_) => return
    };
    for line in program.lines() {
        if line.trim_start().len()==0 {
            continue;
        }
        if let Some(tree) = parser.parse(line.to_string() + "\n",None) {
            eprintln!("{}",line);
            let sexpr = tree.root_node().to_sexp();
            eprintln!("{}",sexpr.get(skip..).unwrap_or(""));
        }
    }
}

/// Line entry interface for the console, `prompt` is the Apple II prompt character.
pub fn line_entry(lang: Language,prompt: &str) -> String {
    let mut code = String::new();
    let mut parser = match new_parser(&lang) {
        Ok(p) => p,
        Err(_) => return code
    };
    eprintln!("Line entry interface.");
    eprintln!("This is a blind accumulation of lines.");
    eprintln!("Verify occurs when entry is terminated.");
    eprintln!("Accumulated lines can be piped.");
    eprintln!("`bye` terminates.");
    loop {
        eprint!("{} ",prompt);
        let mut line = String::new();
        if io::stderr().flush().is_err() || io::stdin().read_line(&mut line).is_err() {
            break;
        }
        if line.len()==0 || line=="bye\n" || line=="bye\r\n" {
            break;
        }
        if let Some(tree) = parser.parse(&line,None) {
            if tree.root_node().has_error() {
                eprintln!("{}","syntax error".red());
            }
        }
        code += &line;
    }
    code
}

/// Simple verify, returns an error if any line has a syntax error
pub fn verify_str(lang: Language,code: &str) -> STDRESULT {
    let mut parser = new_parser(&lang)?;
    let mut err_count = 0;
    for (row,line) in code.lines().enumerate() {
        if line.trim_start().len()==0 {
            continue;
        }
        match parser.parse(line.to_string() + "\n",None) {
            Some(tree) => if tree.root_node().has_error() {
                error!("syntax error on row {}: {}",row,line);
                err_count += 1;
            },
            None => return Err(Box::new(Error::ParsingError))
        }
    }
    match err_count {
        0 => Ok(()),
        _ => Err(Box::new(Error::Syntax))
    }
}

pub fn update_json_i64(val: &serde_json::Value,key: &str,curr: &mut i64) {
    if let Some(x) = val.get(key) {
        if let Some(i) = x.as_i64() {
            *curr = i;
        }
    }
}

pub fn update_json_vec(val: &serde_json::Value,key: &str,curr: &mut Vec<i64>) {
    if let Some(x) = val.get(key) {
        if let Some(list) = x.as_array() {
            *curr = list.iter().filter_map(|v| v.as_i64()).collect();
        }
    }
}

/// Severity keys are `ignore`, `hint`, `info`, `warn`, and `error`
pub fn update_json_severity(val: &serde_json::Value,key: &str,curr: &mut Option<lsp::DiagnosticSeverity>) {
    if let Some(x) = val.get(key) {
        if let Some(s) = x.as_str() {
            *curr = match s {
                "ignore" => None,
                "hint" => Some(lsp::DiagnosticSeverity::HINT),
                "info" => Some(lsp::DiagnosticSeverity::INFORMATION),
                "warn" => Some(lsp::DiagnosticSeverity::WARNING),
                "error" => Some(lsp::DiagnosticSeverity::ERROR),
                _ => *curr
            };
        }
    }
}
