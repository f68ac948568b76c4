//! # `integerbasic` main library
//!
//! This library provides a grammar for Apple II Integer BASIC, along with language services
//! built on top of it.
//!
//! ## Architecture
//!
//! * `grammar` wraps the generated tree-sitter parser, exported to C as `tree_sitter_integerbasic`
//! * `lang` walks syntax trees, generic services such as renumbering live here
//! * `lang::integer` handles (de)tokenization, diagnostics, and renumbering of Integer BASIC
//! * `commands` runs the CLI subcommands
//!
//! ## Syntax Trees
//!
//! Every token of the Apple II tokenizer appears as a named node, whose kind is the rule id
//! in `grammar::tokens::TOKENS`.  As a result tokenization is mostly a matter of walking the tree
//! and emitting the code for each leaf.
//!
//! Language services parse one line at a time, mirroring the way the Apple II treats each
//! numbered line independently.

pub mod grammar;
pub mod lang;
pub mod commands;

pub use grammar::{language,language_case_sensitive};

use regex::Regex;
use hex;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// Display binary to stdout in rows of 16 bytes.
/// Each row shows the address, the hex bytes, the printable positive ASCII,
/// and the printable negative ASCII (high bit set, as on the Apple II screen).
pub fn display_block(start_addr: usize,block: &[u8]) {
    for (row,chunk) in block.chunks(16).enumerate() {
        let hex_cols: String = chunk.iter().map(|b| format!("{:02X} ",b)).collect();
        let pos: String = chunk.iter().map(|b| match *b {
            x if x>=32 && x<127 => x as char,
            _ => '.'
        }).collect();
        let neg: String = chunk.iter().map(|b| match *b {
            x if x>=160 && x<255 => (x - 128) as char,
            _ => '.'
        }).collect();
        println!("{:04X} : {:48}|+| {:16} |-| {}",start_addr + row*16,hex_cols,pos,neg);
    }
}

/// Interpret a UTF8 string as pure ascii and put into bytes.
/// Non-ascii characters are omitted from the result, but arbitrary
/// bytes can be introduced using escapes, e.g., `\xFF`.
/// Literal hex escapes are created by coding the backslash, e.g., `\x5CxFF`.
/// if `inverted` is true the sign of the non-escaped bytes is flipped.
/// if `caps` is true the ascii is put in upper case.
pub fn parse_escaped_ascii(s: &str,inverted: bool,caps: bool) -> Vec<u8> {
    let mut ans: Vec<u8> = Vec::new();
    let hex_patt = Regex::new(r"\\x[0-9A-Fa-f][0-9A-Fa-f]").expect("unreachable");
    let mut hexes = hex_patt.find_iter(s).peekable();
    let mut curs = 0;
    while curs < s.len() {
        if let Some(m) = hexes.peek() {
            if curs==m.start() {
                if let Ok(mut bytes) = hex::decode(&s[curs+2..curs+4]) {
                    ans.append(&mut bytes);
                }
                curs = m.end();
                hexes.next();
                continue;
            }
        }
        let c = match s[curs..].chars().next() {
            Some(c) => c,
            None => break
        };
        if c.is_ascii() {
            let b = match caps {
                true => c.to_ascii_uppercase() as u8,
                false => c as u8
            };
            ans.push(b + match inverted { true => 128, false => 0 });
        }
        curs += c.len_utf8();
    }
    ans
}

#[test]
fn test_escaped_ascii() {
    assert_eq!(parse_escaped_ascii("ab\\x8aC",true,true),vec![0xc1,0xc2,0x8a,0xc3]);
    assert_eq!(parse_escaped_ascii("a\\x5Cx41",false,false),vec![0x61,0x5c,0x78,0x34,0x31]);
    assert_eq!(parse_escaped_ascii("\u{00e9}z",false,true),vec![0x5a]);
}
