//! # Integer BASIC analysis and transformations
//!
//! This module is used by the CLI and by any host that wants language services.
//! The parser is provided by `crate::grammar`.

#[cfg(test)]
mod renumber_test;
#[cfg(test)]
mod diagnostics_test;
pub mod diagnostics;
pub mod tokenizer;
pub mod renumber;
pub mod settings;

use std::collections::{BTreeMap,HashMap,HashSet};
use lsp_types as lsp;
use tree_sitter::Node;
use crate::lang::{lsp_range,node_text};
use crate::DYNERR;

/// Kinds that can receive a value
pub const LEXPR: [&str;5] = ["int_name","int_array","str_name","str_array","str_slice"];
/// Kinds that hold a variable name
pub const SIMPLE_VAR_TYPES: [&str;2] = ["int_name","str_name"];

/// Information about a specific line number.
/// The number itself is a key that maps to this information.
#[derive(Clone)]
pub struct Line {
    /// text of the first remark on the line
    pub rem: Option<String>,
    /// the LSP range of the line number
    pub primary: lsp::Range,
    /// GOSUB statements referencing this line
    pub gosubs: Vec<lsp::Range>,
    /// GOTO and THEN statements referencing this line
    pub gotos: Vec<lsp::Range>
}

/// Information about a variable.
/// The key is the name in upper case without spaces, including `$` for strings.
/// Every case variation that occurs is saved.
#[derive(Clone)]
pub struct Variable {
    pub decs: Vec<lsp::Range>,
    pub defs: Vec<lsp::Range>,
    pub refs: Vec<lsp::Range>,
    pub case: HashSet<String>,
    pub is_array: bool,
    pub is_string: bool
}

impl Variable {
    pub fn new() -> Self {
        Self {
            decs: Vec::new(),
            defs: Vec::new(),
            refs: Vec::new(),
            case: HashSet::new(),
            is_array: false,
            is_string: false
        }
    }
}

/// Symbol information gathered by the analyzer
#[derive(Clone)]
pub struct Symbols {
    pub lines: BTreeMap<i64,Line>,
    pub vars: HashMap<String,Variable>
}

impl Symbols {
    pub fn new() -> Self {
        Self {
            lines: BTreeMap::new(),
            vars: HashMap::new()
        }
    }
    pub fn docstring(&self,linenum: i64) -> Option<String> {
        self.lines.get(&linenum).and_then(|l| l.rem.clone())
    }
}

/// Name node inside a variable node, or the node itself
fn name_node<'a>(node: Node<'a>) -> Node<'a> {
    match node.kind() {
        "int_array" | "str_array" | "str_slice" => node.named_child(0).unwrap_or(node),
        _ => node
    }
}

/// Key information for a name node (`int_name` or `str_name`) in context.
/// Returns (key, name as written without spaces, is_array, is_string).
pub fn var_to_key(node: Node,line: &str) -> (String,String,bool,bool) {
    let cased = node_text(&node,line).replace(" ","");
    let in_array = match node.parent() {
        Some(p) => ["int_array","str_array","str_slice"].contains(&p.kind()),
        None => false
    };
    let dimensioned = match node.next_named_sibling() {
        Some(sib) => sib.kind().starts_with("open_dim_"),
        None => false
    };
    (cased.to_uppercase(),cased,in_array || dimensioned,node.kind()=="str_name")
}

/// Key information for a node that receives a value, see `LEXPR`.
/// Returns (key, name as written, is_array, is_string, range of the name).
pub fn lexpr_to_key(node: Node,row: isize,line: &str) -> Result<(String,String,bool,bool,lsp::Range),DYNERR> {
    if !LEXPR.contains(&node.kind()) {
        return Err(Box::new(super::Error::Syntax));
    }
    let name = name_node(node);
    if !SIMPLE_VAR_TYPES.contains(&name.kind()) {
        return Err(Box::new(super::Error::Syntax));
    }
    let (key,cased,is_array,is_string) = var_to_key(name,line);
    Ok((key,cased,is_array,is_string,lsp_range(name.range(),row,0)))
}

/// Starting on the `open_dim_*` node of a DIM item, return the node after the matching `close`.
/// The subscript is a flat run of siblings, nested parentheses are counted.
pub fn pass_through_subscript<'a>(open: Node<'a>,_line: &str) -> Option<Node<'a>> {
    let mut depth = 1;
    let mut maybe_next = open.next_named_sibling();
    while let Some(next) = maybe_next {
        if next.kind().starts_with("open_") {
            depth += 1;
        } else if next.kind()=="close" {
            depth -= 1;
            if depth==0 {
                return next.next_named_sibling();
            }
        }
        maybe_next = next.next_named_sibling();
    }
    None
}

/// Starting in a string or remark, where the trigger byte has already been consumed,
/// escape the bytes up to a terminator.  Negative ASCII is made positive.  Bytes in `escapes`,
/// and bytes that are not negative ASCII, are written as `\xhh`.
/// A literal backslash that would read as an escape is put as `\x5c`.
/// Returns the string and the index of the terminator, which is not included.
pub fn bytes_to_escaped_string(bytes: &[u8],offset: usize,terminator: &[u8],escapes: &[i64]) -> (String,usize) {
    const BACKSLASH: u8 = 0xdc;
    let is_hex = |x: u8| x.is_ascii_hexdigit();
    let mut ans = String::new();
    let mut idx = offset;
    while idx < bytes.len() && !terminator.contains(&bytes[idx]) {
        let b = bytes[idx];
        if escapes.contains(&(b as i64)) || b < 128 || b==255 {
            ans += &format!("\\x{:02x}",b);
        } else if b==BACKSLASH && idx + 3 < bytes.len() && bytes[idx+1]==b'x'+128
            && is_hex(bytes[idx+2] & 0x7f) && is_hex(bytes[idx+3] & 0x7f) {
            ans += "\\x5c";
        } else {
            ans.push((b - 128) as char);
        }
        idx += 1;
    }
    (ans,idx)
}

#[test]
fn escaped_bytes() {
    let (s,idx) = bytes_to_escaped_string(&[0xc1,0x8a,0xdc,0xf8,0xb4,0xb1,0x29,0x01],0,&[0x29,0x01],&[138]);
    assert_eq!(s,"A\\x8a\\x5cx41");
    assert_eq!(idx,6);
    let (s,idx) = bytes_to_escaped_string(&[0x84,0xc2,0x01],0,&[0x01],&[]);
    assert_eq!(s,"\u{4}B");
    assert_eq!(idx,2);
}
