//! Module containing the Integer BASIC tokenizer
//!
//! A tokenized program is a sequence of records `[length, line number, tokens..., EOL]`.
//! The line number is two bytes little endian, integers elsewhere are prefixed
//! by `0xB0 + first digit`, names and string contents are negative ASCII.

use tree_sitter::{Parser,TreeCursor,Node};
use crate::grammar::tokens::{self,EOL,QUOTE,UNQUOTE,REM};
use crate::lang;
use crate::lang::{Navigate,Navigation};
use super::settings::Settings;
use log::{error,trace};
use crate::{STDRESULT,DYNERR};

/// Longest line body, counting the line number and tokens
const MAX_LINE_BODY: usize = 126;

/// Handles tokenization of Integer BASIC
pub struct Tokenizer {
    config: Settings,
    line: String,
    row: usize,
    tokenized_program: Vec<u8>,
    tokenized_line: Vec<u8>
}

impl Navigate for Tokenizer {
    fn visit(&mut self,curs: &TreeCursor) -> Result<Navigation,DYNERR> {
        let node = curs.node();
        let kind = node.kind();
        match kind {
            "linenum" | "integer" => {
                let cleaned = self.text(&node).replace(" ","");
                let num = match cleaned.parse::<u16>() {
                    Ok(n) => n,
                    Err(_) => {
                        error!("number {} on row {} does not fit in 16 bits",cleaned,self.row);
                        return Err(Box::new(lang::Error::Tokenization));
                    }
                };
                let bare = kind=="linenum" && node.parent().map_or(false,|p| p.kind()=="line");
                if !bare {
                    self.tokenized_line.push(cleaned.as_bytes()[0] + 128);
                }
                self.tokenized_line.extend_from_slice(&u16::to_le_bytes(num));
                Ok(Navigation::GotoSibling)
            },
            "int_name" | "str_name" => {
                let cleaned = self.text(&node).to_uppercase().replace(" ","");
                self.tokenized_line.extend(cleaned.bytes().map(|b| match b {
                    b'$' => tokens::code_for_rule("dollar").unwrap_or(0x40),
                    _ => b + 128
                }));
                Ok(Navigation::GotoSibling)
            },
            "string" => {
                let txt = crate::parse_escaped_ascii(&self.text(&node),true,true);
                self.tokenized_line.push(QUOTE);
                if txt.len() >= 2 {
                    self.tokenized_line.extend_from_slice(&txt[1..txt.len()-1]);
                }
                self.tokenized_line.push(UNQUOTE);
                Ok(Navigation::GotoSibling)
            },
            "comment_text" => {
                let mut txt = crate::parse_escaped_ascii(&self.text(&node),true,true);
                self.tokenized_line.append(&mut txt);
                Ok(Navigation::GotoSibling)
            },
            _ => match tokens::code_for_rule(kind) {
                Some(code) => {
                    self.tokenized_line.push(code);
                    Ok(Navigation::GotoSibling)
                },
                None => Ok(Navigation::GotoChild)
            }
        }
    }
}

impl Tokenizer {
    /// Create a new `Tokenizer` structure
    pub fn new() -> Self {
        Self {
            config: Settings::new(),
            line: String::new(),
            row: 0,
            tokenized_line: Vec::new(),
            tokenized_program: Vec::new()
        }
    }
    pub fn set_config(&mut self,config: Settings) {
        self.config = config;
    }
    fn text(&self,node: &Node) -> String {
        lang::node_text(node,&self.line)
    }
    fn tokenize_line(&mut self,parser: &mut Parser) -> STDRESULT {
        self.tokenized_line = Vec::new();
        let tree = match parser.parse(&self.line,None) {
            Some(tree) => tree,
            None => return Err(Box::new(lang::Error::ParsingError))
        };
        if tree.root_node().has_error() {
            error!("syntax error on row {}: {}",self.row,self.line.trim_end());
            return Err(Box::new(lang::Error::Syntax));
        }
        self.walk(&tree)?;
        if self.tokenized_line.len() > MAX_LINE_BODY {
            error!("integer BASIC line too long on row {}",self.row);
            return Err(Box::new(lang::Error::Tokenization));
        }
        self.tokenized_line.insert(0,self.tokenized_line.len() as u8 + 2);
        self.tokenized_line.push(EOL);
        Ok(())
    }
    /// Tokenize a program contained in a UTF8 string, result is an array of bytes.
    /// Blank lines are skipped.
    pub fn tokenize(&mut self,program: &str) -> Result<Vec<u8>,DYNERR> {
        self.tokenized_program = Vec::new();
        let mut parser = lang::new_parser(&crate::language())?;
        for (row,line) in program.lines().enumerate() {
            if line.trim().len()==0 {
                continue;
            }
            trace!("tokenize row {}",row);
            self.row = row;
            self.line = String::from(line) + "\n";
            self.tokenize_line(&mut parser)?;
            self.tokenized_program.append(&mut self.tokenized_line);
        }
        Ok(std::mem::take(&mut self.tokenized_program))
    }
    /// Detokenize from byte array into a UTF8 string
    pub fn detokenize(&self,img: &[u8]) -> Result<String,DYNERR> {
        let escapes = &self.config.detokenizer.escapes;
        let max_reps = usize::max(self.config.detokenizer.max_line_length as usize,1);
        let max_lines = self.config.detokenizer.max_lines as usize;
        let mut addr = 0;
        let mut code = String::new();
        let mut line_count = 0;
        while addr < 65536 && addr+2 < img.len() {
            if line_count >= max_lines {
                error!("program exceeds {} lines",max_lines);
                return Err(Box::new(lang::Error::Detokenization));
            }
            line_count += 1;
            addr += 1; // skip record length
            let line_num = u16::from_le_bytes([img[addr],img[addr+1]]);
            code += &(line_num.to_string() + " ");
            addr += 2;
            let mut escaped: String;
            for rep in 0..=max_reps {
                if rep==max_reps {
                    error!("integer BASIC line {} is too long",line_num);
                    return Err(Box::new(lang::Error::Detokenization));
                }
                if addr >= img.len() {
                    error!("program ended while processing line {}",line_num);
                    return Err(Box::new(lang::Error::Detokenization));
                }
                let b = img[addr];
                if b==EOL {
                    code += "\n";
                    addr += 1;
                    break;
                } else if b==QUOTE {
                    code += "\"";
                    (escaped,addr) = super::bytes_to_escaped_string(img,addr+1,&[UNQUOTE,EOL],escapes);
                    code += &escaped;
                    if addr < img.len() && img[addr]==UNQUOTE {
                        code += "\"";
                        addr += 1;
                    }
                } else if b==REM {
                    if !code.ends_with(" ") {
                        code += " ";
                    }
                    // an Apple II adds a trailing space, which would not survive a round trip
                    code += "REM";
                    (escaped,addr) = super::bytes_to_escaped_string(img,addr+1,&[EOL],escapes);
                    code += &escaped;
                } else if b < 128 {
                    let tok = match tokens::lexeme(b) {
                        Some(tok) => tok,
                        None => {
                            error!("unrecognized token {:02X} in line {}",b,line_num);
                            return Err(Box::new(lang::Error::Detokenization));
                        }
                    };
                    let spaced = tok.len() > 1 && tok!="<>";
                    if spaced && !code.ends_with(" ") {
                        code += " ";
                    }
                    code += tok;
                    if spaced && !tok.ends_with("(") && !tok.ends_with("=") {
                        code += " ";
                    }
                    addr += 1;
                } else if b>=0xb0 && b<=0xb9 {
                    if addr+2 >= img.len() {
                        error!("program ended while processing integer");
                        return Err(Box::new(lang::Error::Detokenization));
                    }
                    code += &u16::from_le_bytes([img[addr+1],img[addr+2]]).to_string();
                    addr += 3;
                } else {
                    while img[addr] >= 128 {
                        code.push((img[addr] - 128) as char);
                        addr += 1;
                        if addr >= img.len() {
                            error!("program ended while processing variable name");
                            return Err(Box::new(lang::Error::Detokenization));
                        }
                    }
                }
            }
        }
        Ok(code)
    }
}
