//! ## Integer BASIC Renumber Module
//!
//! Line numbers are defined by the `linenum` that starts a line.
//! They are referenced by `GOTO`, `GOSUB`, `THEN`, and `LIST`.

use lsp_types::{Range,Position,TextEdit};
use tree_sitter::{Parser,TreeCursor};
use crate::lang;
use crate::lang::Navigate;
use crate::lang::linenum::{LabelMap,Renumber};
use std::collections::HashSet;
use log::{error,debug,trace};
use crate::{STDRESULT,DYNERR};

pub mod flags {
    pub const REORDER: u64 = 1;
    pub const PASS_OVER_REFS: u64 = 2;
}

/// Keywords whose following integer is a line reference
const BRANCHES: [&str;3] = ["statement_goto","statement_gosub","statement_then_line"];

#[derive(PartialEq,Clone,Copy)]
enum Gather {
    Defs,
    Refs
}

pub struct Renumberer {
    flags: u64,
    parser: Parser,
    row: isize,
    line: String,
    info: LabelMap,
    gather: Gather,
    external_refs: HashSet<usize>
}

impl Navigate for Renumberer {
    fn visit(&mut self,curs: &TreeCursor) -> Result<lang::Navigation,DYNERR> {
        let node = curs.node();
        if node.is_error() || node.is_missing() {
            return Ok(lang::Navigation::GotoSibling);
        }
        let grab_it = match (node.kind(),self.gather) {
            ("linenum",Gather::Defs) => node.parent().map_or(false,|p| p.kind()=="line"),
            ("linenum",Gather::Refs) => node.parent().map_or(false,|p| p.kind()!="line"),
            ("integer",Gather::Refs) => node.prev_named_sibling().map_or(false,|p| BRANCHES.contains(&p.kind())),
            _ => false
        };
        if grab_it {
            self.push_linenum(curs)?;
            return Ok(lang::Navigation::GotoSibling);
        }
        Ok(lang::Navigation::GotoChild)
    }
}

impl Renumber for Renumberer {
    fn gather_defs(&mut self,source: &str,row: isize) -> Result<LabelMap,DYNERR> {
        self.gather_all(source,row,Gather::Defs)
    }
    fn gather_refs(&mut self,source: &str,row: isize) -> Result<LabelMap,DYNERR> {
        self.gather_all(source,row,Gather::Refs)
    }
}

impl Renumberer {
    pub fn new() -> Self {
        Self {
            flags: 0,
            parser: Parser::new(),
            row: 0,
            line: String::new(),
            info: LabelMap::new(),
            gather: Gather::Defs,
            external_refs: HashSet::new()
        }
    }
    fn gather_all(&mut self,source: &str,row: isize,gather: Gather) -> Result<LabelMap,DYNERR> {
        if self.parser.language().is_none() {
            self.parser = lang::new_parser(&crate::language())?;
        }
        self.gather = gather;
        self.info = LabelMap::new();
        self.row = row;
        for line in source.lines() {
            if line.trim().len() > 0 {
                trace!("gather from row {}",self.row);
                self.line = line.to_string() + "\n";
                match self.parser.parse(&self.line,None) {
                    Some(tree) => self.walk(&tree)?,
                    None => return Err(Box::new(lang::Error::ParsingError))
                }
            }
            self.row += 1;
        }
        Ok(std::mem::take(&mut self.info))
    }
    fn push_linenum(&mut self,curs: &TreeCursor) -> STDRESULT {
        let (num,new_info) = Self::get_one(curs,&self.line,self.row)?;
        self.info.entry(num).or_insert(Vec::new()).push(new_info);
        Ok(())
    }
    pub fn set_flags(&mut self,flags: u64) {
        self.flags = flags;
    }
    pub fn set_external_refs(&mut self,externals: Vec<usize>) {
        self.external_refs = externals.into_iter().collect();
    }
    /// Edits for a selection of lines, suitable for an editor
    pub fn get_edits(&mut self,all_txt: &str,ext_sel: Option<Range>,start: &str,step: &str) -> Result<Vec<TextEdit>,String> {
        self.build_edits(all_txt,ext_sel,start,step,
            self.flags & flags::PASS_OVER_REFS == 0,
            self.flags & flags::REORDER > 0,0,32767,self.external_refs.clone())
    }
    /// Renumber all lines with `beg <= number < end` as `first, first+step, ...`.
    /// References are updated throughout the program.
    /// The existing numbering is assumed to be valid.
    pub fn renumber(&mut self,source: &str,beg: usize,end: usize,first: usize,step: usize) -> Result<String,DYNERR> {
        let all_defs = match self.gather_defs(source,0) {
            Ok(result) => result,
            Err(_) => return Err(Box::new(lang::Error::LineNumber))
        };
        let mut rows: Option<(u32,u32)> = None;
        for (num,label) in &all_defs {
            if label.len() != 1 {
                error!("duplicated line number {}",num);
                return Err(Box::new(lang::Error::LineNumber));
            }
            if *num < beg || *num >= end {
                continue;
            }
            let r = label[0].rng.start.line;
            rows = match rows {
                Some((r0,rn)) => Some((u32::min(r0,r),u32::max(rn,r))),
                None => Some((r,r))
            };
        }
        let ext_sel = match rows {
            Some((r0,rn)) => Some(Range::new(Position::new(r0,0),Position::new(rn+1,0))),
            None => {
                error!("no lines in the range {} to {}",beg,end);
                return Err(Box::new(lang::Error::LineNumber));
            }
        };
        debug!("renumber selection {:?}",ext_sel);
        let edits = match self.get_edits(source,ext_sel,&first.to_string(),&step.to_string()) {
            Ok(edits) => edits,
            Err(s) => {
                error!("{}",s);
                return Err(Box::new(lang::Error::LineNumber));
            }
        };
        debug!("apply {} edits",edits.len());
        lang::apply_edits(source,&edits,0)
    }
}
