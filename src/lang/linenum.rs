//! # Line number module
//!
//! Renumbering is shared by any BASIC dialect whose lines start with a number.
//! A dialect provides the gathering of definitions and references, the rest is here.

use lsp_types::{TextEdit,Range,Position};
use std::collections::{HashSet,BTreeMap};
use log::{trace,debug};
use tree_sitter::TreeCursor;
use crate::lang;
use crate::DYNERR;

/// Map from a line number to every place it occurs
pub type LabelMap = BTreeMap<usize,Vec<LabelInformation>>;

#[derive(Clone)]
pub struct LabelInformation {
    pub rng: Range,
    pub leading_space: usize,
    pub trailing_space: usize
}

/// Replace the label, keeping its surrounding spaces
fn relabel(new_num: usize,info: &LabelInformation) -> TextEdit {
    let txt = [
        " ".repeat(info.leading_space),
        new_num.to_string(),
        " ".repeat(info.trailing_space)
    ].concat();
    TextEdit::new(info.rng,txt)
}

fn parse_param(val: &str,what: &str,min: usize,max: usize) -> Result<usize,String> {
    match val.parse::<usize>() {
        Ok(n) if n >= min && n <= max => Ok(n),
        _ => Err(format!("invalid {}",what))
    }
}

fn in_rows(rng: &Range,sel: &Range) -> bool {
    rng.start.line >= sel.start.line && rng.end.line <= sel.end.line
}

pub trait Renumber {
    /// Information about the label under the cursor, `row` is the document row of the source.
    fn get_one(curs: &TreeCursor,source: &str,row: isize) -> Result<(usize,LabelInformation),DYNERR> {
        let node = curs.node();
        match lang::node_integer::<usize>(&node,source) {
            Some(num) => {
                let txt = lang::node_text(&node,source);
                trace!("found line number {} at row {}",num,row);
                Ok((num,LabelInformation {
                    rng: lang::lsp_range(node.range(),row,0),
                    leading_space: txt.len() - txt.trim_start().len(),
                    trailing_space: txt.len() - txt.trim_end().len()
                }))
            },
            None => Err(Box::new(lang::Error::Syntax))
        }
    }
    /// Map each line number to the nodes that define it, normally one per number.
    fn gather_defs(&mut self,source: &str,row: isize) -> Result<LabelMap,DYNERR>;
    /// Map each line number to the nodes that refer to it.
    fn gather_refs(&mut self,source: &str,row: isize) -> Result<LabelMap,DYNERR>;
    /// Build edits that renumber the lines in `ext_sel`, or the whole document if `None`.
    /// References are updated if `update_refs`.  If the new numbers belong elsewhere
    /// the block is moved when `allow_move`, otherwise this is an error.
    /// Lines in `external_refs` keep their numbers.
    /// Apply the result with `lang::apply_edits`.
    fn build_edits(&mut self,all_txt: &str,ext_sel: Option<Range>,start: &str,step: &str,update_refs: bool,allow_move: bool,min_num: usize,max_num: usize,
        external_refs: HashSet<usize>) -> Result<Vec<TextEdit>,String> {
        let line_sep = match all_txt.contains("\r\n") {
            true => "\r\n",
            false => "\n"
        };
        let l0 = parse_param(start,"start",min_num,max_num)?;
        let dl = parse_param(step,"step",1,max_num)?;
        let lines = all_txt.lines().collect::<Vec<&str>>();
        let last_line = match lines.last() {
            Some(l) => l,
            None => return Err("nothing to renumber".to_string())
        };
        let end_pos = Position::new(lines.len() as u32 - 1,last_line.chars().count() as u32);
        let sel = match ext_sel {
            Some(mut sel) => {
                if sel.end.character==0 && sel.end.line > sel.start.line {
                    sel.end.line -= 1;
                    sel.end.character = lines[sel.end.line as usize].chars().count() as u32;
                }
                sel
            },
            None => Range::new(Position::new(0,0),end_pos)
        };
        let mut sel_txt = String::new();
        for l in sel.start.line..=sel.end.line {
            sel_txt += lines[l as usize];
            sel_txt += line_sep;
        }

        debug!("gather line numbers");
        let row0 = sel.start.line as isize;
        let gathered = (self.gather_defs(&sel_txt,row0),self.gather_refs(&sel_txt,row0),self.gather_defs(all_txt,0),self.gather_refs(all_txt,0));
        let (sel_defs,sel_refs,all_defs,all_refs) = match gathered {
            (Ok(a),Ok(b),Ok(c),Ok(d)) => (a,b,c,d),
            _ => return Err("unable to gather line numbers".to_string())
        };
        if sel_defs.len()==0 {
            return Err("no line numbers to change".to_string());
        }

        debug!("map old numbers to new");
        let mut mapping = BTreeMap::new();
        let mut next_num: Option<usize> = None;
        for (old,info) in &sel_defs {
            if info.len() != 1 {
                return Err(format!("duplicated line number {}",old));
            }
            let new_num = match next_num {
                None if external_refs.contains(old) && *old != l0 => return Err("renumbering would change an external reference".to_string()),
                None => l0,
                Some(_) if external_refs.contains(old) => *old,
                Some(prev) => prev + dl
            };
            mapping.insert(*old,new_num);
            next_num = Some(new_num);
        }
        let ln = match next_num {
            Some(n) if n <= max_num => n,
            _ => return Err(format!("upper bound of {} exceeded",max_num))
        };

        debug!("find where the block goes");
        let mut insert_pos = Position::new(0,0);
        for (old,info) in &all_defs {
            if info.len() != 1 {
                return Err(format!("duplicated line number {}",old));
            }
            if in_rows(&info[0].rng,&sel) {
                continue;
            }
            if *old < l0 && info[0].rng.start.line >= insert_pos.line {
                insert_pos = Position::new(info[0].rng.start.line + 1,0);
            }
            if *old >= l0 && *old <= ln {
                return Err(format!("existing line {} is within proposed range",old));
            }
        }
        for (row,line) in lines.iter().enumerate() {
            if insert_pos.line as usize == row && line.trim_start().len()==0 {
                insert_pos.line += 1;
            }
        }
        let moving = insert_pos.line != sel.start.line;
        if moving && !allow_move {
            return Err("renumber parameters would require a move".to_string());
        }

        let mut sel_edits: Vec<TextEdit> = sel_defs.iter()
            .filter_map(|(old,info)| mapping.get(old).map(|n| relabel(*n,&info[0])))
            .collect();
        let mut unsel_edits = Vec::new();
        if update_refs {
            for (old,info) in &sel_refs {
                if let Some(n) = mapping.get(old) {
                    sel_edits.extend(info.iter().map(|item| relabel(*n,item)));
                }
            }
            for (old,info) in &all_refs {
                if let Some(n) = mapping.get(old) {
                    unsel_edits.extend(info.iter().filter(|item| !in_rows(&item.rng,&sel)).map(|item| relabel(*n,item)));
                }
            }
        }

        if !moving {
            sel_edits.append(&mut unsel_edits);
            return Ok(sel_edits);
        }
        // The selection is rewritten here and inserted as a whole,
        // edits that overlap the deletion would not survive.
        debug!("build the move");
        let moved = match lang::apply_edits(&sel_txt,&sel_edits,sel.start.line) {
            Ok(s) => s,
            Err(_) => return Err("apply edits failed".to_string())
        };
        let mut ans = vec![
            TextEdit::new(Range::new(end_pos,end_pos),line_sep.to_string()),
            TextEdit::new(Range::new(insert_pos,insert_pos),moved)
        ];
        for l in sel.start.line..=sel.end.line {
            ans.push(TextEdit::new(Range::new(Position::new(l,0),Position::new(l+1,0)),String::new()));
        }
        ans.append(&mut unsel_edits);
        Ok(ans)
    }
}
