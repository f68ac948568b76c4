//! Integer diagnostics module.
//!
//! Provides diagnostics and symbol information.
//! The first pass gathers line numbers and variable definitions, the second pass
//! uses them to check references.

use std::io;
use std::io::Read;
use lsp_types::{Diagnostic,DiagnosticSeverity};
use tree_sitter::{Node,TreeCursor};
use crate::lang::{Document,Analysis,Navigate,Navigation};
use crate::lang::{lsp_range,node_text,node_integer,extended_range,basic_diag,new_parser};
use crate::{DYNERR,STDRESULT};
use log::{trace,warn};

const CASE_CHECK: [&str;5] = ["statement_","fcall_","str_name","int_name","op_"];
const BRANCHES: [&str;3] = ["statement_goto","statement_gosub","statement_then_line"];

#[derive(PartialEq,Clone,Copy)]
enum Pass {
    Primaries,
    Checks
}

pub struct Analyzer {
    config: super::settings::Settings,
    row: isize,
    col: isize,
    pass: Pass,
    line: String,
    diagnostics: Vec<Diagnostic>,
    symbols: super::Symbols,
    last_good_line_number: i64,
    err_pattern: regex::Regex
}

impl Navigate for Analyzer {
    fn visit(&mut self,curs: &TreeCursor) -> Result<Navigation,DYNERR> {
        match self.pass {
            Pass::Primaries => self.visit_primaries(curs),
            Pass::Checks => self.visit_node(curs)
        }
    }
}

impl Analysis for Analyzer {
    fn analyze(&mut self,doc: &Document) -> STDRESULT {
        self.diagnostics = Vec::new();
        self.symbols = super::Symbols::new();
        let mut parser = new_parser(&crate::language())?;
        for pass in [Pass::Primaries,Pass::Checks] {
            self.last_good_line_number = -1;
            self.row = 0;
            self.col = 0;
            self.pass = pass;
            for line in doc.text.lines() {
                if line.trim_start().len() > 0 {
                    trace!("analyze row {}",self.row);
                    self.line = String::from(line) + "\n";
                    match parser.parse(&self.line,None) {
                        Some(tree) => self.walk(&tree)?,
                        None => return Err(Box::new(crate::lang::Error::ParsingError))
                    };
                }
                self.row += 1;
            }
        }
        Ok(())
    }
    fn update_config(&mut self,json_str: &str) -> STDRESULT {
        self.config = super::settings::parse(json_str)?;
        Ok(())
    }
    fn read_stdin(&self) -> String {
        if atty::is(atty::Stream::Stdin) {
            return crate::lang::line_entry(crate::language(),">");
        }
        let mut program = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut program) {
            warn!("failed to read stdin: {}",e);
        }
        program
    }
    fn get_diags(&self,_doc: &Document) -> Vec<Diagnostic> {
        self.diagnostics.clone()
    }
    fn err_warn_info_counts(&self) -> [usize;3] {
        let mut ans = [0,0,0];
        for item in &self.diagnostics {
            match item.severity {
                Some(DiagnosticSeverity::ERROR) => ans[0] += 1,
                Some(DiagnosticSeverity::WARNING) => ans[1] += 1,
                Some(DiagnosticSeverity::INFORMATION) => ans[2] += 1,
                _ => {}
            }
        }
        ans
    }
    fn eprint_lines_sexpr(&self,program: &str) {
        crate::lang::eprint_lines_sexpr(crate::language(),program,0);
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            config: super::settings::Settings::new(),
            row: 0,
            col: 0,
            pass: Pass::Primaries,
            line: String::new(),
            diagnostics: Vec::new(),
            symbols: super::Symbols::new(),
            last_good_line_number: -1,
            err_pattern: regex::Regex::new(r"^(?i) *(D *S *P|N *O *D *S *P|N *E *X *T|I *N *P *U *T) *[A-Z]").expect("regex failure")
        }
    }
    pub fn set_config(&mut self,config: super::settings::Settings) {
        self.config = config;
    }
    pub fn get_symbols(&self) -> super::Symbols {
        self.symbols.clone()
    }
    fn push(&mut self,rng: tree_sitter::Range,mess: &str,severity: DiagnosticSeverity) {
        self.diagnostics.push(basic_diag(lsp_range(rng,self.row,self.col),mess,severity));
    }
    /// Record up to `nmax` variables that receive values, starting with `maybe_node` and
    /// moving through its siblings.
    fn process_variable_defs(&mut self,maybe_node: Option<Node>,nmax: usize,in_dim: bool) {
        let mut maybe_next = maybe_node;
        let mut num_found = 0;
        while let Some(next) = maybe_next {
            if num_found >= nmax {
                return;
            }
            if super::LEXPR.contains(&next.kind()) {
                num_found += 1;
                if let Ok((keyname,cased,is_array,is_string,rng)) = super::lexpr_to_key(next,self.row,&self.line) {
                    let var_info = self.symbols.vars.entry(keyname).or_insert(super::Variable::new());
                    var_info.is_array = is_array;
                    var_info.is_string = is_string;
                    match in_dim {
                        true => var_info.decs.push(rng),
                        false => var_info.defs.push(rng)
                    }
                    var_info.case.insert(cased);
                }
            }
            maybe_next = match next.kind() {
                "open_dim_str" | "open_dim_int" => super::pass_through_subscript(next,&self.line),
                _ => next.next_named_sibling()
            };
        }
    }
    fn first_remark(&self,linenum: &Node) -> Option<String> {
        let mut next_statement = linenum.next_named_sibling();
        while let Some(statement) = next_statement {
            if let Some(child) = statement.named_child(0) {
                if child.kind()=="statement_rem" {
                    return child.next_named_sibling().map(|txt| node_text(&txt,&self.line).trim().to_string());
                }
            }
            next_statement = statement.next_named_sibling();
        }
        None
    }
    /// gathers primary symbol information
    fn visit_primaries(&mut self,curs: &TreeCursor) -> Result<Navigation,DYNERR> {
        let node = curs.node();
        let rng = node.range();
        if node.is_error() || node.is_missing() {
            return Ok(Navigation::GotoSibling);
        }
        let kind = node.kind();
        if kind=="linenum" && node.parent().map_or(false,|p| p.kind()=="line") {
            let remark = self.first_remark(&node);
            match node_integer::<i64>(&node,&self.line) {
                Some(num) if num < 0 || num > 32767 => self.push(rng,"Out of range (0,32767)",DiagnosticSeverity::ERROR),
                Some(num) if num <= self.last_good_line_number => self.push(rng,"Line number out of order",DiagnosticSeverity::ERROR),
                Some(num) => {
                    self.symbols.lines.insert(num,super::Line {
                        rem: remark,
                        primary: lsp_range(rng,self.row,self.col),
                        gosubs: Vec::new(),
                        gotos: Vec::new()
                    });
                    self.last_good_line_number = num;
                },
                None => self.push(rng,"Out of range (0,32767)",DiagnosticSeverity::ERROR)
            }
            return Ok(Navigation::GotoSibling);
        }
        if kind.starts_with("statement_dim_") {
            self.process_variable_defs(Some(node),64,true);
            return Ok(Navigation::GotoParentSibling);
        }
        if kind.starts_with("assignment_") {
            self.process_variable_defs(node.named_child(0),1,false);
            return Ok(Navigation::GotoParentSibling);
        }
        if kind.starts_with("statement_input_") {
            self.process_variable_defs(Some(node),64,false);
            return Ok(Navigation::GotoParentSibling);
        }
        if kind=="statement_for" {
            self.process_variable_defs(Some(node),1,false);
            return Ok(Navigation::GotoParentSibling);
        }
        // statements nest under IF...THEN, otherwise line > statement > keyword is deep enough
        if kind=="statement" || kind=="line" {
            return Ok(Navigation::GotoChild);
        }
        Ok(Navigation::GotoSibling)
    }
    fn value_range(&mut self,node: Node,low: i64,high: i64) {
        if node.kind()=="integer" || node.kind()=="unary_aexpr" {
            match node_integer::<i64>(&node,&self.line) {
                Some(parsed) => if parsed < low || parsed > high {
                    self.push(node.range(),&format!("Out of range ({},{})",low,high),DiagnosticSeverity::ERROR);
                },
                None => trace!("skipping range check of {}",node_text(&node,&self.line))
            }
        }
    }
    /// Only literal integers are checked.
    /// Starts on the GOTO, GOSUB, or THEN node.
    fn process_linenum_ref(&mut self,curs: &TreeCursor) -> Result<Navigation,DYNERR> {
        let node = match curs.node().next_named_sibling() {
            Some(n) if n.kind()=="integer" => n,
            _ => return Ok(Navigation::GotoSibling)
        };
        let rng = lsp_range(node.range(),self.row,self.col);
        let is_gosub = curs.node().kind()=="statement_gosub";
        let num = node_integer::<i64>(&node,&self.line);
        if let Some(line) = num.and_then(|x| self.symbols.lines.get_mut(&x)) {
            match is_gosub {
                true => line.gosubs.push(rng),
                false => line.gotos.push(rng)
            }
        } else if node.parent().map_or(false,|p| p.has_error()) {
            self.push(node.range(),"Maybe unanalyzed (fix line)",DiagnosticSeverity::WARNING);
        } else if let Some(sev) = self.config.flag.bad_references {
            self.push(node.range(),"Line does not exist",sev);
        }
        Ok(Navigation::GotoSibling)
    }
    /// Takes a name node, the parent and next sibling identify arrays.
    fn process_variable_ref(&mut self,curs: &TreeCursor) -> Result<Navigation,DYNERR> {
        let node = curs.node();
        if node.has_error() {
            return Ok(Navigation::GotoSibling);
        }
        let (keyname,cased,is_array,is_string) = super::var_to_key(node,&self.line);
        let name_range = lsp_range(node.range(),self.row,self.col);
        let var_info = self.symbols.vars.entry(keyname).or_insert(super::Variable::new());
        var_info.is_array = is_array;
        var_info.is_string = is_string;
        var_info.refs.push(name_range);
        var_info.case.insert(cased);
        let is_declared = var_info.decs.len() > 0;
        let is_defined = var_info.defs.len() > 0;
        if let (false,Some(sev)) = (is_declared,self.config.flag.undeclared_arrays) {
            if is_string {
                self.push(node.range(),"string is never DIM'd",sev);
            } else if is_array {
                self.push(node.range(),"array is never DIM'd",sev);
            }
        }
        if let (false,Some(sev)) = (is_defined,self.config.flag.undefined_variables) {
            self.push(node.range(),"variable is never assigned",sev);
        }
        if is_declared && !is_array && !is_string {
            self.push(node.range(),"unsubscripted integer array returns the first element",DiagnosticSeverity::INFORMATION);
        }
        Ok(Navigation::GotoSibling)
    }
    /// Find the sibling of `start` with the given kind
    fn find_sibling<'a>(start: Node<'a>,kind: &str) -> Option<Node<'a>> {
        let mut maybe_next = start.next_named_sibling();
        while let Some(next) = maybe_next {
            if next.kind()==kind {
                return Some(next);
            }
            maybe_next = next.next_named_sibling();
        }
        None
    }
    fn visit_node(&mut self,curs: &TreeCursor) -> Result<Navigation,DYNERR> {
        let node = curs.node();
        let kind = node.kind();
        let rng = node.range();
        if let Some(sev) = self.config.flag.case_sensitive {
            let txt = node_text(&node,&self.line);
            if CASE_CHECK.iter().any(|chk| kind.starts_with(chk)) && txt != txt.to_uppercase() {
                self.push(rng,"settings require upper case",sev);
            }
        }
        if node.is_missing() {
            let (ctx,more) = match node.parent() {
                Some(p) => (p,[" after ",&p.to_sexp()].concat()),
                None => (node,String::new())
            };
            let syn_rng = extended_range(&ctx,self.line.len());
            self.push(syn_rng,&["something is missing",&more].concat(),DiagnosticSeverity::ERROR);
            return Ok(Navigation::GotoSibling);
        }
        if node.is_error() {
            self.push(rng,&["syntax error: ",&node.to_sexp()].concat(),DiagnosticSeverity::ERROR);
            return Ok(Navigation::GotoSibling);
        }
        match kind {
            "line" => if self.line.trim_end().len() > self.config.warn.length as usize {
                self.push(rng,"Line may be too long",DiagnosticSeverity::WARNING);
            },
            _ if BRANCHES.contains(&kind) => return self.process_linenum_ref(curs),
            "statement_poke" => {
                if let Some(addr) = node.next_named_sibling() {
                    self.value_range(addr,-32767,32767);
                }
                if let Some(byte) = Self::find_sibling(node,"sep_poke").and_then(|sep| sep.next_named_sibling()) {
                    self.value_range(byte,0,255);
                }
            },
            "fcall_peek" => {
                if let Some(addr) = node.next_named_sibling().and_then(|open| open.next_named_sibling()) {
                    self.value_range(addr,-32767,32767);
                }
            },
            "statement_coloreq" => {
                if let Some(col) = node.next_named_sibling() {
                    self.value_range(col,0,255);
                }
            },
            "statement_call" => {
                if let Some(addr) = node.next_named_sibling() {
                    self.value_range(addr,-32767,32767);
                }
            },
            "assignment_int" | "assignment_str" => {
                if let Some(child) = node.named_child(0) {
                    // DSPA=1 parses as an assignment, but the Apple II reads DSP A=1
                    if child.kind() != "statement_let" && self.err_pattern.is_match(&node_text(&child,&self.line)) {
                        self.push(child.range(),"illegal variable name, try LET",DiagnosticSeverity::ERROR);
                    }
                }
            },
            _ if super::SIMPLE_VAR_TYPES.contains(&kind) => return self.process_variable_ref(curs),
            _ if kind.starts_with("com_") => if let Some(sev) = self.config.flag.immediate_mode {
                self.push(rng,"Immediate mode command, Apple tokenizer will reject",sev);
            },
            _ => {}
        }
        Ok(Navigation::GotoChild)
    }
}
