//! # Token table
//!
//! Integer BASIC stores a program as a sequence of one byte tokens.  The same
//! lexeme can map to several codes, the ROM picks the code based on context.
//! Each code that the grammar can produce has a rule id, which is also the
//! node kind of the corresponding leaf in the syntax tree.

use serde::Serialize;

#[derive(Serialize,Clone,Copy,Debug,PartialEq)]
pub struct Token {
    pub code: u8,
    pub lexeme: &'static str,
    #[serde(rename = "rule id", skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<&'static str>
}

const fn tok(code: u8, lexeme: &'static str, rule_id: Option<&'static str>) -> Token {
    Token { code, lexeme, rule_id }
}

/// Marks the end of a tokenized line
pub const EOL: u8 = 0x01;
/// Opening quote of a string literal
pub const QUOTE: u8 = 0x28;
/// Closing quote of a string literal
pub const UNQUOTE: u8 = 0x29;
/// Start of a remark, the remainder of the line is negative ASCII
pub const REM: u8 = 0x5d;

pub const TOKENS: [Token;128] = [
    tok(0x00, "", None),
    tok(0x01, "", None),
    tok(0x02, "_", None),
    tok(0x03, ":", Some("sep_statement")),
    tok(0x04, "LOAD", Some("com_load")),
    tok(0x05, "SAVE", Some("com_save")),
    tok(0x06, "CON", Some("com_con")),
    tok(0x07, "RUN", None),
    tok(0x08, "RUN", Some("com_run")),
    tok(0x09, "DEL", Some("com_del")),
    tok(0x0a, ",", Some("sep_del")),
    tok(0x0b, "NEW", Some("com_new")),
    tok(0x0c, "CLR", Some("com_clr")),
    tok(0x0d, "AUTO", Some("com_auto")),
    tok(0x0e, ",", Some("sep_auto")),
    tok(0x0f, "MAN", Some("com_man")),
    tok(0x10, "HIMEM:", Some("com_himem")),
    tok(0x11, "LOMEM:", Some("com_lomem")),
    tok(0x12, "+", Some("op_plus")),
    tok(0x13, "-", Some("op_minus")),
    tok(0x14, "*", Some("op_times")),
    tok(0x15, "/", Some("op_div")),
    tok(0x16, "=", Some("op_aeq")),
    tok(0x17, "#", Some("op_aneq")),
    tok(0x18, ">=", Some("op_greq")),
    tok(0x19, ">", Some("op_gtr")),
    tok(0x1a, "<=", Some("op_lesseq")),
    tok(0x1b, "<>", Some("op_unequal")),
    tok(0x1c, "<", Some("op_less")),
    tok(0x1d, "AND", Some("op_and")),
    tok(0x1e, "OR", Some("op_or")),
    tok(0x1f, "MOD", Some("op_mod")),
    tok(0x20, "^", Some("op_pow")),
    tok(0x21, "+", None),
    tok(0x22, "(", Some("open_dim_str")),
    tok(0x23, ",", Some("sep_slice")),
    tok(0x24, "THEN", Some("statement_then_line")),
    tok(0x25, "THEN", Some("statement_then_statement")),
    tok(0x26, ",", Some("sep_input_str")),
    tok(0x27, ",", Some("sep_input_int")),
    tok(0x28, "\"", Some("quote")),
    tok(0x29, "\"", Some("unquote")),
    tok(0x2a, "(", Some("open_slice")),
    tok(0x2b, "!", None),
    tok(0x2c, "!", None),
    tok(0x2d, "(", Some("open_int_array")),
    tok(0x2e, "PEEK", Some("fcall_peek")),
    tok(0x2f, "RND", Some("fcall_rnd")),
    tok(0x30, "SGN", Some("fcall_sgn")),
    tok(0x31, "ABS", Some("fcall_abs")),
    tok(0x32, "PDL", Some("fcall_pdl")),
    tok(0x33, "RNDX", None),
    tok(0x34, "(", Some("open_dim_int")),
    tok(0x35, "+", Some("op_unary_plus")),
    tok(0x36, "-", Some("op_unary_minus")),
    tok(0x37, "NOT", Some("op_not")),
    tok(0x38, "(", Some("open_aexpr")),
    tok(0x39, "=", Some("op_seq")),
    tok(0x3a, "#", Some("op_sneq")),
    tok(0x3b, "LEN(", Some("fcall_lenp")),
    tok(0x3c, "ASC(", Some("fcall_ascp")),
    tok(0x3d, "SCRN(", Some("fcall_scrnp")),
    tok(0x3e, ",", Some("sep_scrn")),
    tok(0x3f, "(", Some("open_fcall")),
    tok(0x40, "$", Some("dollar")),
    tok(0x41, "$", None),
    tok(0x42, "(", None),
    tok(0x43, ",", Some("sep_dim_str")),
    tok(0x44, ",", Some("sep_dim_int")),
    tok(0x45, ";", Some("sep_print_str")),
    tok(0x46, ";", Some("sep_print_int")),
    tok(0x47, ";", Some("sep_print_null")),
    tok(0x48, ",", Some("sep_tab_str")),
    tok(0x49, ",", Some("sep_tab_int")),
    tok(0x4a, ",", Some("sep_tab_null")),
    tok(0x4b, "TEXT", Some("statement_text")),
    tok(0x4c, "GR", Some("statement_gr")),
    tok(0x4d, "CALL", Some("statement_call")),
    tok(0x4e, "DIM", Some("statement_dim_str")),
    tok(0x4f, "DIM", Some("statement_dim_int")),
    tok(0x50, "TAB", Some("statement_tab")),
    tok(0x51, "END", Some("statement_end")),
    tok(0x52, "INPUT", Some("statement_input_str")),
    tok(0x53, "INPUT", Some("statement_input_prompt")),
    tok(0x54, "INPUT", Some("statement_input_int")),
    tok(0x55, "FOR", Some("statement_for")),
    tok(0x56, "=", Some("op_eq_for")),
    tok(0x57, "TO", Some("statement_to")),
    tok(0x58, "STEP", Some("statement_step")),
    tok(0x59, "NEXT", Some("statement_next")),
    tok(0x5a, ",", Some("sep_next")),
    tok(0x5b, "RETURN", Some("statement_return")),
    tok(0x5c, "GOSUB", Some("statement_gosub")),
    tok(0x5d, "REM", Some("statement_rem")),
    tok(0x5e, "LET", Some("statement_let")),
    tok(0x5f, "GOTO", Some("statement_goto")),
    tok(0x60, "IF", Some("statement_if")),
    tok(0x61, "PRINT", Some("statement_print_str")),
    tok(0x62, "PRINT", Some("statement_print_int")),
    tok(0x63, "PRINT", Some("statement_print_null")),
    tok(0x64, "POKE", Some("statement_poke")),
    tok(0x65, ",", Some("sep_poke")),
    tok(0x66, "COLOR=", Some("statement_coloreq")),
    tok(0x67, "PLOT", Some("statement_plot")),
    tok(0x68, ",", Some("sep_plot")),
    tok(0x69, "HLIN", Some("statement_hlin")),
    tok(0x6a, ",", Some("sep_hlin")),
    tok(0x6b, "AT", Some("statement_hlin_at")),
    tok(0x6c, "VLIN", Some("statement_vlin")),
    tok(0x6d, ",", Some("sep_vlin")),
    tok(0x6e, "AT", Some("statement_vlin_at")),
    tok(0x6f, "VTAB", Some("statement_vtab")),
    tok(0x70, "=", Some("op_eq_assign_str")),
    tok(0x71, "=", Some("op_eq_assign_int")),
    tok(0x72, ")", Some("close")),
    tok(0x73, ")", None),
    tok(0x74, "LIST", Some("statement_list")),
    tok(0x75, ",", Some("sep_list")),
    tok(0x76, "LIST", None),
    tok(0x77, "POP", Some("statement_pop")),
    tok(0x78, "NODSP", Some("statement_nodsp_str")),
    tok(0x79, "NODSP", Some("statement_nodsp_int")),
    tok(0x7a, "NOTRACE", Some("statement_notrace")),
    tok(0x7b, "DSP", Some("statement_dsp_str")),
    tok(0x7c, "DSP", Some("statement_dsp_int")),
    tok(0x7d, "TRACE", Some("statement_trace")),
    tok(0x7e, "PR#", Some("statement_prn")),
    tok(0x7f, "IN#", Some("statement_inn"))
];

/// Iterate over the tokens that appear in the grammar
pub fn grammar_tokens() -> impl Iterator<Item = &'static Token> {
    TOKENS.iter().filter(|t| t.rule_id.is_some())
}

/// Token code for a node kind, if the node kind is a token
pub fn code_for_rule(rule_id: &str) -> Option<u8> {
    grammar_tokens().find(|t| t.rule_id == Some(rule_id)).map(|t| t.code)
}

/// Lexeme for a token code, `None` if the code has no printable form
pub fn lexeme(code: u8) -> Option<&'static str> {
    match TOKENS.get(code as usize) {
        Some(t) if t.lexeme.len() > 0 && code > 0x02 => Some(t.lexeme),
        _ => None
    }
}

/// Token table as JSON, if `indent` is `None` the string is minified
pub fn token_list_json(indent: Option<u16>) -> Result<String,serde_json::Error> {
    let toks: Vec<&Token> = grammar_tokens().collect();
    match indent {
        Some(spaces) => {
            let spc = " ".repeat(spaces as usize);
            let mut buf = Vec::new();
            let fmt = serde_json::ser::PrettyFormatter::with_indent(spc.as_bytes());
            let mut ser = serde_json::Serializer::with_formatter(&mut buf,fmt);
            toks.serialize(&mut ser)?;
            Ok(String::from_utf8_lossy(&buf).to_string())
        },
        None => serde_json::to_string(&toks)
    }
}
