//! test of Integer diagnostics module

use regex::Regex;
use lsp_types::Diagnostic;
use super::diagnostics;
use crate::lang::{Analysis,Document};

fn check_messages(diag_set: &[Diagnostic],expected_messages: &[&str]) {
    let actual: Vec<&str> = diag_set.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(diag_set.len(),expected_messages.len(),"got {:?}",actual);
    for i in 0..diag_set.len() {
        let patt = Regex::new(expected_messages[i]).expect("bad regex");
        assert!(patt.is_match(&diag_set[i].message),"{} does not match {}",diag_set[i].message,expected_messages[i]);
    }
}

fn test_diagnostics(prog_name: &str,expected_messages: &[&str]) {
    let path = std::env::current_dir().expect("no cwd").join("tests").join("integerbasic").join(prog_name);
    let mut analyzer = diagnostics::Analyzer::new();
    let doc = Document::from_file_path(&path).expect("failed to create doc");
    analyzer.analyze(&doc).expect("could not analyze");
    check_messages(&analyzer.get_diags(&doc),expected_messages);
}

fn test_with_config(program: &str,config: &str,expected_messages: &[&str]) {
    let mut analyzer = diagnostics::Analyzer::new();
    analyzer.update_config(config).expect("bad config");
    let doc = Document::from_string(program.to_string(),0);
    analyzer.analyze(&doc).expect("could not analyze");
    check_messages(&analyzer.get_diags(&doc),expected_messages);
}

#[test]
fn long_line() {
    test_diagnostics("long-line.ibas",&[
        "Line may be too long"
    ]);
}

#[test]
fn collisions() {
    test_diagnostics("test-collisions.ibas",&[
        "illegal variable name",
        "illegal variable name",
        "illegal variable name",
        "illegal variable name",
        "string is never DIM'd",
        "something is missing"
    ]);
}

#[test]
fn errors() {
    test_diagnostics("test-errors.ibas",&[
        r"\(ERROR",
        r"\(ERROR",
        r"\(ERROR",
        r"\(ERROR"
    ]);
}

#[test]
fn lines() {
    test_diagnostics("test-lines.ibas",&[
        // first pass
        "Line number out of order",
        // second pass
        "Line does not exist",
        "Line does not exist",
        r"\(ERROR"
    ]);
}

#[test]
fn ranges() {
    test_diagnostics("test-ranges.ibas",&[
        "Out of range",
        "Out of range",
        "Out of range",
        "Out of range",
        "Out of range"
    ]);
}

#[test]
fn unassigned() {
    test_diagnostics("test-unassigned.ibas",&[
        "variable is never assigned",
        "variable is never assigned",
        "variable is never assigned",
        "variable is never assigned",
        "variable is never assigned"
    ]);
}

#[test]
fn undeclared() {
    test_diagnostics("test-undeclared.ibas",&[
        "array is never DIM'd",
        "array is never DIM'd",
        "unsubscripted integer array",
        "string is never DIM'd",
        "string is never DIM'd"
    ]);
}

#[test]
fn immediate() {
    test_diagnostics("test-immediate.ibas",&[
        "Immediate mode command",
        "Immediate mode command",
        "Immediate mode command"
    ]);
}

#[test]
fn case_sensitive() {
    test_with_config("10 x = 1: print x\n","{\"flag\": {\"caseSensitive\": \"warn\"}}",&[
        "settings require upper case",
        "settings require upper case",
        "settings require upper case"
    ]);
}

#[test]
fn ignore_bad_references() {
    test_with_config("10 GOTO 20\n","{\"flag\": {\"badReferences\": \"ignore\"}}",&[]);
}

#[test]
fn symbols() {
    let mut analyzer = diagnostics::Analyzer::new();
    let doc = Document::from_string("10 GOSUB 30: GOTO 30\n20 END\n30 REM  SUBROUTINE\n40 RETURN\n".to_string(),0);
    analyzer.analyze(&doc).expect("could not analyze");
    let symbols = analyzer.get_symbols();
    assert_eq!(symbols.lines.len(),4);
    assert_eq!(symbols.docstring(30),Some("SUBROUTINE".to_string()));
    let line = symbols.lines.get(&30).expect("line 30 missing");
    assert_eq!(line.gosubs.len(),1);
    assert_eq!(line.gotos.len(),1);
    assert_eq!(line.gosubs[0].start.character,9);
}
