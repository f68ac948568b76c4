//! Parse a settings string.
//!
//! Checks for specific keys that affect the analyzer and detokenizer.
//! Unknown keys are ignored, as are values of the wrong type.

use serde_json;
use crate::DYNERR;
use crate::lang::{update_json_i64,update_json_vec,update_json_severity};
use lsp_types::DiagnosticSeverity;
use log::warn;

#[derive(Clone)]
pub struct Flag {
    pub case_sensitive: Option<DiagnosticSeverity>,
    pub undeclared_arrays: Option<DiagnosticSeverity>,
    pub undefined_variables: Option<DiagnosticSeverity>,
    pub bad_references: Option<DiagnosticSeverity>,
    pub immediate_mode: Option<DiagnosticSeverity>
}
#[derive(Clone)]
pub struct Warn {
    pub length: i64
}
#[derive(Clone)]
pub struct Detokenizer {
    pub escapes: Vec<i64>,
    pub max_lines: i64,
    pub max_line_length: i64
}
#[derive(Clone)]
pub struct Settings {
    pub flag: Flag,
    pub warn: Warn,
    pub detokenizer: Detokenizer
}

impl Settings {
    pub fn new() -> Self {
        Self {
            flag : Flag {
                case_sensitive: None,
                undeclared_arrays: Some(DiagnosticSeverity::WARNING),
                undefined_variables: Some(DiagnosticSeverity::WARNING),
                bad_references: Some(DiagnosticSeverity::ERROR),
                immediate_mode: Some(DiagnosticSeverity::ERROR)
            },
            warn : Warn {
                length: 150
            },
            detokenizer : Detokenizer {
                escapes: vec![138,141],
                max_lines: 5000,
                max_line_length: 255
            }
        }
    }
}

/// Settings from a JSON string, starting from the defaults.
/// Invalid JSON is an error.
pub fn parse(json: &str) -> Result<Settings,DYNERR> {
    let mut ans = Settings::new();
    let root = serde_json::from_str::<serde_json::Value>(json)?;
    let obj = match root.as_object() {
        Some(obj) => obj,
        None => {
            warn!("settings are not a JSON object");
            return Ok(ans);
        }
    };
    for (key,val) in obj {
        match key.as_str() {
            "flag" => {
                update_json_severity(val,"caseSensitive",&mut ans.flag.case_sensitive);
                update_json_severity(val,"undeclaredArrays",&mut ans.flag.undeclared_arrays);
                update_json_severity(val,"undefinedVariables",&mut ans.flag.undefined_variables);
                update_json_severity(val,"badReferences",&mut ans.flag.bad_references);
                update_json_severity(val,"immediateMode",&mut ans.flag.immediate_mode);
            },
            "warn" => {
                update_json_i64(val,"length",&mut ans.warn.length);
            },
            "detokenizer" => {
                update_json_i64(val,"maxLineLength",&mut ans.detokenizer.max_line_length);
                update_json_i64(val,"maxLines",&mut ans.detokenizer.max_lines);
                update_json_vec(val,"escapes",&mut ans.detokenizer.escapes);
            },
            _ => {}
        }
    }
    Ok(ans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_survive() {
        let s = parse("{\"warn\": {\"length\": 80}, \"hovers\": {\"keywords\": false}}").expect("parse failed");
        assert_eq!(s.warn.length,80);
        assert_eq!(s.detokenizer.escapes,vec![138,141]);
        assert_eq!(s.flag.bad_references,Some(DiagnosticSeverity::ERROR));
    }

    #[test]
    fn flags() {
        let s = parse("{\"flag\": {\"caseSensitive\": \"warn\", \"immediateMode\": \"ignore\"}}").expect("parse failed");
        assert_eq!(s.flag.case_sensitive,Some(DiagnosticSeverity::WARNING));
        assert_eq!(s.flag.immediate_mode,None);
    }

    #[test]
    fn bad_json() {
        assert!(parse("{\"flag\": ").is_err());
    }
}
