//! # Grammar Module
//!
//! The Integer BASIC grammar for the tree-sitter runtime.
//!
//! The parse tables in `src/parser.c` are generated from `grammar.js` and compiled by the
//! build script.  Trees are concrete: every token of the Apple II tokenizer shows up as a
//! named leaf whose kind is the token's rule id (see `tokens`).
//!
//! Two languages are provided.  `integerbasic` accepts lower case keywords and variable names,
//! `integerbasiccasesens` only accepts upper case, as a real Apple II does.

pub mod tokens;
pub mod highlights;
#[cfg(test)]
mod corpus_test;

use tree_sitter_language::LanguageFn;

extern "C" {
    fn tree_sitter_integerbasic() -> *const ();
    fn tree_sitter_integerbasiccasesens() -> *const ();
}

/// Version of the parse tables
pub const LANGUAGE_VERSION: usize = 14;

/// The tree-sitter [`LanguageFn`] for Integer BASIC, lower case allowed
pub const LANGUAGE: LanguageFn = unsafe { LanguageFn::from_raw(tree_sitter_integerbasic) };

/// The tree-sitter [`LanguageFn`] for Integer BASIC, upper case required
pub const LANGUAGE_CASE_SENSITIVE: LanguageFn = unsafe { LanguageFn::from_raw(tree_sitter_integerbasiccasesens) };

/// The Integer BASIC language, lower case allowed
pub fn language() -> tree_sitter::Language {
    LANGUAGE.into()
}

/// The Integer BASIC language, upper case required
pub fn language_case_sensitive() -> tree_sitter::Language {
    LANGUAGE_CASE_SENSITIVE.into()
}
