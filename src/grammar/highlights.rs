//! # Highlights
//!
//! Runs `queries/highlights.scm` over a syntax tree.  Editors with their own query
//! engine can load `HIGHLIGHTS_QUERY` directly.

use std::collections::HashMap;
use tree_sitter::{Language,Query,QueryCursor,QueryError,Range,StreamingIterator,Tree};

/// Contents of `queries/highlights.scm`
pub const HIGHLIGHTS_QUERY: &str = include_str!("../../queries/highlights.scm");

/// Compiled highlight query
pub struct Highlighter {
    query: Query
}

impl Highlighter {
    pub fn new(lang: &Language) -> Result<Self,QueryError> {
        Ok(Self {
            query: Query::new(lang,HIGHLIGHTS_QUERY)?
        })
    }
    /// Captures in document order.  When more than one pattern captures a node,
    /// the pattern that comes first in the query wins.  Missing nodes are not captured.
    pub fn highlights(&self,tree: &Tree,source: &str) -> Vec<(Range,&str)> {
        let names = self.query.capture_names();
        let mut best: HashMap<usize,(Range,usize,&str)> = HashMap::new();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query,tree.root_node(),source.as_bytes());
        while let Some(m) = matches.next() {
            for cap in m.captures {
                if cap.node.is_missing() {
                    continue;
                }
                match best.get(&cap.node.id()) {
                    Some((_,pattern,_)) if *pattern <= m.pattern_index => {},
                    _ => {
                        best.insert(cap.node.id(),(cap.node.range(),m.pattern_index,names[cap.index as usize]));
                    }
                }
            }
        }
        let mut ans: Vec<(Range,&str)> = best.into_values().map(|(rng,_,name)| (rng,name)).collect();
        ans.sort_by_key(|(rng,_)| (rng.start_byte,rng.end_byte));
        ans
    }
}
