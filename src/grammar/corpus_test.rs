//! Run the grammar against the corpus files in test/corpus.
//! Each case is a header with the case name between `=` rules, the program,
//! a `---` rule, and the expected S-expression.  A case whose header carries
//! `:error` has no expected tree, it only has to produce an error.

use super::{language,language_case_sensitive};

const CORPUS: [(&str,&str);6] = [
    ("statements",include_str!("../../test/corpus/statements.txt")),
    ("expressions",include_str!("../../test/corpus/expressions.txt")),
    ("variables",include_str!("../../test/corpus/variables.txt")),
    ("vars-legal",include_str!("../../test/corpus/vars-legal.txt")),
    ("vars-illegal",include_str!("../../test/corpus/vars-illegal.txt")),
    ("errors",include_str!("../../test/corpus/errors.txt"))
];

struct Case {
    name: String,
    expect_error: bool,
    input: String,
    expected: String
}

fn is_rule(line: &str,c: char) -> bool {
    line.len() >= 3 && line.chars().all(|x| x==c)
}

fn normalize(sexpr: &str) -> String {
    sexpr.split_whitespace().collect::<Vec<&str>>().join(" ").replace("( ","(").replace(" )",")")
}

fn cases(corpus: &str) -> Vec<Case> {
    let mut ans = Vec::new();
    let lines: Vec<&str> = corpus.lines().collect();
    let mut i = 0;
    while i < lines.len() {
        if !is_rule(lines[i],'=') {
            i += 1;
            continue;
        }
        let name = lines[i+1].trim().to_string();
        let mut expect_error = false;
        i += 2;
        while !is_rule(lines[i],'=') {
            expect_error |= lines[i].trim()==":error";
            i += 1;
        }
        i += 1;
        let mut input = Vec::new();
        while !is_rule(lines[i],'-') {
            input.push(lines[i]);
            i += 1;
        }
        i += 1;
        let mut expected = Vec::new();
        while i < lines.len() && !is_rule(lines[i],'=') {
            expected.push(lines[i]);
            i += 1;
        }
        ans.push(Case {
            name,
            expect_error,
            input: input.join("\n").trim().to_string() + "\n",
            expected: normalize(&expected.join(" "))
        });
    }
    ans
}

#[test]
fn corpus() {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&language()).expect("could not set language");
    let mut count = 0;
    for (file,corpus) in CORPUS {
        for case in cases(corpus) {
            let tree = parser.parse(&case.input,None).expect("no tree");
            let root = tree.root_node();
            match case.expect_error {
                true => assert!(root.has_error(),"{}: {} parsed as {}",file,case.name,root.to_sexp()),
                false => assert_eq!(root.to_sexp(),case.expected,"{}: {}",file,case.name)
            }
            count += 1;
        }
    }
    assert!(count >= 300);
}

#[test]
fn case_sensitive_corpus() {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&language_case_sensitive()).expect("could not set language");
    for (file,corpus) in CORPUS {
        for case in cases(corpus) {
            if case.expect_error || case.input.chars().any(|c| c.is_ascii_lowercase()) {
                continue;
            }
            let tree = parser.parse(&case.input,None).expect("no tree");
            assert_eq!(tree.root_node().to_sexp(),case.expected,"{}: {}",file,case.name);
        }
    }
}

#[test]
fn lower_case() {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&language()).expect("could not set language");
    let tree = parser.parse("10 gosub 100: print a$\n",None).expect("no tree");
    assert!(!tree.root_node().has_error());
    parser.set_language(&language_case_sensitive()).expect("could not set language");
    let tree = parser.parse("10 gosub 100: print a$\n",None).expect("no tree");
    assert!(tree.root_node().has_error());
}
