use clap::ValueEnum;

include!("src/cli.rs");

const ALIASES: [(&str,&str);2] = [
    ("(tokenize)", "(tok)"),
    ("(detokenize)", "(dtok)")
];

/// Zsh completions from clap skip visible aliases, so each aliased case block is
/// repeated under the alias name.  Also `--opt=[` becomes `--opt+[`.
fn refine_zsh(script: &str) -> String {
    let eq_patt = regex::RegexBuilder::new(r"^'--(\w+)=\[").multi_line(true).build().expect("regex parsing error");
    let intermediate = eq_patt.replace_all(script, "'--$1+[");
    let mut new_script = String::new();
    let mut block: Option<(String,&str,&str)> = None;
    for line in intermediate.lines() {
        if let Some((accum,name,alias)) = block.as_mut() {
            accum.push_str(line);
            accum.push('\n');
            if line==";;" {
                new_script += accum.as_str();
                new_script += &accum.replace(*name,*alias);
                block = None;
            }
            continue;
        }
        match ALIASES.iter().find(|(name,_)| *name==line) {
            Some((name,alias)) => block = Some((format!("{}\n",line),*name,*alias)),
            None => {
                new_script += line;
                new_script += "\n";
            }
        }
    }
    new_script
}

/// Compile the generated parser tables, both languages share `src/tree_sitter/parser.h`.
fn compile_parsers() {
    let src_dir = std::path::Path::new("src");
    let mut c_config = cc::Build::new();
    c_config.std("c11").include(src_dir);
    #[cfg(target_env = "msvc")]
    c_config.flag("-utf-8");
    for parser_path in [src_dir.join("parser.c"), src_dir.join("casesens").join("parser.c")] {
        println!("cargo:rerun-if-changed={}", parser_path.display());
        c_config.file(&parser_path);
    }
    println!("cargo:rerun-if-changed=src/tree_sitter/parser.h");
    c_config.compile("tree-sitter-integerbasic");
}

fn main() -> Result<(), std::io::Error> {
    compile_parsers();
    println!("cargo:rerun-if-changed=src/cli.rs");
    if std::env::var("DOCS_RS").is_err() {
        let outdir = match std::env::var_os("CARGO_MANIFEST_DIR") {
            None => return Ok(()),
            Some(root) => std::path::Path::new(&root).join("completions"),
        };
        std::fs::create_dir_all(&outdir)?;

        let mut cmd = build_cli();

        for &shell in clap_complete::Shell::value_variants() {
            clap_complete::generate_to(shell, &mut cmd, "integerbasic", &outdir)?;
            match shell {
                clap_complete::Shell::Zsh => {
                    let s = std::fs::read(outdir.join("_integerbasic")).expect("zsh completions missing");
                    let script = String::from_utf8(s).expect("clap_complete output not UTF8");
                    let refined = refine_zsh(&script);
                    std::fs::write(outdir.join("_integerbasic"),refined)?;
                },
                _ => {}
            }
        }
    }

    Ok(())
}
