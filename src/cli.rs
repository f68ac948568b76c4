use clap::{value_parser, crate_version, Arg, ArgAction, Command};

const CONFIG_LONG_HELP: &str = "JSON string with keys `flag`, `warn`, and `detokenizer`,
e.g. `{\"flag\": {\"caseSensitive\": \"warn\"}}`, unknown keys are ignored";

fn extern_arg() -> Arg {
    Arg::new("extern").long("extern").value_name("LIST").help("external references")
        .required(false)
        .value_delimiter(',')
        .value_parser(0..0xffff)
        .long_help("comma delimited list of line numbers that are referenced externally")
}

fn console_arg() -> Arg {
    Arg::new("console").long("console").help("format for console unconditionally")
        .required(false)
        .action(ArgAction::SetTrue)
        .long_help("even if the output context is a file or pipe, format it for the console")
}

fn indent_arg() -> Arg {
    Arg::new("indent").long("indent").help("JSON indentation, omit to minify")
        .value_name("SPACES")
        .value_parser(value_parser!(u16).range(0..16))
        .required(false)
}

fn config_arg() -> Arg {
    Arg::new("config").long("config").short('c').value_name("JSON").help("modify diagnostic configuration")
        .long_help(CONFIG_LONG_HELP)
        .required(false)
        .default_value("")
}

pub fn build_cli() -> Command {
    let long_help = "integerbasic is always invoked with exactly one of several subcommands.
The subcommands are generally designed to function as nodes in a pipeline.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
line entry:            `integerbasic verify`
file check:            `cat prog.bas | integerbasic verify`
tokenize to file:      `cat prog.bas | integerbasic tokenize > prog.itok`
detokenize from file:  `cat prog.itok | integerbasic detokenize`
renumber all lines:    `cat prog.bas | integerbasic renumber -f 100 -s 10`";

    let mut main_cmd = Command::new("integerbasic")
        .about("Parses, checks, and tokenizes Integer BASIC programs.")
        .after_long_help(long_help)
        .version(crate_version!());

    main_cmd = main_cmd.subcommand(
        Command::new("verify")
            .arg(Arg::new("sexpr").long("sexpr").short('s').help("write S-expressions to stderr").action(ArgAction::SetTrue))
            .arg(config_arg())
            .about("read from stdin and perform language analysis"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("renumber")
            .arg(Arg::new("beg").long("beg").short('b').value_name("NUM").help("lowest number to renumber")
                .value_parser(value_parser!(usize))
                .default_value("0"))
            .arg(Arg::new("end").long("end").short('e').value_name("NUM").help("highest number to renumber plus 1")
                .value_parser(value_parser!(usize))
                .default_value("32768"))
            .arg(Arg::new("first").long("first").short('f').value_name("NUM").help("first number")
                .value_parser(value_parser!(usize))
                .default_value("10"))
            .arg(Arg::new("step").long("step").short('s').value_name("NUM").help("step between numbers")
                .value_parser(value_parser!(usize))
                .default_value("10"))
            .arg(Arg::new("reorder").long("reorder").short('r').help("allow reordering of lines").action(ArgAction::SetTrue))
            .arg(extern_arg())
            .about("renumber BASIC program lines"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("tokenize")
            .arg(console_arg())
            .visible_alias("tok")
            .about("read from stdin, tokenize, write to stdout"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("detokenize")
            .arg(config_arg())
            .visible_alias("dtok")
            .about("read from stdin, detokenize, write to stdout"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("tokens")
            .arg(indent_arg())
            .about("write the token table as a JSON string to stdout"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("completions")
            .arg(
                Arg::new("shell").short('s').long("shell").help("shell target").value_name("NAME")
                    .required(true)
                    .value_parser(["bash","elv","fish","ps1","zsh"])
            )
            .about("write completions script to stdout for the specified shell")
    );
    return main_cmd;
}
