use std::env;
use std::io::{self, Read};
use std::process;

use crate::error::{GpError, Result};
use crate::format::sprint_varx;
use crate::json;
use crate::printer::Printer;
use crate::resolve::{ArgNameResolver, Registry, parse_arg_list};
use crate::source::FileSource;
use crate::stack::StackFrame;
use crate::value::Dump;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Render JSON from a file (or stdin) as a variable dump.
    Dump {
        file: Option<String>,
        name: String,
        hex: bool,
        indent: usize,
        width: Option<usize>,
    },
    /// Split an argument list; print one argument or all of them.
    Args { text: String, position: Option<usize> },
    /// Find the call to `function` around `line` of `file` and print the
    /// text of one of its arguments.
    Resolve {
        file: String,
        line: usize,
        function: String,
        position: usize,
    },
    Time { text: String },
    Header,
    Footer,
}

pub fn parse_args() -> Command {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        process::exit(0);
    }
    if args.iter().any(|a| a == "-V" || a == "--version") {
        println!("genprint {}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }
    match parse(&args) {
        Ok(command) => command,
        Err(msg) => {
            eprintln!("genprint: {}", msg);
            eprintln!("Try 'genprint --help' for usage.");
            process::exit(1);
        }
    }
}

/// Parse arguments (program name excluded) into a command.
pub fn parse(args: &[String]) -> std::result::Result<Command, String> {
    let Some((command, rest)) = args.split_first() else {
        return Err("missing command".to_string());
    };
    match command.as_str() {
        "dump" => parse_dump(rest),
        "args" => match rest {
            [text] => Ok(Command::Args {
                text: text.clone(),
                position: None,
            }),
            [text, n] => Ok(Command::Args {
                text: text.clone(),
                position: Some(number("position", n)?),
            }),
            _ => Err("args takes TEXT [N]".to_string()),
        },
        "resolve" => match rest {
            [file, line, function] | [file, line, function, _] => Ok(Command::Resolve {
                file: file.clone(),
                line: number("line", line)?,
                function: function.clone(),
                position: match rest.get(3) {
                    Some(n) => number("position", n)?,
                    None => 1,
                },
            }),
            _ => Err("resolve takes FILE LINE FUNC [POSITION]".to_string()),
        },
        "time" => Ok(Command::Time { text: rest.join(" ") }),
        "header" => Ok(Command::Header),
        "footer" => Ok(Command::Footer),
        other => Err(format!("unknown command: {}", other)),
    }
}

fn parse_dump(args: &[String]) -> std::result::Result<Command, String> {
    let mut file: Option<String> = None;
    let mut name = "json".to_string();
    let mut hex = false;
    let mut indent = 0;
    let mut width: Option<usize> = None;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--hex" => hex = true,
            "--indent" | "--width" | "--name" => {
                i += 1;
                let Some(value) = args.get(i) else {
                    return Err(format!("{} requires an argument", arg));
                };
                match arg.as_str() {
                    "--indent" => indent = number("indent", value)?,
                    "--width" => width = Some(number("width", value)?),
                    _ => name = value.clone(),
                }
            }
            "-" => file = None,
            _ if arg.starts_with("--") => return Err(format!("unknown option: {}", arg)),
            _ => {
                if file.is_some() {
                    return Err("dump takes one input file".to_string());
                }
                file = Some(arg.clone());
            }
        }
        i += 1;
    }
    Ok(Command::Dump {
        file,
        name,
        hex,
        indent,
        width,
    })
}

fn number(what: &str, s: &str) -> std::result::Result<usize, String> {
    s.parse()
        .map_err(|_| format!("{} must be a non-negative integer: {}", what, s))
}

/// Run `command`, returning what it prints to stdout.
pub fn execute(command: &Command, gp: &Printer) -> Result<String> {
    let settings = gp.settings();
    match command {
        Command::Dump {
            file,
            name,
            hex,
            indent,
            width,
        } => {
            let text = read_input(file.as_deref())?;
            let value = json::parse(&text)?;
            let width = width.unwrap_or(settings.col1_width);
            Ok(sprint_varx(name, &value, *hex, *indent, width, "\n"))
        }
        Command::Args { text, position } => {
            // The callee name, if given, is not part of the first argument.
            let call = text.find('(').map_or(text.as_str(), |open| &text[open..]);
            let args = parse_arg_list(call);
            match position {
                None => Ok(sprint_varx("args_list", &args.to_value(), false, 0, settings.col1_width, "\n")),
                Some(n) => match n.checked_sub(1).and_then(|ix| args.get(ix)) {
                    Some(arg) => Ok(format!("{}\n", arg)),
                    None => Err(GpError::ArgumentCountMismatch {
                        requested: *n,
                        listing: sprint_varx("args_list", &args.to_value(), false, 0, settings.col1_width, "\n"),
                        args,
                    }),
                },
            }
        }
        Command::Resolve {
            file,
            line,
            function,
            position,
        } => {
            let frames = vec![
                StackFrame::synthetic(function.as_str()),
                StackFrame::module(file.as_str(), *line, "", file.as_str()),
            ];
            let sources = FileSource::new();
            let registry = Registry::new();
            let arg = ArgNameResolver::new(&frames, &sources, &registry)
                .width(settings.col1_width)
                .resolve(*position, 1)?;
            Ok(format!("{}\n", arg))
        }
        Command::Time { text } => Ok(gp.sprint_timen(text)),
        Command::Header => Ok(gp.sprint_pgm_header(0, true, &[])),
        Command::Footer => Ok(gp.sprint_pgm_footer()),
    }
}

fn read_input(file: Option<&str>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|source| GpError::Io {
            path: path.to_string(),
            source,
        }),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| GpError::Io {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(text)
        }
    }
}

fn print_usage() {
    eprintln!("genprint {} - diagnostic print toolkit", env!("CARGO_PKG_VERSION"));
    eprintln!();
    eprintln!("Usage: genprint <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  dump [--hex] [--indent N] [--width N] [--name NAME] [FILE|-]");
    eprintln!("                   Render JSON as an aligned variable dump");
    eprintln!("  args TEXT [N]    Split a call's argument list; print argument N");
    eprintln!("  resolve FILE LINE FUNC [POSITION]");
    eprintln!("                   Print the text of an argument passed to FUNC");
    eprintln!("                   by the call found at or above LINE");
    eprintln!("  time [TEXT]      Print a timestamped line");
    eprintln!("  header           Print the program header");
    eprintln!("  footer           Print the program footer");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  NANOSECONDS, SHOW_ELAPSED_TIME   Timestamp precision (default 1)");
    eprintln!("  QUIET, DEBUG                     Suppress / enable q and d output");
    eprintln!("  GENPRINT_LOG                     tracing filter, e.g. genprint=debug");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  echo '{{\"a\": 1, \"b\": [2, 3]}}' | genprint dump --name cfg");
    eprintln!("  genprint args 'f(a, g(b, c), 3)' 2");
    eprintln!("  genprint resolve src/main.rs 42 print_var");
}
