//! Command-line interface for tagfmt
//! Formats tag-annotated text from a file or stdin for the terminal.
//!
//! Usage:
//!   tagfmt [PATH]                     - Format PATH (or stdin when absent or `-`)
//!   tagfmt --plain --width 60 [PATH]  - Strip styles, wrap at 60 columns
//!   tagfmt --mode debug [PATH]        - Show every token the printer sees
//!   tagfmt --tokens [PATH]            - Dump the lexed token tree as JSON
//!   tagfmt --escape | --strip [PATH]  - Escape markup / remove all decoration

use std::io::Read;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tagfmt::markup::config::{Loader, TagfmtConfig};
use tagfmt::markup::visitors::print::PrintVisitor;
use tagfmt::markup::{escape, remove_decoration, Lexer, OutputFormatter, PrintMode};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TAGFMT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("tagfmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Format tag-annotated text with ANSI styles, hyperlinks and word wrapping")
        .arg(
            Arg::new("path")
                .help("File to format; reads stdin when absent or `-`")
                .index(1),
        )
        .arg(
            Arg::new("decorated")
                .long("decorated")
                .help("Emit styles and hyperlinks")
                .action(ArgAction::SetTrue)
                .conflicts_with("plain"),
        )
        .arg(
            Arg::new("plain")
                .long("plain")
                .help("Emit plain text only")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .short('w')
                .help("Base wrap width (0 disables wrapping)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .short('m')
                .help("Print mode")
                .value_parser(["normal", "raw", "raw-escaped", "debug"])
                .default_value("normal"),
        )
        .arg(
            Arg::new("tokens")
                .long("tokens")
                .help("Print the token tree as JSON instead of formatting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("escape")
                .long("escape")
                .help("Escape the input so it prints literally")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["strip", "tokens"]),
        )
        .arg(
            Arg::new("strip")
                .long("strip")
                .help("Remove tags, styles and hyperlinks from the input")
                .action(ArgAction::SetTrue)
                .conflicts_with("tokens"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .get_matches();

    let input = read_input(matches.get_one::<String>("path").map(String::as_str));

    if matches.get_flag("escape") {
        print!("{}", escape(&input));
        return;
    }
    if matches.get_flag("strip") {
        print!("{}", remove_decoration(&input));
        return;
    }

    let config = load_config(&matches);
    if matches.get_flag("tokens") {
        handle_tokens_command(&input, &config);
    } else {
        let mode = matches
            .get_one::<String>("mode")
            .map(String::as_str)
            .unwrap_or("normal");
        handle_format_command(&input, &config, mode);
    }
}

fn read_input(path: Option<&str>) -> String {
    match path {
        None | Some("-") => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .unwrap_or_else(|e| {
                    eprintln!("Error reading stdin: {}", e);
                    std::process::exit(1);
                });
            input
        }
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }),
    }
}

fn load_config(matches: &ArgMatches) -> TagfmtConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    let mut overrides: Vec<(&str, config::ValueKind)> = Vec::new();
    if matches.get_flag("decorated") {
        overrides.push(("formatter.decorated", true.into()));
    }
    if matches.get_flag("plain") {
        overrides.push(("formatter.decorated", false.into()));
    }
    if let Some(width) = matches.get_one::<usize>("width") {
        overrides.push(("wrap.width", (*width as i64).into()));
    }
    for (key, value) in overrides {
        loader = loader.set_override(key, value).unwrap_or_else(|e| {
            eprintln!("Invalid option {}: {}", key, e);
            std::process::exit(1);
        });
    }
    loader.build().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    })
}

/// Handle the --tokens flag
fn handle_tokens_command(input: &str, config: &TagfmtConfig) {
    let tree = Lexer::with_limits(config.limits)
        .tokenize(input)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
    match serde_json::to_string_pretty(&tree.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Format the input with the configured chain
fn handle_format_command(input: &str, config: &TagfmtConfig, mode: &str) {
    let mode: PrintMode = mode.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let result = OutputFormatter::from_config(config).and_then(|mut formatter| {
        formatter.visitor_mut::<PrintVisitor>()?.set_mode(mode);
        debug!(decorated = formatter.is_decorated(), %mode, "formatting");
        formatter.format(input)
    });
    match result {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
