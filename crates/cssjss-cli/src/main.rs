mod logging;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cssjss_codegen::ConvertOptions;
use cssjss_parser::{ParseError, ParseOptions};
use tracing::{debug, info};

/// Path argument that means standard input.
const STDIN: &str = "-";

#[derive(Debug, Parser)]
#[command(name = "cssjss")]
#[command(about = "Convert between CSS and JSS style objects")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a CSS file to a makeStyles module
    ToJss {
        /// Input .css file, or `-` for stdin
        path: String,

        /// Unit to strip from single numeric values, e.g. `px`
        #[arg(long)]
        unit: Option<String>,

        /// Keep property names as written instead of camelCasing them
        #[arg(long)]
        dashes: bool,

        /// Convert what parses and report syntax errors as warnings
        #[arg(long)]
        lenient: bool,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a JSON style object to CSS
    ToCss {
        /// Input .json file, or `-` for stdin
        path: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report every syntax error in a CSS file
    Check {
        /// Input .css file, or `-` for stdin
        path: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run a subcommand. `Ok(false)` means the input had problems.
fn run(command: Command) -> Result<bool> {
    match command {
        Command::ToJss {
            path,
            unit,
            dashes,
            lenient,
            output,
        } => {
            let mut options = ConvertOptions::new().dashes(dashes).with_parse_options(
                ParseOptions::new()
                    .with_source(source_name(&path))
                    .silent(lenient),
            );
            if let Some(unit) = unit {
                options = options.with_unit(unit);
            }
            cmd_to_jss(&path, &options, output.as_deref())?;
            Ok(true)
        }
        Command::ToCss { path, output } => {
            cmd_to_css(&path, output.as_deref())?;
            Ok(true)
        }
        Command::Check { path } => cmd_check(&path),
    }
}

fn cmd_to_jss(path: &str, options: &ConvertOptions, output: Option<&Path>) -> Result<()> {
    let source = read_source(path)?;
    let module = cssjss_codegen::css_to_jss(&source, options)
        .with_context(|| format!("failed to convert {}", source_name(path)))?;
    write_output(output, &module)
}

fn cmd_to_css(path: &str, output: Option<&Path>) -> Result<()> {
    let source = read_source(path)?;
    let css = cssjss_codegen::json_to_css(&source)
        .with_context(|| format!("failed to convert {}", source_name(path)))?;
    write_output(output, &css)
}

fn cmd_check(path: &str) -> Result<bool> {
    let source = read_source(path)?;
    let name = source_name(path);
    let errors = check_source(&source, &name);

    for error in &errors {
        eprintln!("{}", format_error(&name, error));
    }
    if errors.is_empty() {
        eprintln!("OK: {name}");
    }
    Ok(errors.is_empty())
}

/// Parse leniently and return every syntax error found.
fn check_source(source: &str, name: &str) -> Vec<ParseError> {
    let options = ParseOptions::new().with_source(name).silent(true);
    match cssjss_parser::Parser::parse_with(source, &options) {
        Ok(sheet) => {
            debug!(rules = sheet.rules.len(), "parsed stylesheet");
            sheet.parsing_errors
        }
        Err(error) => vec![error],
    }
}

/// `path:line:column: message`
fn format_error(name: &str, error: &ParseError) -> String {
    format!("{name}:{}:{}: {}", error.line, error.column, error.message)
}

fn source_name(path: &str) -> String {
    if path == STDIN {
        "<stdin>".to_string()
    } else {
        path.to_string()
    }
}

fn read_source(path: &str) -> Result<String> {
    if path == STDIN {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(file) => {
            std::fs::write(file, text)
                .with_context(|| format!("failed to write {}", file.display()))?;
            info!(path = %file.display(), "wrote output");
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write stdout")
        }
    }
}
