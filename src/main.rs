//! Purpose: `jsonwalk` CLI entry point: decode a JSON document and print it or parts of it.
//! Role: Binary crate root; parses args, streams input through the decoder, emits JSON on stdout.
//! Invariants: Stdout carries only decoded values (pretty or compact JSON).
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::fs::File;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value as JsonValue, json};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod render;

use jsonwalk::api::{Decoder, Error, ErrorKind, ReaderCursor, Value, to_exit_code};
use render::{Layout, render};

const LOG_ENV: &str = "JSONWALK_LOG";

#[derive(Parser)]
#[command(
    name = "jsonwalk",
    version,
    about = "Decode JSON documents and walk into them",
    long_about = None,
    after_help = r#"EXAMPLES
  $ jsonwalk article.json
  $ jsonwalk article.json -p /included/0/attributes/lastName
  $ cat events.jsonl | jsonwalk --all --compact
  $ echo '' | jsonwalk --tolerant      # no value: prints nothing, exits 0

Set JSONWALK_LOG=debug to trace decoding on stderr."#
)]
struct Cli {
    #[arg(
        help = "Input file (default: stdin; `-` also means stdin)",
        value_hint = ValueHint::FilePath
    )]
    input: Option<PathBuf>,
    #[arg(
        long = "pointer",
        short = 'p',
        value_name = "PTR",
        help = "Print only the value at this JSON pointer (repeatable)"
    )]
    pointers: Vec<String>,
    #[arg(long, help = "Treat input without a value as empty instead of an error")]
    tolerant: bool,
    #[arg(long, help = "Decode every whitespace-separated value in the input")]
    all: bool,
    #[arg(long, help = "Emit one value per line instead of pretty JSON")]
    compact: bool,
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics and pretty JSON output: auto|always|never"
    )]
    color: ColorMode,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                return Ok(RunOutcome::with_code(0));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Run `jsonwalk --help` for usage."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    init_tracing();
    let color_mode = cli.color;
    walk(&cli)
        .map(|()| RunOutcome::ok())
        .map_err(|err| (err, color_mode))
}

fn walk(cli: &Cli) -> Result<(), Error> {
    let reader = open_input(cli.input.as_ref())?;
    let mut decoder = Decoder::new(ReaderCursor::new(reader));
    let mut out = Emitter::new(cli);

    if cli.all {
        let mut count = 0usize;
        for value in decoder.values() {
            out.emit_selected(&value?, &cli.pointers)?;
            count += 1;
        }
        debug!(count, "decoded all values");
        if count == 0 && !cli.tolerant {
            return Err(Error::new(ErrorKind::IllegalValue)
                .with_message("input contains no JSON value")
                .with_offset(decoder.offset() as u64));
        }
        return Ok(());
    }

    let Some(value) = decoder.decode_value(cli.tolerant)? else {
        debug!("input holds no value; tolerant mode leaves output empty");
        return Ok(());
    };
    if !decoder.is_exhausted()? {
        warn!(
            offset = decoder.offset(),
            "ignoring content after the first value (use --all to decode it)"
        );
    }
    out.emit_selected(&value, &cli.pointers)
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn Read>, Error> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path).map_err(|err| {
                let kind = if err.kind() == io::ErrorKind::NotFound {
                    ErrorKind::NotFound
                } else {
                    ErrorKind::Io
                };
                Error::new(kind)
                    .with_message(format!("cannot open {}", path.display()))
                    .with_source(err)
            })?;
            Ok(Box::new(file))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

struct Emitter {
    compact: bool,
    use_color: bool,
}

impl Emitter {
    fn new(cli: &Cli) -> Self {
        Self {
            compact: cli.compact,
            use_color: cli.color.use_color(io::stdout().is_terminal()),
        }
    }

    fn emit_selected(&mut self, value: &Value, pointers: &[String]) -> Result<(), Error> {
        if pointers.is_empty() {
            return self.emit(value);
        }
        for pointer in pointers {
            let selected = value.pointer(pointer).ok_or_else(|| {
                Error::new(ErrorKind::NotFound)
                    .with_message(format!("no value at pointer {pointer:?}"))
                    .with_hint("Pointers look like /key/0/child; use ~1 for '/' and ~0 for '~'.")
            })?;
            self.emit(selected)?;
        }
        Ok(())
    }

    fn emit(&mut self, value: &Value) -> Result<(), Error> {
        let text = render(
            value,
            Layout {
                pretty: !self.compact,
                color: self.use_color && !self.compact,
            },
        );
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}").map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to write output")
                .with_source(err)
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .try_init();
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.trim_start_matches("error:").trim().to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Io\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::IllegalValue => "illegal JSON value".to_string(),
        ErrorKind::MissingMember => "missing member".to_string(),
        ErrorKind::UnclosedInstance => "unclosed instance".to_string(),
        ErrorKind::ExpectingSeparator => "expecting object separator".to_string(),
        ErrorKind::UnclosedString => "unclosed string".to_string(),
        ErrorKind::InvalidUnicodeEscape => "invalid unicode symbol".to_string(),
        ErrorKind::UnexpectedKeyword => "unexpected keyword".to_string(),
        ErrorKind::InvalidUtf8 => "invalid UTF-8".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    use std::error::Error as _;

    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> JsonValue {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(offset) = err.offset() {
        inner.insert("offset".to_string(), json!(offset));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), JsonValue::Object(inner));
    JsonValue::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = vec![format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    )];
    if let Some(offset) = err.offset() {
        lines.push(format!(
            "{} byte {offset}",
            colorize_label("at:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    lines.join("\n")
}
