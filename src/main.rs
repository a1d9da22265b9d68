mod debug_report;

use chronos::{Context, ParseOptions, parse_date_with};
use chrono::{DateTime, Utc};
use debug_report::ReportOptions;
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

const DEFAULT_REFERENCE: &str = "2013-02-12T04:30:00Z";

fn main() {
    init_tracing();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let context = Context { reference_time: config.reference_time };
    let options = ParseOptions {
        formats: (!config.formats.is_empty()).then_some(config.formats),
        locale: config.locale,
        strict: config.strict,
        utc: config.utc,
    };
    let value = parse_date_with(config.input.trim(), &context, &options);
    let report = ReportOptions { output: config.output, calendar: config.calendar, color: config.color };
    debug_report::print_report(&config.input, &value, &context, &report);

    if !value.is_valid() {
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr, filtered by `CHRONOS_LOG` (e.g.
/// `CHRONOS_LOG=chronos=debug`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CHRONOS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

struct CliConfig {
    input: String,
    formats: Vec<String>,
    output: Option<String>,
    locale: Option<String>,
    strict: bool,
    utc: bool,
    reference_time: DateTime<Utc>,
    calendar: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut formats = Vec::new();
    let mut output = None;
    let mut locale = None;
    let mut strict = false;
    let mut utc = false;
    let mut reference_time = parse_reference(DEFAULT_REFERENCE)?;
    let mut calendar = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    let value_of = |name: &str, value: Option<String>| value.ok_or_else(|| format!("error: {name} expects a value"));

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("chronos {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--strict" => strict = true,
            "--utc" => utc = true,
            "--calendar" => calendar = true,
            "-f" | "--format" => formats.push(value_of("--format", args.next())?),
            "-o" | "--output" => output = Some(value_of("--output", args.next())?),
            "-l" | "--locale" => locale = Some(value_of("--locale", args.next())?),
            "--reference" => reference_time = parse_reference(&value_of("--reference", args.next())?)?,
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--format=") => formats.push(arg.trim_start_matches("--format=").to_string()),
            _ if arg.starts_with("--output=") => output = Some(arg.trim_start_matches("--output=").to_string()),
            _ if arg.starts_with("--locale=") => locale = Some(arg.trim_start_matches("--locale=").to_string()),
            _ if arg.starts_with("--reference=") => {
                reference_time = parse_reference(arg.trim_start_matches("--reference="))?;
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    if let Some(id) = &locale {
        if chronos::get_locale(id).is_none() {
            let known = chronos::list_locales().join(", ");
            return Err(format!("error: unknown locale '{id}' (known: {known})"));
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, formats, output, locale, strict, utc, reference_time, calendar, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

/// Any ISO 8601 instant; without an offset it is read as UTC.
fn parse_reference(value: &str) -> Result<DateTime<Utc>, String> {
    let options = ParseOptions { utc: true, ..ParseOptions::default() };
    let parsed = parse_date_with(value, &Context { reference_time: Utc::now() }, &options);
    let is_iso = parsed.is_valid() && parsed.parsing_flags().contains(chronos::ParseFlag::ISO);
    match parsed.instant() {
        Some(instant) if is_iso => Ok(instant),
        _ => Err(format!("error: invalid --reference '{value}' (expected ISO 8601, e.g. {DEFAULT_REFERENCE})")),
    }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "chronos {version}

Parse a date with the chronos engine and print what it made of it.

Usage:
  chronos [OPTIONS] [--] <input...>

Options:
  -f, --format <pattern>     Pattern to parse with (repeat to give candidates).
                             Without one, ISO 8601, RFC 2822 and the locale's
                             own formats are tried.
  -o, --output <pattern>     Also render the result with this pattern.
  -l, --locale <id>          Locale for parsing and output (default: en).
  --strict                   Require the input to match the pattern exactly.
  --utc                      Read and show the value in UTC.
  --reference <timestamp>    Reference time (ISO 8601) for defaults and
                             relative phrases. Default: {default_reference}
  --calendar                 Print the month grid around the value.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  CHRONOS_LOG                Log filter for diagnostics on stderr
                             (e.g. chronos=debug).

Exit codes:
  0  The input parsed to a valid date.
  1  The input did not parse to a valid date.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        default_reference = DEFAULT_REFERENCE
    )
}
