use std::{env, iter::Peekable, path::PathBuf, thread};

use log::LevelFilter;
use tsp_ls_derive::KvDisplay;

use crate::{Error, Result};

const THREAD_FALLBACK_PARALLELISM: usize = 2;
const THREAD_MIN_PARALLELISM: usize = 2;
const THREAD_RESERVED_CORES: usize = 1;

/// Runtime options for the solver binary.
#[derive(Clone, Debug, KvDisplay)]
pub struct SolverOptions {
    /// Requested worker count; clamped to the node count by the search.
    pub threads: usize,
    /// Node id the emitted tour starts at.
    pub start: usize,
    /// Print node ids instead of point coordinates.
    pub emit_ids: bool,
    /// Structured logging level.
    pub log_level: LogLevel,
    /// Logging output format.
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    pub log_output: String,
    /// Optional input file path for points. Empty means stdin.
    pub input: String,
    /// Optional output file path for the ordered route. Empty means stdout.
    pub output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            "off" => Ok(Self::Off),
            _ => Err(Error::input(format!(
                "Invalid value for --log-level: {raw} (expected error/warn/info/debug/trace/off)"
            ))),
        }
    }

    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
            Self::Off => "off",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            _ => Err(Error::input(format!(
                "Invalid value for --log-format: {raw} (expected compact/pretty)"
            ))),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Pretty => write!(f, "pretty"),
        }
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            start: 0,
            emit_ids: false,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            output: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        let cli_args: Vec<String> = env::args().skip(1).collect();
        Self::parse_from_iter(cli_args)
    }

    fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = split_arg(raw_name, &mut args);

            match name.as_str() {
                "threads" => options.threads = parse_usize(&name, required(&name, value)?)?,
                "start" => options.start = parse_usize(&name, required(&name, value)?)?,
                "log-level" => options.log_level = LogLevel::parse(&required(&name, value)?)?,
                "log-format" => options.log_format = LogFormat::parse(&required(&name, value)?)?,
                "log-output" => options.log_output = required(&name, value)?,
                "input" => options.input = required(&name, value)?,
                "output" => options.output = required(&name, value)?,
                "emit-ids" => {
                    options.emit_ids = match value {
                        Some(v) => parse_bool(&name, &v)?,
                        None => true,
                    };
                }
                "no-emit-ids" => {
                    reject_value(&name, value)?;
                    options.emit_ids = false;
                }
                "log-timestamp" => {
                    options.log_timestamp = match value {
                        Some(v) => parse_bool(&name, &v)?,
                        None => true,
                    };
                }
                "no-log-timestamp" => {
                    reject_value(&name, value)?;
                    options.log_timestamp = false;
                }
                _ => {
                    return Err(Error::input(format!(
                        "Unknown option: --{name}\n\n{}",
                        Self::usage()
                    )));
                }
            }
        }

        if options.threads == 0 {
            return Err(Error::input("--threads must be at least 1"));
        }

        Ok(options)
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  tsp-ls [options] [--input points.txt]\n",
            "  tsp-ls [options] < points.txt\n\n",
            "Options:\n",
            "  --threads <usize>\n",
            "  --start <node id>\n",
            "  --emit-ids[=<bool>]\n",
            "  --no-emit-ids\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --input <path>\n",
            "  --output <path>\n",
            "  --help\n",
            "\n",
            "Examples:\n",
            "  tsp-ls --threads 8 --log-level info < points.txt\n",
            "  tsp-ls --input points.txt --output route.txt\n",
            "  tsp-ls --emit-ids --start 5 --log-level=debug < points.txt\n",
        )
    }

    pub fn log_output_path(&self) -> Option<PathBuf> {
        check_path(&self.log_output)
    }

    pub fn input_path(&self) -> Option<PathBuf> {
        check_path(&self.input)
    }

    pub fn output_path(&self) -> Option<PathBuf> {
        check_path(&self.output)
    }
}

/// Worker count to use when none is requested: all cores but one.
fn default_threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(THREAD_FALLBACK_PARALLELISM)
        .max(THREAD_MIN_PARALLELISM)
        - THREAD_RESERVED_CORES
}

fn split_arg<I>(raw_name: &str, args: &mut Peekable<I>) -> (String, Option<String>)
where
    I: Iterator<Item = String>,
{
    if let Some((name, value)) = raw_name.split_once('=') {
        return (name.to_owned(), Some(value.to_owned()));
    }
    let value = match args.peek() {
        Some(next) if !next.starts_with("--") => args.next(),
        _ => None,
    };
    (raw_name.to_owned(), value)
}

fn required(name: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| Error::input(format!("Missing value for --{name}")))
}

fn reject_value(name: &str, value: Option<String>) -> Result<()> {
    if value.is_some() {
        return Err(Error::input(format!(
            "Flag --{name} does not take a value"
        )));
    }
    Ok(())
}

fn parse_usize(name: &str, value: String) -> Result<usize> {
    value
        .parse()
        .map_err(|_| Error::input(format!("Invalid value for --{name}: {value}")))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "on" | "ON" => Ok(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "off" | "OFF" => Ok(false),
        _ => Err(Error::input(format!(
            "Invalid boolean for --{name}: {value} (expected true/false)"
        ))),
    }
}

fn check_path(path_str: &str) -> Option<PathBuf> {
    let path_str = path_str.trim();
    if path_str.is_empty() || path_str == "-" {
        None
    } else {
        std::path::absolute(path_str).ok()
    }
}
