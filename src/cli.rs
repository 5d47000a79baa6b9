//! Command-line interface for session-bridge.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::net::IpAddr;
use std::path::PathBuf;

/// Command-line arguments.
///
/// Every override is optional so unset flags leave the config file and
/// environment values in effect.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Host address to bind to.
    pub host: Option<IpAddr>,
    /// Port to listen on.
    pub port: Option<u16>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Session name (also the cookie name).
    pub session_name: Option<String>,
    /// Seconds a stored record stays valid after its last commit.
    pub max_lifetime_secs: Option<u64>,
    /// Seconds between background garbage-collection passes.
    pub gc_interval_secs: Option<u64>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('H') | Long("host") => {
                let value: String = parser.value()?.parse()?;
                result.host = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("host", value))?,
                );
            }
            Short('p') | Long("port") => {
                let value: String = parser.value()?.parse()?;
                result.port = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("port", value))?,
                );
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('n') | Long("session-name") => {
                result.session_name = Some(parser.value()?.parse()?);
            }
            Long("max-lifetime") => {
                let value: String = parser.value()?.parse()?;
                result.max_lifetime_secs = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("max-lifetime", value))?,
                );
            }
            Long("gc-interval") => {
                let value: String = parser.value()?.parse()?;
                result.gc_interval_secs = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("gc-interval", value))?,
                );
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"session-bridge {version}
Session lifecycle facade with an HTTP verification surface

USAGE:
    session-bridge [OPTIONS]

OPTIONS:
    -H, --host <ADDR>          Host address to bind [default: 127.0.0.1]
    -p, --port <PORT>          Port to listen on [default: 8080]
    -c, --config <FILE>        Path to configuration file (JSON)
    -n, --session-name <NAME>  Session name / cookie name [default: SBSESSID]
        --max-lifetime <SECS>  Record lifetime before GC [default: 1440]
        --gc-interval <SECS>   Background GC period [default: 60]
    -l, --log-level <LVL>      Log level (error, warn, info, debug, trace)
    -h, --help                 Print help
    -V, --version              Print version

ENVIRONMENT VARIABLES:
    SESSION_BRIDGE_HOST               Host address (overrides config)
    SESSION_BRIDGE_PORT               Port number (overrides config)
    SESSION_BRIDGE_SESSION_NAME       Session name (overrides config)
    SESSION_BRIDGE_MAX_LIFETIME_SECS  Record lifetime (overrides config)
    SESSION_BRIDGE_LOG_LEVEL          Log level (overrides config)
    RUST_LOG                          Alternative log level setting

EXAMPLES:
    # Start with defaults (localhost:8080)
    session-bridge

    # Start on all interfaces with a custom cookie name
    session-bridge -H 0.0.0.0 -p 9090 -n APPSID

    # Start with config file
    session-bridge -c /etc/session-bridge/config.json

    # Aggressive garbage collection for testing
    session-bridge --max-lifetime 5 --gc-interval 1
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("session-bridge {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
