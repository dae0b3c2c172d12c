//! Command-line interface definitions using clap derive macros.
//!
//! Everything after the flags is the pipeline configuration; the words are
//! joined with single spaces before parsing. Flags have environment
//! variable equivalents for container deployments.

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "httpdebug",
    version,
    about = "HTTP server for debugging clients, proxies and load balancers",
    after_help = "\x1b[1mExamples:\x1b[0m\n  \
        httpdebug                                           Answer every request with \"ok\"\n  \
        httpdebug log info                                  Log requests, reply with request info\n  \
        httpdebug '/api/: log proxy{target: \"http://localhost:9000\"}'\n  \
        httpdebug --check '/: timeout static{code: 503}'   Validate without serving\n  \
        httpdebug --list                                    Show available components"
)]
pub struct Cli {
    /// Listen address
    #[arg(short, long, env = "ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,

    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    /// Max request body size in bytes
    #[arg(long, env = "MAX_BODY_SIZE", default_value_t = 10 * 1024 * 1024)]
    pub max_body: usize,

    /// Parse and resolve the configuration, print it and exit
    #[arg(long, conflicts_with = "list")]
    pub check: bool,

    /// Output format for --check
    #[arg(long, default_value = "text", requires = "check")]
    pub format: CheckFormat,

    /// List the available middlewares and handlers and exit
    #[arg(long)]
    pub list: bool,

    /// Pipeline configuration, e.g. `/api: log echo`
    #[arg(trailing_var_arg = true, value_name = "CONFIG")]
    pub config: Vec<String>,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum CheckFormat {
    Text,
    Json,
}
