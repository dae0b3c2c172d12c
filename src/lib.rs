//! httpdebug is an HTTP server for debugging clients, proxies and load
//! balancers.
//!
//! Its behaviour is described by a small configuration language given on
//! the command line: per path prefix, an ordered list of middlewares ending
//! in one handler, each with optional `{key: value}` settings.
//!
//! ```text
//! httpdebug log /api/: header-out{x-env: dev} proxy{target: "http://localhost:9000"}
//! ```
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Mode dispatch and execution (run, check, list).
//! - [`config`] -- The configuration parser and the routing table it produces.
//! - [`pipeline`] -- Handler/middleware composition, registries, resolution
//!   and the path dispatcher.
//! - [`middleware`] -- Built-in middlewares.
//! - [`handler`] -- Built-in handlers.
//! - [`proxy`] -- The `proxy` handler and its header rewriting.
//! - [`inspect`] -- Request helpers shared by components.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`server`] -- Axum router, outbound HTTP client and graceful shutdown.

// Public functions are consumed by the binary and integration tests only.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod handler;
pub mod inspect;
pub mod logging;
pub mod middleware;
pub mod pipeline;
pub mod proxy;
pub mod server;
