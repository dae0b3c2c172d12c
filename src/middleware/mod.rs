//! Built-in middlewares, addressable by name from the pipeline DSL.
//!
//! | Name | Settings | Effect |
//! |------|----------|--------|
//! | `timeout` | – | sleeps for `?duration=` before forwarding |
//! | `req` | – | logs the request line and headers |
//! | `log` | – | logs one access line per request |
//! | `json` | – | pretty-prints small JSON request bodies to stdout |
//! | `header` | any | adds every setting as a request header |
//! | `header-out` | any | adds every setting as a response header |

pub mod access_log;
pub mod dump;
pub mod headers;
pub mod json;
pub mod timeout;

use crate::pipeline::registry::no_config;
use crate::pipeline::{Middleware, Registry};

#[must_use]
pub fn registry() -> Registry<Middleware> {
    Registry::new()
        .with("timeout", no_config(timeout::middleware()))
        .with("req", no_config(dump::middleware()))
        .with("log", no_config(access_log::middleware()))
        .with("json", no_config(json::middleware()))
        .with("header", headers::request_headers)
        .with("header-out", headers::response_headers)
}
