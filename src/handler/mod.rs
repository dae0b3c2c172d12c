//! Built-in terminal handlers, addressable by name from the pipeline DSL.
//!
//! | Name | Settings | Response |
//! |------|----------|----------|
//! | `info` | – | JSON description of the request, host and bearer token |
//! | `static` | `body`, `code` | fixed body and status |
//! | `echo` | – | the request body |
//! | `proxy` | `target` | the upstream response |
//! | `hec` | – | empty; newline-delimited JSON events go to stdout |
//! | `data` | – | `?size=` bytes of filler |
//! | `fs` | `file` | the file's contents |

pub mod data;
pub mod echo;
pub mod fs;
pub mod hec;
pub mod info;
pub mod jwt;
pub mod static_response;

use crate::pipeline::registry::no_config;
use crate::pipeline::{Handler, Registry};
use crate::proxy;

#[must_use]
pub fn registry() -> Registry<Handler> {
    Registry::new()
        .with("info", info::factory)
        .with("static", static_response::factory)
        .with("echo", no_config(echo::handler()))
        .with("proxy", proxy::factory)
        .with("hec", no_config(hec::handler()))
        .with("data", no_config(data::handler()))
        .with("fs", fs::factory)
}
