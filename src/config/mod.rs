//! Pipeline configuration: the DSL parser and the routing table it builds.
//!
//! A configuration is a flat string such as
//! `log /api: header{x-env: dev} proxy{target: "http://localhost:9000"}`.
//! [`parse`] turns it into a [`RoutingTable`]; [`parse_args`] does the same
//! for command-line words, which are joined with single spaces first.

pub mod model;
pub mod parser;

pub use model::{RoutingTable, Settings, Step, ROOT_PATH};
pub use parser::Parser;

use crate::error::SyntaxError;

pub fn parse(input: &str) -> Result<RoutingTable, SyntaxError> {
    Parser::new(input).parse()
}

pub fn parse_args<I>(args: I) -> Result<RoutingTable, SyntaxError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let joined = args
        .into_iter()
        .map(|arg| arg.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(" ");
    parse(&joined)
}
