//! `--list`: print the registered component names.

use crate::{handler, middleware};

pub fn execute() {
    println!("middlewares:");
    for name in middleware::registry().names() {
        println!("  {name}");
    }
    println!("handlers:");
    for name in handler::registry().names() {
        println!("  {name}");
    }
}
