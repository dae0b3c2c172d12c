//! `req`: log the request line and headers before forwarding.

use axum::extract::Request;

use crate::inspect::dump_head;
use crate::pipeline::{Handler, Middleware};

#[must_use]
pub fn middleware() -> Middleware {
    Middleware::from_fn(|req: Request, next: Handler| async move {
        tracing::info!("request head\n{}", dump_head(&req));
        next.call(req).await
    })
}
