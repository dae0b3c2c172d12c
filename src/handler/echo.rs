//! `echo`: stream the request body straight back.

use axum::extract::Request;
use axum::response::Response;

use crate::pipeline::Handler;

#[must_use]
pub fn handler() -> Handler {
    Handler::new(|req: Request| async move { Response::new(req.into_body()) })
}
