//! `data`: stream `?size=` bytes of `A` without buffering them.

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use hyper::body::{Frame, SizeHint};

use crate::inspect::query_param;
use crate::pipeline::Handler;

const CHUNK_SIZE: usize = 16 * 1024;
static FILLER: [u8; CHUNK_SIZE] = [b'A'; CHUNK_SIZE];

/// Body yielding a fixed number of filler bytes in static chunks.
#[derive(Debug)]
pub struct FillerBody {
    remaining: u64,
}

impl FillerBody {
    #[must_use]
    pub const fn new(len: u64) -> Self {
        Self { remaining: len }
    }
}

impl hyper::body::Body for FillerBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        if self.remaining == 0 {
            return Poll::Ready(None);
        }
        let len = usize::try_from(self.remaining).map_or(CHUNK_SIZE, |r| r.min(CHUNK_SIZE));
        self.remaining -= len as u64;
        Poll::Ready(Some(Ok(Frame::data(Bytes::from_static(&FILLER[..len])))))
    }

    fn is_end_stream(&self) -> bool {
        self.remaining == 0
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.remaining)
    }
}

#[must_use]
pub fn handler() -> Handler {
    Handler::new(|req: Request| async move {
        let size = match query_param(req.uri(), "size") {
            None => 0,
            Some(raw) => match raw.parse::<u64>() {
                Ok(size) => size,
                Err(e) => {
                    return (StatusCode::BAD_REQUEST, format!("invalid size: {e}\n"))
                        .into_response()
                }
            },
        };

        let mut resp = Response::new(Body::new(FillerBody::new(size)));
        resp.headers_mut().insert(
            CONTENT_TYPE,
            axum::http::HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        resp
    })
}
