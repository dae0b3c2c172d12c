//! Request pipelines built from a [`RoutingTable`](crate::config::RoutingTable).
//!
//! A [`Handler`] turns a request into a response. A [`Middleware`] wraps a
//! handler into a new one and decides whether, and when, the wrapped
//! handler runs. [`chain`] folds an ordered middleware list around a
//! terminal handler so that the first middleware declared is the first to
//! see the request. Submodules resolve step names against registries
//! ([`registry`], [`build`]) and route requests by path ([`dispatch`]).

pub mod build;
pub mod dispatch;
pub mod registry;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::Response;

pub use build::{build_service, default_pipeline, resolve_path};
pub use dispatch::PathDispatcher;
pub use registry::Registry;

pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Cheaply cloneable async request handler, safe to call from many tasks.
#[derive(Clone)]
pub struct Handler {
    inner: Arc<dyn Fn(Request) -> BoxFuture + Send + Sync>,
}

impl Handler {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |req: Request| -> BoxFuture { Box::pin(f(req)) }),
        }
    }

    pub fn call(&self, req: Request) -> BoxFuture {
        (self.inner)(req)
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct Middleware {
    inner: Arc<dyn Fn(Handler) -> Handler + Send + Sync>,
}

impl Middleware {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Handler) -> Handler + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Build a middleware from an async function that receives the request
    /// and the next handler.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Request, Handler) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self::new(move |next: Handler| {
            let f = f.clone();
            Handler::new(move |req| f(req, next.clone()))
        })
    }

    #[must_use]
    pub fn wrap(&self, next: Handler) -> Handler {
        (self.inner)(next)
    }
}

impl std::fmt::Debug for Middleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Middleware").finish_non_exhaustive()
    }
}

/// Compose `[m0, m1, .., mk]` around `handler` as `m0(m1(..mk(handler)))`.
///
/// An empty middleware list returns `handler` unchanged.
#[must_use]
pub fn chain(middlewares: Vec<Middleware>, handler: Handler) -> Handler {
    middlewares
        .into_iter()
        .rev()
        .fold(handler, |next, middleware| middleware.wrap(next))
}
