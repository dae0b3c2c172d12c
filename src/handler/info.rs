//! `info`: describe the request as JSON.
//!
//! The payload carries the server's hostname, the request line and
//! headers, the peer address and any bearer token decoded by
//! [`read_jwt`].

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::header::HOST;
use axum::Json;
use axum::response::IntoResponse;
use serde::Serialize;

use super::jwt::{read_jwt, Jwt};
use crate::config::Settings;
use crate::error::ComponentError;
use crate::inspect::{header_lists, remote_addr};
use crate::pipeline::Handler;

#[derive(Debug, Serialize)]
pub struct Info {
    pub hostname: String,
    pub request: RequestInfo,
    pub jwt: Option<Jwt>,
}

#[derive(Debug, Serialize)]
pub struct RequestInfo {
    pub method: String,
    pub host: String,
    pub uri: String,
    pub protocol: String,
    pub header: BTreeMap<String, Vec<String>>,
    pub remote_addr: String,
}

impl RequestInfo {
    #[must_use]
    pub fn from_request(req: &Request) -> Self {
        let host = req
            .headers()
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .or_else(|| req.uri().authority().map(ToString::to_string))
            .unwrap_or_default();

        Self {
            method: req.method().to_string(),
            host,
            uri: req.uri().to_string(),
            protocol: format!("{:?}", req.version()),
            header: header_lists(req.headers()),
            remote_addr: remote_addr(req).map(|a| a.to_string()).unwrap_or_default(),
        }
    }
}

/// Hostname is looked up once, when the pipeline is built.
pub fn factory(_settings: &Settings) -> Result<Handler, ComponentError> {
    let hostname: Arc<str> = Arc::from(hostname());

    Ok(Handler::new(move |req: Request| {
        let info = Info {
            hostname: hostname.to_string(),
            request: RequestInfo::from_request(&req),
            jwt: read_jwt(req.headers()),
        };
        async move { Json(info).into_response() }
    }))
}

fn hostname() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.is_empty())
        .or_else(|| {
            std::fs::read_to_string("/etc/hostname")
                .ok()
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
        })
        .unwrap_or_default()
}
