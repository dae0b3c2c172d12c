//! `header` and `header-out`: add fixed headers to the request or the
//! response. Every setting becomes one header; names and values are
//! validated when the pipeline is built.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::config::Settings;
use crate::error::ComponentError;
use crate::pipeline::{Handler, Middleware};

fn parse_headers(settings: &Settings) -> Result<HeaderMap, ComponentError> {
    let mut headers = HeaderMap::with_capacity(settings.len());
    for (key, value) in settings {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| ComponentError::invalid("header name", key, e))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ComponentError::invalid("header value", value, e))?;
        headers.append(name, value);
    }
    Ok(headers)
}

pub fn request_headers(settings: &Settings) -> Result<Middleware, ComponentError> {
    let headers = parse_headers(settings)?;
    Ok(Middleware::from_fn(move |mut req: Request, next: Handler| {
        for (name, value) in &headers {
            req.headers_mut().append(name, value.clone());
        }
        next.call(req)
    }))
}

pub fn response_headers(settings: &Settings) -> Result<Middleware, ComponentError> {
    let headers = parse_headers(settings)?;
    Ok(Middleware::from_fn(move |req: Request, next: Handler| {
        let headers = headers.clone();
        async move {
            let mut resp = next.call(req).await;
            for (name, value) in &headers {
                resp.headers_mut().append(name, value.clone());
            }
            resp
        }
    }))
}
