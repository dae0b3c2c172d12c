//! Unverified decoding of bearer tokens for the `info` handler.
//!
//! The signature is never checked; the point is to show what a client
//! sent. A token that is present but undecodable is reported through
//! [`Jwt::error`] instead of being dropped.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("{0}")]
    Base64(#[from] base64::DecodeError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize)]
pub struct Jwt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Map<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<Map<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Decode the token in `Authorization: <scheme> <header>.<claims>.<sig>`.
///
/// Returns `None` when there is no header or it does not look like a JWT.
#[must_use]
pub fn read_jwt(headers: &HeaderMap) -> Option<Jwt> {
    let authorization = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (_scheme, token) = authorization.split_once(' ')?;

    let mut parts = token.splitn(3, '.');
    let (Some(header), Some(claims), Some(_signature)) = (parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    Some(decode(header, claims).unwrap_or_else(|e| Jwt {
        error: Some(e.to_string()),
        ..Jwt::default()
    }))
}

fn decode(header: &str, claims: &str) -> Result<Jwt, JwtError> {
    let header = decode_segment(header)?;
    let claims = decode_segment(claims)?;

    Ok(Jwt {
        expiry: timestamp(&claims, "exp"),
        issued_at: timestamp(&claims, "iat"),
        header: Some(header),
        claims: Some(claims),
        error: None,
    })
}

fn decode_segment(segment: &str) -> Result<Map<String, Value>, JwtError> {
    let raw = URL_SAFE_NO_PAD.decode(segment)?;
    Ok(serde_json::from_slice(&raw)?)
}

#[allow(clippy::cast_possible_truncation)]
fn timestamp(claims: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    let seconds = claims.get(key)?.as_f64()?;
    DateTime::from_timestamp(seconds as i64, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json)
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
        headers
    }

    #[test]
    fn decodes_header_claims_and_times() {
        let token = format!(
            "{}.{}.sig",
            encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            encode(r#"{"sub":"42","exp":1700000000,"iat":1600000000}"#)
        );

        let jwt = read_jwt(&bearer(&token)).unwrap();

        assert!(jwt.error.is_none());
        assert_eq!(jwt.header.unwrap()["alg"], "HS256");
        assert_eq!(jwt.claims.unwrap()["sub"], "42");
        assert_eq!(jwt.expiry.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(jwt.issued_at.unwrap().timestamp(), 1_600_000_000);
    }

    #[test]
    fn missing_or_malformed_header_yields_none() {
        assert!(read_jwt(&HeaderMap::new()).is_none());
        assert!(read_jwt(&bearer("no-dots")).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "justonetoken".parse().unwrap());
        assert!(read_jwt(&headers).is_none());
    }

    #[test]
    fn undecodable_token_reports_error() {
        let jwt = read_jwt(&bearer("!!!.???.sig")).unwrap();
        assert!(jwt.error.is_some());
        assert!(jwt.claims.is_none());
    }
}
