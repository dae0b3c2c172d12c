//! `static`: a fixed response, `ok\n` with `200` unless configured.

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::config::Settings;
use crate::error::ComponentError;
use crate::pipeline::Handler;

pub const DEFAULT_BODY: &str = "ok\n";

pub fn factory(settings: &Settings) -> Result<Handler, ComponentError> {
    let body = Bytes::from(
        settings
            .get("body")
            .map_or(DEFAULT_BODY, String::as_str)
            .to_owned(),
    );
    let status = settings
        .get("code")
        .map_or(Ok(StatusCode::OK), |code| parse_status(code))?;

    Ok(Handler::new(move |_req| {
        let body = body.clone();
        async move {
            (
                status,
                [(CONTENT_TYPE, "text/plain; charset=utf-8")],
                body,
            )
                .into_response()
        }
    }))
}

fn parse_status(code: &str) -> Result<StatusCode, ComponentError> {
    let number = code
        .parse::<u16>()
        .map_err(|e| ComponentError::invalid("status code", code, e))?;
    StatusCode::from_u16(number).map_err(|e| ComponentError::invalid("status code", code, e))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::Request;

    use super::*;

    async fn respond(settings: &Settings) -> (StatusCode, Bytes) {
        let handler = factory(settings).unwrap();
        let resp = handler.call(Request::new(Body::empty())).await;
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn defaults_to_ok() {
        let (status, body) = respond(&Settings::new()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"ok\n");
    }

    #[tokio::test]
    async fn configured_body_and_code() {
        let settings = Settings::from([
            ("body".to_string(), "foo bar bla".to_string()),
            ("code".to_string(), "418".to_string()),
        ]);
        let (status, body) = respond(&settings).await;
        assert_eq!(status, StatusCode::IM_A_TEAPOT);
        assert_eq!(&body[..], b"foo bar bla");
    }

    #[test]
    fn invalid_code_is_rejected() {
        for code in ["abc", "99", "1000"] {
            let settings = Settings::from([("code".to_string(), code.to_string())]);
            let err = factory(&settings).unwrap_err();
            assert!(
                err.to_string().starts_with(&format!("invalid status code '{code}'")),
                "{err}"
            );
        }
    }
}
