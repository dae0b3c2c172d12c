//! `fs`: serve one file from disk, with a `Content-Type` guessed from its
//! extension.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::config::Settings;
use crate::error::ComponentError;
use crate::pipeline::Handler;

pub fn factory(settings: &Settings) -> Result<Handler, ComponentError> {
    let file = settings
        .get("file")
        .ok_or(ComponentError::MissingSetting { key: "file" })?;
    let file: Arc<Path> = Arc::from(PathBuf::from(file));

    Ok(Handler::new(move |_req| {
        let file = Arc::clone(&file);
        async move { serve_file(&file).await }
    }))
}

async fn serve_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(contents) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(CONTENT_TYPE, mime.to_string())], contents).into_response()
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "404 page not found\n").into_response()
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            (StatusCode::FORBIDDEN, "403 Forbidden\n").into_response()
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read file");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
