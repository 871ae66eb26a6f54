//! The three HTTP endpoints the edge cache exposes.

use http::StatusCode;
use serde::Deserialize;

use crate::body::TakoBody;
use crate::error::FetchError;
use crate::extractors::query::Query;
use crate::extractors::state::State;
use crate::responder::Responder;
use crate::types::Response;

const NOT_FOUND_MESSAGE: &str = "您请求的数据服务器中不存在，请联系管理员";

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    file: String,
}

/// `GET /download?file=<name>` — serves the file's bytes with a Content-Type derived
/// from the configured suffix map.
///
/// The NotFound case responds with HTTP 200 and a plain-text message rather than a
/// proper 404. That is a legacy quirk of the system this replaces, preserved here
/// rather than "fixed", since changing client-visible status codes is outside what a
/// cache layer should decide on its own.
pub async fn download(State(app): State, Query(q): Query<FileQuery>) -> impl Responder {
    let key = app.file_key(&q.file);
    let path = app.disk_path(&q.file);

    match app.coordinator.fetch(&key, &path).await {
        Ok((bytes, _source)) => {
            let mime = app.mime_for(&q.file);
            build_response(StatusCode::OK, &mime, bytes.to_vec())
        }
        Err(FetchError::NotFoundOrigin) => {
            build_response(StatusCode::OK, "text/plain; charset=utf-8", NOT_FOUND_MESSAGE.as_bytes().to_vec())
        }
        Err(FetchError::Io(msg)) => {
            app.logger
                .error_line(&format!("download {} failed: {msg}", q.file))
                .await;
            build_response(StatusCode::INTERNAL_SERVER_ERROR, "text/plain", b"internal error".to_vec())
        }
    }
}

/// `GET /greet?file=<name>` — echoes the requested file name back. A holdover
/// diagnostic endpoint from the original system, kept as-is.
pub async fn greet(Query(q): Query<FileQuery>) -> impl Responder {
    q.file
}

/// `GET /flush?file=<name>` — returns the MIME type that would be used for this file
/// name, without touching the cache. Useful for checking the suffix map without
/// triggering a fetch.
pub async fn flush(State(app): State, Query(q): Query<FileQuery>) -> impl Responder {
    app.mime_for(&q.file)
}

fn build_response(status: StatusCode, content_type: &str, body: Vec<u8>) -> Response {
    hyper::Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, content_type)
        .body(TakoBody::from(body))
        .expect("building response with valid header value")
}
