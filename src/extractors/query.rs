//! Query parameter extraction and deserialization from URL query strings.
//!
//! Every handler in this repo takes its file name as `?file=<name>`, so the only type
//! ever deserialized through here is [`FileQuery`][crate::handlers::FileQuery], but the
//! extractor itself stays generic over any `DeserializeOwned` target.
//!
//! # Example
//!
//! ```rust
//! use tako::extractors::query::Query;
//! use tako::extractors::FromRequest;
//! use tako::types::Request;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct FileQuery {
//!     file: String,
//! }
//!
//! // For URL: /download?file=report.pdf
//! async fn download(mut req: Request) -> Result<String, Box<dyn std::error::Error>> {
//!     let query: Query<FileQuery> = Query::from_request(&mut req).await?;
//!     Ok(format!("fetching {}", query.0.file))
//! }
//! ```

use std::{collections::HashMap, future::ready};

use http::{StatusCode, request::Parts};
use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::{
    extractors::{FromRequest, FromRequestParts},
    responder::Responder,
    types::Request,
};

/// Query parameter extractor with automatic deserialization to typed structures.
///
/// `Query<T>` parses the request URI's query string and deserializes it into `T` via
/// serde. `T` must implement `DeserializeOwned`.
pub struct Query<T>(pub T);

/// Error types for query parameter extraction and deserialization.
#[derive(Debug)]
pub enum QueryError {
    /// No query string found in the request URI.
    MissingQueryString,
    /// Failed to parse query parameters from the query string.
    ParseError(String),
    /// Query parameter deserialization failed (type mismatch, missing field, etc.).
    DeserializationError(String),
}

impl Responder for QueryError {
    /// Converts query parameter errors into 400 Bad Request responses.
    fn into_response(self) -> crate::types::Response {
        match self {
            QueryError::MissingQueryString => (
                StatusCode::BAD_REQUEST,
                "No query string found in request URI",
            )
                .into_response(),
            QueryError::ParseError(err) => (
                StatusCode::BAD_REQUEST,
                format!("Failed to parse query parameters: {}", err),
            )
                .into_response(),
            QueryError::DeserializationError(err) => (
                StatusCode::BAD_REQUEST,
                format!("Failed to deserialize query parameters: {}", err),
            )
                .into_response(),
        }
    }
}

impl<T> Query<T>
where
    T: DeserializeOwned,
{
    /// Parses a URL-encoded query string into `T` via a JSON round-trip through a
    /// `HashMap<String, String>`.
    ///
    /// ```rust
    /// use tako::extractors::query::Query;
    /// use serde::Deserialize;
    ///
    /// #[derive(Debug, Deserialize)]
    /// struct FileQuery {
    ///     file: String,
    /// }
    ///
    /// let ok = Query::<FileQuery>::extract_from_query_string(Some("file=report.pdf"));
    /// let missing = Query::<FileQuery>::extract_from_query_string(None);
    ///
    /// assert!(ok.is_ok());
    /// assert!(missing.is_err());
    /// ```
    fn extract_from_query_string(query_string: Option<&str>) -> Result<Query<T>, QueryError> {
        let query = query_string.unwrap_or_default();

        let params: HashMap<String, String> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        let json_value =
            serde_json::to_value(params).map_err(|e| QueryError::ParseError(e.to_string()))?;

        let query_data = serde_json::from_value::<T>(json_value)
            .map_err(|e| QueryError::DeserializationError(e.to_string()))?;

        Ok(Query(query_data))
    }
}

impl<'a, T> FromRequest<'a> for Query<T>
where
    T: DeserializeOwned + Send + 'a,
{
    type Error = QueryError;

    fn from_request(
        req: &'a mut Request,
    ) -> impl core::future::Future<Output = core::result::Result<Self, Self::Error>> + Send + 'a
    {
        ready(Self::extract_from_query_string(req.uri().query()))
    }
}

impl<'a, T> FromRequestParts<'a> for Query<T>
where
    T: DeserializeOwned + Send + 'a,
{
    type Error = QueryError;

    /// Extracts query parameters from request parts, for handlers that don't need the
    /// body (this repo's handlers all use this form, since they're GET-only).
    fn from_request_parts(
        parts: &'a mut Parts,
    ) -> impl core::future::Future<Output = core::result::Result<Self, Self::Error>> + Send + 'a
    {
        ready(Self::extract_from_query_string(parts.uri.query()))
    }
}
