//! Core type aliases used throughout the HTTP layer.
//!
//! These standardize the request/response/error shapes so the router, handler
//! machinery, and extractors all agree on the same types.

use bytes::Bytes;
use http_body_util::combinators::UnsyncBoxBody;
use hyper::body::Incoming;

use crate::body::TakoBody;

/// HTTP request with a streaming Hyper body.
pub type Request = hyper::Request<Incoming>;

/// HTTP response using our body wrapper.
pub type Response = hyper::Response<TakoBody>;

pub(crate) type BoxBody = UnsyncBoxBody<Bytes, BoxError>;

/// Boxed error type for thread-safe, dynamically-dispatched error propagation.
pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;
