//! HTTP route definition: an exact method + path pair bound to a handler.
//!
//! The edge cache exposes a fixed, small endpoint set (`/download`, `/greet`,
//! `/flush`), so routes here match on exact path strings rather than a
//! pattern language with dynamic segments.

use http::Method;

use crate::handler::BoxHandler;

/// A single HTTP route: method, exact path, and the handler that serves it.
pub struct Route {
    pub path: String,
    pub method: Method,
    pub handler: BoxHandler,
}

impl Route {
    pub fn new(path: String, method: Method, handler: BoxHandler) -> Self {
        Self {
            path,
            method,
            handler,
        }
    }
}
