//! HTTP request routing and dispatch.
//!
//! A minimal router over exact (method, path) pairs. The original framework's
//! router supported dynamic segments, middleware chains, and plugins; the edge
//! cache needs none of that, so dispatch here is a linear scan over a short,
//! fixed route table guarded by a single lock.
//!
//! # Examples
//!
//! ```rust
//! use tako::{router::Router, Method, responder::Responder, types::Request};
//!
//! async fn hello(_req: Request) -> impl Responder {
//!     "Hello, World!"
//! }
//!
//! let mut router = Router::new();
//! router.route(Method::GET, "/", hello);
//! ```

use std::sync::RwLock;

use http::StatusCode;
use hyper::Method;

use crate::{
    body::TakoBody,
    handler::{BoxHandler, Handler},
    route::Route,
    types::{Request, Response},
};

/// HTTP router for managing routes and request dispatching.
pub struct Router {
    routes: RwLock<Vec<Route>>,
}

impl Router {
    /// Creates a new, empty router.
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(Vec::new()),
        }
    }

    /// Registers a new route with the router.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tako::{router::Router, Method, responder::Responder, types::Request};
    ///
    /// async fn get_health(_req: Request) -> impl Responder {
    ///     "ok"
    /// }
    ///
    /// let mut router = Router::new();
    /// router.route(Method::GET, "/health", get_health);
    /// ```
    pub fn route<H, T>(&mut self, method: Method, path: &str, handler: H)
    where
        H: Handler<T> + Clone + 'static,
    {
        let route = Route::new(path.to_owned(), method, BoxHandler::new(handler));
        self.routes.write().unwrap().push(route);
    }

    /// Dispatches an incoming request to the matching route, or 404.
    pub async fn dispatch(&self, req: Request) -> Response {
        let method = req.method().clone();
        let path = req.uri().path().to_owned();

        let handler = {
            let routes = self.routes.read().unwrap();
            routes
                .iter()
                .find(|r| r.method == method && r.path == path)
                .map(|r| r.handler.clone())
        };

        match handler {
            Some(handler) => handler.call(req).await,
            None => hyper::Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(TakoBody::empty())
                .unwrap(),
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
