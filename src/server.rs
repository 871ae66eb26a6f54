//! HTTP server implementation and lifecycle management.
//!
//! Built on Hyper directly, as the teacher framework does: accept loop, one
//! task per connection, HTTP/1.1 with upgrades. The only addition over the
//! framework's original `serve` is a shutdown signal so the [`crate::lifecycle`]
//! event loop can stop accepting new connections once it has decided to exit.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tako::{serve, router::Router, Method, responder::Responder, types::Request};
//! use tokio::net::TcpListener;
//!
//! async fn hello(_: Request) -> impl Responder {
//!     "Hello, World!".into_response()
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let listener = TcpListener::bind("127.0.0.1:8080").await?;
//! let mut router = Router::new();
//! router.route(Method::GET, "/", hello);
//! let (_tx, rx) = tokio::sync::watch::channel(false);
//! serve(listener, router, rx).await;
//! # Ok(())
//! # }
//! ```

use hyper::{Request, server::conn::http1, service::service_fn};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::router::Router;
use crate::types::BoxError;

/// Starts the HTTP server, accepting connections until `shutdown` fires.
pub async fn serve(listener: TcpListener, router: Router, shutdown: watch::Receiver<bool>) {
    if let Err(err) = run(listener, router, shutdown).await {
        tracing::error!(%err, "server loop exited with error");
    }
}

async fn run(
    listener: TcpListener,
    router: Router,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), BoxError> {
    let router = Arc::new(router);

    tracing::info!(addr = %listener.local_addr()?, "listening");

    loop {
        let (stream, addr) = tokio::select! {
            accepted = listener.accept() => accepted?,
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    return Ok(());
                }
                continue;
            }
        };

        let io = hyper_util::rt::TokioIo::new(stream);
        let router = router.clone();

        tokio::spawn(async move {
            let svc = service_fn(move |mut req: Request<_>| {
                let router = router.clone();
                async move {
                    req.extensions_mut().insert(addr);
                    Ok::<_, Infallible>(router.dispatch(req).await)
                }
            });

            let mut http = http1::Builder::new();
            http.keep_alive(true);
            let conn = http.serve_connection(io, svc).with_upgrades();

            if let Err(err) = conn.await {
                tracing::warn!(%err, "error serving connection");
            }
        });
    }
}
