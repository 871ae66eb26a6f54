//! An HTTP edge cache with a Redis-backed hot tier.
//!
//! Requests for `/download?file=<name>` are served from a KVS hot tier once a file
//! has been accessed often enough (admission policy), with TTLs extended on files
//! accessed often enough to count as hot (retention policy). Everything below the
//! admission threshold, and anything the KVS can't currently serve, falls back to disk.
//!
//! # Module map
//! - [router] / [handler] / [responder] / [extractors] / [body] / [types] / [route] /
//!   [state] / [server] — the HTTP plumbing: an exact-path router over Hyper, with
//!   Axum-style extractor-based handlers and a single-value global store for injecting
//!   [app::App] into them.
//! - [config] — JSON configuration loading.
//! - [kvs] — the typed KVS client adapter (Redis via `deadpool-redis`).
//! - [origin] — disk reads for cache misses.
//! - [mime] — suffix-to-MIME-type lookup.
//! - [counter] — the access-counter store layered over the KVS client.
//! - [admission] / [retention] — the two policies that decide when a file enters and
//!   stays in the hot tier.
//! - [coordinator] — the `fetch` decision tree tying the above together.
//! - [telemetry] — the hit-ratio counter.
//! - [logger] — daily/error file sinks, distinct from the stderr [tracing] subscriber.
//! - [lifecycle] — the single event loop multiplexing timers and shutdown signals.
//! - [app] — bundles all of the above into one injectable value.
//! - [handlers] — the three HTTP endpoints.
//! - [error] — shared error kinds for the KVS/origin/coordinator boundary.

/// Application state bundle injected into handlers and the lifecycle loop.
pub mod app;

/// Admission policy: when a file enters the hot tier.
pub mod admission;

/// HTTP request and response body handling utilities.
pub mod body;

/// JSON configuration loading.
pub mod config;

/// Cache coordinator: the `fetch` decision tree.
pub mod coordinator;

/// Access-counter store layered over the KVS client.
pub mod counter;

/// Shared error kinds for the KVS/origin/coordinator boundary.
pub mod error;

/// Request data extraction utilities for parsing query params and injected state.
pub mod extractors;

/// Request handler traits and implementations.
mod handler;

/// The three HTTP endpoints the edge cache exposes.
pub mod handlers;

/// KVS client adapter (Redis via `deadpool-redis`).
pub mod kvs;

/// Process lifecycle: timers and shutdown signal, multiplexed into one event loop.
pub mod lifecycle;

/// Daily/error file log sinks.
pub mod logger;

/// Suffix-to-MIME-type lookup.
pub mod mime;

/// Disk reads for cache misses.
pub mod origin;

/// Response generation utilities and traits.
pub mod responder;

/// Retention policy: whether a hot entry's TTL gets extended.
pub mod retention;

/// Route definition and matching logic.
mod route;

/// Request routing and dispatch functionality.
pub mod router;

/// HTTP server implementation and configuration.
mod server;

/// The single global `App` instance, installed once at startup.
pub mod state;

/// Hit-ratio telemetry.
pub mod telemetry;

/// Process-wide structured logging setup (stderr), distinct from `logger`.
pub mod tracing;

/// Core type definitions used throughout the framework.
pub mod types;

pub use bytes::Bytes;
pub use http::{Method, StatusCode, header};

/// Starts the HTTP server with the given listener, router, and shutdown signal.
pub use server::serve;
