//! The single piece of global state: the shared [`crate::app::App`].
//!
//! The source design kept several independent package-level singletons (the KVS
//! client, the logger, the settings, the event channel). Here they are bundled into
//! one `App` value, and there is exactly one of it per process — so this is a
//! `OnceLock<Arc<App>>`, not a type-keyed map. `set_state` runs once at startup
//! (see `main.rs`); every handler and the lifecycle loop read it back with `get_state`.

use std::sync::{Arc, OnceLock};

use crate::app::App;

static APP: OnceLock<Arc<App>> = OnceLock::new();

/// Installs the application state. Called exactly once, before the server starts
/// accepting connections, and returns the `Arc` so the caller can hand the same
/// instance to the lifecycle loop without a second lookup.
///
/// # Panics
///
/// Panics if called more than once — that would mean two `App`s exist for one process,
/// which is a startup bug, not a recoverable condition.
pub fn set_state(app: App) -> Arc<App> {
    let app = Arc::new(app);
    APP.set(app.clone())
        .unwrap_or_else(|_| panic!("application state already initialized"));
    app
}

/// Reads back the application state. `None` only before `set_state` has run, which
/// handlers never observe since the router isn't wired up until after startup completes.
pub fn get_state() -> Option<Arc<App>> {
    APP.get().cloned()
}
