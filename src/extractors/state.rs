//! Handler-side access to the shared [`crate::app::App`].
//!
//! `State` is the extractor half of [`crate::state`]: `download`/`flush` both take
//! `State(app): State` as their first argument instead of reaching for a global.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tako::{extractors::state::State, app::App, responder::Responder};
//!
//! async fn flush(State(app): State) -> impl Responder {
//!     app.mime_for("report.csv")
//! }
//! ```

use std::sync::Arc;

use http::request::Parts;

use crate::app::App;
use crate::extractors::FromRequest;
use crate::extractors::FromRequestParts;
use crate::responder::Responder;
use crate::state::get_state;
use crate::types::Request;

/// Extractor for the shared [`App`] instance.
pub struct State(pub Arc<App>);

impl Clone for State {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// Returned when a handler runs before [`crate::state::set_state`] has been called.
/// Not expected in practice — the router isn't wired up until after startup installs
/// the state — but extraction is still fallible rather than panicking.
#[derive(Debug)]
pub struct MissingState;

impl Responder for MissingState {
    fn into_response(self) -> crate::types::Response {
        (
            http::StatusCode::INTERNAL_SERVER_ERROR,
            "missing application state",
        )
            .into_response()
    }
}

impl<'a> FromRequest<'a> for State {
    type Error = MissingState;

    fn from_request(
        _req: &'a mut Request,
    ) -> impl core::future::Future<Output = core::result::Result<Self, Self::Error>> + Send + 'a
    {
        std::future::ready(get_state().map(Self).ok_or(MissingState))
    }
}

impl<'a> FromRequestParts<'a> for State {
    type Error = MissingState;

    fn from_request_parts(
        _parts: &'a mut Parts,
    ) -> impl core::future::Future<Output = core::result::Result<Self, Self::Error>> + Send + 'a
    {
        std::future::ready(get_state().map(Self).ok_or(MissingState))
    }
}
