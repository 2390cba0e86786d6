//! Redirect signal raised while loading or rendering a page.
//!
//! A page that wants to send the client elsewhere fails with a [`Redirect`]
//! error. The resolver passes it through untouched; the transport layer
//! checks for it with [`as_redirect`] and answers with a redirect response
//! instead of an error page.

use http::{header, Response, StatusCode};
use thiserror::Error;

/// Status used by [`redirect`].
pub const DEFAULT_REDIRECT_STATUS: StatusCode = StatusCode::TEMPORARY_REDIRECT;

/// A request to redirect the client to `location`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("redirect to {location} ({status})")]
pub struct Redirect {
    pub location: String,
    pub status: StatusCode,
}

impl Redirect {
    /// Redirect with the permanent (308) status.
    pub fn new(location: impl Into<String>) -> Self {
        Self::with_status(location, StatusCode::PERMANENT_REDIRECT)
    }

    pub fn with_status(location: impl Into<String>, status: StatusCode) -> Self {
        Self {
            location: location.into(),
            status,
        }
    }

    /// Empty response carrying the status and `Location` header.
    pub fn to_response(&self) -> anyhow::Result<Response<()>> {
        let response = Response::builder()
            .status(self.status)
            .header(header::LOCATION, self.location.as_str())
            .body(())?;
        Ok(response)
    }
}

/// Error signalling a temporary (307) redirect, for use with `?` or `Err(..)`.
pub fn redirect(location: impl Into<String>) -> anyhow::Error {
    Redirect::with_status(location, DEFAULT_REDIRECT_STATUS).into()
}

/// The redirect carried by `err`, if it is one.
#[must_use]
pub fn as_redirect(err: &anyhow::Error) -> Option<&Redirect> {
    err.downcast_ref::<Redirect>()
}

#[must_use]
pub fn is_redirect(err: &anyhow::Error) -> bool {
    as_redirect(err).is_some()
}
