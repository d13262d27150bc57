// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use instana_api_types::ValidationError;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Errors which may be returned from the Instana client.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent or its response could not be read.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered 404.
    #[error("Entity not found: {method} {url}")]
    NotFound { method: Method, url: String },

    /// The API answered with any other non-success status.
    #[error("{method} {url} failed with status {status}: {body}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        headers: HeaderMap,
        body: String,
    },

    #[error("Cannot decode response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Cannot encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The object handed to the client failed validation; nothing was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[source] ValidationError),

    /// The API returned an object which fails validation.
    #[error("Invalid response: {0}")]
    InvalidResponse(#[source] ValidationError),

    #[error("update is not supported for {0}")]
    UpdateNotSupported(String),

    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl Error {
    /// True if the entity addressed by the request does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Error::Status { status, .. } => Some(*status),
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// The error of a resource operation.
///
/// Besides the [`Error`] it carries the object the operation was working on
/// when it failed, if any: the caller's input when validation of a request or
/// the exchange with the API failed, or the decoded object when the API
/// returned an object which fails validation.
pub struct ResourceError<T> {
    error: Error,
    object: Option<T>,
}

impl<T> ResourceError<T> {
    pub fn new(error: Error) -> Self {
        Self { error, object: None }
    }

    pub fn with_object(error: Error, object: T) -> Self {
        Self { error, object: Some(object) }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    pub fn object(&self) -> Option<&T> {
        self.object.as_ref()
    }

    pub fn is_not_found(&self) -> bool {
        self.error.is_not_found()
    }

    pub fn into_parts(self) -> (Error, Option<T>) {
        (self.error, self.object)
    }

    pub fn into_error(self) -> Error {
        self.error
    }
}

impl<T> From<Error> for ResourceError<T> {
    fn from(error: Error) -> Self {
        Self::new(error)
    }
}

impl<T: fmt::Debug> fmt::Debug for ResourceError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceError")
            .field("error", &self.error)
            .field("object", &self.object)
            .finish()
    }
}

impl<T> fmt::Display for ResourceError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl<T: fmt::Debug> std::error::Error for ResourceError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Result of a resource operation.
pub type ResourceResult<T> = Result<T, ResourceError<T>>;
