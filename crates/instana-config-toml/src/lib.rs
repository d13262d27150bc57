// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

/// Connection settings of an Instana API client.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// API token sent as `Authorization: apiToken {token}`.
    pub api_token: String,

    /// Host name of the Instana tenant unit, without scheme.
    pub endpoint: String,

    /// Accept invalid TLS certificates. Only meant for test installations.
    #[serde(default)]
    pub tls_skip_verify: bool,

    /// Overall timeout of a single request. No timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn new(api_token: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            endpoint: endpoint.into(),
            tls_skip_verify: false,
            request_timeout_secs: None,
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn check(self) -> Result<Self, ParseError> {
        if self.api_token.trim().is_empty() {
            return Err(ParseError::MissingValue("api_token"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(ParseError::MissingValue("endpoint"));
        }
        Ok(self)
    }
}

// The token is a credential; keep it out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("tls_skip_verify", &self.tls_skip_verify)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Cannot parse toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Value {0} must not be empty")]
    MissingValue(&'static str),
}

impl FromStr for Config {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str::<Config>(s)?.check()
    }
}

/// Parses a TOML file into a [`Config`].
pub fn parse<P: AsRef<Path>>(path: P) -> Result<Config, ParseError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    contents.parse()
}
