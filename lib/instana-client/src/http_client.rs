// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the Instana REST API

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use instana_config_toml::Config;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use slog::{debug, o, warn, Logger};

use crate::error::Error;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Verb primitives of the Instana REST API.
///
/// Every operation addresses `{base}{resource_path}` or
/// `{base}{resource_path}/{id}` and returns the raw response body. A 404
/// response is reported as [`Error::NotFound`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestClient: Send + Sync {
    async fn get(&self, resource_path: &str) -> Result<Vec<u8>, Error>;

    async fn get_one(
        &self,
        id: &str,
        resource_path: &str,
    ) -> Result<Vec<u8>, Error>;

    async fn post(
        &self,
        body: Vec<u8>,
        resource_path: &str,
    ) -> Result<Vec<u8>, Error>;

    async fn post_with_id(
        &self,
        id: &str,
        body: Vec<u8>,
        resource_path: &str,
    ) -> Result<Vec<u8>, Error>;

    /// POST without a body; the payload travels in the query string.
    async fn post_by_query(
        &self,
        resource_path: &str,
        query: &BTreeMap<String, String>,
    ) -> Result<Vec<u8>, Error>;

    async fn put(
        &self,
        id: &str,
        body: Vec<u8>,
        resource_path: &str,
    ) -> Result<Vec<u8>, Error>;

    /// PUT without a body; the payload travels in the query string.
    async fn put_by_query(
        &self,
        resource_path: &str,
        id: &str,
        query: &BTreeMap<String, String>,
    ) -> Result<Vec<u8>, Error>;

    async fn delete(&self, id: &str, resource_path: &str) -> Result<(), Error>;
}

/// [`RestClient`] talking HTTPS to an Instana tenant unit.
///
/// The client is cheap to share: the underlying connection pool and the
/// token are only read.
pub struct InstanaRestClient {
    client: reqwest::Client,
    base_url: Url,
    api_token: String,
    log: Logger,
}

impl InstanaRestClient {
    /// Creates a client for `https://{host}`.
    pub fn new(
        api_token: &str,
        host: &str,
        tls_skip_verify: bool,
        log: Logger,
    ) -> Result<Self, Error> {
        Self::build(api_token, host, tls_skip_verify, None, log)
    }

    pub fn from_config(config: &Config, log: Logger) -> Result<Self, Error> {
        Self::build(
            &config.api_token,
            &config.endpoint,
            config.tls_skip_verify,
            config.request_timeout(),
            log,
        )
    }

    /// Creates a client for an arbitrary base URL, such as a local test
    /// server.
    pub fn with_base_url(
        api_token: &str,
        base_url: &str,
        client: reqwest::Client,
        log: Logger,
    ) -> Result<Self, Error> {
        let base_url = parse_base_url(base_url)?;
        let log = log.new(o!(
            "component" => "instana-client",
            "endpoint" => base_url.to_string(),
        ));
        Ok(Self { client, base_url, api_token: api_token.to_string(), log })
    }

    fn build(
        api_token: &str,
        host: &str,
        tls_skip_verify: bool,
        timeout: Option<Duration>,
        log: Logger,
    ) -> Result<Self, Error> {
        if host.contains("://") {
            return Err(Error::InvalidEndpoint {
                endpoint: host.to_string(),
                reason: "expected a host name without scheme".to_string(),
            });
        }
        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(tls_skip_verify);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Self::with_base_url(api_token, &format!("https://{}", host), client, log)
    }

    fn url(
        &self,
        resource_path: &str,
        id: Option<&str>,
        query: Option<&BTreeMap<String, String>>,
    ) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.set_path(resource_path.trim_end_matches('/'));
        if let Some(id) = id {
            url.path_segments_mut()
                .map_err(|()| Error::InvalidEndpoint {
                    endpoint: self.base_url.to_string(),
                    reason: "cannot be a base URL".to_string(),
                })?
                .push(id);
        }
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, Error> {
        debug!(self.log, "client request";
            "method" => %method,
            "url" => %url,
        );

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("apiToken {}", self.api_token));
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        debug!(self.log, "client response";
            "method" => %method,
            "url" => %url,
            "status" => status.as_u16(),
            "length" => body.len(),
        );

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound { method, url: url.to_string() });
        }
        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            warn!(self.log, "request failed";
                "method" => %method,
                "url" => %url,
                "status" => %status,
                "body" => &body,
            );
            return Err(Error::Status {
                method,
                url: url.to_string(),
                status,
                headers,
                body,
            });
        }
        Ok(body.to_vec())
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, Error> {
    let invalid = |reason: &str| Error::InvalidEndpoint {
        endpoint: base_url.to_string(),
        reason: reason.to_string(),
    };
    let url = Url::parse(base_url).map_err(|e| invalid(&e.to_string()))?;
    if url.cannot_be_a_base() || url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host"));
    }
    Ok(url)
}

#[async_trait]
impl RestClient for InstanaRestClient {
    async fn get(&self, resource_path: &str) -> Result<Vec<u8>, Error> {
        let url = self.url(resource_path, None, None)?;
        self.execute(Method::GET, url, None).await
    }

    async fn get_one(
        &self,
        id: &str,
        resource_path: &str,
    ) -> Result<Vec<u8>, Error> {
        let url = self.url(resource_path, Some(id), None)?;
        self.execute(Method::GET, url, None).await
    }

    async fn post(
        &self,
        body: Vec<u8>,
        resource_path: &str,
    ) -> Result<Vec<u8>, Error> {
        let url = self.url(resource_path, None, None)?;
        self.execute(Method::POST, url, Some(body)).await
    }

    async fn post_with_id(
        &self,
        id: &str,
        body: Vec<u8>,
        resource_path: &str,
    ) -> Result<Vec<u8>, Error> {
        let url = self.url(resource_path, Some(id), None)?;
        self.execute(Method::POST, url, Some(body)).await
    }

    async fn post_by_query(
        &self,
        resource_path: &str,
        query: &BTreeMap<String, String>,
    ) -> Result<Vec<u8>, Error> {
        let url = self.url(resource_path, None, Some(query))?;
        self.execute(Method::POST, url, None).await
    }

    async fn put(
        &self,
        id: &str,
        body: Vec<u8>,
        resource_path: &str,
    ) -> Result<Vec<u8>, Error> {
        let url = self.url(resource_path, Some(id), None)?;
        self.execute(Method::PUT, url, Some(body)).await
    }

    async fn put_by_query(
        &self,
        resource_path: &str,
        id: &str,
        query: &BTreeMap<String, String>,
    ) -> Result<Vec<u8>, Error> {
        let url = self.url(resource_path, Some(id), Some(query))?;
        self.execute(Method::PUT, url, None).await
    }

    async fn delete(&self, id: &str, resource_path: &str) -> Result<(), Error> {
        let url = self.url(resource_path, Some(id), None)?;
        self.execute(Method::DELETE, url, None).await.map(|_| ())
    }
}
