// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lifecycle operations on the configuration objects of one resource path.
//!
//! Every operation validates the object it is handed before anything is
//! sent, and validates the object the API answers with before returning it.
//! A request failing validation never reaches the API; a response failing
//! validation is returned together with the decoded object in the
//! [`ResourceError`].

use async_trait::async_trait;
use instana_api_types::InstanaDataObject;

use crate::error::{Error, ResourceError, ResourceResult};
use crate::unmarshal::JsonUnmarshaller;

mod generic;
mod read_only;
mod synthetic;
mod website_monitoring;

pub use generic::{DefaultRestResource, RestResourceMode};
pub use read_only::DefaultReadOnlyRestResource;
pub use synthetic::SyntheticTestRestResource;
pub use website_monitoring::WebsiteMonitoringConfigRestResource;

/// Create, read, update and delete of objects of type `T`.
#[async_trait]
pub trait RestResource<T: InstanaDataObject>: Send + Sync {
    /// Fetches the object with the given id. A missing object is reported
    /// as [`Error::NotFound`].
    async fn get_one(&self, id: &str) -> ResourceResult<T>;

    async fn create(&self, data: T) -> ResourceResult<T>;

    async fn update(&self, data: T) -> ResourceResult<T>;

    async fn delete(&self, data: &T) -> Result<(), Error> {
        self.delete_by_id(data.id_for_resource_path()).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), Error>;
}

/// Read access to objects the API does not allow to be changed.
#[async_trait]
pub trait ReadOnlyRestResource<T: InstanaDataObject>: Send + Sync {
    async fn get_one(&self, id: &str) -> ResourceResult<T>;

    /// Fetches every object of the resource path.
    ///
    /// If one of the objects fails validation the whole list is returned in
    /// the error, next to the first validation failure.
    async fn get_all(&self) -> Result<Vec<T>, ResourceError<Vec<T>>>;
}

/// Validates and encodes an object about to be sent.
fn encode_request<T: InstanaDataObject>(data: &T) -> Result<Vec<u8>, Error> {
    data.validate().map_err(Error::InvalidRequest)?;
    serde_json::to_vec(data).map_err(Error::Encode)
}

fn decode_and_validate<T: InstanaDataObject>(
    unmarshaller: &dyn JsonUnmarshaller<T>,
    body: &[u8],
) -> ResourceResult<T> {
    let object = unmarshaller.unmarshal(body)?;
    match object.validate() {
        Ok(()) => Ok(object),
        Err(e) => Err(ResourceError::with_object(Error::InvalidResponse(e), object)),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use instana_api_types::Rule;

    pub fn rule() -> Rule {
        Rule {
            id: "rule-id".to_string(),
            name: "cpu".to_string(),
            entity_type: "host".to_string(),
            metric_name: "cpu.user".to_string(),
            rollup: 1000,
            window: 60000,
            aggregation: "avg".to_string(),
            condition_operator: ">".to_string(),
            condition_value: 0.8,
        }
    }

    pub fn rule_body() -> Vec<u8> {
        serde_json::to_vec(&rule()).unwrap()
    }
}
