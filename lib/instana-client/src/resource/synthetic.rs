// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use async_trait::async_trait;
use instana_api_types::{InstanaDataObject, ValidationError};

use super::{decode_and_validate, encode_request, RestResource};
use crate::error::{Error, ResourceError, ResourceResult};
use crate::http_client::RestClient;
use crate::unmarshal::JsonUnmarshaller;

/// Synthetic tests and monitors.
///
/// Updates are answered without a body, so the object is read back after
/// the PUT.
pub struct SyntheticTestRestResource<T: Send + Sync + 'static> {
    resource_path: String,
    unmarshaller: Box<dyn JsonUnmarshaller<T>>,
    client: Arc<dyn RestClient>,
}

impl<T: InstanaDataObject> SyntheticTestRestResource<T> {
    pub fn new(
        resource_path: impl Into<String>,
        unmarshaller: Box<dyn JsonUnmarshaller<T>>,
        client: Arc<dyn RestClient>,
    ) -> Self {
        Self { resource_path: resource_path.into(), unmarshaller, client }
    }

    async fn put_and_read_back(&self, data: &T) -> Result<Vec<u8>, Error> {
        let body = encode_request(data)?;
        let id = data.id_for_resource_path();
        if id.trim().is_empty() {
            return Err(Error::InvalidRequest(ValidationError::missing("ID")));
        }
        self.client.put(id, body, &self.resource_path).await?;
        self.client.get_one(id, &self.resource_path).await
    }
}

#[async_trait]
impl<T: InstanaDataObject> RestResource<T> for SyntheticTestRestResource<T> {
    async fn get_one(&self, id: &str) -> ResourceResult<T> {
        let body = self.client.get_one(id, &self.resource_path).await?;
        decode_and_validate(self.unmarshaller.as_ref(), &body)
    }

    async fn create(&self, data: T) -> ResourceResult<T> {
        let result = match encode_request(&data) {
            Ok(body) => self.client.post(body, &self.resource_path).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(body) => decode_and_validate(self.unmarshaller.as_ref(), &body),
            Err(e) => Err(ResourceError::with_object(e, data)),
        }
    }

    async fn update(&self, data: T) -> ResourceResult<T> {
        match self.put_and_read_back(&data).await {
            Ok(body) => decode_and_validate(self.unmarshaller.as_ref(), &body),
            Err(e) => Err(ResourceError::with_object(e, data)),
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), Error> {
        self.client.delete(id, &self.resource_path).await
    }
}
