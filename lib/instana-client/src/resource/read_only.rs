// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use async_trait::async_trait;
use instana_api_types::InstanaDataObject;

use super::{decode_and_validate, ReadOnlyRestResource};
use crate::error::{Error, ResourceError, ResourceResult};
use crate::http_client::RestClient;
use crate::unmarshal::JsonUnmarshaller;

pub struct DefaultReadOnlyRestResource<T: Send + Sync + 'static> {
    resource_path: String,
    unmarshaller: Box<dyn JsonUnmarshaller<T>>,
    client: Arc<dyn RestClient>,
}

impl<T: InstanaDataObject> DefaultReadOnlyRestResource<T> {
    pub fn new(
        resource_path: impl Into<String>,
        unmarshaller: Box<dyn JsonUnmarshaller<T>>,
        client: Arc<dyn RestClient>,
    ) -> Self {
        Self { resource_path: resource_path.into(), unmarshaller, client }
    }
}

#[async_trait]
impl<T: InstanaDataObject> ReadOnlyRestResource<T>
    for DefaultReadOnlyRestResource<T>
{
    async fn get_one(&self, id: &str) -> ResourceResult<T> {
        let body = self.client.get_one(id, &self.resource_path).await?;
        decode_and_validate(self.unmarshaller.as_ref(), &body)
    }

    async fn get_all(&self) -> Result<Vec<T>, ResourceError<Vec<T>>> {
        let body = self.client.get(&self.resource_path).await?;
        let objects = self.unmarshaller.unmarshal_array(&body)?;
        if let Err(e) = objects.iter().try_for_each(T::validate) {
            return Err(ResourceError::with_object(
                Error::InvalidResponse(e),
                objects,
            ));
        }
        Ok(objects)
    }
}
