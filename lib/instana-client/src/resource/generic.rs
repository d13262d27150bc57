// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use async_trait::async_trait;
use instana_api_types::InstanaDataObject;

use super::{decode_and_validate, encode_request, RestResource};
use crate::error::{Error, ResourceError, ResourceResult};
use crate::http_client::RestClient;
use crate::unmarshal::JsonUnmarshaller;

/// The HTTP verbs a resource path expects for create and update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestResourceMode {
    /// PUT `{path}/{id}` for both.
    CreatePutUpdatePut,
    /// POST `{path}` to create, PUT `{path}/{id}` to update.
    CreatePostUpdatePut,
    /// POST `{path}` to create, POST `{path}/{id}` to update.
    CreatePostUpdatePost,
    /// POST `{path}` to create. Objects cannot be updated.
    CreatePostUpdateNotSupported,
}

/// [`RestResource`] of a resource path following one of the
/// [`RestResourceMode`] conventions.
pub struct DefaultRestResource<T: Send + Sync + 'static> {
    resource_path: String,
    mode: RestResourceMode,
    unmarshaller: Box<dyn JsonUnmarshaller<T>>,
    client: Arc<dyn RestClient>,
}

impl<T: InstanaDataObject> DefaultRestResource<T> {
    pub fn new(
        mode: RestResourceMode,
        resource_path: impl Into<String>,
        unmarshaller: Box<dyn JsonUnmarshaller<T>>,
        client: Arc<dyn RestClient>,
    ) -> Self {
        Self { resource_path: resource_path.into(), mode, unmarshaller, client }
    }

    pub fn mode(&self) -> RestResourceMode {
        self.mode
    }

    async fn send_create(&self, data: &T) -> Result<Vec<u8>, Error> {
        let body = encode_request(data)?;
        let path = &self.resource_path;
        match self.mode {
            RestResourceMode::CreatePutUpdatePut => {
                self.client.put(data.id_for_resource_path(), body, path).await
            }
            RestResourceMode::CreatePostUpdatePut
            | RestResourceMode::CreatePostUpdatePost
            | RestResourceMode::CreatePostUpdateNotSupported => {
                self.client.post(body, path).await
            }
        }
    }

    async fn send_update(&self, data: &T) -> Result<Vec<u8>, Error> {
        if self.mode == RestResourceMode::CreatePostUpdateNotSupported {
            return Err(Error::UpdateNotSupported(self.resource_path.clone()));
        }
        let body = encode_request(data)?;
        let id = data.id_for_resource_path();
        let path = &self.resource_path;
        match self.mode {
            RestResourceMode::CreatePostUpdatePost => {
                self.client.post_with_id(id, body, path).await
            }
            _ => self.client.put(id, body, path).await,
        }
    }
}

#[async_trait]
impl<T: InstanaDataObject> RestResource<T> for DefaultRestResource<T> {
    async fn get_one(&self, id: &str) -> ResourceResult<T> {
        let body = self.client.get_one(id, &self.resource_path).await?;
        decode_and_validate(self.unmarshaller.as_ref(), &body)
    }

    async fn create(&self, data: T) -> ResourceResult<T> {
        match self.send_create(&data).await {
            Ok(body) => decode_and_validate(self.unmarshaller.as_ref(), &body),
            Err(e) => Err(ResourceError::with_object(e, data)),
        }
    }

    async fn update(&self, data: T) -> ResourceResult<T> {
        match self.send_update(&data).await {
            Ok(body) => decode_and_validate(self.unmarshaller.as_ref(), &body),
            Err(e) => Err(ResourceError::with_object(e, data)),
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), Error> {
        self.client.delete(id, &self.resource_path).await
    }
}
