// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use instana_api_types::{
    InstanaDataObject, ValidationError, WebsiteMonitoringConfig,
};

use super::{decode_and_validate, RestResource};
use crate::error::{Error, ResourceError, ResourceResult};
use crate::http_client::RestClient;
use crate::unmarshal::JsonUnmarshaller;

/// Website monitoring configurations.
///
/// The endpoint takes the website name as a query parameter on create and
/// update; the object itself is never sent.
pub struct WebsiteMonitoringConfigRestResource {
    resource_path: String,
    unmarshaller: Box<dyn JsonUnmarshaller<WebsiteMonitoringConfig>>,
    client: Arc<dyn RestClient>,
}

impl WebsiteMonitoringConfigRestResource {
    pub fn new(
        resource_path: impl Into<String>,
        unmarshaller: Box<dyn JsonUnmarshaller<WebsiteMonitoringConfig>>,
        client: Arc<dyn RestClient>,
    ) -> Self {
        Self { resource_path: resource_path.into(), unmarshaller, client }
    }

    fn name_query(
        data: &WebsiteMonitoringConfig,
    ) -> Result<BTreeMap<String, String>, Error> {
        data.validate().map_err(Error::InvalidRequest)?;
        Ok(BTreeMap::from([("name".to_string(), data.name.clone())]))
    }

    fn finish(
        &self,
        result: Result<Vec<u8>, Error>,
        data: WebsiteMonitoringConfig,
    ) -> ResourceResult<WebsiteMonitoringConfig> {
        match result {
            Ok(body) => decode_and_validate(self.unmarshaller.as_ref(), &body),
            Err(e) => Err(ResourceError::with_object(e, data)),
        }
    }
}

#[async_trait]
impl RestResource<WebsiteMonitoringConfig>
    for WebsiteMonitoringConfigRestResource
{
    async fn get_one(&self, id: &str) -> ResourceResult<WebsiteMonitoringConfig> {
        let body = self.client.get_one(id, &self.resource_path).await?;
        decode_and_validate(self.unmarshaller.as_ref(), &body)
    }

    async fn create(
        &self,
        data: WebsiteMonitoringConfig,
    ) -> ResourceResult<WebsiteMonitoringConfig> {
        let result = match Self::name_query(&data) {
            Ok(query) => {
                self.client.post_by_query(&self.resource_path, &query).await
            }
            Err(e) => Err(e),
        };
        self.finish(result, data)
    }

    async fn update(
        &self,
        data: WebsiteMonitoringConfig,
    ) -> ResourceResult<WebsiteMonitoringConfig> {
        let result = match Self::name_query(&data) {
            Ok(_) if data.id.trim().is_empty() => {
                Err(Error::InvalidRequest(ValidationError::missing("ID")))
            }
            Ok(query) => {
                self.client
                    .put_by_query(&self.resource_path, &data.id, &query)
                    .await
            }
            Err(e) => Err(e),
        };
        self.finish(result, data)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), Error> {
        self.client.delete(id, &self.resource_path).await
    }
}
