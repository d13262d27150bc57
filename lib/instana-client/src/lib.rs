// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A client for the configuration API of Instana.
//!
//! [`InstanaApi`] hands out one resource handle per kind of configuration
//! object. All handles share a single [`RestClient`].

use std::sync::Arc;

use instana_api_types::{
    AlertingChannel, AlertingConfiguration, ApiToken, ApplicationAlertConfig,
    ApplicationConfig, BuiltinEventSpecification, CustomDashboard,
    CustomEventSpecification, Group, InstanaDataObject, Rule, RuleBinding,
    SliConfig, SyntheticLocation, SyntheticTest, UserRole, WebsiteAlertConfig,
    WebsiteMonitoringConfig,
};
use instana_config_toml::Config;
use serde::de::DeserializeOwned;
use slog::Logger;

pub mod error;
pub mod http_client;
pub mod paths;
pub mod resource;
pub mod unmarshal;

pub use error::{Error, ResourceError, ResourceResult};
pub use http_client::{InstanaRestClient, RestClient};
pub use resource::{ReadOnlyRestResource, RestResource, RestResourceMode};

use resource::{
    DefaultReadOnlyRestResource, DefaultRestResource,
    SyntheticTestRestResource, WebsiteMonitoringConfigRestResource,
};
use unmarshal::{CustomPayloadFieldsUnmarshallerAdapter, DefaultJsonUnmarshaller};

/// Entry point to the Instana configuration API.
pub struct InstanaApi {
    rules: DefaultRestResource<Rule>,
    rule_bindings: DefaultRestResource<RuleBinding>,
    alerting_channels: DefaultRestResource<AlertingChannel>,
    alerting_configurations: DefaultRestResource<AlertingConfiguration>,
    api_tokens: DefaultRestResource<ApiToken>,
    application_configs: DefaultRestResource<ApplicationConfig>,
    application_alert_configs: DefaultRestResource<ApplicationAlertConfig>,
    custom_event_specifications: DefaultRestResource<CustomEventSpecification>,
    builtin_event_specifications:
        DefaultReadOnlyRestResource<BuiltinEventSpecification>,
    user_roles: DefaultRestResource<UserRole>,
    groups: DefaultRestResource<Group>,
    custom_dashboards: DefaultRestResource<CustomDashboard>,
    sli_configs: DefaultRestResource<SliConfig>,
    website_monitoring_configs: WebsiteMonitoringConfigRestResource,
    website_alert_configs: DefaultRestResource<WebsiteAlertConfig>,
    synthetic_tests: SyntheticTestRestResource<SyntheticTest>,
    synthetic_locations: DefaultReadOnlyRestResource<SyntheticLocation>,
}

impl InstanaApi {
    /// Creates a client for the tenant unit at `https://{host}`.
    pub fn new(
        api_token: &str,
        host: &str,
        tls_skip_verify: bool,
        log: Logger,
    ) -> Result<Self, Error> {
        let client =
            InstanaRestClient::new(api_token, host, tls_skip_verify, log)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    pub fn from_config(config: &Config, log: Logger) -> Result<Self, Error> {
        let client = InstanaRestClient::from_config(config, log)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    pub fn with_client(client: Arc<dyn RestClient>) -> Self {
        use RestResourceMode::*;

        Self {
            rules: generic(CreatePutUpdatePut, paths::RULES, &client),
            rule_bindings: generic(
                CreatePutUpdatePut,
                paths::RULE_BINDINGS,
                &client,
            ),
            alerting_channels: generic(
                CreatePutUpdatePut,
                paths::ALERTING_CHANNELS,
                &client,
            ),
            alerting_configurations: generic(
                CreatePutUpdatePut,
                paths::ALERTING_CONFIGURATIONS,
                &client,
            ),
            api_tokens: generic(CreatePutUpdatePut, paths::API_TOKENS, &client),
            application_configs: generic(
                CreatePutUpdatePut,
                paths::APPLICATION_CONFIGS,
                &client,
            ),
            application_alert_configs: DefaultRestResource::new(
                CreatePostUpdatePost,
                paths::APPLICATION_ALERT_CONFIGS,
                Box::new(CustomPayloadFieldsUnmarshallerAdapter::new(Box::new(
                    DefaultJsonUnmarshaller::new(),
                ))),
                Arc::clone(&client),
            ),
            custom_event_specifications: generic(
                CreatePutUpdatePut,
                paths::CUSTOM_EVENT_SPECIFICATIONS,
                &client,
            ),
            builtin_event_specifications: DefaultReadOnlyRestResource::new(
                paths::BUILTIN_EVENT_SPECIFICATIONS,
                Box::new(DefaultJsonUnmarshaller::new()),
                Arc::clone(&client),
            ),
            user_roles: generic(CreatePutUpdatePut, paths::USER_ROLES, &client),
            groups: generic(CreatePostUpdatePut, paths::GROUPS, &client),
            custom_dashboards: generic(
                CreatePostUpdatePut,
                paths::CUSTOM_DASHBOARDS,
                &client,
            ),
            sli_configs: generic(
                CreatePostUpdateNotSupported,
                paths::SLI_CONFIGS,
                &client,
            ),
            website_monitoring_configs:
                WebsiteMonitoringConfigRestResource::new(
                    paths::WEBSITE_MONITORING_CONFIGS,
                    Box::new(DefaultJsonUnmarshaller::new()),
                    Arc::clone(&client),
                ),
            website_alert_configs: DefaultRestResource::new(
                CreatePostUpdatePost,
                paths::WEBSITE_ALERT_CONFIGS,
                Box::new(CustomPayloadFieldsUnmarshallerAdapter::new(Box::new(
                    DefaultJsonUnmarshaller::new(),
                ))),
                Arc::clone(&client),
            ),
            synthetic_tests: SyntheticTestRestResource::new(
                paths::SYNTHETIC_TESTS,
                Box::new(DefaultJsonUnmarshaller::new()),
                Arc::clone(&client),
            ),
            synthetic_locations: DefaultReadOnlyRestResource::new(
                paths::SYNTHETIC_LOCATIONS,
                Box::new(DefaultJsonUnmarshaller::new()),
                client,
            ),
        }
    }

    pub fn rules(&self) -> &dyn RestResource<Rule> {
        &self.rules
    }

    pub fn rule_bindings(&self) -> &dyn RestResource<RuleBinding> {
        &self.rule_bindings
    }

    pub fn alerting_channels(&self) -> &dyn RestResource<AlertingChannel> {
        &self.alerting_channels
    }

    pub fn alerting_configurations(
        &self,
    ) -> &dyn RestResource<AlertingConfiguration> {
        &self.alerting_configurations
    }

    /// API tokens are addressed by their internal id.
    pub fn api_tokens(&self) -> &dyn RestResource<ApiToken> {
        &self.api_tokens
    }

    pub fn application_configs(&self) -> &dyn RestResource<ApplicationConfig> {
        &self.application_configs
    }

    pub fn application_alert_configs(
        &self,
    ) -> &dyn RestResource<ApplicationAlertConfig> {
        &self.application_alert_configs
    }

    pub fn custom_event_specifications(
        &self,
    ) -> &dyn RestResource<CustomEventSpecification> {
        &self.custom_event_specifications
    }

    pub fn builtin_event_specifications(
        &self,
    ) -> &dyn ReadOnlyRestResource<BuiltinEventSpecification> {
        &self.builtin_event_specifications
    }

    pub fn user_roles(&self) -> &dyn RestResource<UserRole> {
        &self.user_roles
    }

    pub fn groups(&self) -> &dyn RestResource<Group> {
        &self.groups
    }

    pub fn custom_dashboards(&self) -> &dyn RestResource<CustomDashboard> {
        &self.custom_dashboards
    }

    /// SLI configurations cannot be updated; `update` always fails.
    pub fn sli_configs(&self) -> &dyn RestResource<SliConfig> {
        &self.sli_configs
    }

    pub fn website_monitoring_configs(
        &self,
    ) -> &dyn RestResource<WebsiteMonitoringConfig> {
        &self.website_monitoring_configs
    }

    pub fn website_alert_configs(
        &self,
    ) -> &dyn RestResource<WebsiteAlertConfig> {
        &self.website_alert_configs
    }

    pub fn synthetic_tests(&self) -> &dyn RestResource<SyntheticTest> {
        &self.synthetic_tests
    }

    pub fn synthetic_locations(
        &self,
    ) -> &dyn ReadOnlyRestResource<SyntheticLocation> {
        &self.synthetic_locations
    }
}

fn generic<T>(
    mode: RestResourceMode,
    resource_path: &str,
    client: &Arc<dyn RestClient>,
) -> DefaultRestResource<T>
where
    T: InstanaDataObject + DeserializeOwned,
{
    DefaultRestResource::new(
        mode,
        resource_path,
        Box::new(DefaultJsonUnmarshaller::new()),
        Arc::clone(client),
    )
}
