// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Alerting channels and the configurations routing events to them.

use serde::{Deserialize, Serialize};

use crate::vocabulary::{AlertEventType, AlertingChannelType, OpsGenieRegionType};
use crate::{
    all_unique, check_max_len, require, require_opt, InstanaDataObject,
    ValidationError, Vocabulary,
};

/// A delivery endpoint for alerts.
///
/// Only the fields belonging to `kind` are meaningful; the others are left
/// unset and omitted from the wire.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertingChannel {
    pub id: String,
    pub name: String,
    pub kind: AlertingChannelType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_integration_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
}

impl AlertingChannel {
    /// Creates a channel of the given kind with all kind-specific fields
    /// unset.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: AlertingChannelType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            emails: None,
            webhook_url: None,
            api_key: None,
            tags: None,
            region: None,
            routing_key: None,
            service_integration_key: None,
            icon_url: None,
            channel: None,
            url: None,
            token: None,
            webhook_urls: None,
            headers: None,
        }
    }

    fn validate_ops_genie(&self) -> Result<(), ValidationError> {
        require_opt(self.api_key.as_deref(), "API key")?;
        require_opt(self.tags.as_deref(), "Tags")?;
        let region = self.region.as_deref().unwrap_or_default();
        require(region, "OpsGenie region")?;
        if !OpsGenieRegionType::is_supported(region) {
            return Err(ValidationError::new(format!(
                "OpsGenie region {} is not valid",
                region
            )));
        }
        Ok(())
    }
}

fn has_entries(values: Option<&Vec<String>>) -> bool {
    values.is_some_and(|v| v.iter().any(|s| !crate::is_blank(s)))
}

impl InstanaDataObject for AlertingChannel {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.name, "Name")?;
        match self.kind {
            AlertingChannelType::Email => {
                if !has_entries(self.emails.as_ref()) {
                    return Err(ValidationError::new(
                        "Email addresses are missing",
                    ));
                }
                Ok(())
            }
            AlertingChannelType::GoogleChat
            | AlertingChannelType::Office365
            | AlertingChannelType::Slack => {
                require_opt(self.webhook_url.as_deref(), "Webhook URL")
            }
            AlertingChannelType::OpsGenie => self.validate_ops_genie(),
            AlertingChannelType::PagerDuty => require_opt(
                self.service_integration_key.as_deref(),
                "Service integration key",
            ),
            AlertingChannelType::Splunk => {
                require_opt(self.url.as_deref(), "URL")?;
                require_opt(self.token.as_deref(), "Token")
            }
            AlertingChannelType::VictorOps => {
                require_opt(self.api_key.as_deref(), "API key")?;
                require_opt(self.routing_key.as_deref(), "Routing key")
            }
            AlertingChannelType::Webhook => {
                if !has_entries(self.webhook_urls.as_ref()) {
                    return Err(ValidationError::new(
                        "Webhook URLs are missing",
                    ));
                }
                Ok(())
            }
        }
    }
}

pub const ALERT_NAME_MAX_LENGTH: usize = 256;
pub const INTEGRATION_IDS_MAX: usize = 1024;
pub const CUSTOM_PAYLOAD_MAX_LENGTH: usize = 65536;
pub const QUERY_MAX_LENGTH: usize = 2048;
pub const RULE_IDS_MAX: usize = 1024;
pub const EVENT_TYPES_MAX: usize = 6;

/// Selects the events an alerting configuration reacts to.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilteringConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default)]
    pub rule_ids: Vec<String>,
    #[serde(default)]
    pub event_types: Vec<AlertEventType>,
}

impl EventFilteringConfiguration {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(query) = &self.query {
            check_max_len(query, QUERY_MAX_LENGTH, "Query")?;
        }
        match (self.rule_ids.is_empty(), self.event_types.is_empty()) {
            (false, true) => {
                check_count(self.rule_ids.len(), RULE_IDS_MAX, "RuleIDs")?;
                if !all_unique(&self.rule_ids) {
                    return Err(ValidationError::new("RuleIDs must be unique"));
                }
                Ok(())
            }
            (true, false) => {
                check_count(
                    self.event_types.len(),
                    EVENT_TYPES_MAX,
                    "EventTypes",
                )?;
                if !all_unique(&self.event_types) {
                    return Err(ValidationError::new(
                        "EventTypes must be unique",
                    ));
                }
                Ok(())
            }
            _ => Err(ValidationError::new(
                "Either RuleIDs or EventTypes must be configured",
            )),
        }
    }
}

fn check_count(
    count: usize,
    max: usize,
    field: &str,
) -> Result<(), ValidationError> {
    if count > max {
        return Err(ValidationError::new(format!(
            "{} must not contain more than {} entries",
            field, max
        )));
    }
    Ok(())
}

/// Routes matching events to a set of alerting channels.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertingConfiguration {
    pub id: String,
    pub alert_name: String,
    #[serde(default)]
    pub integration_ids: Vec<String>,
    pub event_filtering_configuration: EventFilteringConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_payload: Option<String>,
}

impl InstanaDataObject for AlertingConfiguration {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.alert_name, "AlertName")?;
        check_max_len(&self.alert_name, ALERT_NAME_MAX_LENGTH, "AlertName")?;
        check_count(
            self.integration_ids.len(),
            INTEGRATION_IDS_MAX,
            "IntegrationIDs",
        )?;
        if !all_unique(&self.integration_ids) {
            return Err(ValidationError::new("IntegrationIDs must be unique"));
        }
        if let Some(payload) = &self.custom_payload {
            check_max_len(payload, CUSTOM_PAYLOAD_MAX_LENGTH, "CustomPayload")?;
        }
        self.event_filtering_configuration.validate()
    }
}
