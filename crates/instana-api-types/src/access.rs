// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! API tokens and user roles, which share a set of capability flags.

use serde::{Deserialize, Serialize};

use crate::{require, InstanaDataObject, ValidationError};

/// Capabilities granted to an API token or a user role.
///
/// Absent flags decode as `false`.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessCapabilities {
    pub can_configure_service_mapping: bool,
    pub can_configure_eum_applications: bool,
    pub can_configure_mobile_app_monitoring: bool,
    pub can_configure_users: bool,
    pub can_install_new_agents: bool,
    pub can_see_usage_information: bool,
    pub can_configure_integrations: bool,
    pub can_see_on_prem_license_information: bool,
    pub can_configure_custom_alerts: bool,
    pub can_configure_api_tokens: bool,
    pub can_configure_agent_run_mode: bool,
    pub can_view_audit_log: bool,
    pub can_configure_agents: bool,
    pub can_configure_authentication_methods: bool,
    pub can_configure_applications: bool,
    pub can_configure_teams: bool,
    pub can_configure_releases: bool,
    pub can_configure_log_management: bool,
    pub can_create_public_custom_dashboards: bool,
    pub can_view_logs: bool,
    pub can_view_trace_details: bool,
    pub can_configure_session_settings: bool,
    pub can_configure_service_level_indicators: bool,
    pub can_configure_global_alert_payload: bool,
    pub can_configure_global_alert_configs: bool,
    pub can_view_account_and_billing_information: bool,
    pub can_edit_all_accessible_custom_dashboards: bool,
}

/// An API token. The resource path is keyed by `internal_id`, not `id`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiToken {
    pub id: String,
    pub internal_id: String,
    pub access_granting_token: String,
    pub name: String,
    #[serde(flatten)]
    pub capabilities: AccessCapabilities,
}

impl InstanaDataObject for ApiToken {
    fn id_for_resource_path(&self) -> &str {
        &self.internal_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.access_granting_token, "AccessGrantingToken")?;
        require(&self.internal_id, "InternalID")?;
        require(&self.name, "Name")
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit_view_filter: Option<String>,
    #[serde(flatten)]
    pub capabilities: AccessCapabilities,
}

impl InstanaDataObject for UserRole {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.name, "Name")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn api_token() -> ApiToken {
        ApiToken {
            id: "id".to_string(),
            internal_id: "internal-id".to_string(),
            access_granting_token: "token".to_string(),
            name: "name".to_string(),
            capabilities: AccessCapabilities {
                can_view_logs: true,
                can_configure_api_tokens: true,
                ..Default::default()
            },
        }
    }

    #[test]
    fn api_token_path_uses_internal_id() {
        assert_eq!(api_token().id_for_resource_path(), "internal-id");
    }

    #[test]
    fn api_token_validation() {
        assert_eq!(api_token().validate(), Ok(()));

        let mut token = api_token();
        token.access_granting_token.clear();
        assert_eq!(
            token.validate().unwrap_err().message(),
            "AccessGrantingToken is missing"
        );

        let mut token = api_token();
        token.internal_id.clear();
        assert_eq!(
            token.validate().unwrap_err().message(),
            "InternalID is missing"
        );
    }

    #[test]
    fn capabilities_are_flattened() {
        let json = serde_json::to_value(api_token()).unwrap();
        assert_eq!(json["canViewLogs"], true);
        assert_eq!(json["canConfigureApiTokens"], true);
        assert_eq!(json["canConfigureUsers"], false);
        assert_eq!(json["internalId"], "internal-id");
    }

    #[test]
    fn missing_capabilities_decode_as_false() {
        let role: UserRole = serde_json::from_value(serde_json::json!({
            "id": "role-id",
            "name": "role",
            "implicitViewFilter": "entity.zone:prod",
            "canConfigureAgents": true,
        }))
        .unwrap();
        assert!(role.capabilities.can_configure_agents);
        assert!(!role.capabilities.can_view_audit_log);
        assert_eq!(role.implicit_view_filter.as_deref(), Some("entity.zone:prod"));
        assert_eq!(role.validate(), Ok(()));

        let mut nameless = role;
        nameless.name.clear();
        assert_eq!(nameless.validate().unwrap_err().message(), "Name is missing");
    }
}
