// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Role based access control groups.

use serde::{Deserialize, Serialize};

use crate::vocabulary::InstanaPermission;
use crate::{require, InstanaDataObject, ValidationError, Vocabulary};

/// Grants access to one scope, optionally through a specific scope role.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeBinding {
    pub scope_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_role_id: Option<String>,
}

impl ScopeBinding {
    pub fn new(scope_id: impl Into<String>) -> Self {
        Self { scope_id: scope_id.into(), scope_role_id: None }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct APIPermissionSetWithRoles {
    #[serde(default)]
    pub application_ids: Vec<ScopeBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infra_dfq_filter: Option<ScopeBinding>,
    #[serde(default, rename = "kubernetesClusterUUIDs")]
    pub kubernetes_cluster_uuids: Vec<ScopeBinding>,
    #[serde(default, rename = "kubernetesNamespaceUIDs")]
    pub kubernetes_namespace_uids: Vec<ScopeBinding>,
    #[serde(default)]
    pub mobile_app_ids: Vec<ScopeBinding>,
    #[serde(default)]
    pub website_ids: Vec<ScopeBinding>,
    /// Wire spellings of [`InstanaPermission`] values.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl APIPermissionSetWithRoles {
    /// True if the set grants nothing.
    pub fn is_empty(&self) -> bool {
        self.scope_bindings().next().is_none() && self.permissions.is_empty()
    }

    fn scope_bindings(&self) -> impl Iterator<Item = &ScopeBinding> {
        self.application_ids
            .iter()
            .chain(self.infra_dfq_filter.iter())
            .chain(self.kubernetes_cluster_uuids.iter())
            .chain(self.kubernetes_namespace_uids.iter())
            .chain(self.mobile_app_ids.iter())
            .chain(self.website_ids.iter())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for binding in self.scope_bindings() {
            require(&binding.scope_id, "ScopeID")?;
        }
        match self
            .permissions
            .iter()
            .find(|p| !InstanaPermission::is_supported(p))
        {
            Some(p) => Err(ValidationError::new(format!(
                "Permission {} is not valid",
                p
            ))),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<GroupMember>,
    #[serde(default)]
    pub permission_set: APIPermissionSetWithRoles,
}

impl InstanaDataObject for Group {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.name, "Name")?;
        for member in &self.members {
            require(&member.user_id, "UserID of group member")?;
        }
        self.permission_set.validate()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn group() -> Group {
        Group {
            id: "group-id".to_string(),
            name: "group".to_string(),
            members: vec![GroupMember {
                user_id: "user-1".to_string(),
                email: Some("user-1@example.com".to_string()),
            }],
            permission_set: APIPermissionSetWithRoles {
                application_ids: vec![ScopeBinding::new("app-1")],
                infra_dfq_filter: Some(ScopeBinding {
                    scope_id: "entity.zone:prod".to_string(),
                    scope_role_id: Some("-100".to_string()),
                }),
                permissions: vec![
                    InstanaPermission::CanViewLogs.to_string(),
                    InstanaPermission::CanConfigureTeams.to_string(),
                ],
                ..Default::default()
            },
        }
    }

    #[test]
    fn valid_group_passes() {
        assert_eq!(group().validate(), Ok(()));
    }

    #[test]
    fn unsupported_permissions_are_rejected() {
        let mut group = group();
        group.permission_set.permissions.push("CAN_FLY".to_string());
        assert_eq!(
            group.validate().unwrap_err().message(),
            "Permission CAN_FLY is not valid"
        );
    }

    #[test]
    fn scope_ids_and_members_are_required() {
        let mut g = group();
        g.permission_set.website_ids.push(ScopeBinding::new(""));
        assert_eq!(g.validate().unwrap_err().message(), "ScopeID is missing");

        let mut g = group();
        g.members[0].user_id.clear();
        assert_eq!(
            g.validate().unwrap_err().message(),
            "UserID of group member is missing"
        );
    }

    #[test]
    fn permission_set_emptiness() {
        assert!(APIPermissionSetWithRoles::default().is_empty());
        assert!(!group().permission_set.is_empty());

        let only_filter = APIPermissionSetWithRoles {
            infra_dfq_filter: Some(ScopeBinding::new("entity.zone:prod")),
            ..Default::default()
        };
        assert!(!only_filter.is_empty());

        let only_permission = APIPermissionSetWithRoles {
            permissions: vec!["CAN_VIEW_LOGS".to_string()],
            ..Default::default()
        };
        assert!(!only_permission.is_empty());
    }

    #[test]
    fn kubernetes_scopes_use_upper_case_suffixes() {
        let set = APIPermissionSetWithRoles {
            kubernetes_cluster_uuids: vec![ScopeBinding::new("cluster")],
            kubernetes_namespace_uids: vec![ScopeBinding::new("ns")],
            ..Default::default()
        };
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["kubernetesClusterUUIDs"][0]["scopeId"], "cluster");
        assert_eq!(json["kubernetesNamespaceUIDs"][0]["scopeId"], "ns");
        assert!(json.get("infraDfqFilter").is_none());
    }
}
