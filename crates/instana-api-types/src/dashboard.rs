// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::vocabulary::{AccessType, RelationType};
use crate::{require, require_opt, InstanaDataObject, ValidationError};

/// Grants a principal access to a custom dashboard.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRule {
    pub access_type: AccessType,
    pub relation_type: RelationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
}

/// Widget definitions of a dashboard, kept byte for byte as received.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Widgets(pub Box<RawValue>);

impl Widgets {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        RawValue::from_string(json.to_string()).map(Widgets)
    }

    pub fn as_str(&self) -> &str {
        self.0.get()
    }
}

impl PartialEq for Widgets {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Widgets {}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDashboard {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub access_rules: Vec<AccessRule>,
    pub widgets: Widgets,
}

impl InstanaDataObject for CustomDashboard {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.title, "Title")?;
        for rule in &self.access_rules {
            if rule.relation_type != RelationType::Global {
                require_opt(rule.related_id.as_deref(), "RelatedID of access rule")?;
            }
        }
        if !self.widgets.as_str().trim_start().starts_with('[') {
            return Err(ValidationError::new("Widgets must be a JSON array"));
        }
        Ok(())
    }
}
