// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Threshold rules and the bindings that raise alerts from them.

use serde::{Deserialize, Serialize};

use crate::{require, InstanaDataObject, ValidationError};

/// A metric threshold rule.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub entity_type: String,
    pub metric_name: String,
    pub rollup: i32,
    pub window: i32,
    pub aggregation: String,
    pub condition_operator: String,
    pub condition_value: f64,
}

impl InstanaDataObject for Rule {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.name, "Name")?;
        require(&self.entity_type, "EntityType")?;
        require(&self.metric_name, "MetricName")?;
        require(&self.aggregation, "Aggregation")?;
        require(&self.condition_operator, "ConditionOperator")
    }
}

/// Binds a set of rules to an alert text, severity and query.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleBinding {
    pub id: String,
    pub enabled: bool,
    pub triggering: bool,
    pub severity: i32,
    pub text: String,
    pub description: String,
    pub expiration_time: i32,
    pub query: String,
    #[serde(default)]
    pub rule_ids: Vec<String>,
}

impl InstanaDataObject for RuleBinding {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.text, "Text")?;
        require(&self.description, "Description")?;
        require(&self.query, "Query")?;
        if self.rule_ids.is_empty() {
            return Err(ValidationError::missing("RuleIDs"));
        }
        Ok(())
    }
}
