// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Custom and built-in event specifications.

use serde::{Deserialize, Serialize};

use crate::application_alert::validate_severity;
use crate::vocabulary::{
    AggregationType, ConditionOperator, MatchingOperator,
    MetricPatternOperator, RuleType,
};
use crate::{require, require_opt, InstanaDataObject, ValidationError, Vocabulary};

/// Entity type an entity verification rule must be attached to.
pub const ENTITY_VERIFICATION_ENTITY_TYPE: &str = "host";

/// Selects metrics by name pattern instead of an exact name.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPattern {
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postfix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub operator: MetricPatternOperator,
}

/// The predicate of a custom event. The fields that apply depend on
/// `rule_type`; the others stay unset.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpecification {
    pub rule_type: RuleType,
    /// Instana severity (5 or 10).
    pub severity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_rule_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollup: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<i32>,
    /// Wire spelling of an [`AggregationType`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<String>,
    /// Wire spelling of a [`ConditionOperator`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_pattern: Option<MetricPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_entity_type: Option<String>,
    /// Wire spelling of a [`MatchingOperator`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_entity_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline_duration: Option<i32>,
}

impl RuleSpecification {
    fn empty(rule_type: RuleType, severity: i32) -> Self {
        Self {
            rule_type,
            severity,
            system_rule_id: None,
            metric_name: None,
            rollup: None,
            window: None,
            aggregation: None,
            condition_operator: None,
            condition_value: None,
            metric_pattern: None,
            matching_entity_type: None,
            matching_operator: None,
            matching_entity_label: None,
            offline_duration: None,
        }
    }

    pub fn system(system_rule_id: impl Into<String>, severity: i32) -> Self {
        Self {
            system_rule_id: Some(system_rule_id.into()),
            ..Self::empty(RuleType::System, severity)
        }
    }

    /// A threshold rule on `metric_name` evaluated over a window.
    pub fn threshold(
        metric_name: impl Into<String>,
        window: i32,
        aggregation: AggregationType,
        condition_operator: ConditionOperator,
        condition_value: f64,
        severity: i32,
    ) -> Self {
        Self {
            metric_name: Some(metric_name.into()),
            window: Some(window),
            aggregation: Some(aggregation.to_string()),
            condition_operator: Some(condition_operator.to_string()),
            condition_value: Some(condition_value),
            ..Self::empty(RuleType::Threshold, severity)
        }
    }

    pub fn entity_verification(
        matching_entity_type: impl Into<String>,
        matching_operator: MatchingOperator,
        matching_entity_label: impl Into<String>,
        offline_duration: i32,
        severity: i32,
    ) -> Self {
        Self {
            matching_entity_type: Some(matching_entity_type.into()),
            matching_operator: Some(matching_operator.to_string()),
            matching_entity_label: Some(matching_entity_label.into()),
            offline_duration: Some(offline_duration),
            ..Self::empty(RuleType::EntityVerification, severity)
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_severity(Some(self.severity))?;
        match self.rule_type {
            RuleType::System => {
                require_opt(self.system_rule_id.as_deref(), "SystemRuleID")
            }
            RuleType::Threshold => self.validate_threshold(),
            RuleType::EntityVerification => self.validate_entity_verification(),
        }
    }

    fn validate_threshold(&self) -> Result<(), ValidationError> {
        let has_name = self.metric_name.as_deref().is_some_and(|n| !crate::is_blank(n));
        match (has_name, &self.metric_pattern) {
            (true, None) => {}
            (false, Some(pattern)) => {
                require(&pattern.prefix, "Prefix of metric pattern")?;
            }
            _ => {
                return Err(ValidationError::new(
                    "Either MetricName or MetricPattern must be configured",
                ))
            }
        }
        let windowed = self.window.is_some() && self.aggregation.is_some();
        let rollup_only = self.rollup.is_some() && self.window.is_none();
        if !rollup_only && !windowed {
            return Err(ValidationError::new(
                "Either Rollup or Window and Aggregation must be configured",
            ));
        }
        if let Some(aggregation) = &self.aggregation {
            if !AggregationType::is_supported(aggregation) {
                return Err(ValidationError::new(format!(
                    "Aggregation {} is not valid",
                    aggregation
                )));
            }
        }
        let operator = self.condition_operator.as_deref().unwrap_or_default();
        require(operator, "ConditionOperator")?;
        if !ConditionOperator::is_supported(operator) {
            return Err(ValidationError::new(format!(
                "ConditionOperator {} is not valid",
                operator
            )));
        }
        if self.condition_value.is_none() {
            return Err(ValidationError::missing("ConditionValue"));
        }
        Ok(())
    }

    fn validate_entity_verification(&self) -> Result<(), ValidationError> {
        require_opt(self.matching_entity_type.as_deref(), "MatchingEntityType")?;
        let operator = self.matching_operator.as_deref().unwrap_or_default();
        require(operator, "MatchingOperator")?;
        if !MatchingOperator::is_supported(operator) {
            return Err(ValidationError::new(format!(
                "MatchingOperator {} is not valid",
                operator
            )));
        }
        require_opt(
            self.matching_entity_label.as_deref(),
            "MatchingEntityLabel",
        )?;
        if self.offline_duration.is_none() {
            return Err(ValidationError::missing("OfflineDuration"));
        }
        Ok(())
    }
}

/// Where events of a specification are sent besides the alerting
/// configurations that select them.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSpecificationDownstream {
    #[serde(default)]
    pub integration_ids: Vec<String>,
    pub broadcast_to_all_alerting_configs: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomEventSpecification {
    pub id: String,
    pub name: String,
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub triggering: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<i32>,
    pub enabled: bool,
    #[serde(default)]
    pub rules: Vec<RuleSpecification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downstream: Option<EventSpecificationDownstream>,
}

impl InstanaDataObject for CustomEventSpecification {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.name, "Name")?;
        require(&self.entity_type, "EntityType")?;
        let [rule] = self.rules.as_slice() else {
            return Err(ValidationError::new("exactly one rule must be defined"));
        };
        rule.validate()?;
        if rule.rule_type == RuleType::EntityVerification
            && self.entity_type != ENTITY_VERIFICATION_ENTITY_TYPE
        {
            return Err(ValidationError::new(format!(
                "EntityType must be {} for entity verification rules",
                ENTITY_VERIFICATION_ENTITY_TYPE
            )));
        }
        if let Some(downstream) = &self.downstream {
            if downstream.integration_ids.is_empty() {
                return Err(ValidationError::missing(
                    "IntegrationIDs of downstream",
                ));
            }
        }
        Ok(())
    }
}

/// An event specification shipped with Instana. Read only.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltinEventSpecification {
    pub id: String,
    pub short_plugin_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub severity: i32,
    pub triggering: bool,
    pub enabled: bool,
}

impl InstanaDataObject for BuiltinEventSpecification {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.short_plugin_id, "ShortPluginID")?;
        require(&self.name, "Name")?;
        validate_severity(Some(self.severity))
    }
}
