// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Website monitoring configurations and smart alerts on websites.

use serde::{Deserialize, Serialize};

use crate::application_alert::{validate_granularity, validate_severity};
use crate::custom_payload::{
    validate_custom_payload_fields, CustomPayloadField,
    CustomPayloadFieldsAware,
};
use crate::tag_filter::TagFilterExpressionElement;
use crate::threshold::Threshold;
use crate::vocabulary::{
    AggregationType, ExpressionOperator, WebsiteAlertType,
    WebsiteImpactMeasurementMethod, WebsiteTimeThresholdType,
};
use crate::{require, InstanaDataObject, ValidationError};

/// A monitored website.
///
/// The server assigns `id` and `app_name` on creation; the name travels as a
/// query parameter rather than in the body.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteMonitoringConfig {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub app_name: String,
}

impl WebsiteMonitoringConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }
}

impl InstanaDataObject for WebsiteMonitoringConfig {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "Name")
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteAlertRule {
    pub alert_type: WebsiteAlertType,
    pub metric_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<AggregationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<ExpressionOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl WebsiteAlertRule {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.metric_name, "MetricName of rule")?;
        match self.alert_type {
            WebsiteAlertType::Slowness if self.aggregation.is_none() => Err(
                ValidationError::missing("Aggregation of slowness rule"),
            ),
            WebsiteAlertType::SpecificJsError
            | WebsiteAlertType::StatusCode => {
                let Some(operator) = self.operator else {
                    return Err(ValidationError::missing(&format!(
                        "Operator of {} rule",
                        self.alert_type
                    )));
                };
                if operator.is_comparison()
                    && self.value.as_deref().map_or(true, crate::is_blank)
                {
                    return Err(ValidationError::missing(&format!(
                        "Value of {} rule",
                        self.alert_type
                    )));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteTimeThreshold {
    #[serde(rename = "type")]
    pub threshold_type: WebsiteTimeThresholdType,
    pub time_window: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_measurement_method: Option<WebsiteImpactMeasurementMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<i32>,
}

impl WebsiteTimeThreshold {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.time_window <= 0 {
            return Err(ValidationError::new(
                "TimeWindow of time threshold must be positive",
            ));
        }
        match self.threshold_type {
            WebsiteTimeThresholdType::ViolationsInPeriod
                if self.violations.is_none() =>
            {
                Err(ValidationError::missing("Violations of time threshold"))
            }
            WebsiteTimeThresholdType::UserImpactOfViolationsInSequence => {
                if self.impact_measurement_method.is_none() {
                    return Err(ValidationError::missing(
                        "ImpactMeasurementMethod of time threshold",
                    ));
                }
                match (self.users, self.user_percentage) {
                    (None, None) => Err(ValidationError::new(
                        "Either Users or UserPercentage must be configured",
                    )),
                    (_, Some(p)) if !(p > 0.0 && p <= 1.0) => {
                        Err(ValidationError::new(format!(
                            "UserPercentage {} must be within (0, 1]",
                            p
                        )))
                    }
                    _ => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteAlertConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<i32>,
    pub triggering: bool,
    pub website_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_filter_expression: Option<TagFilterExpressionElement>,
    #[serde(default)]
    pub alert_channel_ids: Vec<String>,
    pub granularity: u64,
    #[serde(default)]
    pub custom_payload_fields: Vec<CustomPayloadField>,
    pub rule: WebsiteAlertRule,
    pub threshold: Threshold,
    pub time_threshold: WebsiteTimeThreshold,
}

impl InstanaDataObject for WebsiteAlertConfig {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.name, "Name")?;
        require(&self.description, "Description")?;
        validate_severity(self.severity)?;
        require(&self.website_id, "WebsiteID")?;
        validate_granularity(self.granularity)?;
        if let Some(expr) = &self.tag_filter_expression {
            expr.validate()?;
        }
        validate_custom_payload_fields(&self.custom_payload_fields)?;
        self.rule.validate()?;
        self.threshold.validate()?;
        self.time_threshold.validate()
    }
}

impl CustomPayloadFieldsAware for WebsiteAlertConfig {
    fn custom_payload_fields(&self) -> &[CustomPayloadField] {
        &self.custom_payload_fields
    }
}
