// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Smart alerts on application perspectives.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::custom_payload::{
    validate_custom_payload_fields, CustomPayloadField,
    CustomPayloadFieldsAware,
};
use crate::tag_filter::TagFilterExpressionElement;
use crate::threshold::Threshold;
use crate::vocabulary::{
    AggregationType, AlertSeverity, ApplicationAlertEvaluationType,
    ApplicationAlertType, BoundaryScope, ExpressionOperator, Granularity,
    LogLevel, TimeThresholdType,
};
use crate::{require, InstanaDataObject, ValidationError};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedEndpoint {
    pub endpoint_id: String,
    pub inclusive: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedService {
    pub service_id: String,
    pub inclusive: bool,
    #[serde(default)]
    pub endpoints: BTreeMap<String, IncludedEndpoint>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedApplication {
    pub application_id: String,
    pub inclusive: bool,
    #[serde(default)]
    pub services: BTreeMap<String, IncludedService>,
}

impl IncludedApplication {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.application_id, "ApplicationID")?;
        for service in self.services.values() {
            require(&service.service_id, "ServiceID")?;
            for endpoint in service.endpoints.values() {
                require(&endpoint.endpoint_id, "EndpointID")?;
            }
        }
        Ok(())
    }
}

/// The signal an application alert watches.
///
/// Which of the optional fields apply depends on `alert_type`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationAlertRule {
    pub alert_type: ApplicationAlertType,
    pub metric_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<AggregationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code_start: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code_end: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<ExpressionOperator>,
}

impl ApplicationAlertRule {
    pub fn new(alert_type: ApplicationAlertType, metric_name: &str) -> Self {
        Self {
            alert_type,
            metric_name: metric_name.to_string(),
            aggregation: None,
            status_code_start: None,
            status_code_end: None,
            level: None,
            message: None,
            operator: None,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.metric_name, "MetricName of rule")?;
        match self.alert_type {
            ApplicationAlertType::StatusCode => {
                if let (Some(start), Some(end)) =
                    (self.status_code_start, self.status_code_end)
                {
                    if start > end {
                        return Err(ValidationError::new(format!(
                            "StatusCodeStart {} must not be greater than \
                             StatusCodeEnd {}",
                            start, end
                        )));
                    }
                }
                Ok(())
            }
            ApplicationAlertType::Logs => {
                if self.level.is_none() {
                    return Err(ValidationError::missing("Level of logs rule"));
                }
                crate::require_opt(
                    self.message.as_deref(),
                    "Message of logs rule",
                )?;
                if self.operator.is_none() {
                    return Err(ValidationError::missing(
                        "Operator of logs rule",
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationTimeThreshold {
    #[serde(rename = "type")]
    pub threshold_type: TimeThresholdType,
    pub time_window: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<i32>,
}

impl ApplicationTimeThreshold {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.time_window <= 0 {
            return Err(ValidationError::new(
                "TimeWindow of time threshold must be positive",
            ));
        }
        match self.threshold_type {
            TimeThresholdType::ViolationsInPeriod
                if self.violations.is_none() =>
            {
                Err(ValidationError::missing("Violations of time threshold"))
            }
            TimeThresholdType::RequestImpact if self.requests.is_none() => {
                Err(ValidationError::missing("Requests of time threshold"))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationAlertConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Instana severity (5 or 10), see [`AlertSeverity`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<i32>,
    pub triggering: bool,
    pub applications: BTreeMap<String, IncludedApplication>,
    pub boundary_scope: BoundaryScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_filter_expression: Option<TagFilterExpressionElement>,
    pub include_internal: bool,
    pub include_synthetic: bool,
    pub evaluation_type: ApplicationAlertEvaluationType,
    #[serde(default)]
    pub alert_channel_ids: Vec<String>,
    /// Evaluation window in milliseconds, see [`Granularity`].
    pub granularity: u64,
    #[serde(default)]
    pub custom_payload_fields: Vec<CustomPayloadField>,
    pub rule: ApplicationAlertRule,
    pub threshold: Threshold,
    pub time_threshold: ApplicationTimeThreshold,
}

pub(crate) fn validate_severity(
    severity: Option<i32>,
) -> Result<(), ValidationError> {
    match severity {
        Some(s) if AlertSeverity::from_instana_severity(s).is_none() => Err(
            ValidationError::new(format!("Severity {} is not valid", s)),
        ),
        _ => Ok(()),
    }
}

pub(crate) fn validate_granularity(
    granularity: u64,
) -> Result<(), ValidationError> {
    if !Granularity::is_supported(granularity) {
        return Err(ValidationError::new(format!(
            "Granularity {} is not valid",
            granularity
        )));
    }
    Ok(())
}

impl InstanaDataObject for ApplicationAlertConfig {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.name, "Name")?;
        require(&self.description, "Description")?;
        validate_severity(self.severity)?;
        if self.applications.is_empty() {
            return Err(ValidationError::new("Applications are missing"));
        }
        for application in self.applications.values() {
            application.validate()?;
        }
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

impl CustomPayloadFieldsAware for ApplicationAlertConfig {
    fn custom_payload_fields(&self) -> &[CustomPayloadField] {
        &self.custom_payload_fields
    }
}
