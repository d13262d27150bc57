// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service level indicator configurations.

use serde::{Deserialize, Serialize};

use crate::tag_filter::TagFilterExpressionElement;
use crate::vocabulary::{
    AggregationType, BoundaryScope, SliType, WebsiteBeaconType,
};
use crate::{require, InstanaDataObject, ValidationError, Vocabulary};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricConfiguration {
    pub metric_name: String,
    /// Wire spelling of an [`AggregationType`].
    pub metric_aggregation: String,
    pub threshold: f64,
}

/// The entity an SLI is computed for. `sli_type` decides which of the
/// optional fields are required.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliEntity {
    pub sli_type: SliType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_scope: Option<BoundaryScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beacon_type: Option<WebsiteBeaconType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_expression: Option<TagFilterExpressionElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good_event_filter_expression: Option<TagFilterExpressionElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bad_event_filter_expression: Option<TagFilterExpressionElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_internal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_synthetic: Option<bool>,
}

impl SliEntity {
    pub fn new(sli_type: SliType) -> Self {
        Self {
            sli_type,
            application_id: None,
            service_id: None,
            endpoint_id: None,
            boundary_scope: None,
            website_id: None,
            beacon_type: None,
            filter_expression: None,
            good_event_filter_expression: None,
            bad_event_filter_expression: None,
            include_internal: None,
            include_synthetic: None,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let missing = |field: &str| {
            ValidationError::missing(&format!(
                "{} of {} SLI entity",
                field, self.sli_type
            ))
        };
        match self.sli_type {
            SliType::Application | SliType::Availability => {
                if self.application_id.as_deref().map_or(true, crate::is_blank)
                {
                    return Err(missing("ApplicationID"));
                }
                if self.boundary_scope.is_none() {
                    return Err(missing("BoundaryScope"));
                }
            }
            SliType::WebsiteEventBased | SliType::WebsiteTimeBased => {
                if self.website_id.as_deref().map_or(true, crate::is_blank) {
                    return Err(missing("WebsiteID"));
                }
                if self.beacon_type.is_none() {
                    return Err(missing("BeaconType"));
                }
            }
        }
        if matches!(
            self.sli_type,
            SliType::Availability | SliType::WebsiteEventBased
        ) {
            if self.good_event_filter_expression.is_none() {
                return Err(missing("GoodEventFilterExpression"));
            }
            if self.bad_event_filter_expression.is_none() {
                return Err(missing("BadEventFilterExpression"));
            }
        }
        for expr in [
            &self.filter_expression,
            &self.good_event_filter_expression,
            &self.bad_event_filter_expression,
        ]
        .into_iter()
        .flatten()
        {
            expr.validate()?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliConfig {
    pub id: String,
    pub sli_name: String,
    pub initial_evaluation_timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_configuration: Option<MetricConfiguration>,
    pub sli_entity: SliEntity,
}

impl InstanaDataObject for SliConfig {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.sli_name, "SliName")?;
        if let Some(metric) = &self.metric_configuration {
            require(&metric.metric_name, "MetricName")?;
            if !AggregationType::is_supported(&metric.metric_aggregation) {
                return Err(ValidationError::new(format!(
                    "MetricAggregation {} is not valid",
                    metric.metric_aggregation
                )));
            }
            if metric.threshold <= 0.0 {
                return Err(ValidationError::new(
                    "Threshold of metric configuration must be positive",
                ));
            }
        }
        self.sli_entity.validate()
    }
}
