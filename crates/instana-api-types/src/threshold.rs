// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

use crate::vocabulary::{ThresholdOperator, ThresholdType};
use crate::ValidationError;

/// The bound an alert rule's metric is compared against.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Threshold {
    #[serde(rename = "type")]
    pub threshold_type: ThresholdType,
    pub operator: ThresholdOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonality: Option<String>,
}

impl Threshold {
    pub fn static_threshold(operator: ThresholdOperator, value: f64) -> Self {
        Self {
            threshold_type: ThresholdType::Static,
            operator,
            value: Some(value),
            last_updated: None,
            deviation_factor: None,
            seasonality: None,
        }
    }

    pub fn adaptive_baseline(
        operator: ThresholdOperator,
        deviation_factor: f64,
        seasonality: impl Into<String>,
    ) -> Self {
        Self {
            threshold_type: ThresholdType::AdaptiveBaseline,
            operator,
            value: None,
            last_updated: None,
            deviation_factor: Some(deviation_factor),
            seasonality: Some(seasonality.into()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.threshold_type {
            ThresholdType::Static if self.value.is_none() => {
                Err(ValidationError::missing("Value of static threshold"))
            }
            ThresholdType::AdaptiveBaseline
                if self.deviation_factor.is_none() =>
            {
                Err(ValidationError::missing(
                    "Deviation factor of adaptive baseline threshold",
                ))
            }
            _ => Ok(()),
        }
    }
}
