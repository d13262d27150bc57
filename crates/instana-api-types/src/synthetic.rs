// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Synthetic monitoring tests and the locations they run from.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::vocabulary::SyntheticTestType;
use crate::{require, require_opt, InstanaDataObject, ValidationError};

pub const RETRIES: RangeInclusive<i32> = 0..=2;
pub const RETRY_INTERVAL_SECS: RangeInclusive<i32> = 1..=10;
pub const TEST_FREQUENCY_MINUTES: RangeInclusive<i32> = 1..=120;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticTestConfiguration {
    pub mark_synthetic_call: bool,
    pub retries: i32,
    pub retry_interval: i32,
    pub synthetic_type: SyntheticTestType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_redirect: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_insecure: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_status: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_match: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

impl SyntheticTestConfiguration {
    /// An `HTTPAction` test of `url` with default retry settings.
    pub fn http_action(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::empty(SyntheticTestType::HttpAction)
        }
    }

    pub fn http_script(script: impl Into<String>) -> Self {
        Self {
            script: Some(script.into()),
            ..Self::empty(SyntheticTestType::HttpScript)
        }
    }

    fn empty(synthetic_type: SyntheticTestType) -> Self {
        Self {
            mark_synthetic_call: false,
            retries: 0,
            retry_interval: 1,
            synthetic_type,
            timeout: None,
            url: None,
            operation: None,
            headers: BTreeMap::new(),
            body: None,
            validation_string: None,
            follow_redirect: None,
            allow_insecure: None,
            expect_status: None,
            expect_match: None,
            script: None,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self.synthetic_type {
            SyntheticTestType::HttpAction => {
                require_opt(self.url.as_deref(), "URL of HTTPAction test")?
            }
            SyntheticTestType::HttpScript => {
                require_opt(self.script.as_deref(), "Script of HTTPScript test")?
            }
        }
        check_range(self.retries, RETRIES, "Retries")?;
        check_range(self.retry_interval, RETRY_INTERVAL_SECS, "RetryInterval")
    }
}

fn check_range(
    value: i32,
    range: RangeInclusive<i32>,
    field: &str,
) -> Result<(), ValidationError> {
    if !range.contains(&value) {
        return Err(ValidationError::new(format!(
            "{} {} must be within {}..={}",
            field,
            value,
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticTest {
    /// Assigned by the server on creation.
    #[serde(default)]
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    pub configuration: SyntheticTestConfiguration,
    #[serde(default)]
    pub custom_properties: BTreeMap<String, String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_frequency: Option<i32>,
}

impl InstanaDataObject for SyntheticTest {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.label, "Label")?;
        if self.locations.is_empty() {
            return Err(ValidationError::new("Locations are missing"));
        }
        if let Some(frequency) = self.test_frequency {
            check_range(frequency, TEST_FREQUENCY_MINUTES, "TestFrequency")?;
        }
        self.configuration.validate()
    }
}

/// A point of presence synthetic tests are run from. Read only.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticLocation {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub location_type: String,
}

impl InstanaDataObject for SyntheticLocation {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.label, "Label")?;
        require(&self.location_type, "LocationType")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn synthetic_test() -> SyntheticTest {
        SyntheticTest {
            id: "test-id".to_string(),
            label: "homepage".to_string(),
            description: None,
            active: true,
            application_id: None,
            configuration: SyntheticTestConfiguration::http_action(
                "https://example.com",
            ),
            custom_properties: BTreeMap::from([(
                "team".to_string(),
                "web".to_string(),
            )]),
            locations: vec!["location-1".to_string()],
            playback_mode: None,
            test_frequency: Some(15),
        }
    }

    #[test]
    fn type_specific_fields() {
        assert_eq!(synthetic_test().validate(), Ok(()));

        let mut test = synthetic_test();
        test.configuration.url = None;
        assert_eq!(
            test.validate().unwrap_err().message(),
            "URL of HTTPAction test is missing"
        );

        test.configuration =
            SyntheticTestConfiguration::http_script("console.log(1)");
        assert_eq!(test.validate(), Ok(()));
        test.configuration.script = Some(String::new());
        assert!(test.validate().is_err());
    }

    #[test]
    fn locations_are_required() {
        let mut test = synthetic_test();
        test.locations.clear();
        assert_eq!(
            test.validate().unwrap_err().message(),
            "Locations are missing"
        );
    }

    #[test]
    fn ranges() {
        let cases: Vec<(fn(&mut SyntheticTest), bool)> = vec![
            (|t| t.configuration.retries = 2, true),
            (|t| t.configuration.retries = 3, false),
            (|t| t.configuration.retries = -1, false),
            (|t| t.configuration.retry_interval = 10, true),
            (|t| t.configuration.retry_interval = 0, false),
            (|t| t.test_frequency = Some(120), true),
            (|t| t.test_frequency = Some(121), false),
            (|t| t.test_frequency = None, true),
        ];
        for (i, (mutate, ok)) in cases.into_iter().enumerate() {
            let mut test = synthetic_test();
            mutate(&mut test);
            assert_eq!(test.validate().is_ok(), ok, "case {}", i);
        }
    }

    #[test]
    fn wire_form() {
        let json = serde_json::to_value(synthetic_test()).unwrap();
        assert_eq!(json["configuration"]["syntheticType"], "HTTPAction");
        assert_eq!(json["configuration"]["url"], "https://example.com");
        assert_eq!(json["customProperties"]["team"], "web");
        assert_eq!(json["testFrequency"], 15);
    }

    #[test]
    fn locations() {
        let location: SyntheticLocation =
            serde_json::from_str(
                r#"{"id":"l1","label":"Frankfurt","locationType":"Managed"}"#,
            )
            .unwrap();
        assert_eq!(location.validate(), Ok(()));
        assert_eq!(location.description, "");
    }
}
