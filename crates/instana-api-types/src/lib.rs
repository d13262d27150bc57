// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Definitions for the configuration objects exposed by the Instana REST API

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;
use thiserror::Error;

pub mod access;
pub mod alerting;
pub mod application;
pub mod application_alert;
pub mod custom_payload;
pub mod dashboard;
pub mod event_spec;
pub mod match_expression;
pub mod rbac;
pub mod rules;
pub mod sli;
pub mod synthetic;
pub mod tag_filter;
pub mod threshold;
pub mod vocabulary;
pub mod website;

pub use access::{AccessCapabilities, ApiToken, UserRole};
pub use alerting::{
    AlertingChannel, AlertingConfiguration, EventFilteringConfiguration,
};
pub use application::ApplicationConfig;
pub use application_alert::{
    ApplicationAlertConfig, ApplicationAlertRule, ApplicationTimeThreshold,
    IncludedApplication, IncludedEndpoint, IncludedService,
};
pub use custom_payload::{
    CustomPayloadField, CustomPayloadFieldValue, CustomPayloadFieldsAware,
    DynamicCustomPayloadFieldValue, StaticStringCustomPayloadFieldValue,
};
pub use dashboard::{AccessRule, CustomDashboard, Widgets};
pub use event_spec::{
    BuiltinEventSpecification, CustomEventSpecification,
    EventSpecificationDownstream, MetricPattern, RuleSpecification,
};
pub use match_expression::MatchExpression;
pub use rbac::{APIPermissionSetWithRoles, Group, GroupMember, ScopeBinding};
pub use rules::{Rule, RuleBinding};
pub use sli::{MetricConfiguration, SliConfig, SliEntity};
pub use synthetic::{
    SyntheticLocation, SyntheticTest, SyntheticTestConfiguration,
};
pub use tag_filter::{TagFilter, TagFilterExpressionElement, TagFilterValue};
pub use threshold::Threshold;
pub use vocabulary::Vocabulary;
pub use website::{
    WebsiteAlertConfig, WebsiteAlertRule, WebsiteMonitoringConfig,
    WebsiteTimeThreshold,
};

/// A configuration object managed through the Instana REST API.
pub trait InstanaDataObject:
    Serialize + Clone + Debug + Send + Sync + 'static
{
    /// The last segment of `{resource path}/{id}` for this object.
    fn id_for_resource_path(&self) -> &str;

    /// Checks the object before it is sent and after it is received.
    ///
    /// Returns the first violation found.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// A violated constraint of a configuration object, described by a message
/// naming the offending field.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// `"{field} is missing"`
    pub fn missing(field: &str) -> Self {
        Self(format!("{} is missing", field))
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub(crate) fn require(value: &str, field: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::missing(field));
    }
    Ok(())
}

pub(crate) fn require_opt(
    value: Option<&str>,
    field: &str,
) -> Result<(), ValidationError> {
    require(value.unwrap_or_default(), field)
}

pub(crate) fn all_unique<T: Eq + Hash>(items: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(item))
}

pub(crate) fn check_max_len(
    value: &str,
    max: usize,
    field: &str,
) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(format!(
            "{} must not exceed {} characters",
            field, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blank_strings_are_missing() {
        assert_eq!(
            require("  ", "Name"),
            Err(ValidationError::new("Name is missing"))
        );
        assert!(require("name", "Name").is_ok());
        assert!(require_opt(None, "Query").is_err());
    }

    #[test]
    fn uniqueness() {
        assert!(all_unique(&["a", "b"]));
        assert!(!all_unique(&["a", "b", "a"]));
        assert!(all_unique::<String>(&[]));
    }

    #[test]
    fn length_limits_count_characters() {
        assert!(check_max_len("äöü", 3, "Name").is_ok());
        let err = check_max_len("abcd", 3, "Name").unwrap_err();
        assert_eq!(err.message(), "Name must not exceed 3 characters");
    }
}
