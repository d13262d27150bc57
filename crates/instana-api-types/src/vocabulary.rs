// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed value sets understood by the Instana API.
//!
//! Every vocabulary uses the same spelling on the wire (serde) and in its
//! string conversions (strum), so `Display`, `FromStr` and the JSON form of a
//! value always agree.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::VariantNames;

/// Operations shared by every closed value set.
pub trait Vocabulary: VariantNames + FromStr {
    /// Returns true if `value` is the wire spelling of a member of the set.
    fn is_supported(value: &str) -> bool {
        Self::VARIANTS.contains(&value)
    }

    /// Returns the wire spellings of all members, in declaration order.
    fn to_string_slice() -> &'static [&'static str] {
        Self::VARIANTS
    }
}

impl<T: VariantNames + FromStr> Vocabulary for T {}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:tt
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            Debug,
            Deserialize,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            strum::AsRefStr,
            strum::Display,
            strum::EnumIter,
            strum::EnumString,
            strum::VariantNames,
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                #[strum(serialize = $wire)]
                $variant,
            )+
        }
    };
}

vocabulary! {
    /// Aggregation applied to a metric before it is compared to a threshold.
    AggregationType {
        Sum => "sum",
        Mean => "mean",
        Max => "max",
        Min => "min",
        P25 => "p25",
        P50 => "p50",
        P75 => "p75",
        P90 => "p90",
        P95 => "p95",
        P98 => "p98",
        P99 => "p99",
        P99_9 => "p99_9",
        P99_99 => "p99_99",
        Distribution => "distribution",
        DistinctCount => "distinct_count",
        SumPositive => "sum_positive",
        PerSecond => "per_second",
        Increase => "increase",
    }
}

vocabulary! {
    /// Severity of a raised event.
    ///
    /// The API encodes severities as integers; see
    /// [`AlertSeverity::to_instana_severity`].
    AlertSeverity {
        Warning => "warning",
        Critical => "critical",
    }
}

impl AlertSeverity {
    /// Returns the integer the API uses for this severity.
    pub fn to_instana_severity(self) -> i32 {
        match self {
            AlertSeverity::Warning => 5,
            AlertSeverity::Critical => 10,
        }
    }

    /// Maps an API severity back to its symbolic form.
    pub fn from_instana_severity(severity: i32) -> Option<Self> {
        match severity {
            5 => Some(AlertSeverity::Warning),
            10 => Some(AlertSeverity::Critical),
            _ => None,
        }
    }

    /// All integer severities accepted by the API.
    pub fn supported_instana_severities() -> [i32; 2] {
        [5, 10]
    }
}

impl TryFrom<i32> for AlertSeverity {
    type Error = i32;

    fn try_from(severity: i32) -> Result<Self, Self::Error> {
        Self::from_instana_severity(severity).ok_or(severity)
    }
}

vocabulary! {
    /// The delivery mechanism of an alerting channel.
    AlertingChannelType {
        Email => "EMAIL",
        GoogleChat => "GOOGLE_CHAT",
        Office365 => "OFFICE_365",
        OpsGenie => "OPS_GENIE",
        PagerDuty => "PAGER_DUTY",
        Slack => "SLACK",
        Splunk => "SPLUNK",
        VictorOps => "VICTOR_OPS",
        Webhook => "WEB_HOOK",
    }
}

vocabulary! {
    /// The OpsGenie data center an OpsGenie channel delivers to.
    OpsGenieRegionType {
        Eu => "EU",
        Us => "US",
    }
}

vocabulary! {
    /// Event classes an alerting configuration can subscribe to.
    AlertEventType {
        Incident => "incident",
        Critical => "critical",
        Warning => "warning",
        Change => "change",
        Online => "online",
        Offline => "offline",
    }
}

vocabulary! {
    /// Comparison applied by a tag matcher or tag filter.
    ExpressionOperator {
        Equals => "EQUALS",
        NotEqual => "NOT_EQUAL",
        Contains => "CONTAINS",
        NotContain => "NOT_CONTAIN",
        StartsWith => "STARTS_WITH",
        EndsWith => "ENDS_WITH",
        NotStartsWith => "NOT_STARTS_WITH",
        NotEndsWith => "NOT_ENDS_WITH",
        GreaterOrEqualThan => "GREATER_OR_EQUAL_THAN",
        LessOrEqualThan => "LESS_OR_EQUAL_THAN",
        GreaterThan => "GREATER_THAN",
        LessThan => "LESS_THAN",
        IsEmpty => "IS_EMPTY",
        NotEmpty => "NOT_EMPTY",
        IsBlank => "IS_BLANK",
        NotBlank => "NOT_BLANK",
    }
}

impl ExpressionOperator {
    /// Unary operators test the tag itself and never carry a value.
    pub fn is_unary(self) -> bool {
        matches!(
            self,
            ExpressionOperator::IsEmpty
                | ExpressionOperator::NotEmpty
                | ExpressionOperator::IsBlank
                | ExpressionOperator::NotBlank
        )
    }

    /// Comparison operators compare the tag against a value.
    pub fn is_comparison(self) -> bool {
        !self.is_unary()
    }
}

vocabulary! {
    /// Logical operator joining the children of a binary operator or a tag
    /// filter expression.
    LogicalOperatorType {
        And => "AND",
        Or => "OR",
    }
}

vocabulary! {
    /// Side of a call a tag is read from.
    TagFilterEntity {
        Source => "SOURCE",
        Destination => "DESTINATION",
        NotApplicable => "NOT_APPLICABLE",
    }
}

/// Match expressions use the same entity sides as tag filters.
pub type MatchExpressionEntity = TagFilterEntity;

vocabulary! {
    /// Which downstream calls an application perspective includes.
    ApplicationConfigScope {
        IncludeNoDownstream => "INCLUDE_NO_DOWNSTREAM",
        IncludeImmediateDownstreamDatabaseAndMessaging =>
            "INCLUDE_IMMEDIATE_DOWNSTREAM_DATABASE_AND_MESSAGING",
        IncludeAllDownstream => "INCLUDE_ALL_DOWNSTREAM",
    }
}

vocabulary! {
    /// Which calls are considered to cross the boundary of an application.
    BoundaryScope {
        All => "ALL",
        Inbound => "INBOUND",
        Default => "DEFAULT",
    }
}

vocabulary! {
    /// Granularity at which an application alert is evaluated.
    ApplicationAlertEvaluationType {
        PerAp => "PER_AP",
        PerApService => "PER_AP_SERVICE",
    }
}

vocabulary! {
    /// Log level matched by a log alert rule.
    LogLevel {
        Warn => "WARN",
        Error => "ERROR",
        Any => "ANY",
    }
}

vocabulary! {
    /// Comparison of a metric against an alert threshold.
    ThresholdOperator {
        GreaterThan => ">",
        GreaterThanOrEqual => ">=",
        LessThan => "<",
        LessThanOrEqual => "<=",
    }
}

vocabulary! {
    /// How an alert threshold is derived.
    ThresholdType {
        Static => "staticThreshold",
        AdaptiveBaseline => "adaptiveBaseline",
    }
}

vocabulary! {
    /// How violations of an application alert are accumulated over time.
    TimeThresholdType {
        ViolationsInSequence => "violationsInSequence",
        ViolationsInPeriod => "violationsInPeriod",
        RequestImpact => "requestImpact",
    }
}

vocabulary! {
    /// How violations of a website alert are accumulated over time.
    WebsiteTimeThresholdType {
        ViolationsInSequence => "violationsInSequence",
        ViolationsInPeriod => "violationsInPeriod",
        UserImpactOfViolationsInSequence => "userImpactOfViolationsInSequence",
    }
}

vocabulary! {
    /// How affected users are counted for user impact time thresholds.
    WebsiteImpactMeasurementMethod {
        Aggregated => "AGGREGATED",
        PerWindow => "PER_WINDOW",
    }
}

vocabulary! {
    /// Kind of signal an application alert rule watches.
    ApplicationAlertType {
        ErrorRate => "errorRate",
        Errors => "errors",
        Logs => "logs",
        Slowness => "slowness",
        StatusCode => "statusCode",
        Throughput => "throughput",
    }
}

vocabulary! {
    /// Kind of signal a website alert rule watches.
    WebsiteAlertType {
        Slowness => "slowness",
        SpecificJsError => "specificJsError",
        StatusCode => "statusCode",
        Throughput => "throughput",
    }
}

vocabulary! {
    /// Comparison of a threshold rule specification.
    ConditionOperator {
        Equals => "=",
        NotEqual => "!=",
        LessThan => "<",
        LessThanOrEqual => "<=",
        GreaterThan => ">",
        GreaterThanOrEqual => ">=",
    }
}

vocabulary! {
    /// Comparison of an entity verification rule against entity labels.
    MatchingOperator {
        Is => "is",
        Contains => "contains",
        StartsWith => "startsWith",
        EndsWith => "endsWith",
    }
}

vocabulary! {
    /// Comparison of a metric pattern against metric names.
    MetricPatternOperator {
        Is => "is",
        Contains => "contains",
        Any => "any",
        StartsWith => "startsWith",
        EndsWith => "endsWith",
    }
}

vocabulary! {
    /// Discriminator of a custom event rule specification.
    RuleType {
        System => "system",
        Threshold => "threshold",
        EntityVerification => "entity_verification",
    }
}

vocabulary! {
    /// Level of access an access rule grants on a custom dashboard.
    AccessType {
        Read => "READ",
        ReadWrite => "READ_WRITE",
    }
}

vocabulary! {
    /// Kind of principal an access rule applies to.
    RelationType {
        User => "USER",
        ApiToken => "API_TOKEN",
        Role => "ROLE",
        Team => "TEAM",
        Global => "GLOBAL",
    }
}

vocabulary! {
    /// Kind of synthetic test.
    SyntheticTestType {
        HttpAction => "HTTPAction",
        HttpScript => "HTTPScript",
    }
}

vocabulary! {
    /// Kind of entity a service level indicator is computed for.
    SliType {
        Application => "application",
        Availability => "availability",
        WebsiteEventBased => "websiteEventBased",
        WebsiteTimeBased => "websiteTimeBased",
    }
}

vocabulary! {
    /// Beacon kind a website SLI is computed from.
    WebsiteBeaconType {
        PageLoad => "pageLoad",
        ResourceLoad => "resourceLoad",
        HttpRequest => "httpRequest",
        Error => "error",
        Custom => "custom",
        PageChange => "pageChange",
    }
}

vocabulary! {
    /// Whether a custom payload field carries a literal or a tag reference.
    CustomPayloadType {
        StaticString => "staticString",
        Dynamic => "dynamic",
    }
}

vocabulary! {
    /// Permissions grantable to a group.
    InstanaPermission {
        CanConfigureApplications => "CAN_CONFIGURE_APPLICATIONS",
        CanSeeOnPremLicenseInformation => "CAN_SEE_ON_PREM_LICENE_INFORMATION",
        CanConfigureEumApplications => "CAN_CONFIGURE_EUM_APPLICATIONS",
        CanConfigureAgents => "CAN_CONFIGURE_AGENTS",
        CanViewTraceDetails => "CAN_VIEW_TRACE_DETAILS",
        CanViewLogs => "CAN_VIEW_LOGS",
        CanConfigureSessionSettings => "CAN_CONFIGURE_SESSION_SETTINGS",
        CanConfigureIntegrations => "CAN_CONFIGURE_INTEGRATIONS",
        CanConfigureGlobalAlertConfigs => "CAN_CONFIGURE_GLOBAL_ALERT_CONFIGS",
        CanConfigureGlobalAlertPayload => "CAN_CONFIGURE_GLOBAL_ALERT_PAYLOAD",
        CanConfigureMobileAppMonitoring => "CAN_CONFIGURE_MOBILE_APP_MONITORING",
        CanConfigureApiTokens => "CAN_CONFIGURE_API_TOKENS",
        CanConfigureServiceLevelIndicators =>
            "CAN_CONFIGURE_SERVICE_LEVEL_INDICATORS",
        CanConfigureAuthenticationMethods =>
            "CAN_CONFIGURE_AUTHENTICATION_METHODS",
        CanConfigureReleases => "CAN_CONFIGURE_RELEASES",
        CanViewAuditLog => "CAN_VIEW_AUDIT_LOG",
        CanConfigureCustomAlerts => "CAN_CONFIGURE_CUSTOM_ALERTS",
        CanConfigureAgentRunMode => "CAN_CONFIGURE_AGENT_RUN_MODE",
        CanConfigureServiceMapping => "CAN_CONFIGURE_SERVICE_MAPPING",
        CanSeeUsageInformation => "CAN_SEE_USAGE_INFORMATION",
        CanEditAllAccessibleCustomDashboards =>
            "CAN_EDIT_ALL_ACCESSIBLE_CUSTOM_DASHBOARDS",
        CanConfigureUsers => "CAN_CONFIGURE_USERS",
        CanInstallNewAgents => "CAN_INSTALL_NEW_AGENTS",
        CanConfigureTeams => "CAN_CONFIGURE_TEAMS",
        CanCreatePublicCustomDashboards =>
            "CAN_CREATE_PUBLIC_CUSTOM_DASHBOARDS",
        CanConfigureLogManagement => "CAN_CONFIGURE_LOG_MANAGEMENT",
        CanViewAccountAndBillingInformation =>
            "CAN_VIEW_ACCOUNT_AND_BILLING_INFORMATION",
        CanConfigureAutomationActions => "CAN_CONFIGURE_AUTOMATION_ACTIONS",
    }
}

/// Evaluation window of an alert, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Granularity {
    FiveMinutes,
    TenMinutes,
    FifteenMinutes,
    TwentyMinutes,
    ThirtyMinutes,
}

impl Granularity {
    pub const ALL: [Granularity; 5] = [
        Granularity::FiveMinutes,
        Granularity::TenMinutes,
        Granularity::FifteenMinutes,
        Granularity::TwentyMinutes,
        Granularity::ThirtyMinutes,
    ];

    pub fn millis(self) -> u64 {
        match self {
            Granularity::FiveMinutes => 300_000,
            Granularity::TenMinutes => 600_000,
            Granularity::FifteenMinutes => 900_000,
            Granularity::TwentyMinutes => 1_200_000,
            Granularity::ThirtyMinutes => 1_800_000,
        }
    }

    pub fn is_supported(millis: u64) -> bool {
        Self::try_from(millis).is_ok()
    }

    /// The supported window sizes in milliseconds, ascending.
    pub fn supported_millis() -> [u64; 5] {
        Self::ALL.map(Granularity::millis)
    }
}

impl TryFrom<u64> for Granularity {
    type Error = u64;

    fn try_from(millis: u64) -> Result<Self, Self::Error> {
        Self::ALL.into_iter().find(|g| g.millis() == millis).ok_or(millis)
    }
}

impl From<Granularity> for u64 {
    fn from(granularity: Granularity) -> Self {
        granularity.millis()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn wire_spelling_matches_display() {
        for kind in AlertingChannelType::iter() {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
            assert_eq!(kind.to_string().parse::<AlertingChannelType>(), Ok(kind));
        }
        assert_eq!(ThresholdOperator::GreaterThanOrEqual.as_ref(), ">=");
        assert_eq!(
            serde_json::to_string(&AggregationType::P99_9).unwrap(),
            "\"p99_9\""
        );
    }

    #[test]
    fn is_supported_checks_wire_spelling() {
        assert!(OpsGenieRegionType::is_supported("EU"));
        assert!(OpsGenieRegionType::is_supported("US"));
        assert!(!OpsGenieRegionType::is_supported("eu"));
        assert!(!OpsGenieRegionType::is_supported("Invalid"));
        assert!(InstanaPermission::is_supported("CAN_VIEW_LOGS"));
        assert!(!InstanaPermission::is_supported("CAN_DO_EVERYTHING"));
    }

    #[test]
    fn to_string_slice_lists_all_members_in_order() {
        assert_eq!(LogicalOperatorType::to_string_slice(), &["AND", "OR"]);
        assert_eq!(
            AlertingChannelType::to_string_slice().len(),
            AlertingChannelType::iter().count()
        );
        assert_eq!(ExpressionOperator::to_string_slice()[0], "EQUALS");
    }

    #[test]
    fn unary_operators() {
        let unary: Vec<_> =
            ExpressionOperator::iter().filter(|op| op.is_unary()).collect();
        assert_eq!(
            unary,
            vec![
                ExpressionOperator::IsEmpty,
                ExpressionOperator::NotEmpty,
                ExpressionOperator::IsBlank,
                ExpressionOperator::NotBlank,
            ]
        );
        assert!(ExpressionOperator::GreaterThan.is_comparison());
    }

    #[test]
    fn severities_map_to_instana_integers() {
        for severity in AlertSeverity::iter() {
            assert_eq!(
                AlertSeverity::from_instana_severity(
                    severity.to_instana_severity()
                ),
                Some(severity)
            );
        }
        assert_eq!(AlertSeverity::from_instana_severity(7), None);
    }

    #[test]
    fn granularities() {
        assert_eq!(
            Granularity::supported_millis(),
            [300_000, 600_000, 900_000, 1_200_000, 1_800_000]
        );
        assert_eq!(Granularity::try_from(600_000), Ok(Granularity::TenMinutes));
        assert_eq!(Granularity::try_from(60_000), Err(60_000));
        assert!(!Granularity::is_supported(0));
    }
}
