// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resource paths of the Instana REST API

pub const RULES: &str = "/api/settings/rules";
pub const RULE_BINDINGS: &str = "/api/settings/rule-bindings";
pub const ALERTING_CHANNELS: &str = "/api/events/settings/alertingChannels";
pub const ALERTING_CONFIGURATIONS: &str = "/api/events/settings/alerts";
pub const API_TOKENS: &str = "/api/settings/api-tokens";
pub const APPLICATION_CONFIGS: &str =
    "/api/application-monitoring/settings/application";
pub const APPLICATION_ALERT_CONFIGS: &str =
    "/api/events/settings/application-alert-configs";
pub const CUSTOM_EVENT_SPECIFICATIONS: &str =
    "/api/events/settings/event-specifications/custom";
pub const BUILTIN_EVENT_SPECIFICATIONS: &str =
    "/api/events/settings/event-specifications/built-in";
pub const USER_ROLES: &str = "/api/settings/roles";
pub const GROUPS: &str = "/api/settings/rbac/groups";
pub const CUSTOM_DASHBOARDS: &str = "/api/custom-dashboard";
pub const SLI_CONFIGS: &str = "/api/settings/sli";
pub const WEBSITE_MONITORING_CONFIGS: &str = "/api/website-monitoring/config";
pub const WEBSITE_ALERT_CONFIGS: &str =
    "/api/events/settings/website-alert-configs";
pub const SYNTHETIC_TESTS: &str = "/api/synthetics/settings/tests";
pub const SYNTHETIC_LOCATIONS: &str = "/api/synthetics/settings/locations";
