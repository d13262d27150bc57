// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use instana_api_types::vocabulary::{
    ExpressionOperator, LogicalOperatorType, TagFilterEntity,
};
use instana_api_types::{
    ApplicationConfig, CustomPayloadFieldValue, MatchExpression,
    WebsiteMonitoringConfig,
};
use instana_client::{Error, InstanaApi, InstanaRestClient};
use serde_json::json;
use slog::{o, Drain, Logger};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_logger() -> Logger {
    let dec = slog_term::PlainSyncDecorator::new(slog_term::TestStdoutWriter);
    let drain = slog_term::FullFormat::new(dec).build().fuse();
    Logger::root(drain, o!("component" => "api-test"))
}

fn api(server: &MockServer) -> InstanaApi {
    let client = InstanaRestClient::with_base_url(
        "secret-token",
        &server.uri(),
        reqwest::Client::new(),
        test_logger(),
    )
    .unwrap();
    InstanaApi::with_client(Arc::new(client))
}

fn application_config() -> ApplicationConfig {
    ApplicationConfig {
        id: "app-1".to_string(),
        label: "shop".to_string(),
        match_specification: MatchExpression::from_leaves(
            LogicalOperatorType::And,
            vec![
                MatchExpression::comparison(
                    "service.name",
                    TagFilterEntity::Destination,
                    ExpressionOperator::Equals,
                    "checkout",
                ),
                MatchExpression::unary(
                    "kubernetes.namespace",
                    TagFilterEntity::Destination,
                    ExpressionOperator::NotBlank,
                ),
                MatchExpression::comparison(
                    "zone",
                    TagFilterEntity::Source,
                    ExpressionOperator::StartsWith,
                    "eu-",
                ),
            ],
        ),
        scope: "INCLUDE_ALL_DOWNSTREAM".to_string(),
        boundary_scope: "INBOUND".to_string(),
    }
}

fn website_alert_config(payload_value: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "wa-1",
        "name": "slow pages",
        "description": "page loads are slow",
        "severity": 5,
        "triggering": false,
        "websiteId": "website-1",
        "alertChannelIds": [],
        "granularity": 600000,
        "customPayloadFields": [
            { "type": "staticString", "key": "team", "value": payload_value },
        ],
        "rule": { "alertType": "throughput", "metricName": "pageLoads" },
        "threshold": { "type": "staticThreshold", "operator": ">", "value": 10.0 },
        "timeThreshold": { "type": "violationsInSequence", "timeWindow": 600000 },
    })
}

fn application_alert_config(
    tag_filter_expression: serde_json::Value,
) -> serde_json::Value {
    json!({
        "id": "aa-1",
        "name": "slow checkout",
        "description": "checkout is slow",
        "severity": 10,
        "triggering": false,
        "applications": {
            "app-1": { "applicationId": "app-1", "inclusive": true },
        },
        "boundaryScope": "INBOUND",
        "tagFilterExpression": tag_filter_expression,
        "includeInternal": false,
        "includeSynthetic": false,
        "evaluationType": "PER_AP",
        "alertChannelIds": [],
        "granularity": 600000,
        "customPayloadFields": [],
        "rule": { "alertType": "slowness", "metricName": "latency" },
        "threshold": { "type": "staticThreshold", "operator": ">", "value": 500.0 },
        "timeThreshold": { "type": "violationsInSequence", "timeWindow": 600000 },
    })
}

#[tokio::test]
async fn application_config_lifecycle() {
    let server = MockServer::start().await;
    let config = application_config();
    let wire = serde_json::to_value(&config).unwrap();
    Mock::given(method("PUT"))
        .and(path("/api/application-monitoring/settings/application/app-1"))
        .and(body_json(&wire))
        .respond_with(ResponseTemplate::new(200).set_body_json(&wire))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/application-monitoring/settings/application/app-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&wire))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/application-monitoring/settings/application/app-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = api(&server);
    let resource = api.application_configs();
    assert_eq!(resource.create(config.clone()).await.unwrap(), config);
    assert_eq!(resource.update(config.clone()).await.unwrap(), config);

    let read = resource.get_one("app-1").await.unwrap();
    assert_eq!(read.match_specification.map(|m| m.depth()), Some(3));
    resource.delete(&config).await.unwrap();
}

#[tokio::test]
async fn deleted_objects_are_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/settings/roles/role-1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = api(&server).user_roles().get_one("role-1").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn website_monitoring_config_is_created_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/website-monitoring/config"))
        .and(query_param("name", "N"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "website-1",
            "name": "N",
            "appName": "N",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = api(&server)
        .website_monitoring_configs()
        .create(WebsiteMonitoringConfig::named("N"))
        .await
        .unwrap();
    assert_eq!(created.id, "website-1");
}

#[tokio::test]
async fn website_alert_config_custom_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/settings/website-alert-configs/wa-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(website_alert_config(json!("web"))),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/events/settings/website-alert-configs/wa-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            website_alert_config(json!({ "tagName": "team" })),
        ))
        .mount(&server)
        .await;

    let api = api(&server);
    let config = api.website_alert_configs().get_one("wa-1").await.unwrap();
    assert!(matches!(
        &config.custom_payload_fields[0].value,
        CustomPayloadFieldValue::Static(v) if v.0 == "web"
    ));

    let err = api.website_alert_configs().get_one("wa-2").await.unwrap_err();
    assert!(matches!(err.error(), Error::Decode(_)));
}

#[tokio::test]
async fn builtin_event_specifications_are_listed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/settings/event-specifications/built-in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "b1",
                "shortPluginId": "host",
                "name": "Disk full",
                "severity": 10,
                "triggering": true,
                "enabled": true,
            },
            {
                "id": "b2",
                "shortPluginId": "jvm",
                "name": "GC pressure",
                "description": "Too much time spent in GC",
                "severity": 5,
                "triggering": false,
                "enabled": true,
            },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let specs = api(&server)
        .builtin_event_specifications()
        .get_all()
        .await
        .unwrap();
    let ids: Vec<_> = specs.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["b1", "b2"]);
}

#[tokio::test]
async fn invalid_objects_never_reach_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = application_config();
    config.scope = "EVERYTHING".to_string();
    let err = api(&server)
        .application_configs()
        .create(config.clone())
        .await
        .unwrap_err();
    match err.error() {
        Error::InvalidRequest(e) => {
            assert_eq!(e.message(), "Scope EVERYTHING is not valid")
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.object(), Some(&config));
}

#[tokio::test]
async fn malformed_tag_filter_expression_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/settings/application-alert-configs/aa-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            application_alert_config(json!({
                "type": "TAG_FILTER",
                "entity": "DESTINATION",
                "name": "call.type",
                "operator": "EQUALS",
                "stringValue": "HTTP",
            })),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/events/settings/application-alert-configs/aa-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            application_alert_config(json!(["foo", "bar"])),
        ))
        .mount(&server)
        .await;

    let api = api(&server);
    let config = api.application_alert_configs().get_one("aa-1").await.unwrap();
    assert!(config.tag_filter_expression.is_some());

    let err = api
        .application_alert_configs()
        .get_one("aa-2")
        .await
        .unwrap_err();
    assert!(matches!(err.error(), Error::Decode(_)), "{:?}", err);
    assert!(err.object().is_none());
}
