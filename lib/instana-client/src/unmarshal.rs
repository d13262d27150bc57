// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of response bodies into configuration objects

use std::marker::PhantomData;

use instana_api_types::CustomPayloadFieldsAware;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

use crate::error::Error;

/// Decodes response bodies into objects of type `T`.
#[cfg_attr(test, mockall::automock)]
pub trait JsonUnmarshaller<T: Send + Sync + 'static>: Send + Sync {
    fn unmarshal(&self, data: &[u8]) -> Result<T, Error>;

    /// Decodes a JSON array of objects.
    ///
    /// The body is first split into raw element fragments, each of which is
    /// handed to [`JsonUnmarshaller::unmarshal`], so recursive per-element
    /// decoding applies to every element.
    fn unmarshal_array(&self, data: &[u8]) -> Result<Vec<T>, Error> {
        let elements: Vec<Box<RawValue>> =
            serde_json::from_slice(data).map_err(Error::Decode)?;
        elements
            .iter()
            .map(|element| self.unmarshal(element.get().as_bytes()))
            .collect()
    }
}

/// Decodes `T` through its `serde` implementation.
pub struct DefaultJsonUnmarshaller<T> {
    _target: PhantomData<fn() -> T>,
}

impl<T> DefaultJsonUnmarshaller<T> {
    pub fn new() -> Self {
        Self { _target: PhantomData }
    }
}

impl<T> Default for DefaultJsonUnmarshaller<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned + Send + Sync + 'static> JsonUnmarshaller<T>
    for DefaultJsonUnmarshaller<T>
{
    fn unmarshal(&self, data: &[u8]) -> Result<T, Error> {
        serde_json::from_slice(data).map_err(Error::Decode)
    }
}

/// Wraps the unmarshaller of an object carrying custom payload fields and
/// rejects value cells whose shape contradicts the declared field type.
pub struct CustomPayloadFieldsUnmarshallerAdapter<T: Send + Sync + 'static> {
    inner: Box<dyn JsonUnmarshaller<T>>,
}

impl<T: CustomPayloadFieldsAware + Send + Sync + 'static>
    CustomPayloadFieldsUnmarshallerAdapter<T>
{
    pub fn new(inner: Box<dyn JsonUnmarshaller<T>>) -> Self {
        Self { inner }
    }

    fn check(object: &T) -> Result<(), Error> {
        for field in object.custom_payload_fields() {
            field.check_value_type().map_err(|msg| {
                Error::Decode(<serde_json::Error as serde::de::Error>::custom(
                    msg,
                ))
            })?;
        }
        Ok(())
    }
}

impl<T: CustomPayloadFieldsAware + Send + Sync + 'static> JsonUnmarshaller<T>
    for CustomPayloadFieldsUnmarshallerAdapter<T>
{
    fn unmarshal(&self, data: &[u8]) -> Result<T, Error> {
        let object = self.inner.unmarshal(data)?;
        Self::check(&object)?;
        Ok(object)
    }

    fn unmarshal_array(&self, data: &[u8]) -> Result<Vec<T>, Error> {
        let objects = self.inner.unmarshal_array(data)?;
        objects.iter().try_for_each(Self::check)?;
        Ok(objects)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use instana_api_types::{
        ApplicationConfig, CustomPayloadField, CustomPayloadFieldValue,
        DynamicCustomPayloadFieldValue, InstanaDataObject, MatchExpression,
        Rule, StaticStringCustomPayloadFieldValue, TagFilterExpressionElement,
    };
    use instana_api_types::vocabulary::{
        ExpressionOperator, LogicalOperatorType, TagFilterEntity,
    };
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Payload {
        custom_payload_fields: Vec<CustomPayloadField>,
    }

    impl CustomPayloadFieldsAware for Payload {
        fn custom_payload_fields(&self) -> &[CustomPayloadField] {
            &self.custom_payload_fields
        }
    }

    fn adapter() -> CustomPayloadFieldsUnmarshallerAdapter<Payload> {
        CustomPayloadFieldsUnmarshallerAdapter::new(Box::new(
            DefaultJsonUnmarshaller::new(),
        ))
    }

    #[test]
    fn application_config_round_trip() {
        let config = ApplicationConfig {
            id: "id".to_string(),
            label: "label".to_string(),
            match_specification: Some(MatchExpression::binary(
                MatchExpression::comparison(
                    "key",
                    TagFilterEntity::Destination,
                    ExpressionOperator::Equals,
                    "value",
                ),
                LogicalOperatorType::And,
                MatchExpression::unary(
                    "key",
                    TagFilterEntity::Destination,
                    ExpressionOperator::NotBlank,
                ),
            )),
            scope: "scope".to_string(),
            boundary_scope: "boundaryScope".to_string(),
        };
        let body = serde_json::to_vec(&config).unwrap();
        let decoded = DefaultJsonUnmarshaller::<ApplicationConfig>::new()
            .unmarshal(&body)
            .unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn malformed_tag_filter_expression_fails_decoding() {
        let result = DefaultJsonUnmarshaller::<TagFilterExpressionElement>::new()
            .unmarshal(br#"["foo","bar"]"#);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn arrays_are_decoded_per_element() {
        let rule = |id: &str, metric: &str| {
            json!({
                "id": id,
                "name": "cpu",
                "entityType": "host",
                "metricName": metric,
                "rollup": 1000,
                "window": 60000,
                "aggregation": "avg",
                "conditionOperator": ">",
                "conditionValue": 0.5,
            })
        };
        let body = json!([rule("r1", "cpu.user"), rule("r2", "cpu.sys")]);
        let rules = DefaultJsonUnmarshaller::<Rule>::new()
            .unmarshal_array(body.to_string().as_bytes())
            .unwrap();
        let ids: Vec<_> = rules.iter().map(|r| r.id_for_resource_path()).collect();
        assert_eq!(ids, ["r1", "r2"]);

        let result = DefaultJsonUnmarshaller::<Rule>::new()
            .unmarshal_array(br#"{"id":"r1"}"#);
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn mocked_inner_unmarshaller_drives_array_decoding() {
        let mut inner = MockJsonUnmarshaller::<Payload>::new();
        inner.expect_unmarshal_array().times(1).returning(|_| {
            Ok(vec![Payload {
                custom_payload_fields: vec![CustomPayloadField::static_string(
                    "team", "payments",
                )],
            }])
        });
        inner.expect_unmarshal().never();
        let adapter = CustomPayloadFieldsUnmarshallerAdapter::new(Box::new(inner));
        assert_eq!(adapter.unmarshal_array(b"[]").unwrap().len(), 1);
    }

    #[test]
    fn value_cells_follow_the_declared_type() {
        let body = json!({
            "customPayloadFields": [
                { "type": "staticString", "key": "team", "value": "payments" },
                {
                    "type": "dynamic",
                    "key": "host",
                    "value": { "tagName": "host.name", "key": "fqdn" },
                },
                { "type": "dynamic", "key": "zone", "value": { "tagName": "zone" } },
            ]
        });
        let payload = adapter().unmarshal(body.to_string().as_bytes()).unwrap();
        let values: Vec<_> = payload
            .custom_payload_fields
            .into_iter()
            .map(|field| field.value)
            .collect();
        assert_eq!(
            values,
            vec![
                CustomPayloadFieldValue::Static(
                    StaticStringCustomPayloadFieldValue("payments".to_string())
                ),
                CustomPayloadFieldValue::Dynamic(DynamicCustomPayloadFieldValue {
                    tag_name: "host.name".to_string(),
                    key: Some("fqdn".to_string()),
                }),
                CustomPayloadFieldValue::Dynamic(DynamicCustomPayloadFieldValue {
                    tag_name: "zone".to_string(),
                    key: None,
                }),
            ]
        );
    }

    #[test]
    fn contradicting_value_cells_are_decode_errors() {
        let body = json!({
            "customPayloadFields": [
                {
                    "type": "staticString",
                    "key": "team",
                    "value": { "tagName": "team" },
                },
            ]
        });
        match adapter().unmarshal(body.to_string().as_bytes()) {
            Err(Error::Decode(e)) => assert!(e.to_string().contains("team")),
            other => panic!("unexpected result: {:?}", other),
        }

        let body = json!([{
            "customPayloadFields": [
                { "type": "dynamic", "key": "host", "value": "host.name" },
            ]
        }]);
        assert!(matches!(
            adapter().unmarshal_array(body.to_string().as_bytes()),
            Err(Error::Decode(_))
        ));
    }
}
