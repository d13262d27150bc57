// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extra key/value pairs attached to the payload of an alert.

use serde::{Deserialize, Serialize};

use crate::vocabulary::CustomPayloadType;
use crate::{require, ValidationError};

/// A literal payload value.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StaticStringCustomPayloadFieldValue(pub String);

/// A payload value filled in from a tag of the event.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicCustomPayloadFieldValue {
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// The value cell of a custom payload field.
///
/// The wire form is untyped: a JSON string for static values and an object
/// for dynamic ones. Which of the two a field must hold is declared by
/// [`CustomPayloadField::field_type`]; see
/// [`CustomPayloadField::check_value_type`].
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CustomPayloadFieldValue {
    Static(StaticStringCustomPayloadFieldValue),
    Dynamic(DynamicCustomPayloadFieldValue),
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct CustomPayloadField {
    #[serde(rename = "type")]
    pub field_type: CustomPayloadType,
    pub key: String,
    pub value: CustomPayloadFieldValue,
}

impl CustomPayloadField {
    pub fn static_string(
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field_type: CustomPayloadType::StaticString,
            key: key.into(),
            value: CustomPayloadFieldValue::Static(
                StaticStringCustomPayloadFieldValue(value.into()),
            ),
        }
    }

    pub fn dynamic(
        key: impl Into<String>,
        tag_name: impl Into<String>,
        tag_key: Option<String>,
    ) -> Self {
        Self {
            field_type: CustomPayloadType::Dynamic,
            key: key.into(),
            value: CustomPayloadFieldValue::Dynamic(
                DynamicCustomPayloadFieldValue {
                    tag_name: tag_name.into(),
                    key: tag_key,
                },
            ),
        }
    }

    /// Checks that the decoded value cell has the shape announced by the
    /// field type.
    pub fn check_value_type(&self) -> Result<(), String> {
        match (self.field_type, &self.value) {
            (CustomPayloadType::StaticString, CustomPayloadFieldValue::Static(_))
            | (
                CustomPayloadType::Dynamic,
                CustomPayloadFieldValue::Dynamic(_),
            ) => Ok(()),
            (CustomPayloadType::StaticString, _) => Err(format!(
                "custom payload field {} is declared {} but holds a dynamic \
                 value",
                self.key, self.field_type
            )),
            (CustomPayloadType::Dynamic, _) => Err(format!(
                "custom payload field {} is declared {} but holds a static \
                 value",
                self.key, self.field_type
            )),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.key, "Key of custom payload field")?;
        self.check_value_type().map_err(ValidationError::new)?;
        match &self.value {
            CustomPayloadFieldValue::Static(value) => {
                require(&value.0, "Value of custom payload field")
            }
            CustomPayloadFieldValue::Dynamic(value) => {
                require(&value.tag_name, "Tag name of custom payload field")
            }
        }
    }
}

/// Implemented by entities carrying custom payload fields, so their value
/// cells can be checked after decoding.
pub trait CustomPayloadFieldsAware {
    fn custom_payload_fields(&self) -> &[CustomPayloadField];
}

pub(crate) fn validate_custom_payload_fields(
    fields: &[CustomPayloadField],
) -> Result<(), ValidationError> {
    fields.iter().try_for_each(CustomPayloadField::validate)
}
