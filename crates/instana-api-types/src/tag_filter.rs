// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tag filter expressions: AND/OR trees over typed tag predicates.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::vocabulary::{ExpressionOperator, LogicalOperatorType, TagFilterEntity};
use crate::{require, ValidationError};

/// A node of a tag filter expression tree.
///
/// Decoding dispatches on the `type` discriminator (`EXPRESSION` or
/// `TAG_FILTER`) before decoding the node itself, and keeps the order of the
/// `elements` of every expression.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TagFilterExpressionElement {
    #[serde(rename = "EXPRESSION", rename_all = "camelCase")]
    Expression {
        logical_operator: LogicalOperatorType,
        elements: Vec<TagFilterExpressionElement>,
    },
    #[serde(rename = "TAG_FILTER")]
    TagFilter(TagFilter),
}

/// A predicate over one tag of one side of a call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TagFilterWire", into = "TagFilterWire")]
pub struct TagFilter {
    pub entity: TagFilterEntity,
    pub name: String,
    pub operator: ExpressionOperator,
    pub value: Option<TagFilterValue>,
}

/// The value a tag is compared against.
#[derive(Clone, Debug, PartialEq)]
pub enum TagFilterValue {
    String(String),
    Number(i64),
    Boolean(bool),
    /// For tags holding key/value pairs, such as labels.
    KeyValue { key: String, value: String },
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct TagFilterWire {
    entity: TagFilterEntity,
    name: String,
    operator: ExpressionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    string_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    number_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boolean_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl TryFrom<TagFilterWire> for TagFilter {
    type Error = String;

    fn try_from(wire: TagFilterWire) -> Result<Self, Self::Error> {
        let cells = [
            wire.string_value.is_some(),
            wire.number_value.is_some(),
            wire.boolean_value.is_some(),
            wire.key.is_some(),
        ];
        if cells.iter().filter(|set| **set).count() > 1 {
            return Err(format!(
                "tag filter {} sets more than one of stringValue, \
                 numberValue, booleanValue and key",
                wire.name
            ));
        }
        if wire.key.is_none() && wire.value.is_some() {
            return Err(format!(
                "tag filter {} sets value without key",
                wire.name
            ));
        }
        let value = if let Some(s) = wire.string_value {
            Some(TagFilterValue::String(s))
        } else if let Some(n) = wire.number_value {
            Some(TagFilterValue::Number(n))
        } else if let Some(b) = wire.boolean_value {
            Some(TagFilterValue::Boolean(b))
        } else if let Some(key) = wire.key {
            Some(TagFilterValue::KeyValue {
                key,
                value: wire.value.unwrap_or_default(),
            })
        } else {
            None
        };
        Ok(TagFilter {
            entity: wire.entity,
            name: wire.name,
            operator: wire.operator,
            value,
        })
    }
}

impl From<TagFilter> for TagFilterWire {
    fn from(filter: TagFilter) -> Self {
        let mut wire = TagFilterWire {
            entity: filter.entity,
            name: filter.name,
            operator: filter.operator,
            string_value: None,
            number_value: None,
            boolean_value: None,
            key: None,
            value: None,
        };
        match filter.value {
            Some(TagFilterValue::String(s)) => wire.string_value = Some(s),
            Some(TagFilterValue::Number(n)) => wire.number_value = Some(n),
            Some(TagFilterValue::Boolean(b)) => wire.boolean_value = Some(b),
            Some(TagFilterValue::KeyValue { key, value }) => {
                wire.key = Some(key);
                wire.value = Some(value);
            }
            None => {}
        }
        wire
    }
}

impl TagFilter {
    pub fn new(
        entity: TagFilterEntity,
        name: impl Into<String>,
        operator: ExpressionOperator,
    ) -> Self {
        Self { entity, name: name.into(), operator, value: None }
    }

    pub fn with_string_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(TagFilterValue::String(value.into()));
        self
    }

    pub fn with_number_value(mut self, value: i64) -> Self {
        self.value = Some(TagFilterValue::Number(value));
        self
    }

    pub fn with_boolean_value(mut self, value: bool) -> Self {
        self.value = Some(TagFilterValue::Boolean(value));
        self
    }

    pub fn with_tag_key_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.value = Some(TagFilterValue::KeyValue {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "Name of tag filter")?;
        if self.operator.is_unary() && self.value.is_some() {
            return Err(ValidationError::new(format!(
                "Value of tag filter {} must not be set for unary operator {}",
                self.name, self.operator
            )));
        }
        if self.operator.is_comparison() && self.value.is_none() {
            return Err(ValidationError::new(format!(
                "Value of tag filter {} is missing for comparison operator {}",
                self.name, self.operator
            )));
        }
        if let Some(TagFilterValue::KeyValue { key, .. }) = &self.value {
            require(key, "Key of tag filter")?;
        }
        Ok(())
    }
}

impl From<TagFilter> for TagFilterExpressionElement {
    fn from(filter: TagFilter) -> Self {
        TagFilterExpressionElement::TagFilter(filter)
    }
}

impl TagFilterExpressionElement {
    pub fn and(elements: Vec<TagFilterExpressionElement>) -> Self {
        TagFilterExpressionElement::Expression {
            logical_operator: LogicalOperatorType::And,
            elements,
        }
    }

    pub fn or(elements: Vec<TagFilterExpressionElement>) -> Self {
        TagFilterExpressionElement::Expression {
            logical_operator: LogicalOperatorType::Or,
            elements,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            TagFilterExpressionElement::Expression { elements, .. } => {
                elements.iter().try_for_each(Self::validate)
            }
            TagFilterExpressionElement::TagFilter(filter) => filter.validate(),
        }
    }

    fn decode<E: de::Error>(value: Value) -> Result<Self, E> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ExpressionEnvelope {
            logical_operator: LogicalOperatorType,
            #[serde(default)]
            elements: Vec<Value>,
        }

        let kind = value.get("type").and_then(Value::as_str).map(str::to_owned);
        match kind.as_deref() {
            Some("EXPRESSION") => {
                let envelope: ExpressionEnvelope =
                    serde_json::from_value(value).map_err(E::custom)?;
                let elements = envelope
                    .elements
                    .into_iter()
                    .map(Self::decode)
                    .collect::<Result<Vec<_>, E>>()?;
                Ok(TagFilterExpressionElement::Expression {
                    logical_operator: envelope.logical_operator,
                    elements,
                })
            }
            Some("TAG_FILTER") => serde_json::from_value(value)
                .map(TagFilterExpressionElement::TagFilter)
                .map_err(E::custom),
            Some(other) => Err(E::custom(format!(
                "invalid tag filter element type {}",
                other
            ))),
            None => Err(E::custom(
                "invalid tag filter element: type is missing",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for TagFilterExpressionElement {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        Self::decode(Value::deserialize(deserializer)?)
    }
}
