// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recursive predicates selecting the calls of an application perspective.
//!
//! On the wire every node carries a `type` discriminator: `BINARY_OP` nodes
//! join a `left` and a `right` subtree with a conjunction, `LEAF` nodes
//! match a single tag. Decoding peeks the discriminator first and only then
//! decodes the node body, recursing into the operands of binary operators.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::vocabulary::{
    ExpressionOperator, LogicalOperatorType, MatchExpressionEntity,
};
use crate::{require, ValidationError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum MatchExpression {
    #[serde(rename = "BINARY_OP")]
    BinaryOperator {
        left: Box<MatchExpression>,
        conjunction: LogicalOperatorType,
        right: Box<MatchExpression>,
    },
    #[serde(rename = "LEAF")]
    TagMatcher(TagMatcherExpression),
}

/// Matches a single tag of one side of a call.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagMatcherExpression {
    pub key: String,
    pub entity: MatchExpressionEntity,
    pub operator: ExpressionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Deserialize)]
struct BinaryOperatorEnvelope {
    left: Value,
    conjunction: LogicalOperatorType,
    right: Value,
}

impl MatchExpression {
    pub fn binary(
        left: MatchExpression,
        conjunction: LogicalOperatorType,
        right: MatchExpression,
    ) -> Self {
        MatchExpression::BinaryOperator {
            left: Box::new(left),
            conjunction,
            right: Box::new(right),
        }
    }

    /// A leaf comparing the tag `key` against `value`.
    pub fn comparison(
        key: impl Into<String>,
        entity: MatchExpressionEntity,
        operator: ExpressionOperator,
        value: impl Into<String>,
    ) -> Self {
        MatchExpression::TagMatcher(TagMatcherExpression {
            key: key.into(),
            entity,
            operator,
            value: Some(value.into()),
        })
    }

    /// A leaf testing the tag `key` without a value.
    pub fn unary(
        key: impl Into<String>,
        entity: MatchExpressionEntity,
        operator: ExpressionOperator,
    ) -> Self {
        MatchExpression::TagMatcher(TagMatcherExpression {
            key: key.into(),
            entity,
            operator,
            value: None,
        })
    }

    /// Joins `leaves` with `conjunction` into a balanced tree.
    ///
    /// The left operand of every binary node receives the larger half of the
    /// leaves, so the order of the leaves is kept when the tree is read from
    /// left to right. Returns `None` for an empty list.
    pub fn from_leaves(
        conjunction: LogicalOperatorType,
        mut leaves: Vec<MatchExpression>,
    ) -> Option<Self> {
        match leaves.len() {
            0 | 1 => leaves.pop(),
            n => {
                let right = leaves.split_off((n + 1) / 2);
                Some(Self::binary(
                    Self::from_leaves(conjunction, leaves)?,
                    conjunction,
                    Self::from_leaves(conjunction, right)?,
                ))
            }
        }
    }

    /// Number of nodes on the longest path from the root to a leaf.
    pub fn depth(&self) -> usize {
        match self {
            MatchExpression::BinaryOperator { left, right, .. } => {
                1 + left.depth().max(right.depth())
            }
            MatchExpression::TagMatcher(_) => 1,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            MatchExpression::BinaryOperator { left, right, .. } => {
                left.validate()?;
                right.validate()
            }
            MatchExpression::TagMatcher(leaf) => leaf.validate(),
        }
    }

    fn decode<E: de::Error>(value: Value) -> Result<Self, E> {
        let kind = value.get("type").and_then(Value::as_str).map(str::to_owned);
        match kind.as_deref() {
            Some("BINARY_OP") => {
                let envelope: BinaryOperatorEnvelope =
                    serde_json::from_value(value).map_err(E::custom)?;
                Ok(Self::binary(
                    Self::decode(envelope.left)?,
                    envelope.conjunction,
                    Self::decode(envelope.right)?,
                ))
            }
            Some("LEAF") => serde_json::from_value(value)
                .map(MatchExpression::TagMatcher)
                .map_err(E::custom),
            Some(other) => Err(E::custom(format!(
                "invalid expression type {}",
                other
            ))),
            None => Err(E::custom("invalid expression type: type is missing")),
        }
    }
}

impl TagMatcherExpression {
    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.key, "Key of tag matcher expression")?;
        let has_value = self.value.as_deref().is_some_and(|v| !v.is_empty());
        if self.operator.is_unary() && has_value {
            return Err(ValidationError::new(format!(
                "Value must not be set for unary operator {}",
                self.operator
            )));
        }
        if self.operator.is_comparison() && !has_value {
            return Err(ValidationError::new(format!(
                "Value is missing for comparison operator {}",
                self.operator
            )));
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for MatchExpression {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::decode(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    use crate::vocabulary::ExpressionOperator::*;
    use crate::vocabulary::LogicalOperatorType::*;
    use crate::vocabulary::TagFilterEntity::*;

    fn leaf(n: usize) -> MatchExpression {
        MatchExpression::comparison(format!("key{}", n), Source, Equals, "v")
    }

    #[test]
    fn encodes_with_type_discriminators() {
        let expr = MatchExpression::binary(
            MatchExpression::comparison("key", Destination, Equals, "value"),
            And,
            MatchExpression::unary("key", Destination, NotBlank),
        );
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(
            json,
            json!({
                "type": "BINARY_OP",
                "conjunction": "AND",
                "left": {
                    "type": "LEAF",
                    "key": "key",
                    "entity": "DESTINATION",
                    "operator": "EQUALS",
                    "value": "value"
                },
                "right": {
                    "type": "LEAF",
                    "key": "key",
                    "entity": "DESTINATION",
                    "operator": "NOT_BLANK"
                }
            })
        );
        let decoded: MatchExpression = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, expr);
    }

    #[test]
    fn nested_operands_keep_their_order_and_depth() {
        let expr = MatchExpression::binary(
            MatchExpression::binary(leaf(1), Or, leaf(2)),
            And,
            MatchExpression::binary(
                leaf(3),
                Or,
                MatchExpression::binary(leaf(4), And, leaf(5)),
            ),
        );
        let text = serde_json::to_string(&expr).unwrap();
        let decoded: MatchExpression = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded.depth(), 4);
        assert_eq!(decoded, expr);
    }

    #[test]
    fn unknown_discriminator_fails() {
        let err = serde_json::from_value::<MatchExpression>(json!({
            "type": "TERNARY_OP",
            "key": "key"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("invalid expression type TERNARY_OP"));

        let nested = json!({
            "type": "BINARY_OP",
            "conjunction": "AND",
            "left": {"type": "LEAF", "key": "k", "entity": "SOURCE", "operator": "IS_EMPTY"},
            "right": {"key": "k"}
        });
        assert!(serde_json::from_value::<MatchExpression>(nested).is_err());
    }

    #[test]
    fn unsupported_conjunction_fails_to_decode() {
        let json = json!({
            "type": "BINARY_OP",
            "conjunction": "XOR",
            "left": {"type": "LEAF", "key": "k", "entity": "SOURCE", "operator": "IS_EMPTY"},
            "right": {"type": "LEAF", "key": "k", "entity": "SOURCE", "operator": "IS_EMPTY"}
        });
        assert!(serde_json::from_value::<MatchExpression>(json).is_err());
    }

    #[test]
    fn operator_arity_is_validated() {
        let cases = vec![
            (MatchExpression::comparison("k", Source, Equals, "v"), true),
            (MatchExpression::unary("k", Source, Equals), false),
            (MatchExpression::comparison("k", Source, Equals, ""), false),
            (MatchExpression::unary("k", Source, IsEmpty), true),
            (MatchExpression::comparison("k", Source, NotBlank, "v"), false),
            (MatchExpression::unary("", Source, IsEmpty), false),
        ];
        for (expr, ok) in cases {
            assert_eq!(expr.validate().is_ok(), ok, "{:?}", expr);
        }

        let nested = MatchExpression::binary(
            leaf(1),
            And,
            MatchExpression::unary("k", Source, GreaterThan),
        );
        assert_eq!(
            nested.validate().unwrap_err().message(),
            "Value is missing for comparison operator GREATER_THAN"
        );
    }

    #[test]
    fn from_leaves_builds_a_balanced_tree() {
        assert_eq!(MatchExpression::from_leaves(And, vec![]), None);
        assert_eq!(MatchExpression::from_leaves(And, vec![leaf(1)]), Some(leaf(1)));

        let three = MatchExpression::from_leaves(Or, (1..=3).map(leaf).collect());
        assert_eq!(
            three,
            Some(MatchExpression::binary(
                MatchExpression::binary(leaf(1), Or, leaf(2)),
                Or,
                leaf(3),
            ))
        );

        let eight = MatchExpression::from_leaves(And, (1..=8).map(leaf).collect())
            .unwrap();
        assert_eq!(eight.depth(), 4);
    }
}
