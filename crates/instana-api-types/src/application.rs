// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

use crate::match_expression::MatchExpression;
use crate::vocabulary::{ApplicationConfigScope, BoundaryScope};
use crate::{require, InstanaDataObject, ValidationError, Vocabulary};

/// An application perspective.
///
/// `scope` and `boundary_scope` hold the wire spellings of
/// [`ApplicationConfigScope`] and [`BoundaryScope`] and are checked by
/// `validate`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationConfig {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_specification: Option<MatchExpression>,
    pub scope: String,
    pub boundary_scope: String,
}

impl InstanaDataObject for ApplicationConfig {
    fn id_for_resource_path(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.id, "ID")?;
        require(&self.label, "Label")?;
        match &self.match_specification {
            Some(spec) => spec.validate()?,
            None => return Err(ValidationError::missing("MatchSpecification")),
        }
        if !ApplicationConfigScope::is_supported(&self.scope) {
            return Err(ValidationError::new(format!(
                "Scope {} is not valid",
                self.scope
            )));
        }
        if !BoundaryScope::is_supported(&self.boundary_scope) {
            return Err(ValidationError::new(format!(
                "BoundaryScope {} is not valid",
                self.boundary_scope
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::vocabulary::{
        ExpressionOperator, LogicalOperatorType, TagFilterEntity,
    };

    fn match_specification() -> MatchExpression {
        MatchExpression::binary(
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
        )
    }

    #[test]
    fn round_trips_through_json() {
        let config = ApplicationConfig {
            id: "id".to_string(),
            label: "label".to_string(),
            match_specification: Some(match_specification()),
            scope: "scope".to_string(),
            boundary_scope: "boundaryScope".to_string(),
        };
        let bytes = serde_json::to_vec(&config).unwrap();
        let decoded: ApplicationConfig = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn validation() {
        let valid = ApplicationConfig {
            id: "id".to_string(),
            label: "label".to_string(),
            match_specification: Some(match_specification()),
            scope: ApplicationConfigScope::IncludeAllDownstream.to_string(),
            boundary_scope: BoundaryScope::Inbound.to_string(),
        };
        assert_eq!(valid.validate(), Ok(()));

        let mut config = valid.clone();
        config.match_specification = None;
        assert_eq!(
            config.validate().unwrap_err().message(),
            "MatchSpecification is missing"
        );

        let mut config = valid.clone();
        config.scope = "scope".to_string();
        assert_eq!(
            config.validate().unwrap_err().message(),
            "Scope scope is not valid"
        );

        let mut config = valid.clone();
        config.boundary_scope = "OUTBOUND".to_string();
        assert!(config.validate().unwrap_err().message().contains("OUTBOUND"));

        let mut config = valid;
        config.match_specification = Some(MatchExpression::unary(
            "key",
            TagFilterEntity::Source,
            ExpressionOperator::Equals,
        ));
        assert!(config.validate().is_err());
    }
}
