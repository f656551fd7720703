use super::request::{CostMetric, Granularity};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Boolean filter tree understood by the billing API
///
/// Each node is exactly one of its shapes, so a leaf and an `And` wrapper
/// can never be populated on the same node. `Empty` serializes as `{}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Empty,
    And(Vec<Expression>),
    Not(Box<Expression>),
    Dimensions(DimensionValues),
    Tags(TagValues),
}

impl Expression {
    pub fn dimension(key: impl Into<String>, values: Vec<String>) -> Self {
        Expression::Dimensions(DimensionValues {
            key: key.into(),
            values,
        })
    }

    pub fn tag(key: impl Into<String>, values: Vec<String>) -> Self {
        Expression::Tags(TagValues {
            key: key.into(),
            values,
        })
    }

    pub fn not(inner: Expression) -> Self {
        Expression::Not(Box::new(inner))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Expression::Empty)
    }
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Expression::Empty => serializer.serialize_map(Some(0))?.end(),
            Expression::And(children) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("And", children)?;
                map.end()
            }
            Expression::Not(inner) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Not", inner)?;
                map.end()
            }
            Expression::Dimensions(values) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Dimensions", values)?;
                map.end()
            }
            Expression::Tags(values) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Tags", values)?;
                map.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DimensionValues {
    pub key: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagValues {
    pub key: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupDefinitionType {
    Dimension,
    Tag,
    CostCategory,
}

/// One group-by instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupDefinition {
    #[serde(rename = "Type")]
    pub kind: GroupDefinitionType,
    pub key: String,
}

impl GroupDefinition {
    pub fn dimension(key: impl Into<String>) -> Self {
        Self {
            kind: GroupDefinitionType::Dimension,
            key: key.into(),
        }
    }

    pub fn tag(key: impl Into<String>) -> Self {
        Self {
            kind: GroupDefinitionType::Tag,
            key: key.into(),
        }
    }

    pub fn is_tag(&self) -> bool {
        self.kind == GroupDefinitionType::Tag
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateInterval {
    pub start: String,
    pub end: String,
}

/// GetCostAndUsage request body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostAndUsageQuery {
    pub time_period: DateInterval,
    pub granularity: Granularity,
    pub metrics: Vec<CostMetric>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<GroupDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Expression>,
}

/// GetCostForecast request body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForecastQuery {
    pub time_period: DateInterval,
    pub metric: CostMetric,
    pub granularity: Granularity,
    pub prediction_interval_level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Expression>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expression_wire_shape() {
        let expr = Expression::And(vec![
            Expression::not(Expression::dimension(
                "RECORD_TYPE",
                vec!["Credit".to_string()],
            )),
            Expression::tag("team", vec!["core".to_string()]),
        ]);

        assert_eq!(
            serde_json::to_value(&expr).unwrap(),
            json!({
                "And": [
                    {"Not": {"Dimensions": {"Key": "RECORD_TYPE", "Values": ["Credit"]}}},
                    {"Tags": {"Key": "team", "Values": ["core"]}}
                ]
            })
        );
    }

    #[test]
    fn test_empty_expression_is_empty_object() {
        assert_eq!(serde_json::to_value(Expression::Empty).unwrap(), json!({}));
    }

    #[test]
    fn test_response_group_definitions_deserialize() {
        let groups: Vec<GroupDefinition> = serde_json::from_str(
            r#"[{"Type": "DIMENSION", "Key": "SERVICE"},
                {"Type": "COST_CATEGORY", "Key": "Team"}]"#,
        )
        .unwrap();

        assert_eq!(groups[0], GroupDefinition::dimension("SERVICE"));
        assert_eq!(groups[1].kind, GroupDefinitionType::CostCategory);
        assert!(!groups[1].is_tag());
    }

    #[test]
    fn test_group_definition_wire_shape() {
        assert_eq!(
            serde_json::to_value(GroupDefinition::tag("ApplicationName")).unwrap(),
            json!({"Type": "TAG", "Key": "ApplicationName"})
        );
    }
}
