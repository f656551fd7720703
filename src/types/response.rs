use super::expression::{DateInterval, GroupDefinition};
use serde::Deserialize;
use std::collections::BTreeMap;

// Raw billing API payloads, deserialized as returned by the provider

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetCostAndUsageResponse {
    #[serde(default)]
    pub results_by_time: Vec<ResultByTime>,
    #[serde(default)]
    pub group_definitions: Vec<GroupDefinition>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultByTime {
    pub time_period: DateInterval,
    #[serde(default)]
    pub total: BTreeMap<String, MetricValue>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub estimated: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricValue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricValue {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetCostForecastResponse {
    #[serde(default)]
    pub total: Option<MetricValue>,
    #[serde(default)]
    pub forecast_results_by_time: Vec<ForecastResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForecastResult {
    pub time_period: DateInterval,
    pub mean_value: String,
    #[serde(default)]
    pub prediction_interval_lower_bound: Option<String>,
    #[serde(default)]
    pub prediction_interval_upper_bound: Option<String>,
}
