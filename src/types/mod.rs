pub mod cost;
pub mod expression;
pub mod request;
pub mod response;
pub mod service;
pub mod vector;

pub use cost::Cost;
pub use expression::{
    CostAndUsageQuery, DateInterval, DimensionValues, Expression, ForecastQuery, GroupDefinition,
    GroupDefinitionType, TagValues,
};
pub use request::{CostMetric, Dimension, Granularity, OutputFormat, Request};
pub use response::{
    ForecastResult, GetCostAndUsageResponse, GetCostForecastResponse, Group, MetricValue,
    ResultByTime,
};
pub use service::{Metric, Service, ServiceMap};
pub use vector::{UpsertMetadata, UpsertVector, VectorItem, VectorMetadata};
