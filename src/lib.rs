// Module declarations
pub mod binning;
pub mod clients;
pub mod compiler;
pub mod config;
pub mod constants;
pub mod curator;
pub mod error;
pub mod formatting;
pub mod logging;
pub mod render;
pub mod sorter;
pub mod types;

// Re-export commonly used items
pub use binning::classify;
pub use compiler::{
    compile_cost_and_usage, compile_filter, compile_forecast, compile_forecast_filter,
    compile_group_by,
};
pub use curator::curate;
pub use error::{CexError, Result};
pub use render::{ReportInput, ReportWriter, Renderer};
pub use sorter::{SortBy, sort_services};
pub use types::{
    Cost, CostMetric, Expression, GetCostAndUsageResponse, GetCostForecastResponse, Granularity,
    GroupDefinition, Metric, OutputFormat, Request, Service, ServiceMap, VectorItem,
};
