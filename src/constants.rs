/// Record types removed from results when discounts are excluded
pub const DISCOUNT_RECORD_TYPES: [&str; 7] = [
    "Refund",
    "Credit",
    "DiscountedUsage",
    "Discount",
    "BundledDiscount",
    "SavingsPlanCoveredUsage",
    "SavingsPlanNegation",
];

/// Vector store per-request item limit
pub const UPSERT_BATCH_SIZE: usize = 25;

/// Number of services plotted per pie chart
pub const CHART_TOP_N: usize = 15;

/// A divider row is inserted after this many table rows
pub const TABLE_DIVIDER_EVERY: usize = 10;

pub const CSV_HEADER: [&str; 8] = [
    "Dimension/Tag",
    "Dimension/Tag",
    "Metric",
    "Granularity",
    "Start",
    "End",
    "USD Amount",
    "Unit",
];

/// Confidence level requested for forecast prediction intervals
pub const FORECAST_PREDICTION_INTERVAL: u8 = 80;

/// Source tag written into vector metadata
pub const VECTOR_SOURCE: &str = "aws-cost-explorer";
