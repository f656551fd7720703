use crate::config::VectorStoreConfig;
use crate::error::{CexError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Time-bucket size for cost queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    Daily,
    #[default]
    Monthly,
    Hourly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "DAILY",
            Granularity::Monthly => "MONTHLY",
            Granularity::Hourly => "HOURLY",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = CexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Granularity::Daily),
            "MONTHLY" => Ok(Granularity::Monthly),
            "HOURLY" => Ok(Granularity::Hourly),
            _ => Err(CexError::compilation(format!("unknown granularity '{}'", s))),
        }
    }
}

/// Cost and usage metrics the billing API can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostMetric {
    AmortizedCost,
    BlendedCost,
    NetAmortizedCost,
    NetUnblendedCost,
    NormalizedUsageAmount,
    UnblendedCost,
    UsageQuantity,
}

impl CostMetric {
    pub const ALL: [CostMetric; 7] = [
        CostMetric::AmortizedCost,
        CostMetric::BlendedCost,
        CostMetric::NetAmortizedCost,
        CostMetric::NetUnblendedCost,
        CostMetric::NormalizedUsageAmount,
        CostMetric::UnblendedCost,
        CostMetric::UsageQuantity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CostMetric::AmortizedCost => "AmortizedCost",
            CostMetric::BlendedCost => "BlendedCost",
            CostMetric::NetAmortizedCost => "NetAmortizedCost",
            CostMetric::NetUnblendedCost => "NetUnblendedCost",
            CostMetric::NormalizedUsageAmount => "NormalizedUsageAmount",
            CostMetric::UnblendedCost => "UnblendedCost",
            CostMetric::UsageQuantity => "UsageQuantity",
        }
    }
}

impl fmt::Display for CostMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CostMetric {
    type Err = CexError;

    fn from_str(s: &str) -> Result<Self> {
        CostMetric::ALL
            .into_iter()
            .find(|metric| metric.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CexError::compilation(format!("unknown metric '{}'", s)))
    }
}

/// Dimensions the billing API accepts for grouping and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Az,
    Service,
    UsageType,
    InstanceType,
    LinkedAccount,
    Operation,
    PurchaseType,
    Platform,
    Tenancy,
    RecordType,
    LegalEntityName,
    InvoicingEntity,
    DeploymentOption,
    DatabaseEngine,
    CacheEngine,
    InstanceTypeFamily,
    Region,
    BillingEntity,
    ReservationId,
    SavingsPlansType,
    SavingsPlanArn,
    OperatingSystem,
}

impl Dimension {
    pub const ALL: [Dimension; 22] = [
        Dimension::Az,
        Dimension::Service,
        Dimension::UsageType,
        Dimension::InstanceType,
        Dimension::LinkedAccount,
        Dimension::Operation,
        Dimension::PurchaseType,
        Dimension::Platform,
        Dimension::Tenancy,
        Dimension::RecordType,
        Dimension::LegalEntityName,
        Dimension::InvoicingEntity,
        Dimension::DeploymentOption,
        Dimension::DatabaseEngine,
        Dimension::CacheEngine,
        Dimension::InstanceTypeFamily,
        Dimension::Region,
        Dimension::BillingEntity,
        Dimension::ReservationId,
        Dimension::SavingsPlansType,
        Dimension::SavingsPlanArn,
        Dimension::OperatingSystem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Az => "AZ",
            Dimension::Service => "SERVICE",
            Dimension::UsageType => "USAGE_TYPE",
            Dimension::InstanceType => "INSTANCE_TYPE",
            Dimension::LinkedAccount => "LINKED_ACCOUNT",
            Dimension::Operation => "OPERATION",
            Dimension::PurchaseType => "PURCHASE_TYPE",
            Dimension::Platform => "PLATFORM",
            Dimension::Tenancy => "TENANCY",
            Dimension::RecordType => "RECORD_TYPE",
            Dimension::LegalEntityName => "LEGAL_ENTITY_NAME",
            Dimension::InvoicingEntity => "INVOICING_ENTITY",
            Dimension::DeploymentOption => "DEPLOYMENT_OPTION",
            Dimension::DatabaseEngine => "DATABASE_ENGINE",
            Dimension::CacheEngine => "CACHE_ENGINE",
            Dimension::InstanceTypeFamily => "INSTANCE_TYPE_FAMILY",
            Dimension::Region => "REGION",
            Dimension::BillingEntity => "BILLING_ENTITY",
            Dimension::ReservationId => "RESERVATION_ID",
            Dimension::SavingsPlansType => "SAVINGS_PLANS_TYPE",
            Dimension::SavingsPlanArn => "SAVINGS_PLAN_ARN",
            Dimension::OperatingSystem => "OPERATING_SYSTEM",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = CexError;

    fn from_str(s: &str) -> Result<Self> {
        Dimension::ALL
            .into_iter()
            .find(|dimension| dimension.as_str() == s)
            .ok_or_else(|| CexError::compilation(format!("unknown dimension '{}'", s)))
    }
}

/// Output backend selected for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Chart,
    Vector,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
            OutputFormat::Chart => "chart",
            OutputFormat::Vector => "vector",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = CexError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" | "stdout" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "chart" | "html" => Ok(OutputFormat::Chart),
            "vector" | "pinecone" => Ok(OutputFormat::Vector),
            _ => Err(CexError::compilation(format!("unknown output format '{}'", s))),
        }
    }
}

/// Normalized cost query, built once per invocation
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub granularity: Granularity,
    pub group_by_dimensions: Vec<String>,
    pub group_by_tags: Vec<String>,
    pub time_start: String,
    pub time_end: String,
    pub exclude_discounts: bool,
    pub filter_by_tag: bool,
    pub tag_filter_value: String,
    pub filter_by_dimension: bool,
    pub dimension_filter: BTreeMap<String, String>,
    pub metrics: Vec<CostMetric>,
    pub sort_by_date: bool,
    pub output_format: OutputFormat,
    pub vector_store: Option<VectorStoreConfig>,
}

impl Request {
    pub fn new(
        granularity: Granularity,
        time_start: impl Into<String>,
        time_end: impl Into<String>,
    ) -> Self {
        Self {
            granularity,
            time_start: time_start.into(),
            time_end: time_end.into(),
            metrics: vec![CostMetric::UnblendedCost],
            ..Default::default()
        }
    }

    pub fn with_dimensions<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by_dimensions = dimensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_metrics(mut self, metrics: Vec<CostMetric>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn excluding_discounts(mut self) -> Self {
        self.exclude_discounts = true;
        self
    }

    pub fn with_tag_filter(mut self, value: impl Into<String>) -> Self {
        self.filter_by_tag = true;
        self.tag_filter_value = value.into();
        self
    }

    pub fn with_dimension_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter_by_dimension = true;
        self.dimension_filter.insert(key.into(), value.into());
        self
    }

    pub fn sorted_by_date(mut self, sort_by_date: bool) -> Self {
        self.sort_by_date = sort_by_date;
        self
    }

    pub fn with_output(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_vector_store(mut self, config: VectorStoreConfig) -> Self {
        self.vector_store = Some(config);
        self
    }

    /// Check the preconditions the query compiler relies on
    pub fn validate(&self) -> Result<()> {
        for name in self
            .group_by_dimensions
            .iter()
            .chain(self.dimension_filter.keys())
        {
            name.parse::<Dimension>()?;
        }

        if self.dimension_filter.len() > 2 {
            return Err(CexError::compilation(format!(
                "at most two dimension filters are supported, got {}",
                self.dimension_filter.len()
            )));
        }

        if self.filter_by_dimension && self.dimension_filter.is_empty() {
            return Err(CexError::compilation(
                "dimension filter enabled without any KEY=VALUE pair",
            ));
        }

        if self.filter_by_tag && self.tag_filter_value.is_empty() {
            return Err(CexError::compilation("tag filter enabled without a value"));
        }

        if self.output_format == OutputFormat::Vector && self.vector_store.is_none() {
            return Err(CexError::compilation(
                "vector output requires vector store credentials",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_parsing() {
        assert_eq!("daily".parse::<Granularity>().unwrap(), Granularity::Daily);
        assert_eq!("MONTHLY".parse::<Granularity>().unwrap(), Granularity::Monthly);
        assert!("weekly".parse::<Granularity>().is_err());
        assert_eq!(Granularity::Hourly.to_string(), "HOURLY");
    }

    #[test]
    fn test_dimension_vocabulary() {
        assert_eq!(Dimension::ALL.len(), 22);
        for dimension in Dimension::ALL {
            assert_eq!(dimension.as_str().parse::<Dimension>().unwrap(), dimension);
        }
        assert!("SERVICES".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_metric_parsing_is_case_insensitive() {
        assert_eq!(
            "unblendedcost".parse::<CostMetric>().unwrap(),
            CostMetric::UnblendedCost
        );
        assert_eq!(
            serde_json::to_string(&CostMetric::NetAmortizedCost).unwrap(),
            "\"NetAmortizedCost\""
        );
    }

    #[test]
    fn test_validate_rejects_unknown_dimension() {
        let request = Request::new(Granularity::Daily, "2024-01-01", "2024-01-31")
            .with_dimensions(["NOT_A_DIMENSION"]);
        assert!(matches!(
            request.validate(),
            Err(CexError::Compilation { .. })
        ));
    }

    #[test]
    fn test_validate_limits_dimension_filters() {
        let request = Request::new(Granularity::Daily, "2024-01-01", "2024-01-31")
            .with_dimension_filter("SERVICE", "Amazon EC2")
            .with_dimension_filter("REGION", "us-east-1")
            .with_dimension_filter("AZ", "us-east-1a");
        assert!(request.validate().is_err());

        let request = Request::new(Granularity::Daily, "2024-01-01", "2024-01-31")
            .with_dimension_filter("SERVICE", "Amazon EC2")
            .with_dimension_filter("REGION", "us-east-1");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_vector_output_needs_credentials() {
        let request = Request::new(Granularity::Monthly, "2024-01-01", "2024-02-01")
            .with_output(OutputFormat::Vector);
        assert!(request.validate().is_err());
    }
}
