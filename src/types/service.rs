use std::collections::BTreeMap;

/// Curated results keyed by their position in the provider response
pub type ServiceMap = BTreeMap<usize, Service>;

/// One provider result group for one time bucket
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    /// Group-by key values, in group definition order
    pub keys: Vec<String>,
    pub start: String,
    pub end: String,
    pub metrics: Vec<Metric>,
}

impl Service {
    #[inline]
    pub fn primary_key(&self) -> &str {
        self.keys.first().map(String::as_str).unwrap_or("")
    }

    /// Secondary group-by value, empty when grouped by a single key
    #[inline]
    pub fn secondary_key(&self) -> &str {
        self.keys.get(1).map(String::as_str).unwrap_or("")
    }

    /// Value of the first metric, the one ordering and charts are based on
    #[inline]
    pub fn primary_amount(&self) -> f64 {
        self.metrics.first().map(|m| m.amount_float).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: String,
    pub amount: String,
    pub amount_float: f64,
    pub unit: String,
}

impl Metric {
    #[inline]
    pub fn is_usd(&self) -> bool {
        self.unit == "USD"
    }
}
