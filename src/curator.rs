use crate::error::{CexError, Result};
use crate::types::{GetCostAndUsageResponse, Group, Metric, Request, Service, ServiceMap};
use tracing::debug;

/// Flatten a raw response into services indexed by response position.
///
/// Buckets and their groups are walked in response order and the index keeps
/// counting across buckets. Metrics follow the request's metric order so that
/// `metrics[0]` is always the first requested metric; metrics missing from a
/// group are skipped.
pub fn curate(response: &GetCostAndUsageResponse, request: &Request) -> Result<ServiceMap> {
    let mut services = ServiceMap::new();

    for bucket in &response.results_by_time {
        for group in &bucket.groups {
            let service = Service {
                keys: group.keys.clone(),
                start: bucket.time_period.start.clone(),
                end: bucket.time_period.end.clone(),
                metrics: curate_metrics(group, request)?,
            };
            services.insert(services.len(), service);
        }
    }

    debug!(
        buckets = response.results_by_time.len(),
        services = services.len(),
        "curated cost response"
    );
    Ok(services)
}

fn curate_metrics(group: &Group, request: &Request) -> Result<Vec<Metric>> {
    if request.metrics.is_empty() {
        return group
            .metrics
            .iter()
            .map(|(name, value)| parse_metric(name, &value.amount, &value.unit))
            .collect();
    }

    request
        .metrics
        .iter()
        .filter_map(|metric| {
            group
                .metrics
                .get(metric.as_str())
                .map(|value| parse_metric(metric.as_str(), &value.amount, &value.unit))
        })
        .collect()
}

/// Parse a provider amount, rejecting `NaN` and infinities
pub(crate) fn parse_amount(metric: &str, amount: &str) -> Result<f64> {
    let invalid = |source| CexError::Curation {
        metric: metric.to_string(),
        amount: amount.to_string(),
        source,
    };

    let value = amount.trim().parse::<f64>().map_err(|e| invalid(Some(e)))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid(None))
    }
}

fn parse_metric(name: &str, amount: &str, unit: &str) -> Result<Metric> {
    let amount_float = parse_amount(name, amount)?;

    Ok(Metric {
        name: name.to_string(),
        amount: amount.to_string(),
        amount_float,
        unit: unit.to_string(),
    })
}
