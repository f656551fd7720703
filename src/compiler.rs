//! Translate a normalized [`Request`] into billing API query parameters.
//!
//! Everything here is pure. Preconditions (dimension vocabulary, at most two
//! dimension filters) are checked by [`Request::validate`] before compiling.

use crate::constants::{DISCOUNT_RECORD_TYPES, FORECAST_PREDICTION_INTERVAL};
use crate::error::{CexError, Result};
use crate::types::{
    CostAndUsageQuery, CostMetric, DateInterval, Dimension, Expression, ForecastQuery,
    GroupDefinition, Request,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Build the group-by list.
///
/// A single dimension with a single tag yields the dimension first; that
/// order decides how `Service::keys` are indexed downstream. Any other
/// request with tags groups by the tags alone and drops the dimensions.
pub fn compile_group_by(dimensions: &[String], tags: &[String]) -> Vec<GroupDefinition> {
    if tags.len() == 1 && dimensions.len() == 1 {
        dimensions
            .iter()
            .map(GroupDefinition::dimension)
            .chain(tags.iter().map(GroupDefinition::tag))
            .collect()
    } else if !tags.is_empty() {
        tags.iter().map(GroupDefinition::tag).collect()
    } else {
        dimensions.iter().map(GroupDefinition::dimension).collect()
    }
}

/// Build the filter expression, `None` when the request filters nothing.
///
/// Filters are appended discount exclusion first, then the tag filter, then
/// the dimension filters in key order. A single filter is returned bare;
/// several are wrapped in one `And`.
pub fn compile_filter(request: &Request) -> Option<Expression> {
    let mut filters = Vec::new();

    if request.exclude_discounts {
        filters.push(discount_exclusion());
    }

    if request.filter_by_tag {
        match request.group_by_tags.first() {
            Some(key) if !key.is_empty() => filters.push(Expression::tag(
                key.as_str(),
                vec![request.tag_filter_value.clone()],
            )),
            // No tag key to filter on: pass an empty node through
            _ => filters.push(Expression::Empty),
        }
    }

    if request.filter_by_dimension {
        filters.extend(
            request
                .dimension_filter
                .iter()
                .map(|(key, value)| Expression::dimension(key.as_str(), vec![value.clone()])),
        );
    }

    debug!(filters = filters.len(), "compiled cost filter");
    combine(filters)
}

/// Build the forecast filter from dimension filters only.
///
/// One filter becomes a bare dimension leaf, several become one `And`. The
/// first candidate expression built wins.
pub fn compile_forecast_filter(dimension_filter: &BTreeMap<String, String>) -> Option<Expression> {
    let mut candidates = Vec::new();
    let mut conjunction = Vec::new();

    for (key, value) in dimension_filter {
        let leaf = Expression::dimension(key.as_str(), vec![value.clone()]);
        if dimension_filter.len() == 1 {
            candidates.push(leaf);
        } else {
            conjunction.push(leaf);
        }
    }

    if !conjunction.is_empty() {
        candidates.push(Expression::And(conjunction));
    }

    candidates.into_iter().next()
}

/// Compile the full GetCostAndUsage request body
pub fn compile_cost_and_usage(request: &Request) -> CostAndUsageQuery {
    CostAndUsageQuery {
        time_period: time_period(request),
        granularity: request.granularity,
        metrics: request.metrics.clone(),
        group_by: compile_group_by(&request.group_by_dimensions, &request.group_by_tags),
        filter: compile_filter(request),
    }
}

/// Compile the GetCostForecast request body.
///
/// Forecasts take one metric (the first requested) and cannot filter on tags.
pub fn compile_forecast(request: &Request) -> Result<ForecastQuery> {
    if request.filter_by_tag {
        return Err(CexError::compilation(
            "tag filters are not supported for forecasts",
        ));
    }

    let metric = request
        .metrics
        .first()
        .copied()
        .unwrap_or(CostMetric::UnblendedCost);

    let filter = if request.filter_by_dimension {
        compile_forecast_filter(&request.dimension_filter)
    } else {
        None
    };

    Ok(ForecastQuery {
        time_period: time_period(request),
        metric,
        granularity: request.granularity,
        prediction_interval_level: FORECAST_PREDICTION_INTERVAL,
        filter,
    })
}

fn discount_exclusion() -> Expression {
    Expression::not(Expression::dimension(
        Dimension::RecordType.as_str(),
        DISCOUNT_RECORD_TYPES.iter().map(|s| s.to_string()).collect(),
    ))
}

fn combine(mut filters: Vec<Expression>) -> Option<Expression> {
    match filters.len() {
        0 => None,
        1 => filters.pop(),
        _ => Some(Expression::And(filters)),
    }
}

fn time_period(request: &Request) -> DateInterval {
    DateInterval {
        start: request.time_start.clone(),
        end: request.time_end.clone(),
    }
}
