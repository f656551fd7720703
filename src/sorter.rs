use crate::types::{Service, ServiceMap};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::cmp::Reverse;

/// Ordering applied to curated services before rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Descending by the first metric's amount
    #[default]
    Cost,
    /// Descending by bucket start
    Date,
}

impl SortBy {
    pub fn from_flag(sort_by_date: bool) -> Self {
        if sort_by_date { SortBy::Date } else { SortBy::Cost }
    }
}

/// Materialize services in index order, then stable-sort them.
///
/// Ties keep their curated index order.
pub fn sort_services(services: &ServiceMap, sort_by: SortBy) -> Vec<&Service> {
    let mut sorted: Vec<&Service> = services.values().collect();

    match sort_by {
        SortBy::Cost => {
            sorted.sort_by(|a, b| b.primary_amount().total_cmp(&a.primary_amount()))
        }
        SortBy::Date => {
            sorted.sort_by_cached_key(|service| Reverse(parse_start(&service.start)))
        }
    }

    sorted
}

/// Bucket starts are `YYYY-MM-DD`, or RFC 3339 for hourly buckets.
/// Anything else yields `None`, which sorts last.
fn parse_start(start: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = NaiveDate::parse_from_str(start, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    DateTime::parse_from_rfc3339(start)
        .ok()
        .map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metric;

    fn service(key: &str, start: &str, amount: f64) -> Service {
        Service {
            keys: vec![key.to_string()],
            start: start.to_string(),
            end: start.to_string(),
            metrics: vec![Metric {
                name: "UnblendedCost".to_string(),
                amount: amount.to_string(),
                amount_float: amount,
                unit: "USD".to_string(),
            }],
        }
    }

    fn services(entries: Vec<Service>) -> ServiceMap {
        entries.into_iter().enumerate().collect()
    }

    fn keys(sorted: &[&Service]) -> Vec<String> {
        sorted.iter().map(|s| s.primary_key().to_string()).collect()
    }

    #[test]
    fn test_sort_by_cost_descending() {
        let map = services(vec![
            service("a", "2024-01-01", 1.0),
            service("b", "2024-01-01", 30.0),
            service("c", "2024-01-01", 5.5),
        ]);

        assert_eq!(keys(&sort_services(&map, SortBy::Cost)), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_by_cost_is_stable() {
        let map = services(vec![
            service("first", "2024-01-01", 2.0),
            service("top", "2024-01-01", 9.0),
            service("second", "2024-01-01", 2.0),
            service("third", "2024-01-01", 2.0),
        ]);

        assert_eq!(
            keys(&sort_services(&map, SortBy::Cost)),
            vec!["top", "first", "second", "third"]
        );
    }

    #[test]
    fn test_sort_by_cost_with_nan_does_not_panic() {
        let entries = (0..40)
            .map(|i| {
                let amount = if i % 3 == 0 { f64::NAN } else { i as f64 };
                service(&format!("svc-{}", i), "2024-01-01", amount)
            })
            .collect();
        let map = services(entries);

        let sorted = sort_services(&map, SortBy::Cost);
        assert_eq!(sorted.len(), 40);
        // Positive NaN orders above every finite amount
        assert!(sorted[0].primary_amount().is_nan());
        assert_eq!(sorted[14].primary_amount(), 38.0);
        assert_eq!(sorted[39].primary_amount(), 1.0);
    }

    #[test]
    fn test_sort_by_date_descending_and_stable() {
        let map = services(vec![
            service("jan-a", "2024-01-01", 1.0),
            service("mar", "2024-03-01", 1.0),
            service("jan-b", "2024-01-01", 50.0),
            service("feb", "2024-02-01", 1.0),
        ]);

        assert_eq!(
            keys(&sort_services(&map, SortBy::Date)),
            vec!["mar", "feb", "jan-a", "jan-b"]
        );
    }

    #[test]
    fn test_sort_by_date_handles_hourly_and_garbage() {
        let map = services(vec![
            service("bad", "not-a-date", 1.0),
            service("early", "2024-01-01T01:00:00Z", 1.0),
            service("late", "2024-01-01T05:00:00Z", 1.0),
        ]);

        assert_eq!(
            keys(&sort_services(&map, SortBy::Date)),
            vec!["late", "early", "bad"]
        );
    }

    #[test]
    fn test_sort_by_flag() {
        assert_eq!(SortBy::from_flag(true), SortBy::Date);
        assert_eq!(SortBy::from_flag(false), SortBy::Cost);
    }
}
