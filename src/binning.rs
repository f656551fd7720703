use crate::formatting::format_currency;

/// Upper bounds paired with the label of the range they close.
///
/// A cost takes the label of the first bound at or above it. The zero bound
/// names itself; every other label describes the range below its bound.
const COST_BINS: [(f64, &str); 9] = [
    (0.0, "Zero"),
    (0.01, "Between 0 and 1"),
    (1.0, "Between 0 and 1"),
    (10.0, "Between 1 and 10"),
    (50.0, "Between 10 and 50"),
    (100.0, "Between 50 and 100"),
    (500.0, "Between 100 and 500"),
    (1000.0, "Between 500 and 1000"),
    (f64::INFINITY, "Over 1000"),
];

/// Name the display bucket of a cost
pub fn cost_label(cost: f64) -> &'static str {
    COST_BINS
        .iter()
        .find(|(bound, _)| *bound >= cost)
        .map(|(_, label)| *label)
        .unwrap_or(COST_BINS[COST_BINS.len() - 1].1)
}

/// Human-readable cost, e.g. "Between 1 and 10 ($4.20)"
pub fn classify(cost: f64) -> String {
    format!("{} ({})", cost_label(cost), format_currency(cost))
}
