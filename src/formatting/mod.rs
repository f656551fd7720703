// Format currency
pub fn format_currency(value: f64) -> String {
    // Handle negative zero case
    let formatted_value = if value.abs() < 0.005 { 0.00 } else { value };
    format!("${:.2}", formatted_value)
}

// Round to cents without a currency sign
pub fn format_rounded(value: f64) -> String {
    let formatted_value = if value.abs() < 0.005 { 0.00 } else { value };
    format!("{:.2}", formatted_value)
}

// Format a reporting window, e.g. "MONTHLY 2024-01-01 - 2024-02-01"
pub fn format_period(granularity: &str, start: &str, end: &str) -> String {
    format!("{} {} - {}", granularity, start, end)
}

/// Pad a cell to `width` characters, counting chars rather than bytes
pub fn pad_right(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        value.to_string()
    } else {
        format!("{}{}", value, " ".repeat(width - len))
    }
}
