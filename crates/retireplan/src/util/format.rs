/// Insert thousands separators into a whole number
fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a currency amount rounded to whole units, e.g. `1,234,568`
pub fn format_amount(value: f64) -> String {
    let grouped = group_thousands(value.abs().round() as u64);
    if value < 0.0 && grouped != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format a fraction as a percentage
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format an optional duration in years
pub fn format_years(years: Option<f64>) -> String {
    match years {
        Some(y) => format!("{y:.2} years"),
        None => "not reached".to_string(),
    }
}
