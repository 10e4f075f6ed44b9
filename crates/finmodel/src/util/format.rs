/// Format a currency value with thousands separators
pub fn format_currency(value: f64) -> String {
    let abs_value = value.abs();
    let mut dollars = abs_value as i64;
    let mut cents = ((abs_value - dollars as f64) * 100.0).round() as i64;
    if cents == 100 {
        dollars += 1;
        cents = 0;
    }

    let dollars_str = dollars.to_string();
    let mut result = String::new();
    for (i, c) in dollars_str.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let dollars_formatted: String = result.chars().rev().collect();

    if value >= 0.0 {
        format!("${}.{:02}", dollars_formatted, cents)
    } else {
        format!("-${}.{:02}", dollars_formatted, cents)
    }
}

/// Format a ledger amount: fixed precision, no separators, so the ledgers
/// stay machine-readable
pub fn format_amount(value: f64) -> String {
    // Avoid printing "-0.000000" for values that rounded to zero
    if value.abs() < 5e-7 {
        return "0.000000".to_string();
    }
    format!("{value:.6}")
}
