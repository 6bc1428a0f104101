//! Display helpers for consumers of the model. The math never formats.

/// `0.12345` -> `"12.35%"`.
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Formats a decimal price string as dollars, or `"N/A"` when missing or unparsable.
pub fn format_price(price: Option<&str>) -> String {
    match price.filter(|p| !p.is_empty()).map(str::parse::<f64>) {
        Some(Ok(value)) => format!("${value:.2}"),
        _ => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_as_percentage() {
        assert_eq!(format_probability(0.943_794), "94.38%");
        assert_eq!(format_probability(0.0), "0.00%");
        assert_eq!(format_probability(1.0), "100.00%");
    }

    #[test]
    fn price_with_two_decimals() {
        assert_eq!(format_price(Some("1.5")), "$1.50");
        assert_eq!(format_price(Some("0.10")), "$0.10");
        assert_eq!(format_price(None), "N/A");
        assert_eq!(format_price(Some("")), "N/A");
        assert_eq!(format_price(Some("n/a")), "N/A");
    }
}
