//! Custom Askama template filters.

use std::fmt::Display;

/// Format a decimal price string as dollars.
fn format_money(raw: &str) -> String {
    raw.parse::<f64>()
        .map_or_else(|_| format!("${raw}"), |amount| format!("${amount:.2}"))
}

/// Render a price as `$x.yy`.
///
/// Usage in templates: `{{ product.price|money }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(&value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money_pads_cents() {
        assert_eq!(format_money("19.99"), "$19.99");
        assert_eq!(format_money("5"), "$5.00");
        assert_eq!(format_money("5.5"), "$5.50");
    }

    #[test]
    fn test_format_money_passes_through_unparseable() {
        assert_eq!(format_money("n/a"), "$n/a");
    }
}
