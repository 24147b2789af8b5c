use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Fields that hold a rate or ratio rather than an amount of money.
const RAW_DECIMAL_KEYS: [&str; 1] = ["monthly_rate"];

/// Render money as `$1,234.56`, negatives as `-$1,234.56`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{cents}")
}

/// Render a percentage figure (5.5 = 5.5%) with `decimals` places.
pub fn format_percent(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", decimals as usize, rounded)
}

/// Human rendering of a result field, keyed on the field name.
pub fn format_field(key: &str, value: &Value) -> String {
    match value {
        Value::String(s) => match s.parse::<Decimal>() {
            Ok(d) if key.ends_with("_percent") => format_percent(d, 2),
            Ok(d) if !RAW_DECIMAL_KEYS.contains(&key) => format_currency(d),
            _ => s.clone(),
        },
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => arr
            .iter()
            .map(|v| format_field(key, v))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(dec!(1135.578)), "$1,135.58");
        assert_eq!(format_currency(dec!(208808.0809)), "$208,808.08");
        assert_eq!(format_currency(dec!(1234567.5)), "$1,234,567.50");
        assert_eq!(format_currency(dec!(999.999)), "$1,000.00");
    }

    #[test]
    fn test_format_currency_small_and_negative() {
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(0.004)), "$0.00");
        assert_eq!(format_currency(dec!(-0.001)), "$0.00");
        assert_eq!(format_currency(dec!(-2500)), "-$2,500.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(5.5), 2), "5.50%");
        assert_eq!(format_percent(dec!(4.125), 1), "4.1%");
        assert_eq!(format_percent(dec!(20), 0), "20%");
    }

    #[test]
    fn test_format_field_by_key() {
        assert_eq!(format_field("monthly_payment", &json!("1135.578")), "$1,135.58");
        assert_eq!(format_field("down_payment_percent", &json!("20")), "20.00%");
        assert_eq!(format_field("monthly_rate", &json!("0.005")), "0.005");
        assert_eq!(format_field("number_of_payments", &json!(360)), "360");
        assert_eq!(format_field("methodology", &json!("Fixed-rate")), "Fixed-rate");
    }
}
