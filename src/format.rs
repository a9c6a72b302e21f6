use bigdecimal::BigDecimal;
use bigdecimal::RoundingMode;
use std::str::FromStr;

const VS_CURRENCY_SYMBOL_PREFIX: &str = "$";

// en-US locale formatting keeps at most three fraction digits.
const GROUPED_MAX_DECIMALS: usize = 3;

const THOUSAND_SEPARATOR: char = ',';

pub fn format_price(price: f64) -> String {
    let body = if price < 1.0 {
        round_to_decimals(price, 4)
    } else if price < 100.0 {
        round_to_decimals(price, 2)
    } else {
        group_thousands(price)
    };

    format!("{}{}", VS_CURRENCY_SYMBOL_PREFIX, body)
}

pub fn format_change(change: f64) -> String {
    // if change >= 0, add a plus sign
    if change >= 0.0 {
        return format!("+{}%", round_to_decimals(change, 2));
    }

    format!("{}%", round_to_decimals(change, 2))
}

pub fn format_market_cap(market_cap: f64) -> String {
    const SUFFIXES: [(f64, &str); 3] = [(1e12, "T"), (1e9, "B"), (1e6, "M")];

    for (threshold, suffix) in SUFFIXES {
        if market_cap >= threshold {
            return format!(
                "{}{}{}",
                VS_CURRENCY_SYMBOL_PREFIX,
                round_to_decimals(market_cap / threshold, 2),
                suffix
            );
        }
    }

    format!("{}{}", VS_CURRENCY_SYMBOL_PREFIX, group_thousands(market_cap))
}

/// Rounds half-up on the shortest decimal text of `value`, so `2.465` becomes
/// `2.47` even though its binary value sits just below the midpoint. Always
/// prints exactly `decimals` fraction digits, and keeps the `-` of a negative
/// value that rounds to zero.
fn round_to_decimals(value: f64, decimals: usize) -> String {
    let rounded = match to_decimal(value) {
        Some(decimal) => decimal.with_scale_round(decimals as i64, RoundingMode::HalfUp),
        None => return value.to_string(),
    };

    let sign = if value < 0.0 { "-" } else { "" };
    // a zero result comes back unscaled, so the fraction is padded below
    let digits = if rounded == BigDecimal::from(0) {
        "0".to_string()
    } else {
        rounded.abs().to_string()
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

    if decimals == 0 {
        return format!("{}{}", sign, int_part);
    }

    format!("{}{}.{:0<width$}", sign, int_part, frac_part, width = decimals)
}

fn to_decimal(value: f64) -> Option<BigDecimal> {
    if !value.is_finite() {
        return None;
    }

    BigDecimal::from_str(&value.to_string()).ok()
}

fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = round_to_decimals(value, GROUPED_MAX_DECIMALS);
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part.trim_end_matches('0')),
        None => (rounded.as_str(), ""),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(rounded.len() + digits.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(THOUSAND_SEPARATOR);
        }
        grouped.push(digit);
    }

    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    grouped
}
