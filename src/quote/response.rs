use crate::quote::error::QuoteRequestError;
use serde_json::Map;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceQuote {
    pub price_usd: f64,
    pub change_24h_pct: f64,
    pub market_cap_usd: f64,
    pub volume_24h_usd: f64,
}

impl PriceQuote {
    pub const ZERO: PriceQuote = PriceQuote {
        price_usd: 0.0,
        change_24h_pct: 0.0,
        market_cap_usd: 0.0,
        volume_24h_usd: 0.0,
    };
}

impl Default for PriceQuote {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Quotes keyed by coin id, as returned by one request.
pub type QuoteTable = HashMap<String, PriceQuote>;

// example response
// {"bitcoin":{"usd":65761,"usd_market_cap":1296530887521.7,"usd_24h_vol":28431126733.3,"usd_24h_change":1.8841205093585678}}
pub fn parse_simple_price(body: &str, vs_currency: &str) -> Result<QuoteTable, QuoteRequestError> {
    let json: Value = serde_json::from_str(body)?;
    let entries = match json.as_object() {
        Some(entries) => entries,
        None => {
            return Err(QuoteRequestError::Malformed(
                "top level of the API response is not an object".to_string(),
            ))
        }
    };

    let price_key = vs_currency.to_string();
    let change_key = format!("{}_24h_change", vs_currency);
    let market_cap_key = format!("{}_market_cap", vs_currency);
    let volume_key = format!("{}_24h_vol", vs_currency);

    let table = entries
        .iter()
        .filter_map(|(id, entry)| {
            // Non-object entries carry no usable fields; treat the id as absent.
            let fields = entry.as_object()?;
            Some((
                id.clone(),
                PriceQuote {
                    price_usd: number_or_zero(fields, &price_key),
                    change_24h_pct: number_or_zero(fields, &change_key),
                    market_cap_usd: number_or_zero(fields, &market_cap_key),
                    volume_24h_usd: number_or_zero(fields, &volume_key),
                },
            ))
        })
        .collect();

    Ok(table)
}

fn number_or_zero(fields: &Map<String, Value>, key: &str) -> f64 {
    fields.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}
