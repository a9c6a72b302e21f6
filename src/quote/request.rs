use crate::catalog;

/// One batched `/simple/price` request covering every id at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchQuoteRequest {
    pub ids: Vec<String>,
    pub vs_currency: String,
}

impl BatchQuoteRequest {
    pub fn for_catalog() -> Self {
        Self {
            ids: catalog::ids(),
            vs_currency: "usd".to_string(),
        }
    }

    pub fn url(&self, api_base_url: &str) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies={}&include_24hr_change=true&include_market_cap=true&include_24hr_vol=true",
            api_base_url.trim_end_matches('/'),
            self.ids.join(","),
            self.vs_currency
        )
    }
}
