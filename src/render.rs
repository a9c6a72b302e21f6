use crate::format::{format_change, format_market_cap, format_price};
use crate::ticker::snapshot::{DisplayRecord, Snapshot};

pub fn render_record(record: &DisplayRecord) -> String {
    let mut line = format!(
        "{} {:<10} ({:<4})  {:>14}  {:>8} {}",
        record.asset.symbol,
        record.asset.name,
        record.asset.code,
        format_price(record.quote.price_usd),
        format_change(record.quote.change_24h_pct),
        record.trend().arrow(),
    );

    if record.has_market_cap() {
        line.push_str("  Market Cap: ");
        line.push_str(&format_market_cap(record.quote.market_cap_usd));
    }

    line
}

/// Plain-text board: status line, optional error banner, one row per asset.
pub fn render_board(snapshot: &Snapshot) -> String {
    let mut lines = vec![snapshot.state.status_line()];
    lines.extend(snapshot.state.error_banner());
    lines.extend(snapshot.records.iter().map(render_record));
    lines.push(String::new());

    lines.join("\n")
}
