//! # Sina Quote Model
//!
//! The real-time quote service answers with one JavaScript assignment per
//! symbol:
//!
//! ```text
//! var hq_str_sh600519="贵州茅台,2038.000,2042.000,2030.050,...,2021-03-02,15:00:00,00";
//! ```
//!
//! Field 0 is the name, 2 the previous close, 3 the last price, 30 the date
//! and 31 the time. Unknown symbols come back with an empty string.

use crate::markets::error::MarketError;
use std::collections::HashMap;

const NAME: usize = 0;
const PRE_CLOSE: usize = 2;
const PRICE: usize = 3;
const DATE: usize = 30;
const TIME: usize = 31;

/// Index aliases accepted in place of full symbols.
const INDEX_ALIASES: [(&str, &str); 8] = [
    ("sh", "sh000001"),
    ("sz", "sz399001"),
    ("hs300", "sh000300"),
    ("sz50", "sh000016"),
    ("zxb", "sz399005"),
    ("cyb", "sz399006"),
    ("zx300", "sz399008"),
    ("zh500", "sh000905"),
];

/// One instrument's latest quote.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSnapshot {
    /// The code as requested, e.g. `600519` or `hs300`.
    pub code: String,
    /// The exchange-prefixed symbol, e.g. `sh600519`.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Last traded price.
    pub price: f64,
    /// Previous session's close.
    pub pre_close: f64,
    /// Quote date, `YYYY-MM-DD`.
    pub date: String,
    /// Quote time, `HH:MM:SS`.
    pub time: String,
}

/// Maps a code or index alias to the exchange-prefixed symbol.
///
/// Six-digit codes starting with 5, 6, 9, 11 or 13 trade in Shanghai, the
/// rest in Shenzhen. Anything else passes through unchanged.
pub fn normalize_symbol(code: &str) -> String {
    if let Some((_, symbol)) = INDEX_ALIASES.iter().find(|(alias, _)| *alias == code) {
        return symbol.to_string();
    }
    if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return code.to_string();
    }
    if code.starts_with(['5', '6', '9']) || code.starts_with("11") || code.starts_with("13") {
        format!("sh{}", code)
    } else {
        format!("sz{}", code)
    }
}

/// Parses a quote response into raw field lists keyed by symbol.
///
/// Lines that are not `var hq_str_<symbol>="...";` assignments, and symbols
/// with an empty value, are left out.
pub fn parse_quote_body(text: &str) -> HashMap<String, Vec<String>> {
    text.lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("var hq_str_")?;
            let (symbol, value) = rest.split_once('=')?;
            let value = value.trim_end_matches(';').trim_matches('"');
            if value.is_empty() {
                return None;
            }
            let fields = value.split(',').map(str::to_string).collect();
            Some((symbol.to_string(), fields))
        })
        .collect()
}

/// Builds a snapshot from the raw fields of one symbol.
pub fn snapshot_from_fields(
    code: &str,
    symbol: &str,
    fields: &[String],
) -> Result<QuoteSnapshot, MarketError> {
    if fields.len() <= TIME {
        return Err(MarketError::Parse(format!(
            "quote for {} has {} fields, expected at least {}",
            symbol,
            fields.len(),
            TIME + 1
        )));
    }

    let number = |idx: usize, what: &str| -> Result<f64, MarketError> {
        fields[idx].trim().parse::<f64>().map_err(|e| {
            MarketError::Parse(format!("{} of {} is not a number: {}", what, symbol, e))
        })
    };

    Ok(QuoteSnapshot {
        code: code.to_string(),
        symbol: symbol.to_string(),
        name: fields[NAME].clone(),
        price: number(PRICE, "price")?,
        pre_close: number(PRE_CLOSE, "previous close")?,
        date: fields[DATE].clone(),
        time: fields[TIME].clone(),
    })
}

/// Percentage change of `price` against `pre_close`.
pub fn change_percent(price: f64, pre_close: f64) -> Result<f64, MarketError> {
    if pre_close == 0.0 {
        return Err(MarketError::Parse(
            "previous close is zero, change is undefined".to_string(),
        ));
    }
    Ok((price - pre_close) / pre_close * 100.0)
}

/// Renders a change magnitude the short way: shortest float form, cut to
/// four characters (`0.5`, `1.23`, `12.3`).
pub fn short_percent(change: f64) -> String {
    change.abs().to_string().chars().take(4).collect()
}

/// Formats one quote line, e.g.
/// `2021-03-02 15:00:00 - 贵州茅台 | 跌 0.58 % | 当前： 2030.05`.
pub fn format_quote_line(quote: &QuoteSnapshot) -> Result<String, MarketError> {
    let change = change_percent(quote.price, quote.pre_close)?;
    let direction = if change >= 0.0 { "涨" } else { "跌" };
    Ok(format!(
        "{} {} - {} | {} {} % | 当前： {}",
        quote.date,
        quote.time,
        quote.name,
        direction,
        short_percent(change),
        quote.price
    ))
}
