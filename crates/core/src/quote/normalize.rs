//! Reconciles the upstream's quote payload shapes into [`NormalizedQuote`] records.
//!
//! The provider answers the same `/quote` call in several shapes depending on how many symbols
//! were requested and which plan the key is on. [`classify`] picks exactly one shape and each
//! shape has one mapping rule.

use crate::domain::quote::NormalizedQuote;
use crate::quote::coerce::to_number;
use crate::upstream::provider::is_truthy;
use serde_json::{Map, Value};

const PRICE_FIELDS: [&str; 3] = ["price", "close", "last"];
const CHANGE_FIELDS: [&str; 3] = ["percent_change", "change_percent", "change"];
const UPDATED_FIELDS: [&str; 3] = ["datetime", "timestamp", "last_trade_time"];
const SINGLE_MARKERS: [&str; 3] = ["symbol", "name", "price"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuoteShape<'a> {
    /// Absent payload or not a JSON object.
    Unusable,
    /// `{ "data": [ {..}, .. ] }`
    List(&'a [Value]),
    /// One flat quote object.
    Single(&'a Map<String, Value>),
    /// `{ "AAPL": {..}, "MSFT": {..} }`
    Keyed(&'a Map<String, Value>),
}

/// First match wins: list, then single object, then symbol-keyed map.
pub fn classify(raw: &Value) -> QuoteShape<'_> {
    let Some(obj) = raw.as_object() else {
        return QuoteShape::Unusable;
    };

    if let Some(Value::Array(items)) = obj.get("data") {
        return QuoteShape::List(items);
    }

    if SINGLE_MARKERS
        .iter()
        .any(|k| obj.get(*k).is_some_and(is_truthy))
    {
        return QuoteShape::Single(obj);
    }

    QuoteShape::Keyed(obj)
}

/// Maps any payload shape to canonical records.
///
/// List output follows the upstream array order; keyed output follows `symbols` and fills in a
/// zeroed record for every symbol the upstream left out.
pub fn normalize_batch(symbols: &[String], raw: &Value) -> Vec<NormalizedQuote> {
    match classify(raw) {
        QuoteShape::Unusable => Vec::new(),
        QuoteShape::List(items) => items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| {
                let fields = item.as_object();
                let symbol = fields
                    .and_then(symbol_field)
                    .or_else(|| symbols.get(idx).cloned());
                if symbol.is_none() {
                    tracing::debug!(idx, "dropping list entry without a symbol");
                }
                Some(extract(symbol?, fields))
            })
            .collect(),
        QuoteShape::Single(d) => symbol_field(d)
            .or_else(|| symbols.first().cloned())
            .map(|symbol| vec![extract(symbol, Some(d))])
            .unwrap_or_default(),
        QuoteShape::Keyed(map) => symbols
            .iter()
            .map(|sym| extract(sym.clone(), map.get(sym).and_then(Value::as_object)))
            .collect(),
    }
}

fn extract(symbol: String, d: Option<&Map<String, Value>>) -> NormalizedQuote {
    let Some(d) = d else {
        return NormalizedQuote::zeroed(symbol);
    };

    NormalizedQuote {
        symbol,
        price: to_number(first_present(d, &PRICE_FIELDS)),
        change_percent: to_number(first_present(d, &CHANGE_FIELDS)),
        updated: updated_field(d),
    }
}

fn first_present<'a>(d: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| d.get(*k))
        .find(|v| !v.is_null())
}

fn updated_field(d: &Map<String, Value>) -> Option<String> {
    UPDATED_FIELDS
        .iter()
        .filter_map(|k| d.get(*k))
        .filter(|v| is_truthy(v))
        .find_map(scalar_string)
}

fn symbol_field(d: &Map<String, Value>) -> Option<String> {
    d.get("symbol")
        .and_then(scalar_string)
        .filter(|s| !s.is_empty())
}

fn scalar_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
