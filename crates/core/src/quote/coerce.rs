use serde_json::Value;

/// Lenient numeric coercion for upstream fields.
///
/// `null`, unparseable and non-finite values all become `0.0`. Strings have every `%` removed
/// before parsing, so `"1.23%"` reads as `1.23`.
pub fn to_number(v: Option<&Value>) -> f64 {
    let n = match v {
        None | Some(Value::Null) => return 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_decimal(&s.replace('%', "")),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Array(_) | Value::Object(_)) => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

fn parse_decimal(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    // Rust accepts "inf"/"nan" spellings; only finite decimals count here.
    t.parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0)
}
