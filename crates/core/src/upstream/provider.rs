use crate::domain::series::SeriesRequest;
use anyhow::Result;
use serde_json::Value;

/// Request/response capability of the upstream quote provider.
///
/// Implementations return the parsed payload untouched; shape reconciliation happens in
/// [`crate::quote::normalize`]. An `Err` means the call itself failed (transport, unreadable
/// body), never that the upstream reported an error in-band.
#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// `symbols` is the comma-joined request list.
    async fn fetch_batch(&self, symbols: &str, api_key: &str) -> Result<Value>;

    async fn fetch_single(&self, symbol: &str, api_key: &str) -> Result<Value>;

    async fn fetch_time_series(&self, req: &SeriesRequest, api_key: &str) -> Result<Value>;
}

/// Upstream reports failure in-band with either `status: "error"` or a `code`/`message` pair.
pub fn is_upstream_error(raw: &Value) -> bool {
    if is_status_error(raw) {
        return true;
    }
    let present = |key: &str| raw.get(key).is_some_and(|v| !v.is_null());
    present("code") && present("message")
}

/// Narrower check used for single-symbol and time series calls.
pub fn is_status_error(raw: &Value) -> bool {
    raw.get("status").and_then(Value::as_str) == Some("error")
}

pub fn upstream_message(raw: &Value) -> Option<&str> {
    raw.get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

pub(crate) fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
