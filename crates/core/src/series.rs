//! Time series lookup for charting: one upstream call, no fallback.

use crate::domain::series::{SeriesBody, SeriesPoint, SeriesRequest};
use crate::quote::coerce::to_number;
use crate::quote::error::QuoteFailure;
use crate::upstream::provider::{is_status_error, upstream_message};
use crate::upstream::QuoteProvider;
use anyhow::Context;
use serde_json::Value;

const DEFAULT_UPSTREAM_MESSAGE: &str = "Upstream time_series error";

pub async fn series_response(
    provider: &dyn QuoteProvider,
    req: SeriesRequest,
    api_key: &str,
) -> Result<SeriesBody, QuoteFailure> {
    let raw = provider
        .fetch_time_series(&req, api_key)
        .await
        .with_context(|| format!("{} time_series request failed", provider.provider_name()))?;

    if is_status_error(&raw) {
        let message = upstream_message(&raw)
            .unwrap_or(DEFAULT_UPSTREAM_MESSAGE)
            .to_string();
        tracing::warn!(symbol = %req.symbol, interval = %req.interval, %message, "time_series upstream error");
        return Err(QuoteFailure::Upstream { message });
    }

    Ok(SeriesBody {
        series: normalize_series(&raw),
        symbol: req.symbol,
        interval: req.interval,
    })
}

/// `values` entries become `{t, c}` points; anything but an array yields an empty series.
pub fn normalize_series(raw: &Value) -> Vec<SeriesPoint> {
    let Some(values) = raw.get("values").and_then(Value::as_array) else {
        return Vec::new();
    };

    values
        .iter()
        .map(|v| SeriesPoint {
            t: v.get("datetime").and_then(Value::as_str).map(str::to_string),
            c: to_number(v.get("close")),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, ScriptedProvider};
    use serde_json::json;

    #[test]
    fn maps_values_to_points() {
        let raw = json!({
            "meta": {"symbol": "AAPL"},
            "values": [
                {"datetime": "2026-01-27 09:30:00", "close": "190.1"},
                {"datetime": "2026-01-27 09:35:00", "close": "bad"}
            ]
        });
        let points = normalize_series(&raw);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].t.as_deref(), Some("2026-01-27 09:30:00"));
        assert_eq!(points[0].c, 190.1);
        assert_eq!(points[1].c, 0.0);
    }

    #[test]
    fn missing_values_is_empty_series() {
        assert!(normalize_series(&json!({"values": {}})).is_empty());
        assert!(normalize_series(&Value::Null).is_empty());
    }

    #[tokio::test]
    async fn upstream_error_carries_message() {
        let provider = ScriptedProvider::new(Reply::Json(json!({})))
            .with_series(Reply::Json(json!({"status": "error", "message": "symbol not found"})));
        let err = series_response(&provider, SeriesRequest::default(), "demo")
            .await
            .unwrap_err();
        assert!(err.is_upstream());
        assert_eq!(err.message(), "symbol not found");
    }

    #[tokio::test]
    async fn upstream_error_without_message_uses_default() {
        let provider = ScriptedProvider::new(Reply::Json(json!({})))
            .with_series(Reply::Json(json!({"status": "error"})));
        let err = series_response(&provider, SeriesRequest::default(), "demo")
            .await
            .unwrap_err();
        assert_eq!(err.message(), DEFAULT_UPSTREAM_MESSAGE);
    }

    #[tokio::test]
    async fn echoes_request_in_body() {
        let provider = ScriptedProvider::new(Reply::Json(json!({})))
            .with_series(Reply::Json(json!({"values": [{"datetime": "d", "close": 1}]})));
        let req = SeriesRequest::from_params(Some("msft"), Some("1h"), None);
        let body = series_response(&provider, req, "demo").await.unwrap();
        assert_eq!(body.symbol, "MSFT");
        assert_eq!(body.interval, "1h");
        assert_eq!(body.series.len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_local() {
        let provider = ScriptedProvider::new(Reply::Json(json!({})));
        let err = series_response(&provider, SeriesRequest::default(), "demo")
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteFailure::Local(_)));
    }
}
