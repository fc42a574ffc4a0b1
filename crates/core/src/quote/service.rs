use crate::domain::quote::QuotesBody;
use crate::quote::error::QuoteFailure;
use crate::quote::resolver::resolve_quotes;
use crate::upstream::QuoteProvider;
use std::sync::Arc;

/// Runs the resolver and sorts its outcome into a body or a terminal failure.
pub async fn quotes_response(
    provider: Arc<dyn QuoteProvider>,
    symbols: Vec<String>,
    api_key: &str,
) -> Result<QuotesBody, QuoteFailure> {
    if symbols.is_empty() {
        return Err(QuoteFailure::Local(anyhow::anyhow!(
            "no valid symbols in request"
        )));
    }

    let data = resolve_quotes(provider, &symbols, api_key).await?;
    if data.is_empty() {
        tracing::warn!(symbols = ?symbols, "no quote data obtainable");
        return Err(QuoteFailure::NoData);
    }

    Ok(QuotesBody { symbols, data })
}
