use crate::domain::quote::NormalizedQuote;
use crate::quote::error::Omitted;
use crate::quote::normalize::normalize_batch;
use crate::upstream::provider::{is_status_error, is_upstream_error, upstream_message};
use crate::upstream::QuoteProvider;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Resolves current quotes for `symbols`, preferring one batched upstream call.
///
/// When the batch reports an error, or every normalized record has a zero price, the batch
/// result is discarded and each symbol is requested on its own, concurrently. Only records with
/// a non-zero price survive the fallback. An empty `Ok` means no data could be obtained.
///
/// Errors are reserved for an empty symbol list and for a batch call that never got an answer.
pub async fn resolve_quotes(
    provider: Arc<dyn QuoteProvider>,
    symbols: &[String],
    api_key: &str,
) -> Result<Vec<NormalizedQuote>> {
    anyhow::ensure!(!symbols.is_empty(), "at least one symbol is required");

    let batch = provider
        .fetch_batch(&symbols.join(","), api_key)
        .await
        .with_context(|| format!("{} batch quote request failed", provider.provider_name()))?;

    let errored = is_upstream_error(&batch);
    let normalized = if errored {
        Vec::new()
    } else {
        normalize_batch(symbols, &batch)
    };

    if !errored && !needs_fallback(&normalized) {
        return Ok(normalized);
    }

    tracing::info!(
        provider = provider.provider_name(),
        symbols = symbols.len(),
        errored,
        upstream_message = upstream_message(&batch).unwrap_or_default(),
        "batch quote unusable; falling back to per-symbol requests"
    );

    Ok(fallback(provider, symbols, api_key).await)
}

/// Degenerate batch: nothing came back, or nothing came back with a price.
pub fn needs_fallback(normalized: &[NormalizedQuote]) -> bool {
    normalized.iter().all(NormalizedQuote::is_empty)
}

async fn fallback(
    provider: Arc<dyn QuoteProvider>,
    symbols: &[String],
    api_key: &str,
) -> Vec<NormalizedQuote> {
    let mut tasks = JoinSet::new();
    for (idx, symbol) in symbols.iter().enumerate() {
        let provider = Arc::clone(&provider);
        let symbol = symbol.clone();
        let api_key = api_key.to_string();
        tasks.spawn(async move {
            let res = fetch_one(provider.as_ref(), &symbol, &api_key).await;
            (idx, symbol, res)
        });
    }

    // Barrier: every call finishes (or fails) before the response is built.
    let mut found = Vec::with_capacity(symbols.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, _, Ok(quote))) => found.push((idx, quote)),
            Ok((_, symbol, Err(reason))) => {
                tracing::warn!(%symbol, %reason, "fallback quote omitted");
            }
            Err(err) => {
                let reason = Omitted::Aborted(err.to_string());
                tracing::warn!(%reason, "fallback quote omitted");
            }
        }
    }

    found.sort_by_key(|(idx, _)| *idx);
    tracing::info!(
        requested = symbols.len(),
        resolved = found.len(),
        "per-symbol fallback complete"
    );
    found.into_iter().map(|(_, quote)| quote).collect()
}

/// One fallback call. Every failure mode becomes an [`Omitted`] instead of an error.
pub async fn fetch_one(
    provider: &dyn QuoteProvider,
    symbol: &str,
    api_key: &str,
) -> Result<NormalizedQuote, Omitted> {
    let raw = provider
        .fetch_single(symbol, api_key)
        .await
        .map_err(|err| Omitted::Transport(format!("{err:#}")))?;

    if is_status_error(&raw) {
        return Err(Omitted::UpstreamError(
            upstream_message(&raw).map(str::to_string),
        ));
    }

    normalize_batch(&[symbol.to_string()], &raw)
        .into_iter()
        .next()
        .filter(|quote| !quote.is_empty())
        .ok_or(Omitted::ZeroPrice)
}
