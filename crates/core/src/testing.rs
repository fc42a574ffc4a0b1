use crate::domain::series::SeriesRequest;
use crate::upstream::QuoteProvider;
use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Json(Value),
    Transport(&'static str),
}

impl Reply {
    fn into_result(self) -> Result<Value> {
        match self {
            Self::Json(v) => Ok(v),
            Self::Transport(msg) => Err(anyhow::anyhow!(msg)),
        }
    }
}

/// Canned upstream that replays the same payloads on every call.
#[derive(Debug)]
pub(crate) struct ScriptedProvider {
    batch: Reply,
    singles: HashMap<String, Reply>,
    series: Reply,
    gate: Option<Arc<Barrier>>,
    delays: HashMap<String, Duration>,
    pub batch_calls: AtomicUsize,
    pub single_calls: AtomicUsize,
    pub last_batch_symbols: Mutex<Option<String>>,
}

impl ScriptedProvider {
    pub fn new(batch: Reply) -> Self {
        Self {
            batch,
            singles: HashMap::new(),
            series: Reply::Transport("no series scripted"),
            gate: None,
            delays: HashMap::new(),
            batch_calls: AtomicUsize::new(0),
            single_calls: AtomicUsize::new(0),
            last_batch_symbols: Mutex::new(None),
        }
    }

    pub fn with_single(mut self, symbol: &str, reply: Reply) -> Self {
        self.singles.insert(symbol.to_string(), reply);
        self
    }

    pub fn with_series(mut self, reply: Reply) -> Self {
        self.series = reply;
        self
    }

    /// Every single-symbol call waits until `parties` calls are in flight together.
    pub fn with_gate(mut self, parties: usize) -> Self {
        self.gate = Some(Arc::new(Barrier::new(parties)));
        self
    }

    pub fn with_delay(mut self, symbol: &str, delay: Duration) -> Self {
        self.delays.insert(symbol.to_string(), delay);
        self
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl QuoteProvider for ScriptedProvider {
    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_batch(&self, symbols: &str, _api_key: &str) -> Result<Value> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_batch_symbols.lock().unwrap() = Some(symbols.to_string());
        self.batch.clone().into_result()
    }

    async fn fetch_single(&self, symbol: &str, _api_key: &str) -> Result<Value> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.wait().await;
        }
        if let Some(delay) = self.delays.get(symbol) {
            tokio::time::sleep(*delay).await;
        }
        self.singles
            .get(symbol)
            .cloned()
            .unwrap_or(Reply::Transport("connection reset"))
            .into_result()
    }

    async fn fetch_time_series(&self, _req: &SeriesRequest, _api_key: &str) -> Result<Value> {
        self.series.clone().into_result()
    }
}

pub(crate) fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
