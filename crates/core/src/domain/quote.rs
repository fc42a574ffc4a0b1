use serde::{Deserialize, Serialize};

/// Canonical quote record every upstream shape is converted into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedQuote {
    pub symbol: String,
    pub price: f64,
    pub change_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
}

impl NormalizedQuote {
    pub fn zeroed(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: 0.0,
            change_percent: 0.0,
            updated: None,
        }
    }

    /// A zero price marks a record the upstream did not actually fill.
    pub fn is_empty(&self) -> bool {
        self.price == 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotesBody {
    pub symbols: Vec<String>,
    pub data: Vec<NormalizedQuote>,
}

/// Body returned alongside every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}
