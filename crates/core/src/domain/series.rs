use serde::{Deserialize, Serialize};

pub const DEFAULT_SERIES_SYMBOL: &str = "AAPL";
pub const DEFAULT_SERIES_INTERVAL: &str = "5min";
pub const DEFAULT_SERIES_OUTPUTSIZE: &str = "50";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub symbol: String,
    pub interval: String,
    pub outputsize: String,
}

impl SeriesRequest {
    /// Fills blank parameters with defaults and uppercases the symbol.
    pub fn from_params(
        symbol: Option<&str>,
        interval: Option<&str>,
        outputsize: Option<&str>,
    ) -> Self {
        fn or_default(v: Option<&str>, default: &str) -> String {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_string()
        }

        Self {
            symbol: or_default(symbol, DEFAULT_SERIES_SYMBOL).to_ascii_uppercase(),
            interval: or_default(interval, DEFAULT_SERIES_INTERVAL),
            outputsize: or_default(outputsize, DEFAULT_SERIES_OUTPUTSIZE),
        }
    }
}

impl Default for SeriesRequest {
    fn default() -> Self {
        Self::from_params(None, None, None)
    }
}

/// One charting point: timestamp and close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub t: Option<String>,
    pub c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesBody {
    pub symbol: String,
    pub interval: String,
    pub series: Vec<SeriesPoint>,
}
