use std::fmt;

pub const NO_DATA_MESSAGE: &str = "Upstream quote API returned no data";

/// Terminal outcomes that cross the service boundary.
///
/// `NoData` and `Upstream` are upstream conditions (502-class); `Local` is anything that went
/// wrong on our side or before the upstream could answer (500-class).
#[derive(Debug)]
pub enum QuoteFailure {
    NoData,
    Upstream { message: String },
    Local(anyhow::Error),
}

impl QuoteFailure {
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::NoData | Self::Upstream { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Self::NoData => NO_DATA_MESSAGE.to_string(),
            Self::Upstream { message } => message.clone(),
            Self::Local(err) => format!("{err:#}"),
        }
    }
}

impl fmt::Display for QuoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => f.write_str(NO_DATA_MESSAGE),
            Self::Upstream { message } => write!(f, "upstream error: {message}"),
            Self::Local(err) => write!(f, "{err:#}"),
        }
    }
}

impl std::error::Error for QuoteFailure {}

impl From<anyhow::Error> for QuoteFailure {
    fn from(err: anyhow::Error) -> Self {
        Self::Local(err)
    }
}

/// Why a single-symbol fallback call contributed nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Omitted {
    UpstreamError(Option<String>),
    ZeroPrice,
    Transport(String),
    Aborted(String),
}

impl fmt::Display for Omitted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpstreamError(Some(message)) => write!(f, "upstream error: {message}"),
            Self::UpstreamError(None) => f.write_str("upstream error"),
            Self::ZeroPrice => f.write_str("no usable price"),
            Self::Transport(detail) => write!(f, "transport failure: {detail}"),
            Self::Aborted(detail) => write!(f, "fallback task aborted: {detail}"),
        }
    }
}
