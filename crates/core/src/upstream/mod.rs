pub mod provider;
pub mod twelvedata;

pub use provider::QuoteProvider;
pub use twelvedata::TwelveDataClient;
