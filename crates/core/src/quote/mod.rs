pub mod coerce;
pub mod error;
pub mod normalize;
pub mod resolver;
pub mod service;

pub use error::{Omitted, QuoteFailure};
pub use normalize::normalize_batch;
pub use resolver::resolve_quotes;
pub use service::quotes_response;
