pub mod domain;
pub mod quote;
pub mod series;
pub mod upstream;

#[cfg(test)]
pub(crate) mod testing;

pub mod config {
    /// Sentinel key the upstream accepts for unauthenticated demo access.
    pub const DEMO_API_KEY: &str = "demo";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_key: Option<String>,
        pub sentry_dsn: Option<String>,
        pub quote_provider_base_url: Option<String>,
        pub quote_provider_timeout_secs: Option<u64>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                api_key: std::env::var("API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                quote_provider_base_url: std::env::var("QUOTE_PROVIDER_BASE_URL").ok(),
                quote_provider_timeout_secs: std::env::var("QUOTE_PROVIDER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok()),
            })
        }

        /// Upstream key to pass into every resolver call; falls back to the demo key.
        pub fn api_key_or_demo(&self) -> String {
            self.api_key
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEMO_API_KEY)
                .to_string()
        }
    }

}
