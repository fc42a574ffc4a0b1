use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quoteboard_core::domain::series::SeriesRequest;
use quoteboard_core::domain::symbol::parse_symbols;
use quoteboard_core::quote::{quotes_response, QuoteFailure};
use quoteboard_core::series::series_response;
use quoteboard_core::upstream::TwelveDataClient;

#[derive(Debug, Parser)]
#[command(name = "quoteboard")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve current quotes and print them as JSON.
    Quotes {
        /// Comma-separated tickers. Defaults to AAPL,MSFT,GOOGL,AMZN,NVDA.
        #[arg(long)]
        symbols: Option<String>,
    },

    /// Fetch a close-price series for charting.
    Series {
        #[arg(long)]
        symbol: Option<String>,

        /// Bar interval understood by the provider, e.g. 1min, 5min, 1day.
        #[arg(long)]
        interval: Option<String>,

        #[arg(long)]
        outputsize: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = quoteboard_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let api_key = settings.api_key_or_demo();
    let provider = Arc::new(TwelveDataClient::from_settings(&settings)?);

    match args.command {
        Command::Quotes { symbols } => {
            let symbols = parse_symbols(symbols.as_deref());
            tracing::info!(symbols = ?symbols, "resolving quotes");
            let res = quotes_response(provider, symbols, &api_key).await;
            print_outcome(res)
        }
        Command::Series {
            symbol,
            interval,
            outputsize,
        } => {
            let req = SeriesRequest::from_params(
                symbol.as_deref(),
                interval.as_deref(),
                outputsize.as_deref(),
            );
            let res = series_response(provider.as_ref(), req, &api_key).await;
            print_outcome(res)
        }
    }
}

fn print_outcome<T: Serialize>(res: Result<T, QuoteFailure>) -> anyhow::Result<()> {
    match res {
        Ok(body) => {
            let out = serde_json::to_string_pretty(&body).context("failed to encode output")?;
            println!("{out}");
            Ok(())
        }
        Err(QuoteFailure::Local(err)) => {
            sentry_anyhow::capture_anyhow(&err);
            Err(err)
        }
        Err(failure) => anyhow::bail!("{failure}"),
    }
}

fn init_sentry(settings: &quoteboard_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_series_flags() {
        let args = Args::try_parse_from([
            "quoteboard",
            "series",
            "--symbol",
            "msft",
            "--interval",
            "1day",
        ])
        .unwrap();
        match args.command {
            Command::Series {
                symbol,
                interval,
                outputsize,
            } => {
                assert_eq!(symbol.as_deref(), Some("msft"));
                assert_eq!(interval.as_deref(), Some("1day"));
                assert!(outputsize.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn upstream_failure_becomes_error() {
        let res: Result<(), QuoteFailure> = Err(QuoteFailure::NoData);
        let err = print_outcome(res).unwrap_err();
        assert_eq!(err.to_string(), "Upstream quote API returned no data");
    }
}
