use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quoteboard_core::domain::quote::ErrorBody;
use quoteboard_core::domain::series::SeriesRequest;
use quoteboard_core::domain::symbol::parse_symbols;
use quoteboard_core::quote::{quotes_response, QuoteFailure};
use quoteboard_core::series::series_response;
use quoteboard_core::upstream::{QuoteProvider, TwelveDataClient};

const CACHE_CONTROL: &str = "s-maxage=30, stale-while-revalidate=120";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = quoteboard_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let provider = TwelveDataClient::from_settings(&settings)?;
    let state = AppState {
        provider: Arc::new(provider),
        api_key: settings.api_key_or_demo(),
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, provider = state.provider.provider_name(), "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/stocks", get(get_stocks))
        .route("/api/series", get(get_series))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    provider: Arc<dyn QuoteProvider>,
    api_key: String,
}

#[derive(Debug, Default, Deserialize)]
struct StocksParams {
    symbols: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SeriesParams {
    symbol: Option<String>,
    interval: Option<String>,
    outputsize: Option<String>,
}

async fn get_stocks(State(state): State<AppState>, Query(params): Query<StocksParams>) -> Response {
    let symbols = parse_symbols(params.symbols.as_deref());
    let res = quotes_response(state.provider.clone(), symbols, &state.api_key).await;
    into_response(res)
}

async fn get_series(State(state): State<AppState>, Query(params): Query<SeriesParams>) -> Response {
    let req = SeriesRequest::from_params(
        params.symbol.as_deref(),
        params.interval.as_deref(),
        params.outputsize.as_deref(),
    );
    let res = series_response(state.provider.as_ref(), req, &state.api_key).await;
    into_response(res)
}

fn into_response<T: Serialize>(res: Result<T, QuoteFailure>) -> Response {
    match res {
        Ok(body) => ([(header::CACHE_CONTROL, CACHE_CONTROL)], Json(body)).into_response(),
        Err(failure) => {
            let status = failure_status(&failure);
            match &failure {
                QuoteFailure::Local(err) => {
                    sentry_anyhow::capture_anyhow(err);
                    tracing::error!(error = %failure, "request failed");
                }
                _ => tracing::warn!(error = %failure, %status, "upstream returned no usable data"),
            }
            (status, Json(ErrorBody::new(failure.message()))).into_response()
        }
    }
}

fn failure_status(failure: &QuoteFailure) -> StatusCode {
    if failure.is_upstream() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
