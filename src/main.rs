//! Storefront - customer shop and back office over a remote commerce API

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use storefront::web::{self, AppState};
use storefront::{ApiClient, Config};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env()?;
    let api = ApiClient::new(config.api_base_url.clone(), config.request_timeout).context("building upstream client")?;
    let cors = cors_layer(&config.cors_origins);
    let addr = config.bind_addr();
    tracing::info!(upstream = %api.base_url(), "using remote API");

    let app = web::router(AppState::new(api, config)).layer(cors);

    tracing::info!("🚀 Storefront listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new().allow_origin(AllowOrigin::list(allowed)).allow_methods(tower_http::cors::Any).allow_headers(tower_http::cors::Any)
}
