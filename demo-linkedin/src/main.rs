use axum::{Router, routing::get};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oauth2_linkedin_axum::{LinkedInConfig, LinkedInStrategy, O2L_ROUTE_PREFIX, linkedin_router};

mod handlers;

use crate::handlers::index;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,oauth2_linkedin=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = LinkedInConfig::from_env()?;
    tracing::info!("LinkedIn callback URL: {}", config.callback_url);
    let strategy = LinkedInStrategy::new(config)?;

    let app = Router::new()
        .route("/", get(index))
        .nest(O2L_ROUTE_PREFIX.as_str(), linkedin_router(strategy));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::debug!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
