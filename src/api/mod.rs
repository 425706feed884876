use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub mod stock;

/// Builds the public router. The mobile client calls these endpoints from a
/// webview, so both scrape routes allow any origin; each route only admits
/// its own method plus OPTIONS.
pub fn router() -> Router {
    let single_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);
    let batch_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(
            Router::new()
                .route(
                    "/api/scrape-stock",
                    get(stock::scrape_stock).options(stock::preflight),
                )
                .layer(single_cors),
        )
        .merge(
            Router::new()
                .route(
                    "/api/scrape-all-stocks",
                    post(stock::scrape_all_stocks)
                        .options(stock::preflight)
                        .fallback(stock::method_not_allowed),
                )
                .layer(batch_cors),
        )
}

async fn health() -> &'static str {
    "OK"
}
