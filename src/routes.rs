use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use std::time::Duration;
use tower::buffer::BufferLayer;
use tower::limit::RateLimitLayer;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::handlers;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let config = &state.config;

    // CORS configuration
    let cors = if let Some(ref origins) = config.cors_origins {
        let origins: Vec<_> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Rate limit middleware builders
    let predict_rate_limit = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|_: tower::BoxError| async {
            StatusCode::TOO_MANY_REQUESTS
        }))
        .layer(BufferLayer::new(64))
        .layer(RateLimitLayer::new(
            config.predict_rate_limit,
            Duration::from_secs(60),
        ));

    let batch_rate_limit = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|_: tower::BoxError| async {
            StatusCode::TOO_MANY_REQUESTS
        }))
        .layer(BufferLayer::new(16))
        .layer(RateLimitLayer::new(
            (config.predict_rate_limit / config.max_batch as u64).max(1),
            Duration::from_secs(60),
        ));

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/schema", get(handlers::schema::schema))
        .route(
            "/predict",
            post(handlers::predict::predict).layer(predict_rate_limit),
        )
        .route(
            "/predict/batch",
            post(handlers::batch::batch_predict).layer(batch_rate_limit),
        )
        .route("/metrics", get(handlers::metrics::metrics))
        .layer(cors)
        .with_state(state)
}
