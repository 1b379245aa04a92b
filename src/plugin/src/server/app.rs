use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::config::PluginConfig;

use super::handlers;
use super::routes::ROUTES;
use super::state::AppState;

pub(super) fn get_app(cancellation_token: CancellationToken, config: Arc<PluginConfig>) -> Router {
    let state = AppState::new(cancellation_token, config.clone());

    let mut router = Router::new();
    for (path, method_router) in ROUTES.iter() {
        router = router.route(path, method_router.clone());
    }
    if config.health_endpoint {
        router = router.route("/healthz", get(handlers::health));
    }

    let mut router = router.with_state(state);
    if config.web_enabled {
        router = router.layer(cors_layer(&config));
    }
    router
}

fn cors_layer(config: &PluginConfig) -> CorsLayer {
    let cors = &config.cors;
    let mut layer = CorsLayer::new().max_age(Duration::from_secs(cors.max_age_secs));

    // Wildcards are rejected alongside credentials by the CORS protocol, so
    // the credentialed configuration mirrors the request instead.
    if cors.allow_credentials {
        layer = layer
            .allow_credentials(true)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request());
    } else {
        layer = layer.allow_methods(Any).allow_headers(Any);
    }

    if cors.allowed_origins.iter().any(|origin| origin == "*") {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(%origin, "dropping unparseable CORS origin");
                    None
                }
            })
            .collect();
        layer = layer.allow_origin(AllowOrigin::list(origins));
    }
    layer
}
