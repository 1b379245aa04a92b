use axum::routing::{get, post, MethodRouter};
use once_cell::sync::Lazy;

use super::handlers::*;
use super::state::AppState;

pub(super) static ROUTES: Lazy<Vec<(&'static str, MethodRouter<AppState>)>> = Lazy::new(|| {
    vec![
        ("/name", get(name)),
        ("/supports", post(supports)),
        ("/projected-cost", post(projected_cost)),
        ("/actual-cost", post(actual_cost)),
        ("/pricing-spec", post(pricing_spec)),
        ("/recommendations", post(recommendations)),
    ]
});
