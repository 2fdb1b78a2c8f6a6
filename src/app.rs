use crate::gateway::Gateway;
use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router<G>(state: AppState<G>) -> Router
where
    G: Gateway + Clone + 'static,
{
    Router::new()
        .route("/health", get(handlers::health))
        .route("/gadgets/like/:instance", get(handlers::like_page::<G>))
        .route("/gadgets/like/:instance/toggle", post(handlers::like_toggle::<G>))
        .route("/gadgets/most-liked/:instance", get(handlers::board_page::<G>))
        .route(
            "/gadgets/most-liked/:instance/scope",
            post(handlers::board_scope::<G>),
        )
        .route(
            "/gadgets/most-liked/:instance/date-range",
            post(handlers::board_date_range::<G>),
        )
        .with_state(state)
}
