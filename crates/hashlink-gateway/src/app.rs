use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_url_handler, delete_url_handler, health_handler, redirect_handler, root_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_handler))
            .route("/add", post(create_url_handler))
            .route(
                "/r/{short_code}",
                get(redirect_handler).delete(delete_url_handler),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
