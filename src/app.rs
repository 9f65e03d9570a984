use axum::{http::Method, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::shared::AppState;
use crate::websockets::websocket_handler;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Niuniu server" }))
        .route("/ws", get(websocket_handler))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
