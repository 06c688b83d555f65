mod error;
mod state;
mod util;

pub mod routes;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/users", get(routes::users::list_users))
        .route("/api/users", post(routes::users::register))
        .route("/api/users", delete(routes::users::delete_current_user))
        .route("/api/users/:user_id", get(routes::users::get_user))
        .route(
            "/api/users/update-email",
            post(routes::users::update_email),
        )
        .route(
            "/api/users/update-password",
            post(routes::users::update_password),
        )
        .with_state(state)
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
