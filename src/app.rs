use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/signup", post(handlers::signup))
        .route("/customers", post(handlers::create_customer))
        .route("/fragments/activities", get(handlers::activities_fragment))
        .route("/fragments/customers", get(handlers::customers_fragment))
        .with_state(state)
}
