use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::{handlers::trips, middleware::auth::auth_middleware, state::AppState};

pub fn trip_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/generate-trip", post(trips::generate_trip))
        .route("/my-trips", get(trips::my_trips))
        .route("/trips/:id", get(trips::get_trip).delete(trips::delete_trip))
        .layer(from_fn_with_state(state, auth_middleware))
}
