use axum::{routing::post, Router};

use crate::{handlers::auth_otp, state::AppState};

pub fn auth_otp_routes() -> Router<AppState> {
    Router::new()
        // Request a login code
        .route("/send-otp", post(auth_otp::send_otp))
        // Exchange the code for a session token
        .route("/verify-otp", post(auth_otp::verify_otp))
}
