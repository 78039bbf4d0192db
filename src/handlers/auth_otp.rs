use axum::{extract::State, Json};
use validator::Validate;

use crate::dtos::auth_dtos::{
    normalize_email, AuthUser, SendOtpRequest, SendOtpResponse, VerifyOtpRequest,
    VerifyOtpResponse,
};
use crate::errors::{AppError, Result};
use crate::services::otp_service::OtpService;
use crate::state::AppState;

// 1. Request a login code
pub async fn send_otp(
    State(state): State<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>> {
    req.validate()
        .map_err(|e| AppError::invalid_data(format!("Validation error: {}", e)))?;

    let email = normalize_email(&req.email);
    let code = OtpService::generate();
    state.otp_service.issue(&email, &code).await?;

    // Delivery is fire-and-forget: the code stays valid even if the mail
    // bounces, and the caller never waits on SMTP.
    match &state.email_service {
        Some(mailer) => {
            let mailer = mailer.clone();
            let to = email.clone();
            tokio::spawn(async move {
                if let Err(e) = mailer.send_otp_email(&to, &code).await {
                    tracing::error!("Failed to send OTP email to {}: {}", to, e);
                }
            });
        }
        None => {
            // Dev mode side channel.
            tracing::warn!("Mail not configured; OTP for {} is {}", email, code);
        }
    }

    Ok(Json(SendOtpResponse {
        success: true,
        message: "OTP sent successfully".to_string(),
    }))
}

// 2. Verify the code and mint a session token
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>> {
    req.validate()
        .map_err(|e| AppError::invalid_data(format!("Validation error: {}", e)))?;

    let email = normalize_email(&req.email);

    state
        .otp_service
        .validate(&email, req.otp.trim())
        .await?
        .map_err(|rejection| AppError::OtpRejected(rejection.message().to_string()))?;

    // Created lazily on first successful login.
    if state.db.get_user_by_email(&email).await?.is_none() {
        state.db.create_user(&email).await?;
    }

    if let Err(e) = state.db.update_last_login(&email).await {
        tracing::warn!("Failed to update last login for {}: {}", email, e);
    }

    let token = state.token_service.issue(&email)?;

    Ok(Json(VerifyOtpResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: AuthUser { email },
    }))
}
