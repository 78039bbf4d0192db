use std::net::SocketAddr;
use std::sync::Arc;

use axum::{http::Method, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

mod config;
mod dtos;
mod errors;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;

use config::AppConfig;
use services::ai_service::AiService;
use services::email_service::EmailService;
use services::maps_service::MapsService;
use services::otp_service::{MemoryOtpStore, OtpService};
use services::supabase_service::SupabaseService;
use services::token_service::TokenService;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = AppConfig::from_env();
    let app_state = initialize_app_state(&config);

    let app = build_router(app_state);
    start_server(app, &config).await;
}

fn initialize_app_state(config: &AppConfig) -> AppState {
    let otp_service = OtpService::new(
        Arc::new(MemoryOtpStore::new()),
        config.otp_ttl_minutes,
        config.max_otp_attempts,
    );

    let token_service = TokenService::new(config.jwt_secret.clone(), config.jwt_expiry_days);

    let db = match SupabaseService::new(&config.supabase_url, &config.supabase_key) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("❌ Failed to initialize Supabase client: {}", e);
            panic!("Failed to initialize Supabase client: {}", e);
        }
    };

    let ai_service = AiService::new(config.gemini_api_key.clone());
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; itineraries will use the fallback plan");
    }

    let mut app_state = AppState::new(otp_service, token_service, db, ai_service);

    match (&config.gmail_user, &config.gmail_password) {
        (Some(user), Some(password)) => {
            match EmailService::new(&config.smtp_server, config.smtp_port, user, password) {
                Ok(mailer) => {
                    tracing::info!("✅ Email service initialized ({})", user);
                    app_state = app_state.with_email(Arc::new(mailer));
                }
                Err(e) => {
                    tracing::error!("❌ Failed to initialize email service: {}", e);
                    tracing::warn!("OTP codes will be logged instead of emailed");
                }
            }
        }
        _ => {
            tracing::warn!("GMAIL_USER/GMAIL_PASSWORD not set; OTP codes will be logged");
        }
    }

    if let Some(key) = &config.google_maps_api_key {
        app_state = app_state.with_maps(Arc::new(MapsService::new(key.clone())));
        tracing::info!("✅ Distance lookup enabled");
    }

    app_state
}

fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_credentials(false);

    Router::new()
        .route("/api/health", get(health_check))
        .nest("/api", routes::auth_otp_routes::auth_otp_routes())
        .nest("/api", routes::trip_routes::trip_routes(app_state.clone()))
        .layer(cors)
        .with_state(app_state)
}

async fn start_server(app: Router, config: &AppConfig) {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT");

    tracing::info!("🚀 Travel Planner API starting on {}", addr);

    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            axum::serve(listener, app).await.unwrap();
        }
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
