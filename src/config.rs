// config.rs
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub jwt_expiry_days: i64,
    pub otp_ttl_minutes: i64,
    pub max_otp_attempts: u32,

    pub supabase_url: String,
    pub supabase_key: String,

    pub gemini_api_key: Option<String>,
    pub google_maps_api_key: Option<String>,

    pub smtp_server: String,
    pub smtp_port: u16,
    pub gmail_user: Option<String>,
    pub gmail_password: Option<String>,

    pub port: u16,
    pub host: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expiry_days: env::var("JWT_EXPIRY_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .expect("JWT_EXPIRY_DAYS must be a number"),
            otp_ttl_minutes: env::var("OTP_EXPIRY_MINUTES")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("OTP_EXPIRY_MINUTES must be a number"),
            max_otp_attempts: env::var("MAX_OTP_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .expect("MAX_OTP_ATTEMPTS must be a number"),
            supabase_url: env::var("SUPABASE_URL").expect("SUPABASE_URL must be set"),
            supabase_key: env::var("SUPABASE_KEY").expect("SUPABASE_KEY must be set"),
            gemini_api_key: env::var("GEMINI_API_KEY").ok(),
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY").ok(),
            smtp_server: env::var("SMTP_SERVER").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .expect("SMTP_PORT must be a number"),
            gmail_user: env::var("GMAIL_USER").ok(),
            gmail_password: env::var("GMAIL_PASSWORD").ok(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .expect("PORT must be a number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        }
    }
}
