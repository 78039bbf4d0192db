use std::sync::Arc;

use crate::services::ai_service::AiService;
use crate::services::email_service::EmailService;
use crate::services::maps_service::MapsService;
use crate::services::otp_service::OtpService;
use crate::services::supabase_service::SupabaseService;
use crate::services::token_service::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub otp_service: OtpService,
    pub token_service: TokenService,
    pub db: SupabaseService,
    pub ai_service: AiService,
    // Optional services: the server stays operable without them.
    pub email_service: Option<Arc<EmailService>>,
    pub maps_service: Option<Arc<MapsService>>,
}

impl AppState {
    pub fn new(
        otp_service: OtpService,
        token_service: TokenService,
        db: SupabaseService,
        ai_service: AiService,
    ) -> Self {
        AppState {
            otp_service,
            token_service,
            db,
            ai_service,
            email_service: None,
            maps_service: None,
        }
    }

    pub fn with_email(mut self, email_service: Arc<EmailService>) -> Self {
        self.email_service = Some(email_service);
        self
    }

    pub fn with_maps(mut self, maps_service: Arc<MapsService>) -> Self {
        self.maps_service = Some(maps_service);
        self
    }
}
