pub(crate) mod ai_service;
pub(crate) mod email_service;
pub(crate) mod maps_service;
pub(crate) mod otp_service;
pub(crate) mod supabase_service;
pub(crate) mod token_service;
