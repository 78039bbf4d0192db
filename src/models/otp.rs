use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OneTimeCode {
    pub code: String,             // 6-digit OTP
    pub attempts: u32,            // Failed attempts so far
    pub issued_at: DateTime<Utc>, // When the code was issued
    pub expires_at: DateTime<Utc>, // When the code expires
}
