// services/supabase_service.rs
use chrono::Utc;
use reqwest::{header, Client};

use crate::errors::{AppError, Result};
use crate::models::trip::TripRecord;
use crate::models::user::User;

/// Supabase PostgREST client for the `users` and `trips` tables.
#[derive(Clone)]
pub struct SupabaseService {
    base_url: String,
    client: Client,
}

impl SupabaseService {
    pub fn new(supabase_url: &str, supabase_key: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let key_value = header::HeaderValue::from_str(supabase_key)
            .map_err(|e| AppError::database(format!("Invalid Supabase key: {}", e)))?;
        let bearer = header::HeaderValue::from_str(&format!("Bearer {}", supabase_key))
            .map_err(|e| AppError::database(format!("Invalid Supabase key: {}", e)))?;
        headers.insert("apikey", key_value);
        headers.insert(header::AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::database(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            base_url: format!("{}/rest/v1", supabase_url.trim_end_matches('/')),
            client,
        })
    }

    // ============ USER OPERATIONS ============

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let rows: Vec<User> = self
            .client
            .get(format!("{}/users", self.base_url))
            .query(&[("email", format!("eq.{}", email)), ("select", "*".to_string())])
            .send()
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::database(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok(rows.into_iter().next())
    }

    pub async fn create_user(&self, email: &str) -> Result<User> {
        let user = User {
            id: None,
            email: email.to_string(),
            created_at: Some(Utc::now()),
            last_login: None,
        };

        let rows: Vec<User> = self
            .client
            .post(format!("{}/users", self.base_url))
            .header("Prefer", "return=representation")
            .json(&user)
            .send()
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::database(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::database("User insert returned no row"))
    }

    pub async fn update_last_login(&self, email: &str) -> Result<()> {
        self.client
            .patch(format!("{}/users", self.base_url))
            .query(&[("email", format!("eq.{}", email))])
            .json(&serde_json::json!({ "last_login": Utc::now() }))
            .send()
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok(())
    }

    // ============ TRIP OPERATIONS ============

    pub async fn create_trip(&self, trip: &TripRecord) -> Result<TripRecord> {
        let rows: Vec<TripRecord> = self
            .client
            .post(format!("{}/trips", self.base_url))
            .header("Prefer", "return=representation")
            .json(trip)
            .send()
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::database(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::database("Trip insert returned no row"))
    }

    /// All trips for a user, newest first.
    pub async fn get_user_trips(&self, email: &str) -> Result<Vec<TripRecord>> {
        let rows: Vec<TripRecord> = self
            .client
            .get(format!("{}/trips", self.base_url))
            .query(&[
                ("user_email", format!("eq.{}", email)),
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::database(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok(rows)
    }

    pub async fn get_trip_by_id(&self, trip_id: i64) -> Result<Option<TripRecord>> {
        let rows: Vec<TripRecord> = self
            .client
            .get(format!("{}/trips", self.base_url))
            .query(&[("id", format!("eq.{}", trip_id)), ("select", "*".to_string())])
            .send()
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::database(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok(rows.into_iter().next())
    }

    /// Deletes are scoped to the owner's email so a valid token for one
    /// user can never remove another user's trip.
    pub async fn delete_trip(&self, trip_id: i64, user_email: &str) -> Result<()> {
        self.client
            .delete(format!("{}/trips", self.base_url))
            .query(&[
                ("id", format!("eq.{}", trip_id)),
                ("user_email", format!("eq.{}", user_email)),
            ])
            .send()
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok(())
    }
}
