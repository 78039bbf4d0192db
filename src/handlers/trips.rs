use axum::{
    extract::{Path, State},
    Extension, Json,
};
use validator::Validate;

use crate::dtos::trip_dtos::{
    GenerateTripRequest, GenerateTripResponse, TripListResponse, TripResponse, TripSummary,
};
use crate::errors::{AppError, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::trip::TripRecord;
use crate::services::ai_service::TripRequest;
use crate::state::AppState;

pub async fn generate_trip(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<GenerateTripRequest>,
) -> Result<Json<GenerateTripResponse>> {
    req.validate()
        .map_err(|e| AppError::invalid_data(format!("Validation error: {}", e)))?;

    let interests = req.interests.map(|i| i.into_vec()).unwrap_or_default();
    let trip_request = TripRequest {
        destination: req.destination.clone(),
        budget: req.budget,
        members: req.members,
        days: req.days,
        from_location: req.from.clone(),
        accommodation: req.accommodation.clone(),
        interests: interests.clone(),
    };

    // Upstream failure is absorbed inside the service; this always
    // yields a plan.
    let plan = state.ai_service.generate_itinerary(&trip_request).await;

    let distance = match &state.maps_service {
        Some(maps) => maps.distance(&req.from, &req.destination).await,
        None => None,
    };

    let trip = TripRecord {
        id: None,
        user_email: user.email.clone(),
        destination: req.destination.clone(),
        budget: req.budget,
        members: req.members,
        days: req.days,
        from_location: req.from.clone(),
        accommodation: req.accommodation.clone(),
        interests,
        budget_breakdown: plan.estimated_costs.clone(),
        itinerary: plan.itinerary,
        recommendations: plan.recommendations,
        distance,
        created_at: None,
    };

    let saved = state.db.create_trip(&trip).await?;

    if let Some(mailer) = &state.email_service {
        let mailer = mailer.clone();
        let to = user.email.clone();
        let confirmation = saved.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_trip_confirmation(&to, &confirmation).await {
                tracing::error!("Failed to send trip confirmation to {}: {}", to, e);
            }
        });
    }

    let per_person_budget = saved.budget / saved.members.max(1) as f64;
    Ok(Json(GenerateTripResponse {
        success: true,
        message: "Trip plan generated successfully".to_string(),
        trip: TripSummary {
            id: saved.id,
            destination: saved.destination,
            budget: saved.budget,
            per_person_budget,
            members: saved.members,
            days: saved.days,
            budget_breakdown: saved.budget_breakdown,
            itinerary: saved.itinerary,
            recommendations: saved.recommendations,
            distance: saved.distance,
        },
    }))
}

pub async fn my_trips(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<TripListResponse>> {
    let trips = state.db.get_user_trips(&user.email).await?;
    Ok(Json(TripListResponse {
        success: true,
        trips,
    }))
}

pub async fn get_trip(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(trip_id): Path<i64>,
) -> Result<Json<TripResponse>> {
    let trip = state
        .db
        .get_trip_by_id(trip_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;

    if trip.user_email != user.email {
        return Err(AppError::Forbidden);
    }

    Ok(Json(TripResponse {
        success: true,
        trip,
    }))
}

pub async fn delete_trip(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(trip_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    state.db.delete_trip(trip_id, &user.email).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Trip deleted successfully",
    })))
}
