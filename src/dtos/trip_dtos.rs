use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::trip::TripRecord;

/// Clients send interests either as a single string or as a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Interests {
    One(String),
    Many(Vec<String>),
}

impl Interests {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Interests::One(s) if s.trim().is_empty() => Vec::new(),
            Interests::One(s) => vec![s],
            Interests::Many(v) => v,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateTripRequest {
    #[validate(length(min = 1, message = "Destination is required"))]
    pub destination: String,

    #[validate(range(min = 1.0, message = "Budget must be a positive number"))]
    pub budget: f64,

    #[validate(range(min = 1, message = "Members must be at least 1"))]
    pub members: u32,

    #[validate(range(min = 1, max = 60, message = "Days must be between 1 and 60"))]
    pub days: u32,

    #[validate(length(min = 1, message = "Starting location is required"))]
    pub from: String,

    #[validate(length(min = 1, message = "Accommodation preference is required"))]
    pub accommodation: String,

    #[serde(default)]
    pub interests: Option<Interests>,
}

#[derive(Debug, Serialize)]
pub struct GenerateTripResponse {
    pub success: bool,
    pub message: String,
    pub trip: TripSummary,
}

#[derive(Debug, Serialize)]
pub struct TripSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub destination: String,
    pub budget: f64,
    pub per_person_budget: f64,
    pub members: u32,
    pub days: u32,
    pub budget_breakdown: crate::models::trip::CostBreakdown,
    pub itinerary: Vec<crate::models::trip::ItineraryDay>,
    pub recommendations: crate::models::trip::Recommendations,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<crate::models::trip::DistanceInfo>,
}

#[derive(Debug, Serialize)]
pub struct TripListResponse {
    pub success: bool,
    pub trips: Vec<TripRecord>,
}

#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub success: bool,
    pub trip: TripRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interests_accept_a_single_string() {
        let req: GenerateTripRequest = serde_json::from_str(
            r#"{"destination":"Goa","budget":10000,"members":2,"days":3,
                "from":"Pune","accommodation":"hostel","interests":"beaches"}"#,
        )
        .unwrap();
        assert_eq!(req.interests.unwrap().into_vec(), vec!["beaches"]);
    }

    #[test]
    fn interests_accept_a_list() {
        let req: GenerateTripRequest = serde_json::from_str(
            r#"{"destination":"Goa","budget":10000,"members":2,"days":3,
                "from":"Pune","accommodation":"hostel","interests":["beaches","food"]}"#,
        )
        .unwrap();
        assert_eq!(req.interests.unwrap().into_vec(), vec!["beaches", "food"]);
    }

    #[test]
    fn interests_may_be_omitted() {
        let req: GenerateTripRequest = serde_json::from_str(
            r#"{"destination":"Goa","budget":10000,"members":2,"days":3,
                "from":"Pune","accommodation":"hostel"}"#,
        )
        .unwrap();
        assert!(req.interests.is_none());
    }
}
