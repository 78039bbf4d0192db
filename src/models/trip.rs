use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scheduled item in a day plan. Upstream output is parsed into this
/// shape at the boundary; anything that does not fit is thrown away and
/// the fallback plan is used instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub time: String,
    pub activity: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tips: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub total_day_cost: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub best_restaurants: Vec<String>,
    #[serde(default)]
    pub free_attractions: Vec<String>,
    #[serde(default)]
    pub local_transport_tips: String,
    #[serde(default)]
    pub must_try_foods: Vec<String>,
    #[serde(default)]
    pub safety_tips: Vec<String>,
}

/// Budget split by category. The fallback plan fills this with fixed
/// percentages of the submitted budget (30/35/20/10/5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub transportation: f64,
    pub accommodation: f64,
    pub food: f64,
    pub activities: f64,
    pub miscellaneous: f64,
}

impl CostBreakdown {
    pub fn from_budget(budget: f64) -> Self {
        CostBreakdown {
            transportation: (budget * 0.30 * 100.0).round() / 100.0,
            accommodation: (budget * 0.35 * 100.0).round() / 100.0,
            food: (budget * 0.20 * 100.0).round() / 100.0,
            activities: (budget * 0.10 * 100.0).round() / 100.0,
            miscellaneous: (budget * 0.05 * 100.0).round() / 100.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.transportation + self.accommodation + self.food + self.activities + self.miscellaneous
    }
}

/// The structured plan the Itinerary Requester returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default)]
    pub recommendations: Recommendations,
    pub estimated_costs: CostBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceInfo {
    pub text: String,
    pub meters: u64,
}

/// Trip row as stored in the `trips` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_email: String,
    pub destination: String,
    pub budget: f64,
    pub members: u32,
    pub days: u32,
    pub from_location: String,
    pub accommodation: String,
    pub interests: Vec<String>,
    pub budget_breakdown: CostBreakdown,
    pub itinerary: Vec<ItineraryDay>,
    pub recommendations: Recommendations,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<DistanceInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
