// services/ai_service.rs
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::trip::{Activity, CostBreakdown, ItineraryDay, Recommendations, TripPlan};

const GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

#[derive(Debug, Clone)]
pub struct TripRequest {
    pub destination: String,
    pub budget: f64,
    pub members: u32,
    pub days: u32,
    pub from_location: String,
    pub accommodation: String,
    pub interests: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

/// Gemini-backed itinerary generation. Every failure mode on this path
/// (no API key, HTTP error, timeout, unparseable reply) is absorbed into
/// the deterministic fallback plan; callers never see an error here.
#[derive(Clone)]
pub struct AiService {
    api_key: Option<String>,
    client: Client,
}

impl AiService {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            client: Client::builder()
                .timeout(Duration::from_secs(45))
                .build()
                .unwrap_or_default(),
        }
    }

    pub async fn generate_itinerary(&self, req: &TripRequest) -> TripPlan {
        match self.try_generate(req).await {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!("Itinerary generation failed, using fallback: {}", e);
                fallback_plan(&req.destination, req.days, req.budget)
            }
        }
    }

    async fn try_generate(&self, req: &TripRequest) -> anyhow::Result<TripPlan> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("GEMINI_API_KEY not configured"))?;

        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(req) }] }]
        });

        let response = self
            .client
            .post(GEMINI_URL)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<GeminiResponse>()
            .await?;

        let text = response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| anyhow::anyhow!("Empty Gemini response"))?;

        let plan: TripPlan = serde_json::from_str(extract_json_block(text).trim())?;
        Ok(plan)
    }
}

fn build_prompt(req: &TripRequest) -> String {
    let per_person = req.budget / req.members.max(1) as f64;
    let interests = if req.interests.is_empty() {
        "general sightseeing".to_string()
    } else {
        req.interests.join(", ")
    };

    format!(
        r#"You are an expert travel planner specializing in budget-friendly student trips.

Create a detailed {days}-day itinerary for a trip to {destination}.

TRIP DETAILS:
- Destination: {destination}
- Starting from: {from}
- Total Budget: {budget} ({members} travelers = {per_person:.0} per person)
- Duration: {days} days
- Accommodation: {accommodation}
- Interests: {interests}

BUDGET ALLOCATION:
- Transportation: 30%
- Accommodation: 35%
- Food: 20%
- Activities: 10%
- Miscellaneous: 5%

Please provide:
1. Day-wise detailed itinerary
2. Specific places to visit with descriptions
3. Estimated costs for each activity
4. Budget-friendly food recommendations
5. Travel tips and money-saving advice

Format the response as a JSON object with this structure:
{{
    "itinerary": [
        {{
            "day": 1,
            "title": "Day 1 - Arrival and Local Exploration",
            "activities": [
                {{
                    "time": "9:00 AM",
                    "activity": "Breakfast at local cafe",
                    "location": "Specific place name",
                    "cost": 200,
                    "description": "Brief description",
                    "tips": "Money-saving tips"
                }}
            ],
            "total_day_cost": 1500
        }}
    ],
    "recommendations": {{
        "best_restaurants": ["Restaurant 1", "Restaurant 2"],
        "free_attractions": ["Place 1", "Place 2"],
        "local_transport_tips": "How to get around cheaply",
        "must_try_foods": ["Food 1", "Food 2"],
        "safety_tips": ["Tip 1", "Tip 2"]
    }},
    "estimated_costs": {{
        "transportation": 9000,
        "accommodation": 10500,
        "food": 6000,
        "activities": 3000,
        "miscellaneous": 1500
    }}
}}

Make it practical, budget-friendly, and exciting for students!"#,
        days = req.days,
        destination = req.destination,
        from = req.from_location,
        budget = req.budget,
        members = req.members,
        per_person = per_person,
        accommodation = req.accommodation,
        interests = interests,
    )
}

/// The model tends to wrap its JSON in markdown code fences. Strip them
/// and return the inner block; text without fences passes through as is.
fn extract_json_block(text: &str) -> &str {
    if let Some(rest) = text.split("```json").nth(1) {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some(rest) = text.split("```").nth(1) {
        rest
    } else {
        text
    }
}

/// Deterministic minimal plan used whenever the upstream call fails:
/// one generic sightseeing activity per day, category totals as fixed
/// percentages of the submitted budget.
pub fn fallback_plan(destination: &str, days: u32, budget: f64) -> TripPlan {
    let itinerary = (1..=days)
        .map(|day| ItineraryDay {
            day,
            title: format!("Day {} - Exploring {}", day, destination),
            activities: vec![Activity {
                time: "10:00 AM".to_string(),
                activity: "Sightseeing around the main attractions".to_string(),
                location: destination.to_string(),
                cost: 500.0,
                description: "Explore popular spots at your own pace".to_string(),
                tips: "Look for student discounts and free entry days".to_string(),
            }],
            total_day_cost: 500.0,
        })
        .collect();

    TripPlan {
        itinerary,
        recommendations: Recommendations {
            best_restaurants: vec!["Local cafes".to_string(), "Street food stalls".to_string()],
            free_attractions: vec!["Public parks".to_string(), "Historic areas".to_string()],
            local_transport_tips: "Use public transport or walk when possible".to_string(),
            must_try_foods: vec!["Local specialties".to_string()],
            safety_tips: vec![
                "Stay in groups".to_string(),
                "Keep valuables safe".to_string(),
            ],
        },
        estimated_costs: CostBreakdown::from_budget(budget),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_from_json_fence() {
        let text = "Here you go:\n```json\n{\"a\": 1}\n```\nEnjoy!";
        assert_eq!(extract_json_block(text).trim(), "{\"a\": 1}");
    }

    #[test]
    fn extracts_json_from_bare_fence() {
        let text = "```\n{\"a\": 1}\n";
        assert_eq!(extract_json_block(text).trim(), "{\"a\": 1}");
    }

    #[test]
    fn unfenced_text_passes_through() {
        assert_eq!(extract_json_block("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn parses_a_fenced_plan_into_typed_structures() {
        let text = r#"```json
{
    "itinerary": [
        {
            "day": 1,
            "title": "Day 1 - Arrival",
            "activities": [
                {"time": "9:00 AM", "activity": "Breakfast", "location": "Cafe", "cost": 200, "description": "Local cafe", "tips": "Ask for the student menu"}
            ],
            "total_day_cost": 200
        }
    ],
    "recommendations": {
        "best_restaurants": ["A"],
        "free_attractions": ["B"],
        "local_transport_tips": "Walk",
        "must_try_foods": ["C"],
        "safety_tips": ["D"]
    },
    "estimated_costs": {
        "transportation": 3000,
        "accommodation": 3500,
        "food": 2000,
        "activities": 1000,
        "miscellaneous": 500
    }
}
```"#;
        let plan: TripPlan = serde_json::from_str(extract_json_block(text).trim()).unwrap();
        assert_eq!(plan.itinerary.len(), 1);
        assert_eq!(plan.itinerary[0].activities[0].cost, 200.0);
        assert_eq!(plan.estimated_costs.total(), 10000.0);
    }

    #[test]
    fn malformed_plan_is_rejected_at_the_boundary() {
        let text = "```json\n{\"itinerary\": \"not a list\"}\n```";
        assert!(serde_json::from_str::<TripPlan>(extract_json_block(text).trim()).is_err());
    }

    #[test]
    fn fallback_has_one_activity_per_day() {
        let plan = fallback_plan("Goa", 4, 20000.0);
        assert_eq!(plan.itinerary.len(), 4);
        for (i, day) in plan.itinerary.iter().enumerate() {
            assert_eq!(day.day, (i + 1) as u32);
            assert_eq!(day.activities.len(), 1);
        }
    }

    #[test]
    fn fallback_costs_follow_the_fixed_split() {
        let plan = fallback_plan("Goa", 3, 10000.0);
        let costs = &plan.estimated_costs;
        assert_eq!(costs.transportation, 3000.0);
        assert_eq!(costs.accommodation, 3500.0);
        assert_eq!(costs.food, 2000.0);
        assert_eq!(costs.activities, 1000.0);
        assert_eq!(costs.miscellaneous, 500.0);
        assert!((costs.total() - 10000.0).abs() < 0.01);
    }
}
