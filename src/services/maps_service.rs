// services/maps_service.rs
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::models::trip::DistanceInfo;

const DISTANCE_MATRIX_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<MatrixDistance>,
}

#[derive(Debug, Deserialize)]
struct MatrixDistance {
    text: String,
    value: u64,
}

/// Best-effort origin to destination distance via the Distance Matrix
/// API. A trip plan works fine without it, so any failure collapses to
/// `None` and is only logged.
#[derive(Clone)]
pub struct MapsService {
    api_key: String,
    client: Client,
}

impl MapsService {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }

    pub async fn distance(&self, origin: &str, destination: &str) -> Option<DistanceInfo> {
        match self.lookup(origin, destination).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!("Distance lookup failed for {} -> {}: {}", origin, destination, e);
                None
            }
        }
    }

    async fn lookup(&self, origin: &str, destination: &str) -> anyhow::Result<Option<DistanceInfo>> {
        let response: MatrixResponse = self
            .client
            .get(DISTANCE_MATRIX_URL)
            .query(&[
                ("origins", origin),
                ("destinations", destination),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let element = response
            .rows
            .first()
            .and_then(|r| r.elements.first())
            .ok_or_else(|| anyhow::anyhow!("Empty distance matrix response"))?;

        if element.status != "OK" {
            return Ok(None);
        }

        Ok(element.distance.as_ref().map(|d| DistanceInfo {
            text: d.text.clone(),
            meters: d.value,
        }))
    }
}
