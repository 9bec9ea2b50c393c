use crate::criteria::SearchCriteria;
use crate::http_client::create_http_client;
use crate::models::Listing;
use crate::source::ListingSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/search`. Numbers that don't parse are left out; the
/// local filter step reports them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub property_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_surface: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_surface: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub furnished: Option<bool>,
    pub charges: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    pub balcony: bool,
    pub parking: bool,
    pub pets: bool,
}

fn lenient<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

impl From<&SearchCriteria> for SearchRequest {
    fn from(criteria: &SearchCriteria) -> Self {
        let location = criteria.location.trim();

        Self {
            location: (!location.is_empty()).then(|| location.to_string()),
            property_type: criteria.property_type.clone(),
            rooms: lenient(&criteria.rooms),
            min_surface: lenient(&criteria.min_surface),
            max_surface: lenient(&criteria.max_surface),
            min_price: lenient(&criteria.min_price),
            max_price: lenient(&criteria.max_price),
            furnished: criteria.furnished.then_some(true),
            charges: criteria.charges.clone(),
            bedrooms: lenient(&criteria.bedrooms),
            floor: lenient(&criteria.floor),
            balcony: criteria.balcony,
            parking: criteria.parking,
            pets: criteria.pets,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub listings: Vec<Listing>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Fetches listings from a remote search backend returning the same Listing shape.
pub struct RemoteSource {
    client: Client,
    base_url: String,
}

impl RemoteSource {
    pub fn new(base_url: &str, user_agent: &str, timeout_secs: u64) -> Result<Self> {
        let client = create_http_client(user_agent, timeout_secs)
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/api/search", self.base_url)
    }
}

#[async_trait]
impl ListingSource for RemoteSource {
    fn name(&self) -> &str {
        "remote"
    }

    async fn fetch(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>> {
        let url = self.search_url();
        let body = SearchRequest::from(criteria);
        tracing::debug!("POST {} with {:?}", url, body);

        let response = self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?
            .error_for_status()?;

        let payload: SearchResponse = response.json()
            .await
            .context("Failed to decode search response")?;

        if let Some(message) = &payload.message {
            tracing::info!("Backend says: {}", message);
        }
        tracing::debug!(
            "Received {} listings (total: {}, cached: {})",
            payload.listings.len(), payload.total, payload.cached
        );

        Ok(payload.listings)
    }
}
