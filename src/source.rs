use crate::criteria::SearchCriteria;
use crate::models::Listing;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use futures::future::join_all;
use uuid::Uuid;

/// Anything able to supply listings for a search.
///
/// Sources may pre-narrow their results using the criteria, but the filter
/// engine always re-applies the criteria locally.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Returns the name of the source
    fn name(&self) -> &str;

    async fn fetch(&self, criteria: &SearchCriteria) -> Result<Vec<Listing>>;

    /// Returns whether this source is enabled
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Registry to manage all listing sources
pub struct SourceRegistry {
    sources: Vec<Box<dyn ListingSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn register(&mut self, source: Box<dyn ListingSource>) {
        self.sources.push(source);
    }

    /// Collects listings from every enabled source, fetching them concurrently.
    /// Results keep registration order. A failing source is logged and skipped
    /// so the others still contribute.
    pub async fn fetch_all(&self, criteria: &SearchCriteria) -> Vec<Listing> {
        let enabled: Vec<&dyn ListingSource> = self.sources
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| s.is_enabled())
            .collect();

        let results = join_all(enabled.iter().map(|source| {
            tracing::debug!("Fetching listings from {}", source.name());
            source.fetch(criteria)
        }))
        .await;

        let mut all_listings = Vec::new();

        for (source, result) in enabled.iter().zip(results) {
            match result {
                Ok(mut listings) => {
                    tracing::info!("Found {} listings from {}", listings.len(), source.name());
                    all_listings.append(&mut listings);
                }
                Err(e) => {
                    tracing::error!("Failed to fetch listings from {}: {}", source.name(), e);
                }
            }
        }

        all_listings
    }

    pub fn list_sources(&self) -> Vec<String> {
        self.sources.iter()
            .map(|s| s.name().to_string())
            .collect()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The fixed in-memory dataset used when no remote backend is configured.
pub struct SampleSource {
    listings: Vec<Listing>,
}

impl SampleSource {
    pub fn new() -> Self {
        Self {
            listings: sample_listings(),
        }
    }
}

impl Default for SampleSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingSource for SampleSource {
    fn name(&self) -> &str {
        "sample"
    }

    async fn fetch(&self, _criteria: &SearchCriteria) -> Result<Vec<Listing>> {
        Ok(self.listings.clone())
    }
}

/// Three demo listings, published 1, 2 and 0 days ago.
pub fn sample_listings() -> Vec<Listing> {
    let now = Utc::now();

    vec![
        Listing {
            id: Uuid::new_v4().to_string(),
            title: "Appartement 2 pièces - Centre Paris".to_string(),
            price: 1200,
            surface: 45,
            rooms: 2,
            bedrooms: 1,
            address: "75001 Paris, Île-de-France".to_string(),
            description: "Magnifique appartement au cœur de Paris, proche des transports en commun. Entièrement rénové avec une cuisine équipée moderne.".to_string(),
            images: vec!["https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=400".to_string()],
            source: "LeBonCoin".to_string(),
            published_at: now - Duration::days(1),
            furnished: true,
            charges: 150,
            floor: 3,
            balcony: true,
            parking: false,
            pets: false,
            external_id: None,
            url: Some(format!("https://leboncoin.fr/fake-{}", Uuid::new_v4())),
        },
        Listing {
            id: Uuid::new_v4().to_string(),
            title: "Studio meublé - Quartier Latin".to_string(),
            price: 850,
            surface: 25,
            rooms: 1,
            bedrooms: 0,
            address: "75005 Paris, Île-de-France".to_string(),
            description: "Studio lumineux dans le quartier historique du Quartier Latin. Parfait pour étudiant ou jeune professionnel.".to_string(),
            images: vec!["https://images.unsplash.com/photo-1502672260266-1c1ef2d93688?w=400".to_string()],
            source: "SeLoger".to_string(),
            published_at: now - Duration::days(2),
            furnished: true,
            charges: 100,
            floor: 2,
            balcony: false,
            parking: false,
            pets: true,
            external_id: None,
            url: Some(format!("https://seloger.com/fake-{}", Uuid::new_v4())),
        },
        Listing {
            id: Uuid::new_v4().to_string(),
            title: "Appartement 3 pièces avec terrasse".to_string(),
            price: 1800,
            surface: 70,
            rooms: 3,
            bedrooms: 2,
            address: "92100 Boulogne-Billancourt, Île-de-France".to_string(),
            description: "Spacieux appartement familial avec grande terrasse. Parking privé inclus. Quartier résidentiel calme.".to_string(),
            images: vec!["https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?w=400".to_string()],
            source: "Foncia".to_string(),
            published_at: now,
            furnished: false,
            charges: 200,
            floor: 5,
            balcony: true,
            parking: true,
            pets: false,
            external_id: None,
            url: Some(format!("https://foncia.com/fake-{}", Uuid::new_v4())),
        },
    ]
}
