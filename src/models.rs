use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub price: u32, // €/month
    pub surface: u32, // Surface area in m²
    pub rooms: u32,
    #[serde(default)]
    pub bedrooms: u32,
    pub address: String,
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub source: String,
    #[serde(deserialize_with = "deserialize_published_at")]
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub furnished: bool,
    #[serde(default)]
    pub charges: u32,
    #[serde(default)]
    pub floor: i32,
    #[serde(default)]
    pub balcony: bool,
    #[serde(default)]
    pub parking: bool,
    #[serde(default)]
    pub pets: bool,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Accepts RFC 3339 timestamps as well as naive ISO timestamps, read as UTC.
fn deserialize_published_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

impl Listing {
    fn amenities(&self) -> Vec<&'static str> {
        let mut amenities = Vec::new();
        if self.furnished {
            amenities.push("meublé");
        }
        if self.balcony {
            amenities.push("balcon");
        }
        if self.parking {
            amenities.push("parking");
        }
        if self.pets {
            amenities.push("animaux acceptés");
        }
        amenities
    }

    /// Renders the listing as a display card. `favorite` only decorates the card.
    pub fn format_card(&self, mode: ViewMode, favorite: bool) -> String {
        let heart = if favorite { "♥" } else { "♡" };

        match mode {
            ViewMode::List => format!(
                "{} {} | {}€/mois | {} m² | {} p. | {} | {}",
                heart, self.title, self.price, self.surface, self.rooms, self.address, self.source
            ),
            ViewMode::Grid => {
                let mut card = format!("{} **{}**\n", heart, self.title);
                card.push_str(&format!("💰 {}€/mois (+{}€ charges)\n", self.price, self.charges));
                card.push_str(&format!(
                    "📐 {} m² · {} pièces · {} chambres · étage {}\n",
                    self.surface, self.rooms, self.bedrooms, self.floor
                ));
                card.push_str(&format!("📍 {}\n", self.address));

                let amenities = self.amenities();
                if !amenities.is_empty() {
                    card.push_str(&format!("✨ {}\n", amenities.join(", ")));
                }

                let truncated = if self.description.chars().count() > 120 {
                    let head: String = self.description.chars().take(120).collect();
                    format!("{}...", head)
                } else {
                    self.description.clone()
                };
                card.push_str(&format!("📝 {}\n", truncated));

                if let Some(url) = &self.url {
                    card.push_str(&format!("🔗 {}\n", url));
                }
                card.push_str(&format!(
                    "🌐 {} · publié le {}",
                    self.source,
                    self.published_at.format("%d/%m/%Y")
                ));
                card
            }
        }
    }
}

/// How the renderer lays out result cards. Has no effect on the data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl FromStr for ViewMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => anyhow::bail!("unknown view mode '{}' (expected grid or list)", other),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Grid => write!(f, "grid"),
            ViewMode::List => write!(f, "list"),
        }
    }
}
