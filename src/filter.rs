use crate::criteria::{CriteriaField, SearchCriteria};
use crate::error::FilterError;
use crate::models::Listing;

/// Criteria after the parse-and-validate step: every numeric input is either
/// absent or a whole number.
///
/// `property_type`, `charges` and `floor` are accepted by the form but do not
/// constrain results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaBounds {
    pub location: Option<String>, // lowercased
    pub min_rooms: Option<i64>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_surface: Option<i64>,
    pub max_surface: Option<i64>,
    pub min_bedrooms: Option<i64>,
    pub furnished: bool,
    pub balcony: bool,
    pub parking: bool,
    pub pets: bool,
}

fn parse_bound(field: CriteriaField, raw: &str) -> Result<Option<i64>, FilterError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| FilterError::InvalidNumericCriterion {
            field,
            value: raw.to_string(),
        })
}

impl CriteriaBounds {
    pub fn parse(criteria: &SearchCriteria) -> Result<Self, FilterError> {
        // Location is matched verbatim; only numeric inputs get trimmed
        let location = &criteria.location;

        Ok(Self {
            location: (!location.is_empty()).then(|| location.to_lowercase()),
            min_rooms: parse_bound(CriteriaField::Rooms, &criteria.rooms)?,
            min_price: parse_bound(CriteriaField::MinPrice, &criteria.min_price)?,
            max_price: parse_bound(CriteriaField::MaxPrice, &criteria.max_price)?,
            min_surface: parse_bound(CriteriaField::MinSurface, &criteria.min_surface)?,
            max_surface: parse_bound(CriteriaField::MaxSurface, &criteria.max_surface)?,
            min_bedrooms: parse_bound(CriteriaField::Bedrooms, &criteria.bedrooms)?,
            furnished: criteria.furnished,
            balcony: criteria.balcony,
            parking: criteria.parking,
            pets: criteria.pets,
        })
    }

    /// Checks one listing, stopping at the first failing clause.
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(location) = &self.location {
            if !listing.address.to_lowercase().contains(location.as_str()) {
                return false;
            }
        }

        let rooms = i64::from(listing.rooms);
        let price = i64::from(listing.price);
        let surface = i64::from(listing.surface);

        if self.min_rooms.is_some_and(|min| rooms < min) {
            return false;
        }
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }
        if self.min_surface.is_some_and(|min| surface < min) {
            return false;
        }
        if self.max_surface.is_some_and(|max| surface > max) {
            return false;
        }
        if self
            .min_bedrooms
            .is_some_and(|min| i64::from(listing.bedrooms) < min)
        {
            return false;
        }

        // Checked boxes require the amenity, unchecked ones don't exclude anything
        (!self.furnished || listing.furnished)
            && (!self.balcony || listing.balcony)
            && (!self.parking || listing.parking)
            && (!self.pets || listing.pets)
    }
}

/// Returns the listings matching `criteria`, in source order.
///
/// Malformed numeric input fails the whole search with
/// `FilterError::InvalidNumericCriterion` instead of silently skipping the clause.
pub fn search(criteria: &SearchCriteria, listings: &[Listing]) -> Result<Vec<Listing>, FilterError> {
    let bounds = CriteriaBounds::parse(criteria)?;

    let matched: Vec<Listing> = listings
        .iter()
        .filter(|listing| bounds.matches(listing))
        .cloned()
        .collect();

    tracing::debug!(
        "Filtered {} listings down to {} (filtered out {})",
        listings.len(),
        matched.len(),
        listings.len() - matched.len()
    );

    Ok(matched)
}
