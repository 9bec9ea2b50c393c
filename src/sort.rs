use crate::models::Listing;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordering applied to the matched set before display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Source order, untouched.
    #[default]
    Relevance,
    /// Cheapest first.
    Price,
    /// Largest first.
    Surface,
    /// Most recently published first.
    Date,
}

impl SortKey {
    /// Unrecognized keys fall back to `Relevance`, which keeps the input order.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "price" => SortKey::Price,
            "surface" => SortKey::Surface,
            "date" => SortKey::Date,
            "relevance" | "" => SortKey::Relevance,
            other => {
                tracing::debug!("Unknown sort key '{}', keeping source order", other);
                SortKey::Relevance
            }
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Relevance => "relevance",
            SortKey::Price => "price",
            SortKey::Surface => "surface",
            SortKey::Date => "date",
        };
        f.write_str(name)
    }
}

/// Derives a new ordered sequence from `listings`. Ties keep their input order.
pub fn sort_listings(listings: &[Listing], key: SortKey) -> Vec<Listing> {
    let mut ordered = listings.to_vec();

    // slice::sort_by is stable
    match key {
        SortKey::Relevance => {}
        SortKey::Price => ordered.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::Surface => ordered.sort_by(|a, b| b.surface.cmp(&a.surface)),
        SortKey::Date => ordered.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::listing;
    use crate::source::sample_listings;

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    fn fixture() -> Vec<Listing> {
        vec![
            listing("a", 1200, 45, 2, 5),
            listing("b", 850, 70, 1, 9),
            listing("c", 1200, 25, 3, 1),
            listing("d", 850, 45, 2, 9),
            listing("e", 1800, 70, 3, 3),
        ]
    }

    #[test]
    fn test_sort_by_price_ascending() {
        let sorted = sort_listings(&fixture(), SortKey::Price);
        assert!(sorted.windows(2).all(|w| w[0].price <= w[1].price));
    }

    #[test]
    fn test_sort_by_surface_descending() {
        let sorted = sort_listings(&fixture(), SortKey::Surface);
        assert!(sorted.windows(2).all(|w| w[0].surface >= w[1].surface));
    }

    #[test]
    fn test_sort_by_date_most_recent_first() {
        let sorted = sort_listings(&fixture(), SortKey::Date);
        assert!(sorted.windows(2).all(|w| w[0].published_at >= w[1].published_at));
    }

    #[test]
    fn test_sort_is_stable() {
        let source = fixture();
        assert_eq!(ids(&sort_listings(&source, SortKey::Price)), vec!["b", "d", "a", "c", "e"]);
        assert_eq!(ids(&sort_listings(&source, SortKey::Surface)), vec!["b", "e", "a", "d", "c"]);
        assert_eq!(ids(&sort_listings(&source, SortKey::Date)), vec!["b", "d", "a", "e", "c"]);
    }

    #[test]
    fn test_relevance_keeps_input_order() {
        let source = fixture();
        assert_eq!(sort_listings(&source, SortKey::Relevance), source);
    }

    #[test]
    fn test_sort_does_not_touch_input() {
        let source = fixture();
        let snapshot = source.clone();
        let _ = sort_listings(&source, SortKey::Date);
        assert_eq!(source, snapshot);
    }

    #[test]
    fn test_unknown_key_falls_back_to_relevance() {
        assert_eq!(SortKey::from_name("PRICE"), SortKey::Price);
        assert_eq!(SortKey::from_name("rating"), SortKey::Relevance);
        assert_eq!(SortKey::from_name(""), SortKey::Relevance);
    }

    #[test]
    fn test_samples_by_date_newest_first() {
        let sorted = sort_listings(&sample_listings(), SortKey::Date);
        let prices: Vec<u32> = sorted.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![1800, 1200, 850]);
    }
}
