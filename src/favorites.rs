use std::collections::HashSet;

/// Listing ids the user marked as favorite. Only decorates the display,
/// never influences filtering or sorting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: HashSet<String>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `listing_id` if absent, removes it if present.
    /// Returns whether the listing is a favorite afterwards.
    pub fn toggle(&mut self, listing_id: &str) -> bool {
        if self.ids.remove(listing_id) {
            tracing::debug!("Removed {} from favorites", listing_id);
            false
        } else {
            self.ids.insert(listing_id.to_string());
            tracing::debug!("Added {} to favorites", listing_id);
            true
        }
    }

    pub fn contains(&self, listing_id: &str) -> bool {
        self.ids.contains(listing_id)
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut favorites = FavoriteSet::new();
        assert!(favorites.toggle("a"));
        assert!(favorites.contains("a"));
        assert_eq!(favorites.count(), 1);

        assert!(!favorites.toggle("a"));
        assert!(!favorites.contains("a"));
        assert_eq!(favorites.count(), 0);
    }

    #[test]
    fn test_double_toggle_restores_previous_state() {
        let mut favorites = FavoriteSet::new();
        favorites.toggle("a");
        favorites.toggle("b");
        let before = favorites.clone();

        favorites.toggle("c");
        favorites.toggle("c");
        assert_eq!(favorites, before);

        favorites.toggle("a");
        favorites.toggle("a");
        assert_eq!(favorites, before);
    }
}
