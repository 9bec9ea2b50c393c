use crate::criteria::{CriteriaField, FieldValue, SearchCriteria};
use crate::error::{CriteriaError, FilterError};
use crate::favorites::FavoriteSet;
use crate::models::{Listing, ViewMode};
use crate::sort::{sort_listings, SortKey};

/// Discrete events driving the application.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    CriteriaChanged(SearchCriteria),
    SearchStarted,
    SearchCompleted {
        generation: u64,
        outcome: Result<Vec<Listing>, FilterError>,
    },
    SortChanged(SortKey),
    FavoriteToggled(String),
    ViewModeChanged(ViewMode),
}

/// Whole application state. Every event yields a new value through `apply`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub criteria: SearchCriteria,
    pub matched: Vec<Listing>,
    pub loading: bool,
    pub favorites: FavoriteSet,
    pub view_mode: ViewMode,
    pub sort_key: SortKey,
    pub last_error: Option<FilterError>,
    /// Id of the most recently started search; older completions are dropped.
    pub generation: u64,
}

impl AppState {
    pub fn new(sort_key: SortKey, view_mode: ViewMode) -> Self {
        Self {
            sort_key,
            view_mode,
            ..Self::default()
        }
    }

    pub fn apply(self, event: AppEvent) -> AppState {
        match event {
            AppEvent::CriteriaChanged(criteria) => AppState { criteria, ..self },
            AppEvent::SearchStarted => AppState {
                loading: true,
                generation: self.generation + 1,
                ..self
            },
            AppEvent::SearchCompleted { generation, outcome } => {
                if generation != self.generation {
                    tracing::debug!(
                        "Dropping stale search result #{} (current: #{})",
                        generation, self.generation
                    );
                    return self;
                }

                // Results and loading flag change together
                match outcome {
                    Ok(matched) => AppState {
                        matched,
                        loading: false,
                        last_error: None,
                        ..self
                    },
                    Err(e) => {
                        tracing::warn!("Search rejected: {}", e);
                        AppState {
                            matched: Vec::new(),
                            loading: false,
                            last_error: Some(e),
                            ..self
                        }
                    }
                }
            }
            AppEvent::SortChanged(sort_key) => AppState { sort_key, ..self },
            AppEvent::FavoriteToggled(id) => {
                let mut favorites = self.favorites.clone();
                favorites.toggle(&id);
                AppState { favorites, ..self }
            }
            AppEvent::ViewModeChanged(view_mode) => AppState { view_mode, ..self },
        }
    }

    /// Field edit on the search form.
    pub fn update_field(
        self,
        field: CriteriaField,
        value: impl Into<FieldValue>,
    ) -> Result<AppState, CriteriaError> {
        let criteria = self.criteria.update_field(field, value)?;
        Ok(self.apply(AppEvent::CriteriaChanged(criteria)))
    }

    /// The matched set in display order. Derived, never stored.
    pub fn ordered_view(&self) -> Vec<Listing> {
        sort_listings(&self.matched, self.sort_key)
    }
}
