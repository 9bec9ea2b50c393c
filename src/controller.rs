use crate::criteria::{CriteriaField, FieldValue};
use crate::error::CriteriaError;
use crate::filter;
use crate::source::SourceRegistry;
use crate::state::{AppEvent, AppState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Owns the application state and runs searches in the background.
///
/// A search waits `delay` (standing in for a network round trip), fetches from
/// every registered source and filters the result. Starting a new search
/// aborts the one in flight: last write wins.
pub struct SearchController {
    state: Arc<Mutex<AppState>>,
    registry: Arc<SourceRegistry>,
    delay: Duration,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

async fn dispatch_to(state: &Mutex<AppState>, event: AppEvent) {
    let mut guard = state.lock().await;
    let current = std::mem::take(&mut *guard);
    *guard = current.apply(event);
}

impl SearchController {
    pub fn new(registry: SourceRegistry, delay: Duration, initial: AppState) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial)),
            registry: Arc::new(registry),
            delay,
            in_flight: Mutex::new(None),
        }
    }

    pub async fn snapshot(&self) -> AppState {
        self.state.lock().await.clone()
    }

    pub async fn dispatch(&self, event: AppEvent) {
        dispatch_to(&self.state, event).await;
    }

    pub async fn update_field(
        &self,
        field: CriteriaField,
        value: impl Into<FieldValue>,
    ) -> Result<(), CriteriaError> {
        let mut guard = self.state.lock().await;
        *guard = guard.clone().update_field(field, value)?;
        Ok(())
    }

    /// Starts a search with the current criteria and returns its generation.
    pub async fn search(&self) -> u64 {
        let mut in_flight = self.in_flight.lock().await;

        let (generation, criteria) = {
            let mut guard = self.state.lock().await;
            let current = std::mem::take(&mut *guard);
            *guard = current.apply(AppEvent::SearchStarted);
            (guard.generation, guard.criteria.clone())
        };

        if let Some(previous) = in_flight.take() {
            if !previous.is_finished() {
                tracing::debug!("Superseding in-flight search with #{}", generation);
                previous.abort();
            }
        }

        tracing::info!("Search #{} started", generation);

        let state = self.state.clone();
        let registry = self.registry.clone();
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let listings = registry.fetch_all(&criteria).await;
            let outcome = filter::search(&criteria, &listings);

            match &outcome {
                Ok(matched) => tracing::info!(
                    "Search #{} matched {} of {} listings",
                    generation, matched.len(), listings.len()
                ),
                Err(e) => tracing::warn!("Search #{} failed: {}", generation, e),
            }

            dispatch_to(&state, AppEvent::SearchCompleted { generation, outcome }).await;
        });

        *in_flight = Some(handle);
        generation
    }

    /// Waits for the in-flight search, if any, to finish.
    pub async fn wait(&self) {
        let handle = self.in_flight.lock().await.take();

        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!("Search task failed: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::SearchCriteria;
    use crate::models::Listing;
    use crate::source::tests::FailingSource;
    use crate::source::{sample_listings, ListingSource, SampleSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        fetches: Arc<AtomicUsize>,
        listings: Vec<Listing>,
    }

    #[async_trait]
    impl ListingSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        async fn fetch(&self, _criteria: &SearchCriteria) -> anyhow::Result<Vec<Listing>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.listings.clone())
        }
    }

    fn controller_with(source: Box<dyn ListingSource>) -> SearchController {
        let mut registry = SourceRegistry::new();
        registry.register(source);
        SearchController::new(registry, Duration::from_millis(800), AppState::default())
    }

    fn prices(listings: &[Listing]) -> Vec<u32> {
        listings.iter().map(|l| l.price).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_loading_until_delay_elapses() {
        let controller = controller_with(Box::new(SampleSource::new()));
        controller.update_field(CriteriaField::MaxPrice, "1500").await.unwrap();

        let generation = controller.search().await;
        assert_eq!(generation, 1);

        let pending = controller.snapshot().await;
        assert!(pending.loading);
        assert!(pending.matched.is_empty());

        controller.wait().await;

        let done = controller.snapshot().await;
        assert!(!done.loading);
        assert_eq!(prices(&done.matched), vec![1200, 850]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_search_supersedes_in_flight_one() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let controller = controller_with(Box::new(CountingSource {
            fetches: fetches.clone(),
            listings: sample_listings(),
        }));

        controller.update_field(CriteriaField::Location, "paris").await.unwrap();
        controller.search().await;
        controller.update_field(CriteriaField::Location, "boulogne").await.unwrap();
        let latest = controller.search().await;
        controller.wait().await;

        let state = controller.snapshot().await;
        assert_eq!(state.generation, latest);
        assert!(!state.loading);
        assert_eq!(prices(&state.matched), vec![1800]);
        // The first search was aborted while still waiting
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_source_yields_empty_result() {
        let controller = controller_with(Box::new(FailingSource));
        controller.search().await;
        controller.wait().await;

        let state = controller.snapshot().await;
        assert!(!state.loading);
        assert!(state.matched.is_empty());
        assert_eq!(state.last_error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_criterion_is_reported() {
        let controller = controller_with(Box::new(SampleSource::new()));
        controller.update_field(CriteriaField::Rooms, "trois").await.unwrap();
        controller.search().await;
        controller.wait().await;

        let state = controller.snapshot().await;
        assert!(state.matched.is_empty());
        assert!(state.last_error.is_some());
    }

    #[tokio::test]
    async fn test_update_field_rejects_wrong_control() {
        let controller = controller_with(Box::new(SampleSource::new()));
        let result = controller.update_field(CriteriaField::Parking, "oui").await;
        assert_eq!(result, Err(CriteriaError::ExpectedFlag(CriteriaField::Parking)));
        assert!(!controller.snapshot().await.criteria.parking);
    }

    #[tokio::test]
    async fn test_wait_without_search_returns() {
        let controller = controller_with(Box::new(SampleSource::new()));
        controller.wait().await;
        assert_eq!(controller.snapshot().await.generation, 0);
    }
}
