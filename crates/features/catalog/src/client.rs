//! Client-side query state and fetch coordination.
//!
//! [`FilterState`] is an immutable snapshot of the filter form. Every change produces a new
//! state, which [`FetchCoordinator::submit`] turns into at most one delivered result: text
//! search is debounced, other changes fetch at once, and results of superseded states are
//! dropped.

use crate::error::{CatalogError, CatalogErrorExt};
use crate::pipeline::UniversityPage;
use crate::query::{SortKey, SortOrder};
use async_trait::async_trait;
use campus_kernel::domain::{
    AffordabilitySet, AffordabilityTier, AgeCategory, AgeCategorySet, RegionalGroup,
};
use parking_lot::Mutex;
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Quiet period before a text-search change is fetched.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Filter form state. Transitions return a new value and reset `page` to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub search: String,
    pub countries: Vec<String>,
    pub region: Option<RegionalGroup>,
    pub min_tuition: Option<f64>,
    pub max_tuition: Option<f64>,
    pub affordability: AffordabilitySet,
    pub top_tier: Option<i64>,
    pub institution_age: AgeCategorySet,
    pub value_for_money: bool,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub page: usize,
    pub limit: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            countries: Vec::new(),
            region: None,
            min_tuition: None,
            max_tuition: None,
            affordability: AffordabilitySet::empty(),
            top_tier: None,
            institution_age: AgeCategorySet::empty(),
            value_for_money: false,
            sort_by: SortKey::Ranking,
            sort_order: SortOrder::Asc,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterState {
    #[must_use]
    pub fn reset() -> Self {
        Self::default()
    }

    fn changed(self, update: impl FnOnce(&mut Self)) -> Self {
        let mut next = self;
        update(&mut next);
        next.page = 1;
        next
    }

    #[must_use]
    pub fn with_search(self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.changed(|s| s.search = search)
    }

    #[must_use]
    pub fn with_countries<I, S>(self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let countries = countries.into_iter().map(Into::into).collect();
        self.changed(|s| s.countries = countries)
    }

    #[must_use]
    pub fn with_region(self, region: Option<RegionalGroup>) -> Self {
        self.changed(|s| s.region = region)
    }

    #[must_use]
    pub fn with_tuition(self, min: Option<f64>, max: Option<f64>) -> Self {
        self.changed(|s| {
            s.min_tuition = min;
            s.max_tuition = max;
        })
    }

    #[must_use]
    pub fn toggle_affordability(self, tier: AffordabilityTier) -> Self {
        self.changed(|s| s.affordability.toggle(tier.into()))
    }

    #[must_use]
    pub fn with_top_tier(self, top_tier: Option<i64>) -> Self {
        self.changed(|s| s.top_tier = top_tier)
    }

    #[must_use]
    pub fn toggle_institution_age(self, category: AgeCategory) -> Self {
        self.changed(|s| s.institution_age.toggle(category.into()))
    }

    #[must_use]
    pub fn with_value_for_money(self, enabled: bool) -> Self {
        self.changed(|s| s.value_for_money = enabled)
    }

    #[must_use]
    pub fn with_sort(self, sort_by: SortKey, sort_order: SortOrder) -> Self {
        self.changed(|s| {
            s.sort_by = sort_by;
            s.sort_order = sort_order;
        })
    }

    #[must_use]
    pub fn with_limit(self, limit: usize) -> Self {
        self.changed(|s| s.limit = limit.max(1))
    }

    /// Moves to another page without touching the filters.
    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// `true` when `next` differs from `self` in the search text and nothing else but the page.
    #[must_use]
    pub fn only_search_changed(&self, next: &Self) -> bool {
        self.search != next.search
            && Self { search: next.search.clone(), page: next.page, ..self.clone() } == *next
    }

    /// Query parameters in wire names. Empty filters are left out.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search", search.to_owned()));
        }
        let countries: Vec<&str> =
            self.countries.iter().map(|c| c.trim()).filter(|c| !c.is_empty()).collect();
        if !countries.is_empty() {
            pairs.push(("countries", countries.join(",")));
        }
        if let Some(region) = self.region {
            pairs.push(("region", region.key().to_owned()));
        }
        if let Some(min) = self.min_tuition {
            pairs.push(("minTuition", min.to_string()));
        }
        if let Some(max) = self.max_tuition {
            pairs.push(("maxTuition", max.to_string()));
        }
        if !self.affordability.is_empty() {
            let tiers: Vec<&str> = self.affordability.tiers().map(AffordabilityTier::as_str).collect();
            pairs.push(("affordability", tiers.join(",")));
        }
        if let Some(top_tier) = self.top_tier {
            pairs.push(("topTier", top_tier.to_string()));
        }
        if !self.institution_age.is_empty() {
            let categories: Vec<&str> =
                self.institution_age.categories().map(AgeCategory::as_str).collect();
            pairs.push(("institutionAge", categories.join(",")));
        }
        if self.value_for_money {
            pairs.push(("valueForMoney", "true".to_owned()));
        }

        pairs.push(("sortBy", self.sort_by.as_str().to_owned()));
        pairs.push(("sortOrder", self.sort_order.as_str().to_owned()));
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

/// Source of result pages for a filter state.
#[async_trait]
pub trait UniversityFetcher: Debug + Send + Sync {
    async fn fetch(&self, state: &FilterState) -> Result<UniversityPage, CatalogError>;
}

/// Fetches pages from a running server.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/api/universities", self.base_url)
    }
}

#[async_trait]
impl UniversityFetcher for HttpFetcher {
    async fn fetch(&self, state: &FilterState) -> Result<UniversityPage, CatalogError> {
        self.client
            .get(self.endpoint())
            .query(&state.to_query_pairs())
            .send()
            .await
            .context("Requesting universities")?
            .error_for_status()
            .context("Server rejected the query")?
            .json::<UniversityPage>()
            .await
            .context("Decoding university page")
    }
}

/// A page delivered for the latest submitted state.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub generation: u64,
    pub state: FilterState,
    pub page: UniversityPage,
}

type Delivery = Option<Arc<FetchResult>>;

/// Latest-wins fetch scheduling.
///
/// Each submitted state gets a new generation. Submitting aborts the pending task, and a
/// task only publishes when its generation is still current. Must be used inside a Tokio
/// runtime.
#[derive(Debug)]
pub struct FetchCoordinator<F> {
    fetcher: Arc<F>,
    debounce: Duration,
    generation: Arc<AtomicU64>,
    last: Mutex<FilterState>,
    pending: Mutex<Option<JoinHandle<()>>>,
    results: Arc<watch::Sender<Delivery>>,
}

impl<F: UniversityFetcher + 'static> FetchCoordinator<F> {
    pub fn new(fetcher: F) -> Self {
        let (results, _) = watch::channel(None);
        Self {
            fetcher: Arc::new(fetcher),
            debounce: SEARCH_DEBOUNCE,
            generation: Arc::new(AtomicU64::new(0)),
            last: Mutex::new(FilterState::default()),
            pending: Mutex::new(None),
            results: Arc::new(results),
        }
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<Delivery> {
        self.results.subscribe()
    }

    pub fn latest(&self) -> Delivery {
        self.results.borrow().clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Schedules a fetch for `state` and returns its generation.
    pub fn submit(&self, state: FilterState) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        let delay = {
            let mut last = self.last.lock();
            let delay = if last.only_search_changed(&state) { self.debounce } else { Duration::ZERO };
            *last = state.clone();
            delay
        };

        let task = tokio::spawn(deliver(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.generation),
            Arc::clone(&self.results),
            generation,
            state,
            delay,
        ));

        if let Some(previous) = self.pending.lock().replace(task) {
            previous.abort();
        }
        debug!(generation, delay_ms = delay.as_millis(), "Fetch scheduled");
        generation
    }
}

impl<F> Drop for FetchCoordinator<F> {
    fn drop(&mut self) {
        if let Some(task) = self.pending.get_mut().take() {
            task.abort();
        }
    }
}

async fn deliver<F: UniversityFetcher>(
    fetcher: Arc<F>,
    current: Arc<AtomicU64>,
    results: Arc<watch::Sender<Delivery>>,
    generation: u64,
    state: FilterState,
    delay: Duration,
) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    if current.load(Ordering::Acquire) != generation {
        return;
    }

    let page = match fetcher.fetch(&state).await {
        Ok(page) => page,
        Err(err) => {
            warn!(error = %err, generation, "University fetch failed");
            UniversityPage::empty(state.page, state.limit)
        }
    };

    if current.load(Ordering::Acquire) != generation {
        debug!(generation, "Discarding superseded result");
        return;
    }
    results.send_replace(Some(Arc::new(FetchResult { generation, state, page })));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{PageLimits, UniversityQueryParams, compile};

    #[test]
    fn transitions_reset_the_page() {
        let state = FilterState::default().with_page(4);
        assert_eq!(state.page, 4);
        assert_eq!(state.clone().with_search("tech").page, 1);
        assert_eq!(state.clone().toggle_affordability(AffordabilityTier::Budget).page, 1);
        assert_eq!(state.with_sort(SortKey::TuitionFee, SortOrder::Desc).page, 1);
    }

    #[test]
    fn toggles_flip_membership() {
        let state = FilterState::default()
            .toggle_affordability(AffordabilityTier::Premium)
            .toggle_affordability(AffordabilityTier::Budget)
            .toggle_affordability(AffordabilityTier::Premium);
        assert_eq!(state.affordability, AffordabilitySet::BUDGET);
    }

    #[test]
    fn default_query_only_carries_sort_and_window() {
        let pairs = FilterState::default().to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("sortBy", "ranking".to_owned()),
                ("sortOrder", "asc".to_owned()),
                ("page", "1".to_owned()),
                ("limit", "20".to_owned()),
            ]
        );
    }

    #[test]
    fn query_pairs_compile_to_the_same_filters() {
        let state = FilterState::default()
            .with_search(" Tech ")
            .with_countries(["USA", " ", "UK"])
            .with_tuition(Some(20_000.0), None)
            .toggle_institution_age(AgeCategory::Historic)
            .with_value_for_money(true)
            .with_page(2);

        let object: serde_json::Map<String, serde_json::Value> = state
            .to_query_pairs()
            .into_iter()
            .map(|(k, v)| (k.to_owned(), serde_json::Value::String(v)))
            .collect();
        let params: UniversityQueryParams =
            serde_json::from_value(serde_json::Value::Object(object)).unwrap();
        let compiled = compile(&params, PageLimits::default()).unwrap();

        assert_eq!(compiled.filter.name.as_deref(), Some("Tech"));
        assert_eq!(compiled.filter.countries, Some(vec!["USA".to_owned(), "UK".to_owned()]));
        assert_eq!(compiled.filter.tuition.min, Some(20_000.0));
        assert!(compiled.value_ranking);
        assert_eq!(compiled.post_filters.len(), 1);
        assert_eq!((compiled.page.page, compiled.page.limit), (2, 20));
    }

    #[test]
    fn only_search_changed_ignores_page() {
        let base = FilterState::default().with_page(3);
        assert!(base.only_search_changed(&base.clone().with_search("x")));
        assert!(!base.only_search_changed(&base.clone()));
        assert!(!base.only_search_changed(&base.clone().with_search("x").with_value_for_money(true)));
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let fetcher = HttpFetcher::new("http://localhost:8080/");
        assert_eq!(fetcher.endpoint(), "http://localhost:8080/api/universities");
    }
}
