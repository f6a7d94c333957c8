//! The search engine: keeps the displayed POIs consistent with the query string.
//!
//! Every interaction writes the query store and then re-derives state via
//! `sync`, which is also what runs when the store changes underneath us
//! (back/forward navigation). `sync` is idempotent: a fetch starts only
//! when the server-side query actually changes.
//!
//! Fetches are last-request-wins. Starting one cancels the previous token,
//! and results are applied only if they belong to the newest fetch.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use voyage_directory::{City, Country, Poi, PoiDirectory, PoiQuery, Tag};

use crate::actions::{self, Transition};
use crate::debounce::Debouncer;
use crate::error::FetchError;
use crate::fetch::{build_poi_query, fetch_pois};
use crate::pagination::{page_numbers, page_slice, total_pages, PageLabel, ResultRange};
use crate::refine::{displayed_cities, refine_by_tags};
use crate::state::{compute_query_state, FilterState};
use crate::store::QueryStore;
use crate::vocabulary::FilterVocabulary;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/640x420?text=No+Image";

#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Quiet period on the name field before it is sent to the directory
    pub debounce: Duration,
    /// Image substituted for POIs without any
    pub placeholder_image: String,
}

impl SearchSettings {
    pub fn new(debounce_ms: u64, placeholder_image: impl Into<String>) -> Self {
        Self {
            debounce: Duration::from_millis(debounce_ms),
            placeholder_image: placeholder_image.into(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// Everything a search page renders.
#[derive(Debug, Clone)]
pub struct SearchView {
    pub filters: FilterState,
    /// POIs on the current page
    pub pois: Vec<Poi>,
    /// Matches across all pages, after tag refinement
    pub total_results: usize,
    pub page: u32,
    pub total_pages: u32,
    /// Empty when there are no results (no pager shown)
    pub page_labels: Vec<PageLabel>,
    pub range: Option<ResultRange>,
    pub has_previous: bool,
    pub has_next: bool,
    pub loading: bool,
    pub countries: Vec<Country>,
    /// Cities of the selected country, or all of them
    pub cities: Vec<City>,
    pub tags: Vec<Tag>,
}

impl SearchView {
    /// True when the page should show its "No results found" state.
    pub fn is_empty(&self) -> bool {
        self.total_results == 0
    }
}

#[derive(Debug, Default)]
struct EngineState {
    pois: Vec<Poi>,
    vocabulary: FilterVocabulary,
    vocabulary_loaded: bool,
    /// Name parameter last seen by `sync`; `None` until mounted
    observed_name: Option<String>,
    /// Name as of the last quiet period; this is what gets fetched
    debounced_name: String,
    /// Query of the shown or in-flight results
    active_query: Option<PoiQuery>,
    in_flight: Option<(u64, CancellationToken)>,
    generation: u64,
}

pub struct SearchEngine<D, S> {
    directory: Arc<D>,
    store: Arc<S>,
    settings: SearchSettings,
    debouncer: Debouncer,
    state: Mutex<EngineState>,
    revision: watch::Sender<u64>,
}

impl<D, S> SearchEngine<D, S>
where
    D: PoiDirectory,
    S: QueryStore,
{
    pub fn new(directory: Arc<D>, store: Arc<S>, settings: SearchSettings) -> Arc<Self> {
        let (revision, _) = watch::channel(0);
        Arc::new(Self {
            directory,
            store,
            debouncer: Debouncer::new(settings.debounce),
            settings,
            state: Mutex::new(EngineState::default()),
            revision,
        })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Current filters, straight from the store.
    pub fn filters(&self) -> FilterState {
        compute_query_state(&self.store.get())
    }

    /// Start the engine: load the filter vocabulary in the background and
    /// fetch POIs for the current query without waiting for it.
    ///
    /// The name in the query string at mount time is used as-is, with no
    /// debounce.
    pub fn mount(self: &Arc<Self>) {
        let filters = self.filters();
        {
            let mut state = self.state.lock();
            state.debounced_name = filters.name.clone();
            state.observed_name = Some(filters.name);
        }

        let engine = Arc::clone(self);
        tokio::spawn(async move {
            let vocabulary = FilterVocabulary::load(engine.directory.as_ref()).await;
            engine.apply_vocabulary(vocabulary);
        });

        self.sync();
    }

    /// Cancel the in-flight fetch and any pending name commit.
    pub fn unmount(&self) {
        self.debouncer.cancel();
        let mut state = self.state.lock();
        if let Some((_, token)) = state.in_flight.take() {
            token.cancel();
        }
        state.active_query = None;
        state.observed_name = None;
    }

    /// React to store writes made by others (e.g. history navigation).
    ///
    /// The task ends when the engine is dropped or the store goes away.
    pub fn spawn_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let mut changes = self.store.subscribe();
        let engine: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                match engine.upgrade() {
                    Some(engine) => engine.sync(),
                    None => break,
                }
            }
        })
    }

    pub fn set_name_query(self: &Arc<Self>, text: &str) {
        self.apply(actions::set_name_query(&self.store.get(), text));
    }

    pub fn select_country(self: &Arc<Self>, country_id: Option<&str>) {
        self.apply(actions::select_country(&self.store.get(), country_id));
    }

    pub fn select_city(self: &Arc<Self>, city_name: Option<&str>) {
        self.apply(actions::select_city(&self.store.get(), city_name));
    }

    pub fn toggle_tag(self: &Arc<Self>, tag: &str) {
        self.apply(actions::toggle_tag(&self.store.get(), tag));
    }

    pub fn go_to_page(self: &Arc<Self>, page: u32) {
        self.apply(actions::go_to_page(&self.store.get(), page));
    }

    fn apply(self: &Arc<Self>, transition: Transition) {
        self.store.set(transition.params, transition.mode);
        self.sync();
    }

    /// Re-derive everything from the store.
    pub fn sync(self: &Arc<Self>) {
        let filters = self.filters();

        let name_changed = {
            let mut state = self.state.lock();
            let Some(seen) = state.observed_name.as_deref() else {
                return;
            };
            let changed = seen != filters.name;
            if changed {
                state.observed_name = Some(filters.name.clone());
            }
            changed
        };

        if name_changed {
            let engine = Arc::downgrade(self);
            let name = filters.name.clone();
            self.debouncer.schedule(move || {
                if let Some(engine) = engine.upgrade() {
                    engine.commit_name(name);
                }
            });
        }

        self.refresh(&filters);
        self.correct_page(&filters);
    }

    fn commit_name(self: &Arc<Self>, name: String) {
        tracing::debug!("Search name settled: {:?}", name);
        self.state.lock().debounced_name = name;

        let filters = self.filters();
        self.refresh(&filters);
        self.correct_page(&filters);
    }

    fn apply_vocabulary(self: &Arc<Self>, vocabulary: FilterVocabulary) {
        {
            let mut state = self.state.lock();
            state.vocabulary = vocabulary;
            state.vocabulary_loaded = true;
        }
        self.bump();
        // A selected country can only be sent once its name is known
        self.sync();
    }

    /// Start a fetch if the server-side query differs from the active one.
    fn refresh(self: &Arc<Self>, filters: &FilterState) {
        let (query, generation, token) = {
            let mut state = self.state.lock();
            let query = build_poi_query(filters, &state.debounced_name, &state.vocabulary);
            if state.active_query.as_ref() == Some(&query) {
                return;
            }

            if let Some((_, previous)) = state.in_flight.take() {
                previous.cancel();
            }

            state.generation += 1;
            let generation = state.generation;
            let token = CancellationToken::new();
            state.in_flight = Some((generation, token.clone()));
            state.active_query = Some(query.clone());
            (query, generation, token)
        };
        self.bump();

        let engine = Arc::clone(self);
        tokio::spawn(async move {
            let result = fetch_pois(
                engine.directory.as_ref(),
                &query,
                &token,
                &engine.settings.placeholder_image,
            )
            .await;
            engine.apply_result(generation, result);
        });
    }

    fn apply_result(self: &Arc<Self>, generation: u64, result: Result<Vec<Poi>, FetchError>) {
        {
            let mut state = self.state.lock();
            // Cancelled fetches were already replaced, so they land here too
            match &state.in_flight {
                Some((current, _)) if *current == generation => {}
                _ => {
                    tracing::debug!("Discarding results of superseded fetch #{}", generation);
                    return;
                }
            }
            state.in_flight = None;

            match result {
                Ok(pois) => {
                    tracing::info!("Fetch #{} returned {} POIs", generation, pois.len());
                    state.pois = pois;
                }
                Err(e) => {
                    tracing::error!("Error fetching POIs: {}", e);
                    state.pois.clear();
                }
            }
        }
        self.bump();
        self.correct_page(&self.filters());
    }

    /// Send an out-of-range page back to page 1, replacing the history entry.
    ///
    /// Skipped while a fetch is in flight so a bookmarked page is not reset
    /// against results that are about to be replaced.
    fn correct_page(&self, filters: &FilterState) {
        let total = {
            let state = self.state.lock();
            if state.in_flight.is_some() {
                return;
            }
            total_pages(refine_by_tags(&state.pois, &filters.tags).len())
        };

        if filters.page > total {
            tracing::info!(
                "Page {} is past the last page ({}); returning to page 1",
                filters.page,
                total
            );
            let transition = actions::reset_page(&self.store.get());
            self.store.set(transition.params, transition.mode);
        }
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r = r.wrapping_add(1));
    }

    /// Ticks whenever results, loading state or vocabulary change.
    pub fn subscribe_revisions(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight.is_some()
    }

    /// Wait until the vocabulary is loaded and no fetch is in flight.
    ///
    /// A name still inside its debounce window does not count as pending.
    pub async fn wait_until_settled(&self) {
        let mut revisions = self.subscribe_revisions();
        loop {
            {
                let state = self.state.lock();
                if state.vocabulary_loaded && state.in_flight.is_none() {
                    return;
                }
            }
            if revisions.changed().await.is_err() {
                return;
            }
        }
    }

    /// Snapshot of what the page should render right now.
    pub fn view(&self) -> SearchView {
        let filters = self.filters();
        let state = self.state.lock();

        let refined = refine_by_tags(&state.pois, &filters.tags);
        let total_results = refined.len();
        let pages = total_pages(total_results);
        let page = filters.page;

        let pois = page_slice(&refined, page)
            .iter()
            .map(|poi| (*poi).clone())
            .collect();

        let page_labels = if total_results == 0 {
            Vec::new()
        } else {
            page_numbers(page, pages)
        };

        SearchView {
            pois,
            total_results,
            page,
            total_pages: pages,
            page_labels,
            range: ResultRange::for_page(page, total_results),
            has_previous: page > 1,
            has_next: page < pages,
            loading: state.in_flight.is_some(),
            countries: state.vocabulary.countries.clone(),
            cities: displayed_cities(&state.vocabulary.cities, filters.country_id.as_deref())
                .into_iter()
                .cloned()
                .collect(),
            tags: state.vocabulary.tags.clone(),
            filters,
        }
    }
}
