//! Fixtures and in-memory directories for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::oneshot;
use voyage_directory::{City, Country, DirectoryError, Poi, PoiDirectory, PoiQuery, Tag};

pub fn poi(id: &str, tags: &[&str]) -> Poi {
    Poi {
        id: id.to_string(),
        name: format!("Place {}", id),
        description: None,
        images: vec![format!("https://img.example/{}.jpg", id)],
        tags: tags.iter().map(|t| t.to_string()).collect(),
        city_id: "lis".to_string(),
        latitude: 38.7,
        longitude: -9.1,
    }
}

pub fn named_poi(id: &str, name: &str, city_id: &str, tags: &[&str]) -> Poi {
    Poi {
        name: name.to_string(),
        city_id: city_id.to_string(),
        ..poi(id, tags)
    }
}

pub fn city(id: &str, name: &str, country_id: &str) -> City {
    City {
        id: id.to_string(),
        name: name.to_string(),
        country_id: country_id.to_string(),
    }
}

pub fn country(id: &str, name: &str) -> Country {
    Country {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn tag(id: &str, name: &str) -> Tag {
    Tag {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn unavailable() -> DirectoryError {
    DirectoryError::Api {
        status: 503,
        message: "unavailable".to_string(),
    }
}

/// Directory answering immediately from fixed data, applying the same
/// filters as the real backend.
#[derive(Default)]
pub struct StaticDirectory {
    pub pois: Vec<Poi>,
    pub countries: Vec<Country>,
    pub cities: Vec<City>,
    pub tags: Vec<Tag>,
    pub fail_pois: AtomicBool,
    pub fail_countries: AtomicBool,
    queries: Mutex<Vec<PoiQuery>>,
}

impl StaticDirectory {
    pub fn new(pois: Vec<Poi>) -> Self {
        Self {
            pois,
            countries: vec![country("pt", "Portugal"), country("es", "Spain")],
            cities: vec![
                city("lis", "Lisbon", "pt"),
                city("opo", "Porto", "pt"),
                city("mad", "Madrid", "es"),
            ],
            tags: vec![tag("t1", "beach"), tag("t2", "family"), tag("t3", "sea")],
            ..Default::default()
        }
    }

    /// Every query received, in call order.
    pub fn queries(&self) -> Vec<PoiQuery> {
        self.queries.lock().clone()
    }

    pub fn set_fail_pois(&self, fail: bool) {
        self.fail_pois.store(fail, Ordering::SeqCst);
    }

    fn matches(&self, poi: &Poi, query: &PoiQuery) -> bool {
        let city = self.cities.iter().find(|c| c.id == poi.city_id);
        let name_ok = query
            .name
            .as_ref()
            .map_or(true, |n| poi.name.to_lowercase().contains(&n.to_lowercase()));
        let city_ok = query
            .city_name
            .as_ref()
            .map_or(true, |n| city.is_some_and(|c| &c.name == n));
        let country_ok = query.country_name.as_ref().map_or(true, |n| {
            city.and_then(|c| self.countries.iter().find(|k| k.id == c.country_id))
                .is_some_and(|k| &k.name == n)
        });
        let tag_ok = query.tag_name.as_ref().map_or(true, |t| poi.has_tag(t));
        name_ok && city_ok && country_ok && tag_ok
    }
}

impl PoiDirectory for StaticDirectory {
    async fn list_pois(&self, query: &PoiQuery) -> Result<Vec<Poi>, DirectoryError> {
        self.queries.lock().push(query.clone());
        if self.fail_pois.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self
            .pois
            .iter()
            .filter(|p| self.matches(p, query))
            .cloned()
            .collect())
    }

    async fn list_countries(&self) -> Result<Vec<Country>, DirectoryError> {
        if self.fail_countries.load(Ordering::SeqCst) {
            return Err(DirectoryError::Parse("truncated body".to_string()));
        }
        Ok(self.countries.clone())
    }

    async fn list_cities(&self) -> Result<Vec<City>, DirectoryError> {
        Ok(self.cities.clone())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, DirectoryError> {
        Ok(self.tags.clone())
    }
}

/// Directory whose POI responses are released by the test, one gate per
/// call in call order, so resolution order can be reversed.
pub struct GatedDirectory {
    gates: Mutex<VecDeque<oneshot::Receiver<Vec<Poi>>>>,
    queries: Mutex<Vec<PoiQuery>>,
    countries: Vec<Country>,
}

impl GatedDirectory {
    /// Returns the directory and one sender per expected call.
    pub fn new(calls: usize) -> (Self, Vec<oneshot::Sender<Vec<Poi>>>) {
        let mut senders = Vec::with_capacity(calls);
        let mut gates = VecDeque::with_capacity(calls);
        for _ in 0..calls {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            gates.push_back(rx);
        }
        let directory = Self {
            gates: Mutex::new(gates),
            queries: Mutex::new(Vec::new()),
            countries: vec![country("pt", "Portugal"), country("es", "Spain")],
        };
        (directory, senders)
    }

    pub fn queries(&self) -> Vec<PoiQuery> {
        self.queries.lock().clone()
    }
}

impl PoiDirectory for GatedDirectory {
    async fn list_pois(&self, query: &PoiQuery) -> Result<Vec<Poi>, DirectoryError> {
        self.queries.lock().push(query.clone());
        let gate = self.gates.lock().pop_front();
        match gate {
            Some(rx) => rx.await.map_err(|_| unavailable()),
            None => Err(unavailable()),
        }
    }

    async fn list_countries(&self) -> Result<Vec<Country>, DirectoryError> {
        Ok(self.countries.clone())
    }

    async fn list_cities(&self) -> Result<Vec<City>, DirectoryError> {
        Ok(Vec::new())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, DirectoryError> {
        Ok(Vec::new())
    }
}

type Hook = Box<dyn FnOnce() + Send>;

/// Directory that runs a hook while answering its first POI request and
/// then returns that answer anyway, as a server would when the response is
/// already on the wire. Later requests get `rest`.
pub struct InterleavingDirectory {
    first: Vec<Poi>,
    rest: Vec<Poi>,
    hook: Mutex<Option<Hook>>,
    requests: AtomicUsize,
}

impl InterleavingDirectory {
    pub fn new(first: Vec<Poi>, rest: Vec<Poi>) -> Self {
        Self {
            first,
            rest,
            hook: Mutex::new(None),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn on_first_request<F>(&self, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        *self.hook.lock() = Some(Box::new(hook));
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl PoiDirectory for InterleavingDirectory {
    async fn list_pois(&self, _query: &PoiQuery) -> Result<Vec<Poi>, DirectoryError> {
        if self.requests.fetch_add(1, Ordering::SeqCst) > 0 {
            return Ok(self.rest.clone());
        }
        let hook = self.hook.lock().take();
        if let Some(hook) = hook {
            hook();
        }
        Ok(self.first.clone())
    }

    async fn list_countries(&self) -> Result<Vec<Country>, DirectoryError> {
        Ok(Vec::new())
    }

    async fn list_cities(&self) -> Result<Vec<City>, DirectoryError> {
        Ok(Vec::new())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, DirectoryError> {
        Ok(Vec::new())
    }
}
