use voyage_directory::{City, Country, PoiDirectory, Tag};

/// Countries, cities and tags offered as filters. Loaded once per mount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterVocabulary {
    pub countries: Vec<Country>,
    pub cities: Vec<City>,
    pub tags: Vec<Tag>,
}

impl FilterVocabulary {
    /// Fetch the three lists concurrently.
    ///
    /// A failed list is logged and left empty; the others are kept.
    pub async fn load<D: PoiDirectory>(directory: &D) -> Self {
        let (countries, cities, tags) = tokio::join!(
            directory.list_countries(),
            directory.list_cities(),
            directory.list_tags(),
        );

        let countries = countries.unwrap_or_else(|e| {
            tracing::error!("Error fetching countries: {}", e);
            Vec::new()
        });
        let cities = cities.unwrap_or_else(|e| {
            tracing::error!("Error fetching cities: {}", e);
            Vec::new()
        });
        let tags = tags.unwrap_or_else(|e| {
            tracing::error!("Error fetching tags: {}", e);
            Vec::new()
        });

        tracing::debug!(
            "Loaded filters: {} countries, {} cities, {} tags",
            countries.len(),
            cities.len(),
            tags.len()
        );

        Self {
            countries,
            cities,
            tags,
        }
    }

    /// The directory filters by country name, the query string carries the id.
    pub fn country_name(&self, country_id: &str) -> Option<&str> {
        self.countries
            .iter()
            .find(|c| c.id == country_id)
            .map(|c| c.name.as_str())
    }
}
