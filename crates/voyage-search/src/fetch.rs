use tokio_util::sync::CancellationToken;
use voyage_directory::{Poi, PoiDirectory, PoiQuery};

use crate::error::FetchError;
use crate::state::FilterState;
use crate::vocabulary::FilterVocabulary;

/// Build the server-side query for the current filters.
///
/// The country id is resolved to a name through the vocabulary and the
/// term is dropped when the countries have not arrived yet. Only a lone
/// selected tag is sent; with several, tags are applied client-side.
pub fn build_poi_query(
    filters: &FilterState,
    debounced_name: &str,
    vocabulary: &FilterVocabulary,
) -> PoiQuery {
    let tag_name = match filters.tags.as_slice() {
        [only] => Some(only.clone()),
        _ => None,
    };

    PoiQuery {
        name: (!debounced_name.is_empty()).then(|| debounced_name.to_string()),
        country_name: filters
            .country_id
            .as_deref()
            .and_then(|id| vocabulary.country_name(id))
            .map(str::to_string),
        city_name: filters.city_name.clone(),
        tag_name,
    }
}

/// Fetch POIs for `query` unless `cancel` fires first.
///
/// Returned POIs always have at least one image: `placeholder_image`
/// stands in for missing ones.
pub async fn fetch_pois<D: PoiDirectory>(
    directory: &D,
    query: &PoiQuery,
    cancel: &CancellationToken,
    placeholder_image: &str,
) -> Result<Vec<Poi>, FetchError> {
    tracing::debug!("Fetching POIs for {:?}", query);

    let pois = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(FetchError::Cancelled),
        result = directory.list_pois(query) => result?,
    };

    Ok(pois
        .into_iter()
        .map(|poi| poi.with_fallback_image(placeholder_image))
        .collect())
}
