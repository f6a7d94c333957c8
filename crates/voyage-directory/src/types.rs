use serde::{Deserialize, Serialize};

/// A point of interest as served by the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Image URLs in display order. `null` decodes as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    pub city_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Poi {
    /// Replace an empty image list with a single placeholder so that
    /// renderers can always show `images[0]`.
    pub fn with_fallback_image(mut self, placeholder: &str) -> Self {
        if self.images.is_empty() {
            self.images = vec![placeholder.to_string()];
        }
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub country_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// Server-side POI filter. Every term is optional; absent terms are not sent.
///
/// The directory filters on a single tag only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PoiQuery {
    /// Case-insensitive substring of the POI name
    pub name: Option<String>,
    /// Exact country name (not id)
    pub country_name: Option<String>,
    pub city_name: Option<String>,
    pub tag_name: Option<String>,
}

impl PoiQuery {
    /// Query string pairs in a stable order: name, country, city, tag.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", self.name.as_deref()),
            ("country_name", self.country_name.as_deref()),
            ("city_name", self.city_name.as_deref()),
            ("tag_name", self.tag_name.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

// Response envelopes. The backend also sends a `message` field which we ignore.

#[derive(Debug, Deserialize)]
pub(crate) struct PoiListResponse {
    #[serde(default)]
    pub pois: Vec<Poi>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountryListResponse {
    #[serde(default)]
    pub countries: Vec<Country>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CityListResponse {
    #[serde(default)]
    pub cities: Vec<City>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagListResponse {
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poi_deserialization() {
        let json = r#"{
            "id": "p1",
            "name": "Sagrada Familia",
            "description": "Basilica",
            "latitude": 41.4036,
            "longitude": 2.1744,
            "city_id": "c1",
            "images": ["https://img.example/1.jpg"],
            "tags": ["church", "architecture"]
        }"#;
        let poi: Poi = serde_json::from_str(json).unwrap();
        assert_eq!(poi.name, "Sagrada Familia");
        assert_eq!(poi.images.len(), 1);
        assert!(poi.has_tag("church"));
        assert!(!poi.has_tag("beach"));
    }

    #[test]
    fn test_poi_missing_and_null_collections() {
        let json = r#"{
            "id": "p2",
            "name": "Hidden Cove",
            "latitude": 0.0,
            "longitude": 0.0,
            "city_id": "c2",
            "images": null
        }"#;
        let poi: Poi = serde_json::from_str(json).unwrap();
        assert!(poi.images.is_empty());
        assert!(poi.tags.is_empty());
        assert!(poi.description.is_none());
    }

    #[test]
    fn test_fallback_image_only_when_empty() {
        let json = serde_json::json!({
            "id": "p3", "name": "Pier", "latitude": 1.0, "longitude": 2.0,
            "city_id": "c1", "images": []
        });
        let poi: Poi = serde_json::from_value(json).unwrap();
        let poi = poi.with_fallback_image("https://placeholder/none.png");
        assert_eq!(poi.images, vec!["https://placeholder/none.png".to_string()]);

        let poi = poi.with_fallback_image("https://placeholder/other.png");
        assert_eq!(poi.images, vec!["https://placeholder/none.png".to_string()]);
    }

    #[test]
    fn test_query_pairs_skip_absent_terms() {
        let query = PoiQuery {
            name: Some("park".into()),
            country_name: None,
            city_name: Some("Lisbon".into()),
            tag_name: None,
        };
        assert_eq!(query.query_pairs(), vec![("name", "park"), ("city_name", "Lisbon")]);
        assert!(!query.is_unfiltered());
        assert!(PoiQuery::default().is_unfiltered());
    }

    #[test]
    fn test_envelope_without_collection_is_empty() {
        let resp: PoiListResponse =
            serde_json::from_str(r#"{"message": "POIs retrieved successfully"}"#).unwrap();
        assert!(resp.pois.is_empty());
    }
}
