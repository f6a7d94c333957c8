//! Client-side narrowing of what the directory returned.

use voyage_directory::{City, Poi};

/// POIs carrying every tag in `required`.
///
/// The directory applies at most one tag filter, so with several tags
/// selected the rest are enforced here.
pub fn refine_by_tags<'a>(pois: &'a [Poi], required: &[String]) -> Vec<&'a Poi> {
    pois.iter()
        .filter(|poi| required.iter().all(|tag| poi.has_tag(tag)))
        .collect()
}

/// Cities offered for the selected country; all cities when none is selected.
pub fn displayed_cities<'a>(cities: &'a [City], country_id: Option<&str>) -> Vec<&'a City> {
    match country_id {
        Some(id) => cities.iter().filter(|c| c.country_id == id).collect(),
        None => cities.iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{city, poi};

    #[test]
    fn test_all_selected_tags_must_match() {
        let pois = vec![
            poi("a", &["beach", "family", "sea"]),
            poi("b", &["beach"]),
        ];
        let required = vec!["beach".to_string(), "family".to_string()];

        let refined = refine_by_tags(&pois, &required);
        assert_eq!(refined.len(), 1);
        assert_eq!(refined[0].id, "a");
    }

    #[test]
    fn test_no_tags_keeps_everything() {
        let pois = vec![poi("a", &[]), poi("b", &["museum"])];
        assert_eq!(refine_by_tags(&pois, &[]).len(), 2);
    }

    #[test]
    fn test_tag_order_is_irrelevant() {
        let pois = vec![poi("a", &["family", "beach"])];
        let forward = vec!["beach".to_string(), "family".to_string()];
        let reversed = vec!["family".to_string(), "beach".to_string()];
        assert_eq!(refine_by_tags(&pois, &forward), refine_by_tags(&pois, &reversed));
    }

    #[test]
    fn test_displayed_cities_scoped_to_country() {
        let cities = vec![city("lis", "Lisbon", "pt"), city("mad", "Madrid", "es"), city("opo", "Porto", "pt")];

        let names: Vec<&str> = displayed_cities(&cities, Some("pt"))
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Lisbon", "Porto"]);

        assert_eq!(displayed_cities(&cities, None).len(), 3);
        assert!(displayed_cities(&cities, Some("fr")).is_empty());
    }
}
