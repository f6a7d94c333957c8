use crate::params::{QueryParams, CITY_NAME, COUNTRY_ID, NAME, PAGE, TAG_NAME};

/// Filter state derived from the query string.
///
/// The query string is the only source of truth; this is a read-only
/// projection of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Free-text name filter as typed (not yet debounced)
    pub name: String,
    pub country_id: Option<String>,
    /// Only meaningful relative to `country_id`
    pub city_name: Option<String>,
    /// Required tags, in the order they appear in the query string
    pub tags: Vec<String>,
    /// 1-based page
    pub page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            name: String::new(),
            country_id: None,
            city_name: None,
            tags: Vec::new(),
            page: 1,
        }
    }
}

impl FilterState {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Integer at the start of `raw`, ignoring whatever follows it
/// (`"2abc"` is 2, `"3.0"` is 3). Saturates instead of overflowing.
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Project query parameters onto a `FilterState`.
///
/// Empty values count as absent. `page` is read from its leading integer,
/// clamped to at least 1, and falls back to 1 when there is none.
pub fn compute_query_state(params: &QueryParams) -> FilterState {
    let non_empty = |key: &str| {
        params
            .get(key)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let page = params
        .get(PAGE)
        .and_then(leading_integer)
        .map(|n| n.clamp(1, i64::from(u32::MAX)) as u32)
        .unwrap_or(1);

    FilterState {
        name: params.get(NAME).unwrap_or_default().to_string(),
        country_id: non_empty(COUNTRY_ID),
        city_name: non_empty(CITY_NAME),
        tags: params
            .get_all(TAG_NAME)
            .into_iter()
            .map(str::to_string)
            .collect(),
        page,
    }
}
