//! Query-string transitions for user interactions.
//!
//! Each function takes the current parameters and returns the next ones
//! together with how the change should be recorded in history. Changing
//! any filter other than the page drops `page`, returning to page 1.

use crate::params::{QueryParams, CITY_NAME, COUNTRY_ID, NAME, PAGE, TAG_NAME};
use crate::store::HistoryMode;

/// Next query string plus the history mode to record it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub params: QueryParams,
    pub mode: HistoryMode,
}

impl Transition {
    fn replace(params: QueryParams) -> Self {
        Self {
            params,
            mode: HistoryMode::Replace,
        }
    }

    fn push(params: QueryParams) -> Self {
        Self {
            params,
            mode: HistoryMode::Push,
        }
    }
}

fn set_or_delete(params: &mut QueryParams, key: &str, value: Option<&str>) {
    match value {
        Some(v) if !v.trim().is_empty() => params.set(key, v),
        _ => params.delete(key),
    }
}

/// Typed text goes into `name` immediately; the fetch is debounced elsewhere.
/// Blank input removes the parameter.
pub fn set_name_query(current: &QueryParams, text: &str) -> Transition {
    let mut next = current.clone();
    set_or_delete(&mut next, NAME, Some(text));
    next.delete(PAGE);
    Transition::replace(next)
}

/// The city list is scoped to the country, so any selected city is dropped.
pub fn select_country(current: &QueryParams, country_id: Option<&str>) -> Transition {
    let mut next = current.clone();
    set_or_delete(&mut next, COUNTRY_ID, country_id);
    next.delete(CITY_NAME);
    next.delete(PAGE);
    Transition::push(next)
}

pub fn select_city(current: &QueryParams, city_name: Option<&str>) -> Transition {
    let mut next = current.clone();
    set_or_delete(&mut next, CITY_NAME, city_name);
    next.delete(PAGE);
    Transition::push(next)
}

/// Remove `tag` if selected, otherwise append it after the existing tags.
pub fn toggle_tag(current: &QueryParams, tag: &str) -> Transition {
    let mut next = current.clone();
    let selected = current.get_all(TAG_NAME);

    if selected.contains(&tag) {
        next.delete(TAG_NAME);
        for kept in selected.into_iter().filter(|t| *t != tag) {
            next.append(TAG_NAME, kept);
        }
    } else {
        next.append(TAG_NAME, tag);
    }

    next.delete(PAGE);
    Transition::replace(next)
}

/// Page 1 is represented by the absence of `page`.
pub fn go_to_page(current: &QueryParams, page: u32) -> Transition {
    let mut next = current.clone();
    if page > 1 {
        next.set(PAGE, page.to_string());
    } else {
        next.delete(PAGE);
    }
    Transition::replace(next)
}

/// Correction applied when `page` points past the last page.
pub fn reset_page(current: &QueryParams) -> Transition {
    let mut next = current.clone();
    next.delete(PAGE);
    Transition::replace(next)
}
