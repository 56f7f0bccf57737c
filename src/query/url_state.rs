//! Shareable URL query parameters for the search page.
//!
//! `serialize` writes only fields that differ from their defaults; `parse`
//! reads them back, plus the compound `priceRange` produced by the home page
//! quick-search form ("min-max" or "min+").

use tracing::debug;
use url::form_urlencoded;

use crate::query::criteria::{coerce_number, CountFilter, FilterCriteria};
use crate::query::sort::SortKey;

/// Filter and sort state carried by a URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlState {
    pub criteria: FilterCriteria,
    pub sort: SortKey,
}

pub fn serialize(criteria: &FilterCriteria, sort: SortKey) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());

    if !criteria.location.is_empty() {
        query.append_pair("location", &criteria.location);
    }
    if !criteria.property_type.is_empty() {
        query.append_pair("type", &criteria.property_type);
    }
    if !criteria.bedrooms.is_any() {
        query.append_pair("bedrooms", &criteria.bedrooms.to_string());
    }
    if criteria.min_price > 0 {
        query.append_pair("minPrice", &criteria.min_price.to_string());
    }
    if let Some(max) = criteria.max_price {
        query.append_pair("maxPrice", &max.to_string());
    }
    if criteria.min_area > 0 {
        query.append_pair("minArea", &criteria.min_area.to_string());
    }
    if !criteria.bathrooms.is_any() {
        query.append_pair("bathrooms", &criteria.bathrooms.to_string());
    }
    if sort != SortKey::default() {
        query.append_pair("sort", sort.as_str());
    }

    query.finish()
}

/// Read a query string (with or without the leading `?`)
///
/// Absent or malformed fields stay at their defaults. Explicit `minPrice` /
/// `maxPrice` take precedence over bounds taken from `priceRange`.
pub fn parse(query: &str) -> UrlState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut state = UrlState::default();
    let mut min_price = None;
    let mut max_price = None;
    let mut range = (None, None);

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let criteria = &mut state.criteria;
        match key.as_ref() {
            "location" => criteria.location = value.to_lowercase(),
            "type" => criteria.property_type = value.into_owned(),
            "bedrooms" => criteria.bedrooms = CountFilter::parse_lenient("bedrooms", &value),
            "bathrooms" => criteria.bathrooms = CountFilter::parse_lenient("bathrooms", &value),
            "minPrice" => min_price = coerce_number("minPrice", &value),
            "maxPrice" => max_price = coerce_number("maxPrice", &value),
            "minArea" => criteria.min_area = coerce_number("minArea", &value).unwrap_or(0),
            "priceRange" => range = parse_price_range(&value),
            "sort" => {
                state.sort = value.parse().unwrap_or_else(|err| {
                    debug!(%err, "ignoring sort parameter");
                    SortKey::default()
                })
            }
            other => debug!(param = other, "ignoring unknown query parameter"),
        }
    }

    state.criteria.min_price = min_price.or(range.0).unwrap_or(0);
    state.criteria.max_price = max_price.or(range.1);
    state
}

/// Split "min-max", "min-+" or "min+" into price bounds
pub fn parse_price_range(raw: &str) -> (Option<u64>, Option<u64>) {
    let raw = raw.trim();
    if let Some((min, max)) = raw.split_once('-') {
        let max = if max.trim() == "+" {
            None
        } else {
            coerce_number("priceRange", max)
        };
        (coerce_number("priceRange", min), max)
    } else if let Some(min) = raw.strip_suffix('+') {
        (coerce_number("priceRange", min), None)
    } else {
        debug!(value = raw, "unrecognised priceRange");
        (None, None)
    }
}
