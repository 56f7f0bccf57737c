use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::ValidationError;

/// Constraint on a room count: any, exactly `n`, or `n` and more ("n+")
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CountFilter {
    #[default]
    Any,
    Exactly(u32),
    AtLeast(u32),
}

impl CountFilter {
    pub fn matches(self, value: u32) -> bool {
        match self {
            CountFilter::Any => true,
            CountFilter::Exactly(n) => value == n,
            CountFilter::AtLeast(n) => value >= n,
        }
    }

    pub fn is_any(self) -> bool {
        self == CountFilter::Any
    }

    /// Parse UI input, falling back to `Any` on garbage
    pub fn parse_lenient(field: &'static str, raw: &str) -> Self {
        raw.parse().unwrap_or_else(|err: ValidationError| {
            debug!(field, %err, "ignoring malformed count filter");
            CountFilter::Any
        })
    }
}

impl FromStr for CountFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(CountFilter::Any);
        }
        let invalid = || ValidationError::InvalidCount(s.to_string());
        match s.strip_suffix('+') {
            Some(n) => n.trim().parse().map(CountFilter::AtLeast).map_err(|_| invalid()),
            None => s.parse().map(CountFilter::Exactly).map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for CountFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountFilter::Any => Ok(()),
            CountFilter::Exactly(n) => write!(f, "{n}"),
            CountFilter::AtLeast(n) => write!(f, "{n}+"),
        }
    }
}

impl From<CountFilter> for String {
    fn from(value: CountFilter) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for CountFilter {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The user's active filter constraints
///
/// Defaults mean "no constraint": empty strings, `Any`, zero minimums and no
/// maximum price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the listing location
    pub location: String,
    /// Exact property type name, empty for any
    #[serde(rename = "type")]
    pub property_type: String,
    pub bedrooms: CountFilter,
    pub min_price: u64,
    /// `None` is an open upper bound
    pub max_price: Option<u64>,
    pub min_area: u32,
    pub bathrooms: CountFilter,
}

impl FilterCriteria {
    /// Build criteria from raw form fields, coercing anything malformed to
    /// its default
    pub fn from_input(input: &FilterInput) -> Self {
        Self {
            location: input.location.trim().to_lowercase(),
            property_type: input.property_type.trim().to_string(),
            bedrooms: CountFilter::parse_lenient("bedrooms", &input.bedrooms),
            min_price: coerce_number("minPrice", &input.min_price).unwrap_or(0),
            max_price: coerce_number("maxPrice", &input.max_price),
            min_area: coerce_number("minArea", &input.min_area).unwrap_or(0),
            bathrooms: CountFilter::parse_lenient("bathrooms", &input.bathrooms),
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Raw, unvalidated filter form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInput {
    pub location: String,
    pub property_type: String,
    pub bedrooms: String,
    pub min_price: String,
    pub max_price: String,
    pub min_area: String,
    pub bathrooms: String,
}

/// Parse a numeric field; blank is `None`, garbage is logged and `None`
pub(crate) fn coerce_number<T: FromStr>(field: &'static str, raw: &str) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            let err = ValidationError::InvalidNumber {
                field,
                value: raw.to_string(),
            };
            debug!(%err, "coercing filter field to default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_filter_parsing() {
        assert_eq!("".parse::<CountFilter>(), Ok(CountFilter::Any));
        assert_eq!("3".parse::<CountFilter>(), Ok(CountFilter::Exactly(3)));
        assert_eq!("4+".parse::<CountFilter>(), Ok(CountFilter::AtLeast(4)));
        assert_eq!(" 2 ".parse::<CountFilter>(), Ok(CountFilter::Exactly(2)));
        assert!("many".parse::<CountFilter>().is_err());
        assert!("+".parse::<CountFilter>().is_err());
        assert_eq!(CountFilter::parse_lenient("bedrooms", "x+"), CountFilter::Any);
    }

    #[test]
    fn count_filter_display_round_trips() {
        for filter in [CountFilter::Any, CountFilter::Exactly(0), CountFilter::AtLeast(3)] {
            assert_eq!(filter.to_string().parse::<CountFilter>(), Ok(filter));
        }
    }

    #[test]
    fn count_filter_matching() {
        assert!(CountFilter::Any.matches(0));
        assert!(CountFilter::AtLeast(4).matches(4));
        assert!(CountFilter::AtLeast(4).matches(6));
        assert!(!CountFilter::AtLeast(4).matches(3));
        assert!(CountFilter::Exactly(2).matches(2));
        assert!(!CountFilter::Exactly(2).matches(3));
    }

    #[test]
    fn from_input_coerces_malformed_numbers() {
        let input = FilterInput {
            location: "  CoCoDy ".to_string(),
            property_type: "Villa".to_string(),
            bedrooms: "4+".to_string(),
            min_price: "abc".to_string(),
            max_price: "-12".to_string(),
            min_area: "80".to_string(),
            bathrooms: "two".to_string(),
        };
        let criteria = FilterCriteria::from_input(&input);
        assert_eq!(criteria.location, "cocody");
        assert_eq!(criteria.property_type, "Villa");
        assert_eq!(criteria.bedrooms, CountFilter::AtLeast(4));
        assert_eq!(criteria.min_price, 0);
        assert_eq!(criteria.max_price, None);
        assert_eq!(criteria.min_area, 80);
        assert_eq!(criteria.bathrooms, CountFilter::Any);
    }

    #[test]
    fn blank_input_is_default() {
        assert!(FilterCriteria::from_input(&FilterInput::default()).is_default());
    }

    #[test]
    fn serde_shape_uses_wire_names() {
        let criteria = FilterCriteria {
            property_type: "Studio".to_string(),
            bedrooms: CountFilter::AtLeast(2),
            max_price: Some(300_000),
            ..FilterCriteria::default()
        };
        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json["type"], "Studio");
        assert_eq!(json["bedrooms"], "2+");
        assert_eq!(json["maxPrice"], 300_000);
        let back: FilterCriteria = serde_json::from_value(json).unwrap();
        assert_eq!(back, criteria);
    }
}
