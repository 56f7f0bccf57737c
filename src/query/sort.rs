use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::models::Listing;

/// Result ordering selected by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    PriceAsc,
    PriceDesc,
    RatingDesc,
    AreaDesc,
    /// Newest first; ids are assigned in creation order
    Recent,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::RatingDesc,
        SortKey::AreaDesc,
        SortKey::Recent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::RatingDesc => "rating-desc",
            SortKey::AreaDesc => "area-desc",
            SortKey::Recent => "recent",
        }
    }

    pub fn compare(self, a: &Listing, b: &Listing) -> Ordering {
        match self {
            SortKey::PriceAsc => a.price.cmp(&b.price),
            SortKey::PriceDesc => b.price.cmp(&a.price),
            SortKey::RatingDesc => b.rating.total_cmp(&a.rating),
            SortKey::AreaDesc => b.area.cmp(&a.area),
            SortKey::Recent => b.id.cmp(&a.id),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSort(s.to_string()))
    }
}

/// Sort in place; ties keep their incoming order
pub fn sort_in_place(listings: &mut [Listing], key: SortKey) {
    listings.sort_by(|a, b| key.compare(a, b));
}

/// Sorted copy of `listings`; the input is left untouched
pub fn sort_listings(listings: &[Listing], key: SortKey) -> Vec<Listing> {
    let mut sorted = listings.to_vec();
    sort_in_place(&mut sorted, key);
    sorted
}
