pub mod file;
pub mod http;
pub mod retry;
pub mod traits;

pub use file::FileCatalog;
pub use http::HttpCatalog;
pub use retry::{load_with_retry, RetryPolicy};
pub use traits::CatalogSource;

use std::collections::HashSet;

use crate::error::LoadError;
use crate::models::Listing;
use crate::query::sort::{sort_listings, SortKey};

/// Listings shown on the home page
pub const POPULAR_LIMIT: usize = 6;
/// Suggestions under a listing's detail page
pub const SIMILAR_LIMIT: usize = 3;

/// The full, read-only set of listings, with unique ids
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    listings: Vec<Listing>,
}

impl Catalog {
    pub fn new(listings: Vec<Listing>) -> Result<Self, LoadError> {
        let mut seen = HashSet::with_capacity(listings.len());
        if let Some(dup) = listings.iter().find(|l| !seen.insert(l.id)) {
            return Err(LoadError::DuplicateId(dup.id));
        }
        Ok(Self { listings })
    }

    /// Parse the catalog's JSON array-of-listings shape
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let listings: Vec<Listing> = serde_json::from_str(json)?;
        Self::new(listings)
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    /// Best rated listings
    pub fn popular(&self, limit: usize) -> Vec<Listing> {
        let mut ranked = sort_listings(&self.listings, SortKey::RatingDesc);
        ranked.truncate(limit);
        ranked
    }

    /// Other listings of the same type or in the same neighborhood, best
    /// rated first
    pub fn similar(&self, id: u64, limit: usize) -> Vec<Listing> {
        let Some(current) = self.get(id) else {
            return Vec::new();
        };
        let candidates: Vec<Listing> = self
            .listings
            .iter()
            .filter(|l| {
                l.id != id
                    && (l.property_type == current.property_type
                        || l.neighborhood() == current.neighborhood())
            })
            .cloned()
            .collect();
        let mut ranked = sort_listings(&candidates, SortKey::RatingDesc);
        ranked.truncate(limit);
        ranked
    }

    /// Previous and next listing in catalog order, wrapping at both ends
    pub fn neighbors(&self, id: u64) -> Option<(&Listing, &Listing)> {
        let index = self.listings.iter().position(|l| l.id == id)?;
        let len = self.listings.len();
        let prev = &self.listings[(index + len - 1) % len];
        let next = &self.listings[(index + 1) % len];
        Some((prev, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::listing;
    use crate::models::PropertyType;

    fn rated(id: u64, rating: f32) -> Listing {
        let mut l = listing(id, 1000);
        l.rating = rating;
        l
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Catalog::new(vec![listing(1, 1), listing(2, 1), listing(1, 2)]).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateId(1)));
    }

    #[test]
    fn from_json_reports_malformed_input() {
        assert!(matches!(
            Catalog::from_json("{\"not\": \"an array\"}"),
            Err(LoadError::Malformed(_))
        ));
        assert!(Catalog::from_json("[]").unwrap().is_empty());
    }

    #[test]
    fn popular_takes_best_rated() {
        let catalog =
            Catalog::new(vec![rated(1, 3.0), rated(2, 4.9), rated(3, 4.1), rated(4, 4.9)]).unwrap();
        let ids: Vec<u64> = catalog.popular(3).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 4, 3]);
    }

    #[test]
    fn similar_matches_type_or_neighborhood() {
        let mut a = rated(1, 4.0);
        a.property_type = PropertyType::Villa;
        a.location = "Cocody, Abidjan".to_string();
        let mut same_type = rated(2, 3.5);
        same_type.property_type = PropertyType::Villa;
        same_type.location = "Marcory, Abidjan".to_string();
        let mut same_area = rated(3, 4.5);
        same_area.property_type = PropertyType::Studio;
        same_area.location = "Cocody, Abidjan".to_string();
        let mut unrelated = rated(4, 5.0);
        unrelated.property_type = PropertyType::Studio;
        unrelated.location = "Plateau, Abidjan".to_string();

        let catalog = Catalog::new(vec![a, same_type, same_area, unrelated]).unwrap();
        let ids: Vec<u64> = catalog.similar(1, SIMILAR_LIMIT).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert!(catalog.similar(99, SIMILAR_LIMIT).is_empty());
    }

    #[test]
    fn neighbors_wrap_around() {
        let catalog = Catalog::new(vec![listing(10, 1), listing(20, 1), listing(30, 1)]).unwrap();
        let (prev, next) = catalog.neighbors(10).unwrap();
        assert_eq!((prev.id, next.id), (30, 20));
        let (prev, next) = catalog.neighbors(30).unwrap();
        assert_eq!((prev.id, next.id), (20, 10));
        assert!(catalog.neighbors(5).is_none());
    }
}
