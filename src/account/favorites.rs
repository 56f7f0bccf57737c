use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

use crate::catalog::Catalog;
use crate::error::{StoreError, ValidationError};
use crate::models::Listing;
use crate::query::sort::{sort_in_place, SortKey};
use crate::store::{keys, read_json_or_default, write_json, KeyValueStore};

/// Ordering of the dashboard's favorites tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FavoriteSort {
    /// Most recently added first
    #[default]
    Recent,
    PriceAsc,
    PriceDesc,
    Rating,
}

impl FromStr for FavoriteSort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(FavoriteSort::Recent),
            "price-asc" => Ok(FavoriteSort::PriceAsc),
            "price-desc" => Ok(FavoriteSort::PriceDesc),
            "rating" => Ok(FavoriteSort::Rating),
            other => Err(ValidationError::UnknownSort(other.to_string())),
        }
    }
}

/// A user's favorite listing ids, in the order they were added
pub struct Favorites {
    key: String,
}

impl Favorites {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            key: keys::favorites(user_id),
        }
    }

    pub fn list<S: KeyValueStore + ?Sized>(&self, store: &S) -> Vec<u64> {
        read_json_or_default(store, &self.key)
    }

    pub fn is_favorite<S: KeyValueStore + ?Sized>(&self, store: &S, listing_id: u64) -> bool {
        self.list(store).contains(&listing_id)
    }

    /// Add or remove `listing_id`; returns whether it is now a favorite
    pub fn toggle<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        listing_id: u64,
    ) -> Result<bool, StoreError> {
        let mut ids = self.list(store);
        let now_favorite = match ids.iter().position(|&id| id == listing_id) {
            Some(index) => {
                ids.remove(index);
                false
            }
            None => {
                ids.push(listing_id);
                true
            }
        };
        write_json(store, &self.key, &ids)?;
        info!(listing_id, now_favorite, "favorite toggled");
        Ok(now_favorite)
    }

    pub fn remove<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        listing_id: u64,
    ) -> Result<(), StoreError> {
        let mut ids = self.list(store);
        ids.retain(|&id| id != listing_id);
        write_json(store, &self.key, &ids)
    }

    /// Drop every favorite; returns how many there were
    pub fn clear<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<usize, StoreError> {
        let count = self.list(store).len();
        if count > 0 {
            write_json(store, &self.key, &Vec::<u64>::new())?;
        }
        Ok(count)
    }

    /// Favorite listings found in the catalog, ordered by `sort`
    pub fn resolve<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        catalog: &Catalog,
        sort: FavoriteSort,
    ) -> Vec<Listing> {
        let mut listings: Vec<Listing> = self
            .list(store)
            .into_iter()
            .filter_map(|id| catalog.get(id).cloned())
            .collect();
        match sort {
            FavoriteSort::Recent => listings.reverse(),
            FavoriteSort::PriceAsc => sort_in_place(&mut listings, SortKey::PriceAsc),
            FavoriteSort::PriceDesc => sort_in_place(&mut listings, SortKey::PriceDesc),
            FavoriteSort::Rating => sort_in_place(&mut listings, SortKey::RatingDesc),
        }
        listings
    }
}
