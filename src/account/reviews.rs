use chrono::Utc;
use tracing::info;

use crate::error::{StoreError, ValidationError};
use crate::models::{initials, Listing, Review};
use crate::store::{keys, read_json_or_default, write_json, KeyValueStore};

/// Reviews written locally, stored beside the read-only catalog
pub struct ReviewBook;

impl ReviewBook {
    pub fn stored<S: KeyValueStore + ?Sized>(store: &S, listing_id: u64) -> Vec<Review> {
        read_json_or_default(store, &keys::reviews(listing_id))
    }

    /// Catalog reviews followed by locally added ones
    pub fn merged<S: KeyValueStore + ?Sized>(store: &S, listing: &Listing) -> Vec<Review> {
        let mut reviews = listing.reviews.clone();
        reviews.extend(Self::stored(store, listing.id));
        reviews
    }

    pub fn add<S: KeyValueStore + ?Sized>(
        store: &mut S,
        listing_id: u64,
        author: &str,
        rating: u8,
        comment: &str,
    ) -> Result<Review, StoreError> {
        if !(1..=5).contains(&rating) {
            return Err(ValidationError::InvalidRating(rating).into());
        }
        let now = Utc::now();
        let review = Review {
            id: now.timestamp_millis().max(0) as u64,
            user: author.to_string(),
            rating,
            comment: comment.trim().to_string(),
            date: now.format("%Y-%m-%d").to_string(),
            avatar: initials(author),
        };

        let key = keys::reviews(listing_id);
        let mut reviews: Vec<Review> = read_json_or_default(store, &key);
        reviews.push(review.clone());
        write_json(store, &key, &reviews)?;
        info!(listing_id, rating, "review added");
        Ok(review)
    }
}
