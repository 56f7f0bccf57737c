use chrono::Utc;
use tracing::info;

use crate::account::profile::UserProfile;
use crate::error::{StoreError, ValidationError};
use crate::models::{Contact, Listing, PropertyType};
use crate::store::{keys, read_json_or_default, write_json, KeyValueStore};

pub const MIN_DESCRIPTION_LEN: usize = 100;

/// Listing as submitted by an owner, before defaults are applied
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub location: String,
    pub property_type: PropertyType,
    pub price: u64,
    pub bedrooms: Option<u32>,
    pub area: Option<u32>,
    pub description: String,
}

/// Listings an owner has published locally
pub struct OwnerListings {
    key: String,
}

impl OwnerListings {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            key: keys::owner_listings(user_id),
        }
    }

    pub fn list<S: KeyValueStore + ?Sized>(&self, store: &S) -> Vec<Listing> {
        read_json_or_default(store, &self.key)
    }

    pub fn submit<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        owner: &UserProfile,
        new: NewListing,
    ) -> Result<Listing, StoreError> {
        let len = new.description.chars().count();
        if len < MIN_DESCRIPTION_LEN {
            return Err(ValidationError::DescriptionTooShort {
                len,
                min: MIN_DESCRIPTION_LEN,
            }
            .into());
        }

        let listing = Listing {
            id: Utc::now().timestamp_millis().max(0) as u64,
            title: new.title,
            location: new.location,
            property_type: new.property_type,
            price: new.price,
            bedrooms: new.bedrooms.unwrap_or(1),
            bathrooms: 1,
            area: new.area.unwrap_or(50),
            rating: 4.0,
            period: "mois".to_string(),
            status: "Available".to_string(),
            images: Vec::new(),
            description: new.description,
            reviews: Vec::new(),
            contact: Contact {
                owner: owner.name.clone(),
                phone: owner.phone.clone(),
                email: owner.email.clone(),
            },
        };

        let mut listings = self.list(store);
        listings.push(listing.clone());
        write_json(store, &self.key, &listings)?;
        info!(id = listing.id, owner = %owner.id, "listing submitted");
        Ok(listing)
    }
}
