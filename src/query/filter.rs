use crate::models::Listing;
use crate::query::criteria::FilterCriteria;

/// Criteria with the location needle lowercased once
struct Predicate<'a> {
    criteria: &'a FilterCriteria,
    location: String,
}

impl<'a> Predicate<'a> {
    fn new(criteria: &'a FilterCriteria) -> Self {
        Self {
            criteria,
            location: criteria.location.to_lowercase(),
        }
    }

    fn test(&self, listing: &Listing) -> bool {
        let c = self.criteria;

        if !self.location.is_empty() && !listing.location.to_lowercase().contains(&self.location) {
            return false;
        }
        if !c.property_type.is_empty() && c.property_type != listing.property_type.as_str() {
            return false;
        }
        if !c.bedrooms.matches(listing.bedrooms) {
            return false;
        }
        if listing.price < c.min_price || c.max_price.is_some_and(|max| listing.price > max) {
            return false;
        }
        if listing.area < c.min_area {
            return false;
        }
        c.bathrooms.matches(listing.bathrooms)
    }
}

/// Whether a single listing satisfies every active constraint
pub fn matches(listing: &Listing, criteria: &FilterCriteria) -> bool {
    Predicate::new(criteria).test(listing)
}

/// Listings passing `criteria`, in catalog order
pub fn filter_listings(catalog: &[Listing], criteria: &FilterCriteria) -> Vec<Listing> {
    let predicate = Predicate::new(criteria);
    catalog
        .iter()
        .filter(|listing| predicate.test(listing))
        .cloned()
        .collect()
}
