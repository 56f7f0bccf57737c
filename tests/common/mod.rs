#![allow(dead_code)]

use rental_scout::models::{Contact, Listing, PropertyType};
use rental_scout::Catalog;

pub fn listing(id: u64, price: u64) -> Listing {
    Listing {
        id,
        title: format!("Logement {id}"),
        location: "Cocody, Abidjan".to_string(),
        property_type: PropertyType::Appartement,
        price,
        bedrooms: 2,
        bathrooms: 1,
        area: 70,
        rating: 4.0,
        period: "mois".to_string(),
        status: "Disponible".to_string(),
        images: Vec::new(),
        description: String::new(),
        reviews: Vec::new(),
        contact: Contact::default(),
    }
}

pub fn catalog(listings: Vec<Listing>) -> Catalog {
    Catalog::new(listings).expect("unique ids")
}

pub fn ids(listings: &[Listing]) -> Vec<u64> {
    listings.iter().map(|l| l.id).collect()
}
