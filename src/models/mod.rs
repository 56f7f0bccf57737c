use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Kind of dwelling offered by a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Villa,
    Appartement,
    Studio,
    Maison,
    Duplex,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::Villa,
        PropertyType::Appartement,
        PropertyType::Studio,
        PropertyType::Maison,
        PropertyType::Duplex,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Villa => "Villa",
            PropertyType::Appartement => "Appartement",
            PropertyType::Studio => "Studio",
            PropertyType::Maison => "Maison",
            PropertyType::Duplex => "Duplex",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownPropertyType(s.to_string()))
    }
}

/// Owner contact details shown on the detail page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub owner: String,
    pub phone: String,
    pub email: String,
}

/// A tenant review attached to a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: u64,
    pub user: String,
    pub rating: u8,
    pub comment: String,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub avatar: String,
}

/// One rental property in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: u64,
    pub title: String,
    /// "Neighborhood, City"
    pub location: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub price: u64,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    /// Living area in m²
    #[serde(default)]
    pub area: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub contact: Contact,
}

impl Listing {
    /// Neighborhood part of the location, before the first comma
    pub fn neighborhood(&self) -> &str {
        self.location
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
    }
}

/// Rendering hint for the result list
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl FromStr for ViewMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(ValidationError::UnknownView(other.to_string())),
        }
    }
}

/// Initials of a display name ("Awa Koné" -> "AK")
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .collect()
}

/// Price with space-separated thousands ("1 500 000")
pub fn format_price(price: u64) -> String {
    let digits = price.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_catalog_record() {
        let json = r#"{
            "id": 7,
            "title": "Villa Riviera",
            "location": "Riviera 3, Abidjan",
            "type": "Villa",
            "price": 850000,
            "bedrooms": 4,
            "bathrooms": 3,
            "area": 320,
            "rating": 4.8,
            "period": "mois",
            "status": "Disponible",
            "images": ["https://img.example/a.jpg"],
            "description": "Grande villa",
            "reviews": [{"id": 1, "user": "Awa", "rating": 5, "comment": "Top", "date": "2024-01-02"}],
            "contact": {"owner": "M. Kouassi", "phone": "+225 01", "email": "k@example.com"}
        }"#;

        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.property_type, PropertyType::Villa);
        assert_eq!(listing.neighborhood(), "Riviera 3");
        assert_eq!(listing.reviews.len(), 1);
        assert_eq!(listing.reviews[0].avatar, "");
        assert_eq!(listing.contact.owner, "M. Kouassi");
    }

    #[test]
    fn rejects_unknown_type() {
        let json = r#"{"id": 1, "title": "x", "location": "a, b", "type": "Chateau", "price": 1}"#;
        assert!(serde_json::from_str::<Listing>(json).is_err());
        assert!("Chateau".parse::<PropertyType>().is_err());
        assert_eq!("Duplex".parse::<PropertyType>(), Ok(PropertyType::Duplex));
    }

    #[test]
    fn formats_prices_and_initials() {
        assert_eq!(format_price(0), "0");
        assert_eq!(format_price(950), "950");
        assert_eq!(format_price(1_500_000), "1 500 000");
        assert_eq!(format_price(25_000), "25 000");
        assert_eq!(initials("Awa Koné"), "AK");
        assert_eq!(initials("  "), "");
    }
}
