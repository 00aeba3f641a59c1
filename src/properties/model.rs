//! Property records and their cached projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted title, in characters
pub const MAX_TITLE_LENGTH: usize = 200;

/// Longest accepted location, in characters
pub const MAX_LOCATION_LENGTH: usize = 100;

/// A property as owned by the record store.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    /// Set once at creation, never updated
    pub created_at: DateTime<Utc>,
}

impl Property {
    /// The fields served to readers and stored in the aggregate cache.
    pub fn project(&self) -> PropertyRecord {
        PropertyRecord {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
            location: self.location.clone(),
            created_at: self.created_at,
        }
    }
}

/// Projection of a property to `{id, title, description, price, location, created_at}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a property.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProperty {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub location: String,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
}

impl PropertyChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.location.is_none()
    }
}

/// Returns a message describing the first invalid field, if any.
pub fn validate_fields(title: &str, price: f64, location: &str) -> Option<String> {
    if title.trim().is_empty() {
        return Some("Title cannot be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Some(format!(
            "Title exceeds maximum length of {} characters",
            MAX_TITLE_LENGTH
        ));
    }
    if location.chars().count() > MAX_LOCATION_LENGTH {
        return Some(format!(
            "Location exceeds maximum length of {} characters",
            MAX_LOCATION_LENGTH
        ));
    }
    if !price.is_finite() || price < 0.0 {
        return Some("Price must be a non-negative number".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Property {
        Property {
            id: 7,
            title: "Loft".to_string(),
            description: "Open plan".to_string(),
            price: 1250.5,
            location: "Lisbon".to_string(),
            created_at: "2024-05-01T10:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_projection_serializes_six_fields() {
        let json = serde_json::to_value(sample().project()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 6);
        assert_eq!(json["id"], 7);
        assert_eq!(json["price"], 1250.5);
        assert_eq!(json["created_at"], "2024-05-01T10:00:00Z");
    }

    #[test]
    fn test_new_property_description_defaults_empty() {
        let json = r#"{"title": "Cabin", "price": 90, "location": "Oslo"}"#;
        let new: NewProperty = serde_json::from_str(json).unwrap();
        assert_eq!(new.description, "");
        assert_eq!(new.price, 90.0);
    }

    #[test]
    fn test_changes_empty() {
        assert!(PropertyChanges::default().is_empty());
        let changes = PropertyChanges {
            price: Some(1.0),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_validate_fields() {
        assert!(validate_fields("Loft", 10.0, "Lisbon").is_none());
        assert!(validate_fields("  ", 10.0, "Lisbon").is_some());
        assert!(validate_fields(&"x".repeat(201), 10.0, "Lisbon").is_some());
        assert!(validate_fields("Loft", 10.0, &"y".repeat(101)).is_some());
        assert!(validate_fields("Loft", -1.0, "Lisbon").is_some());
        assert!(validate_fields("Loft", f64::NAN, "Lisbon").is_some());
    }
}
