//! Request DTOs for the property API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::properties::{validate_fields, NewProperty, PropertyChanges};

/// Request body for `POST /properties/`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePropertyRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub location: String,
}

impl CreatePropertyRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_fields(&self.title, self.price, &self.location)
    }
}

impl From<CreatePropertyRequest> for NewProperty {
    fn from(req: CreatePropertyRequest) -> Self {
        NewProperty {
            title: req.title,
            description: req.description,
            price: req.price,
            location: req.location,
        }
    }
}

/// Request body for `PUT /properties/:id`; omitted fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePropertyRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
}

impl UpdatePropertyRequest {
    /// Rejects empty bodies. Full field validation happens against the
    /// merged record in the store.
    pub fn validate(&self) -> Option<String> {
        PropertyChanges::from(self.clone())
            .is_empty()
            .then(|| "No fields to update".to_string())
    }
}

impl From<UpdatePropertyRequest> for PropertyChanges {
    fn from(req: UpdatePropertyRequest) -> Self {
        PropertyChanges {
            title: req.title,
            description: req.description,
            price: req.price,
            location: req.location,
        }
    }
}
