//! API Module
//!
//! HTTP handlers and routing for the property service.
//!
//! # Endpoints
//! - `GET /properties/` - List all properties
//! - `POST /properties/` - Create a property
//! - `PUT /properties/:id` - Update a property
//! - `DELETE /properties/:id` - Delete a property
//! - `GET /cache/metrics` - Cache hit/miss metrics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod response_cache;
pub mod routes;

pub use handlers::*;
pub use response_cache::{ResponseCache, LIST_RESPONSE_KEY};
pub use routes::create_router;
