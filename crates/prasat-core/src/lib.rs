//! # prasat-core
//!
//! Core types, traits, and abstractions for the prasat castle
//! information system.
//!
//! This crate provides the entity models, transfer shapes, repository
//! trait definitions, validation rules, and error taxonomy that the
//! storage crate (`prasat-db`) and any upstream request-handling layer
//! depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
pub use validation::{
    validate_email, validate_latitude, validate_longitude, validate_time_range,
    validate_vector_dimension,
};
