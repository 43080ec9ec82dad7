//! Data-transfer contracts between callers, services and repositories.
//!
//! # Responsibility
//! - Decouple storage representation from the shapes callers exchange.
//! - Model optional fields as explicit presence, never as sentinel defaults.

pub mod product;
