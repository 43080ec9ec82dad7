//! Use-case services.
//!
//! # Responsibility
//! - Expose catalog operations to callers through repository contracts.
//! - Keep callers decoupled from concrete storage implementations.

pub mod product_service;
