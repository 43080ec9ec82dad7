//! Persisted domain model for the product catalog.
//!
//! # Responsibility
//! - Define the storage-side shape of catalog records.
//! - Keep derived projections computed, never stored.
//!
//! # Invariants
//! - Every product is identified by a storage-assigned `ProductId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod product;
