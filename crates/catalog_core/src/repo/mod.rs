//! Repository layer contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the product data access contract consumed by services.
//! - Isolate SQLite query details from orchestration code.
//!
//! # Invariants
//! - Repository APIs return the semantic `NotFound` error in addition to DB
//!   transport errors; they never signal absence with `None`.
//! - Every implementation applies the same merge and filter rules.

pub mod memory_repo;
pub mod product_repo;
