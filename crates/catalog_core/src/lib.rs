//! Core product catalog access path.
//! This crate owns the repository contract, its SQLite implementation and
//! the service callers use to reach it.

pub mod access;
pub mod config;
pub mod db;
pub mod dto;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use access::{
    authorize, require_superuser, AccessError, Authenticator, BearerCredential, Operation,
    Principal,
};
pub use config::{CatalogConfig, ConfigError};
pub use dto::product::{GetProduct, NewProduct, PartialProduct, Product, QueryParams};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::product::{ProductEntity, ProductId};
pub use repo::memory_repo::InMemoryProductRepository;
pub use repo::product_repo::{
    NotFound, ProductRepository, RepoError, RepoResult, SqliteProductRepository,
};
pub use service::product_service::ProductService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
