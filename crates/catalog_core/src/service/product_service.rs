//! Product use-case service.
//!
//! # Responsibility
//! - Provide stable product entry points for core callers.
//! - Delegate every call to the injected repository unchanged.
//!
//! # Invariants
//! - The service holds no state besides its repository.
//! - Results and failures, including `NotFound`, pass through untouched.

use crate::dto::product::{NewProduct, PartialProduct, Product, QueryParams};
use crate::model::product::ProductId;
use crate::repo::product_repo::{ProductRepository, RepoResult};

/// Product service over any [`ProductRepository`] implementation.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a product.
    pub fn create_product(&self, new_product: &NewProduct) -> RepoResult<Product> {
        self.repo.create_product(new_product)
    }

    /// Gets one product by id.
    ///
    /// Returns repository-level not-found errors unchanged.
    pub fn get_product_by_id(&self, id: ProductId) -> RepoResult<Product> {
        self.repo.get_product_by_id(id)
    }

    /// Applies a partial update.
    ///
    /// Returns repository-level not-found errors unchanged.
    pub fn partial_update_product(
        &self,
        id: ProductId,
        partial: &PartialProduct,
    ) -> RepoResult<Product> {
        self.repo.partial_update_product(id, partial)
    }

    /// Hard-deletes one product by id.
    pub fn delete_product_by_id(&self, id: ProductId) -> RepoResult<()> {
        self.repo.delete_product_by_id(id)
    }

    /// Lists products matching `query`; zero matches is `NotFound`.
    pub fn get_products(&self, query: &QueryParams) -> RepoResult<Vec<Product>> {
        self.repo.get_products(query)
    }
}
