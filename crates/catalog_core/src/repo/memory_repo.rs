//! In-memory product repository.
//!
//! Satisfies the same contract as the SQLite repository without touching
//! storage, so services can be exercised in isolation. Prices are kept in
//! their stored form, rounded to two decimals.

use crate::dto::product::{NewProduct, PartialProduct, Product, QueryParams};
use crate::model::product::{ProductEntity, ProductId};
use crate::repo::product_repo::{
    normalize_price, NotFound, ProductRepository, RepoError, RepoResult,
};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Process-local product store keyed by ascending id.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: ProductId,
    rows: BTreeMap<ProductId, ProductEntity>,
}

impl InMemoryProductRepository {
    /// Creates an empty store whose first product gets id `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products.
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    /// Returns whether no product is stored.
    pub fn is_empty(&self) -> bool {
        self.lock().rows.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn create_product(&self, new_product: &NewProduct) -> RepoResult<Product> {
        let price = normalize_price(new_product.price)?;
        let mut state = self.lock();
        // Ids are never reused, matching AUTOINCREMENT.
        state.last_id += 1;
        let mut entity = new_product.clone().into_entity(state.last_id);
        entity.price = price;
        state.rows.insert(entity.id, entity.clone());
        Ok(entity.into())
    }

    fn get_product_by_id(&self, id: ProductId) -> RepoResult<Product> {
        self.lock()
            .rows
            .get(&id)
            .cloned()
            .map(Product::from)
            .ok_or_else(|| RepoError::product_not_found(id))
    }

    fn partial_update_product(
        &self,
        id: ProductId,
        partial: &PartialProduct,
    ) -> RepoResult<Product> {
        let price = partial.price.map(normalize_price).transpose()?;
        let mut state = self.lock();
        let entity = state
            .rows
            .get_mut(&id)
            .ok_or_else(|| RepoError::product_not_found(id))?;
        partial.apply_to(entity);
        if let Some(price) = price {
            entity.price = price;
        }
        Ok(entity.clone().into())
    }

    fn delete_product_by_id(&self, id: ProductId) -> RepoResult<()> {
        self.lock()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::product_not_found(id))
    }

    fn get_products(&self, query: &QueryParams) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .lock()
            .rows
            .values()
            .filter(|entity| query.matches(entity))
            .cloned()
            .map(Product::from)
            .collect();

        if products.is_empty() {
            return Err(RepoError::NotFound(NotFound::NoMatchingProducts(*query)));
        }
        Ok(products)
    }
}
