//! Product data-transfer shapes.
//!
//! # Responsibility
//! - Carry product data across the service/repository boundary without
//!   exposing storage representation.
//! - Own the presence-aware merge rule for partial updates and the
//!   presence-aware match rule for list filters.
//!
//! # Invariants
//! - `None` in `PartialProduct` means "leave the stored value unchanged".
//! - `None` in `QueryParams` means "no constraint on this attribute".
//! - A missing key and an explicit `null` both deserialize to `None`.

use crate::model::product::{compose_description, ProductEntity, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Creation input. Every business field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub photo: String,
    pub category: String,
    pub offer_of_the_month: bool,
    pub availability: bool,
    pub self_pickup: bool,
    pub description1: String,
    pub description2: String,
    pub price: Decimal,
}

impl NewProduct {
    /// Builds the entity persisted under a storage-assigned `id`.
    pub fn into_entity(self, id: ProductId) -> ProductEntity {
        ProductEntity {
            id,
            name: self.name,
            photo: self.photo,
            category: self.category,
            offer_of_the_month: self.offer_of_the_month,
            availability: self.availability,
            self_pickup: self.self_pickup,
            description1: self.description1,
            description2: self.description2,
            price: self.price,
        }
    }
}

/// Full read-model of one persisted product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub photo: String,
    pub category: String,
    pub offer_of_the_month: bool,
    pub availability: bool,
    pub self_pickup: bool,
    pub description1: String,
    pub description2: String,
    pub price: Decimal,
}

impl From<ProductEntity> for Product {
    fn from(entity: ProductEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            photo: entity.photo,
            category: entity.category,
            offer_of_the_month: entity.offer_of_the_month,
            availability: entity.availability,
            self_pickup: entity.self_pickup,
            description1: entity.description1,
            description2: entity.description2,
            price: entity.price,
        }
    }
}

/// Single-read variant carrying the composed `description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetProduct {
    pub id: ProductId,
    pub name: String,
    pub photo: String,
    pub category: String,
    pub offer_of_the_month: bool,
    pub availability: bool,
    pub self_pickup: bool,
    /// `description1` and `description2` joined by the display separator.
    pub description: String,
    pub price: Decimal,
}

impl From<Product> for GetProduct {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            description: compose_description(&product.description1, &product.description2),
            name: product.name,
            photo: product.photo,
            category: product.category,
            offer_of_the_month: product.offer_of_the_month,
            availability: product.availability,
            self_pickup: product.self_pickup,
            price: product.price,
        }
    }
}

/// Partial-update input. Absent fields leave stored values untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialProduct {
    pub name: Option<String>,
    pub photo: Option<String>,
    pub category: Option<String>,
    pub offer_of_the_month: Option<bool>,
    pub availability: Option<bool>,
    pub self_pickup: Option<bool>,
    pub description1: Option<String>,
    pub description2: Option<String>,
    pub price: Option<Decimal>,
}

impl PartialProduct {
    /// Returns whether no field is present, i.e. the update is a no-op.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Overwrites every field of `entity` whose counterpart here is present.
    ///
    /// Fields are independent, so application order does not matter.
    pub fn apply_to(&self, entity: &mut ProductEntity) {
        if let Some(name) = &self.name {
            entity.name.clone_from(name);
        }
        if let Some(photo) = &self.photo {
            entity.photo.clone_from(photo);
        }
        if let Some(category) = &self.category {
            entity.category.clone_from(category);
        }
        if let Some(flag) = self.offer_of_the_month {
            entity.offer_of_the_month = flag;
        }
        if let Some(flag) = self.availability {
            entity.availability = flag;
        }
        if let Some(flag) = self.self_pickup {
            entity.self_pickup = flag;
        }
        if let Some(text) = &self.description1 {
            entity.description1.clone_from(text);
        }
        if let Some(text) = &self.description2 {
            entity.description2.clone_from(text);
        }
        if let Some(price) = self.price {
            entity.price = price;
        }
    }
}

/// List filter. Present flags are ANDed together; absent flags are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    pub offer_of_the_month: Option<bool>,
    pub availability: Option<bool>,
    pub self_pickup: Option<bool>,
}

impl QueryParams {
    /// Returns whether `entity` satisfies every present flag.
    pub fn matches(&self, entity: &ProductEntity) -> bool {
        self.offer_of_the_month
            .map_or(true, |flag| entity.offer_of_the_month == flag)
            && self
                .availability
                .map_or(true, |flag| entity.availability == flag)
            && self
                .self_pickup
                .map_or(true, |flag| entity.self_pickup == flag)
    }
}
