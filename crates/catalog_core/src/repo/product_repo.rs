//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the capability set services depend on for product persistence.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Missing rows are reported as `RepoError::NotFound`, never as `None`.
//! - A filtered listing with zero matches is `NotFound`, not an empty `Vec`.
//! - Every read-model is produced by the same row conversion.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::dto::product::{NewProduct, PartialProduct, Product, QueryParams};
use crate::model::product::{
    price_from_minor_units, price_to_minor_units, ProductEntity, ProductId, PRICE_SCALE,
};
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    photo,
    category,
    offer_of_the_month,
    availability,
    self_pickup,
    description1,
    description2,
    price_cents
FROM products";

const PRODUCT_COLUMNS: [&str; 10] = [
    "id",
    "name",
    "photo",
    "category",
    "offer_of_the_month",
    "availability",
    "self_pickup",
    "description1",
    "description2",
    "price_cents",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// What a `NotFound` failure could not find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    /// No product is stored under this id.
    Product(ProductId),
    /// A listing filter matched zero products.
    NoMatchingProducts(QueryParams),
}

impl Display for NotFound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Product(id) => write!(f, "product not found: {id}"),
            Self::NoMatchingProducts(query) => write!(
                f,
                "no products found for offer_of_the_month={} availability={} self_pickup={}",
                flag_label(query.offer_of_the_month),
                flag_label(query.availability),
                flag_label(query.self_pickup),
            ),
        }
    }
}

/// Repository error for product persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error, propagated untranslated.
    Db(DbError),
    /// Referenced product, or any product matching a filter, does not exist.
    NotFound(NotFound),
    /// Price does not fit `DECIMAL(10, 2)` after rounding.
    UnrepresentablePrice(Decimal),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns whether this is a `NotFound` failure of either kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub(crate) fn product_not_found(id: ProductId) -> Self {
        Self::NotFound(NotFound::Product(id))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(what) => write!(f, "{what}"),
            Self::UnrepresentablePrice(price) => {
                write!(f, "price `{price}` does not fit 10 digits with {PRICE_SCALE} decimals")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "product repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "product repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "product repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for product CRUD and filtered listing.
///
/// Implementations must agree on merge, filter and `NotFound` semantics so
/// that services can swap them freely.
pub trait ProductRepository {
    /// Persists a new product and returns it with its assigned id.
    fn create_product(&self, new_product: &NewProduct) -> RepoResult<Product>;
    /// Gets one product, `NotFound` when absent.
    fn get_product_by_id(&self, id: ProductId) -> RepoResult<Product>;
    /// Overwrites present fields only and returns the merged product.
    fn partial_update_product(
        &self,
        id: ProductId,
        partial: &PartialProduct,
    ) -> RepoResult<Product>;
    /// Hard-deletes one product, `NotFound` when absent.
    fn delete_product_by_id(&self, id: ProductId) -> RepoResult<()>;
    /// Lists products matching every present flag, in ascending id order.
    fn get_products(&self, query: &QueryParams) -> RepoResult<Vec<Product>>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema
    ///   does not match the `products` layout.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_product_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn find_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_product_row(row)?.into())),
            None => Ok(None),
        }
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create_product(&self, new_product: &NewProduct) -> RepoResult<Product> {
        self.conn.execute(
            "INSERT INTO products (
                name,
                photo,
                category,
                offer_of_the_month,
                availability,
                self_pickup,
                description1,
                description2,
                price_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                new_product.name.as_str(),
                new_product.photo.as_str(),
                new_product.category.as_str(),
                bool_to_int(new_product.offer_of_the_month),
                bool_to_int(new_product.availability),
                bool_to_int(new_product.self_pickup),
                new_product.description1.as_str(),
                new_product.description2.as_str(),
                price_to_cents(new_product.price)?,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!("event=product_create module=repo status=ok product_id={id}");
        self.find_product(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created product {id} missing in read-back"))
        })
    }

    fn get_product_by_id(&self, id: ProductId) -> RepoResult<Product> {
        self.find_product(id)?
            .ok_or_else(|| RepoError::product_not_found(id))
    }

    fn partial_update_product(
        &self,
        id: ProductId,
        partial: &PartialProduct,
    ) -> RepoResult<Product> {
        let (assignments, mut bind_values) = partial_assignments(partial)?;
        if assignments.is_empty() {
            return self.get_product_by_id(id);
        }

        let sql = format!(
            "UPDATE products SET {} WHERE id = ?;",
            assignments.join(", ")
        );
        bind_values.push(Value::Integer(id));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::product_not_found(id));
        }

        info!(
            "event=product_update module=repo status=ok product_id={id} fields={}",
            assignments.len()
        );
        self.get_product_by_id(id)
    }

    fn delete_product_by_id(&self, id: ProductId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::product_not_found(id));
        }

        info!("event=product_delete module=repo status=ok product_id={id}");
        Ok(())
    }

    fn get_products(&self, query: &QueryParams) -> RepoResult<Vec<Product>> {
        let mut sql = format!("{PRODUCT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        for (column, flag) in [
            ("offer_of_the_month", query.offer_of_the_month),
            ("availability", query.availability),
            ("self_pickup", query.self_pickup),
        ] {
            if let Some(flag) = flag {
                sql.push_str(&format!(" AND {column} = ?"));
                bind_values.push(Value::Integer(bool_to_int(flag)));
            }
        }

        sql.push_str(" ORDER BY id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut products = Vec::new();
        while let Some(row) = rows.next()? {
            products.push(Product::from(parse_product_row(row)?));
        }

        debug!(
            "event=product_list module=repo status=ok count={}",
            products.len()
        );
        if products.is_empty() {
            return Err(RepoError::NotFound(NotFound::NoMatchingProducts(*query)));
        }

        Ok(products)
    }
}

fn partial_assignments(partial: &PartialProduct) -> RepoResult<(Vec<&'static str>, Vec<Value>)> {
    let mut assignments = Vec::new();
    let mut bind_values = Vec::new();

    let text_fields = [
        ("name = ?", &partial.name),
        ("photo = ?", &partial.photo),
        ("category = ?", &partial.category),
        ("description1 = ?", &partial.description1),
        ("description2 = ?", &partial.description2),
    ];
    for (assignment, value) in text_fields {
        if let Some(value) = value {
            assignments.push(assignment);
            bind_values.push(Value::Text(value.clone()));
        }
    }

    let flag_fields = [
        ("offer_of_the_month = ?", partial.offer_of_the_month),
        ("availability = ?", partial.availability),
        ("self_pickup = ?", partial.self_pickup),
    ];
    for (assignment, flag) in flag_fields {
        if let Some(flag) = flag {
            assignments.push(assignment);
            bind_values.push(Value::Integer(bool_to_int(flag)));
        }
    }

    if let Some(price) = partial.price {
        assignments.push("price_cents = ?");
        bind_values.push(Value::Integer(price_to_cents(price)?));
    }

    Ok((assignments, bind_values))
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<ProductEntity> {
    Ok(ProductEntity {
        id: row.get("id")?,
        name: row.get("name")?,
        photo: row.get("photo")?,
        category: row.get("category")?,
        offer_of_the_month: int_to_bool(row.get("offer_of_the_month")?, "offer_of_the_month")?,
        availability: int_to_bool(row.get("availability")?, "availability")?,
        self_pickup: int_to_bool(row.get("self_pickup")?, "self_pickup")?,
        description1: row.get("description1")?,
        description2: row.get("description2")?,
        price: price_from_minor_units(row.get("price_cents")?),
    })
}

fn ensure_product_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "products")? {
        return Err(RepoError::MissingRequiredTable("products"));
    }

    for column in PRODUCT_COLUMNS {
        if !table_has_column(conn, "products", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "products",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn price_to_cents(price: Decimal) -> RepoResult<i64> {
    price_to_minor_units(price).ok_or(RepoError::UnrepresentablePrice(price))
}

/// Returns `price` exactly as it reads back from storage.
pub(crate) fn normalize_price(price: Decimal) -> RepoResult<Decimal> {
    price_to_cents(price).map(price_from_minor_units)
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean `{other}` in products.{column}"
        ))),
    }
}

fn flag_label(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "true",
        Some(false) => "false",
        None => "any",
    }
}
