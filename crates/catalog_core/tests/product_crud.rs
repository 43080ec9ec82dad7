use catalog_core::db::migrations::latest_version;
use catalog_core::db::open_db_in_memory;
use catalog_core::{
    GetProduct, NewProduct, NotFound, PartialProduct, Product, ProductRepository,
    ProductService, QueryParams, RepoError, SqliteProductRepository,
};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn chair() -> NewProduct {
    NewProduct {
        name: "Chair".to_string(),
        photo: "http://x/1.jpg".to_string(),
        category: "Furniture".to_string(),
        offer_of_the_month: false,
        availability: true,
        self_pickup: false,
        description1: "A".to_string(),
        description2: "B".to_string(),
        price: Decimal::new(1999, 2),
    }
}

fn product(name: &str, offer: bool, available: bool, pickup: bool) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        offer_of_the_month: offer,
        availability: available,
        self_pickup: pickup,
        ..chair()
    }
}

#[test]
fn chair_create_update_delete_scenario() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let created = repo.create_product(&chair()).unwrap();
    assert!(created.id > 0);
    assert_eq!(created.name, "Chair");
    assert_eq!(created.photo, "http://x/1.jpg");
    assert_eq!(created.category, "Furniture");
    assert!(!created.offer_of_the_month);
    assert!(created.availability);
    assert!(!created.self_pickup);
    assert_eq!(created.description1, "A");
    assert_eq!(created.description2, "B");
    assert_eq!(created.price, Decimal::new(1999, 2));

    let update = PartialProduct {
        price: Some(Decimal::new(2499, 2)),
        ..PartialProduct::default()
    };
    let updated = repo.partial_update_product(created.id, &update).unwrap();
    assert_eq!(updated.price, Decimal::new(2499, 2));
    assert_eq!(
        updated,
        Product {
            price: Decimal::new(2499, 2),
            ..created.clone()
        }
    );

    repo.delete_product_by_id(created.id).unwrap();
    let err = repo.get_product_by_id(created.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(NotFound::Product(id)) if id == created.id));
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let created = repo.create_product(&chair()).unwrap();
    let loaded = repo.get_product_by_id(created.id).unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded, Product::from(chair().into_entity(created.id)));
}

#[test]
fn created_ids_are_unique_and_never_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let first = repo.create_product(&chair()).unwrap();
    let second = repo.create_product(&chair()).unwrap();
    assert_ne!(first.id, second.id);

    repo.delete_product_by_id(second.id).unwrap();
    let third = repo.create_product(&chair()).unwrap();
    assert!(third.id > second.id);
}

#[test]
fn missing_id_is_not_found_for_get_update_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let get_err = repo.get_product_by_id(404).unwrap_err();
    assert!(matches!(get_err, RepoError::NotFound(NotFound::Product(404))));

    let update = PartialProduct {
        name: Some("Ghost".to_string()),
        ..PartialProduct::default()
    };
    let update_err = repo.partial_update_product(404, &update).unwrap_err();
    assert!(matches!(update_err, RepoError::NotFound(NotFound::Product(404))));

    let noop_err = repo
        .partial_update_product(404, &PartialProduct::default())
        .unwrap_err();
    assert!(noop_err.is_not_found());

    let delete_err = repo.delete_product_by_id(404).unwrap_err();
    assert!(matches!(delete_err, RepoError::NotFound(NotFound::Product(404))));
}

#[test]
fn empty_partial_update_returns_unchanged_product() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let created = repo.create_product(&chair()).unwrap();
    let same = repo
        .partial_update_product(created.id, &PartialProduct::default())
        .unwrap();

    assert_eq!(same, created);
}

#[test]
fn partial_update_only_touches_present_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let created = repo.create_product(&chair()).unwrap();
    let update = PartialProduct {
        name: Some("Armchair".to_string()),
        availability: Some(false),
        description1: Some("Soft".to_string()),
        ..PartialProduct::default()
    };
    let updated = repo.partial_update_product(created.id, &update).unwrap();

    assert_eq!(updated.name, "Armchair");
    assert!(!updated.availability);
    assert_eq!(updated.description1, "Soft");
    assert_eq!(updated.photo, created.photo);
    assert_eq!(updated.category, created.category);
    assert_eq!(updated.offer_of_the_month, created.offer_of_the_month);
    assert_eq!(updated.self_pickup, created.self_pickup);
    assert_eq!(updated.description2, created.description2);
    assert_eq!(updated.price, created.price);

    assert_eq!(repo.get_product_by_id(created.id).unwrap(), updated);
}

#[test]
fn partial_update_sets_photo_and_second_description() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let created = repo.create_product(&product("Desk", true, false, true)).unwrap();
    let update = PartialProduct {
        photo: Some("http://x/desk-2.jpg".to_string()),
        description2: Some("Oak top".to_string()),
        ..PartialProduct::default()
    };
    let updated = repo.partial_update_product(created.id, &update).unwrap();

    assert_eq!(
        updated,
        Product {
            photo: "http://x/desk-2.jpg".to_string(),
            description2: "Oak top".to_string(),
            ..created.clone()
        }
    );
    assert_eq!(repo.get_product_by_id(created.id).unwrap(), updated);
    assert_eq!(
        GetProduct::from(updated).description,
        format!("{} <br/> Oak top", created.description1)
    );
}

#[test]
fn partial_update_leaves_other_products_alone() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let target = repo.create_product(&chair()).unwrap();
    let bystander = repo.create_product(&product("Table", true, true, true)).unwrap();

    let update = PartialProduct {
        self_pickup: Some(true),
        ..PartialProduct::default()
    };
    repo.partial_update_product(target.id, &update).unwrap();

    assert_eq!(repo.get_product_by_id(bystander.id).unwrap(), bystander);
}

#[test]
fn list_without_flags_returns_every_product_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let a = repo.create_product(&product("a", false, true, false)).unwrap();
    let b = repo.create_product(&product("b", true, false, true)).unwrap();
    let c = repo.create_product(&product("c", true, true, false)).unwrap();

    let all = repo.get_products(&QueryParams::default()).unwrap();
    let ids: Vec<_> = all.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);
}

#[test]
fn list_filters_are_conjunctive() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let a = repo.create_product(&product("a", false, true, false)).unwrap();
    repo.create_product(&product("b", true, false, true)).unwrap();
    let c = repo.create_product(&product("c", true, true, false)).unwrap();

    let available = QueryParams {
        availability: Some(true),
        ..QueryParams::default()
    };
    let ids: Vec<_> = repo
        .get_products(&available)
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec![a.id, c.id]);

    let available_offer = QueryParams {
        offer_of_the_month: Some(true),
        availability: Some(true),
        self_pickup: None,
    };
    let only_c = repo.get_products(&available_offer).unwrap();
    assert_eq!(only_c.len(), 1);
    assert_eq!(only_c[0], c);
}

#[test]
fn list_with_zero_matches_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    repo.create_product(&product("a", false, true, false)).unwrap();

    let impossible = QueryParams {
        offer_of_the_month: Some(true),
        availability: Some(false),
        self_pickup: Some(true),
    };
    let err = repo.get_products(&impossible).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound(NotFound::NoMatchingProducts(query)) if query == impossible
    ));
}

#[test]
fn list_on_empty_catalog_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let err = repo.get_products(&QueryParams::default()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn price_keeps_two_fraction_digits() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let whole = NewProduct {
        price: Decimal::new(20, 0),
        ..chair()
    };
    let created = repo.create_product(&whole).unwrap();
    assert_eq!(created.price, Decimal::new(2000, 2));
    assert_eq!(created.price.to_string(), "20.00");
}

#[test]
fn overlong_fields_surface_as_storage_errors() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let too_long = NewProduct {
        category: "c".repeat(51),
        ..chair()
    };
    let err = repo.create_product(&too_long).unwrap_err();
    match err {
        RepoError::Db(db_err) => assert!(db_err.is_constraint_violation()),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn detail_view_composes_description() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();

    let created = repo.create_product(&chair()).unwrap();
    let detail = GetProduct::from(repo.get_product_by_id(created.id).unwrap());
    assert_eq!(detail.description, "A <br/> B");
    assert_eq!(detail.id, created.id);
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProductRepository::try_new(&conn).unwrap();
    let service = ProductService::new(repo);

    let created = service.create_product(&chair()).unwrap();
    assert_eq!(service.get_product_by_id(created.id).unwrap(), created);

    let listed = service.get_products(&QueryParams::default()).unwrap();
    assert_eq!(listed, vec![created.clone()]);

    service.delete_product_by_id(created.id).unwrap();
    assert!(service.get_product_by_id(created.id).unwrap_err().is_not_found());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteProductRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_products_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteProductRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("products"))
    ));
}

#[test]
fn repository_rejects_connection_missing_price_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE products (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            photo TEXT NOT NULL,
            category TEXT NOT NULL,
            offer_of_the_month INTEGER NOT NULL,
            availability INTEGER NOT NULL,
            self_pickup INTEGER NOT NULL,
            description1 TEXT NOT NULL,
            description2 TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteProductRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "products",
            column: "price_cents"
        })
    ));
}
