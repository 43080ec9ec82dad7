//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire config, logging, storage, repository and service once at startup.
//! - Print a deterministic catalog summary for quick local sanity checks.

use catalog_core::db::open_db;
use catalog_core::{
    init_logging, CatalogConfig, ProductService, QueryParams, RepoError, SqliteProductRepository,
};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("catalog_core ping={}", catalog_core::ping());
    println!("catalog_core version={}", catalog_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("catalog_cli error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CatalogConfig::from_env().map_err(|err| err.to_string())?;
    init_logging(config.log_level, &config.log_dir)?;

    let conn = open_db(&config.db_path).map_err(|err| format!("db open failed: {err}"))?;
    let repo =
        SqliteProductRepository::try_new(&conn).map_err(|err| format!("repo init failed: {err}"))?;
    let service = ProductService::new(repo);

    let products = match service.get_products(&QueryParams::default()) {
        Ok(products) => products,
        Err(RepoError::NotFound(_)) => Vec::new(),
        Err(err) => return Err(format!("product listing failed: {err}")),
    };
    let on_offer = products
        .iter()
        .filter(|product| product.offer_of_the_month)
        .count();

    info!(
        "event=cli_summary module=cli status=ok products={} on_offer={on_offer}",
        products.len()
    );
    println!("catalog db={}", config.db_path.display());
    println!("catalog products={} on_offer={on_offer}", products.len());
    Ok(())
}
