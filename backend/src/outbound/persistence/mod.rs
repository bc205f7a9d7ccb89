//! PostgreSQL persistence adapters built on Diesel (async).

mod diesel_category_repository;
mod diesel_pantry_repository;
mod diesel_recipe_catalog_repository;
mod diesel_user_recipe_repository;
mod diesel_user_repository;
mod json_columns;
mod models;
mod pool;
pub mod schema;

pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_pantry_repository::DieselPantryRepository;
pub use diesel_recipe_catalog_repository::DieselRecipeCatalogRepository;
pub use diesel_user_recipe_repository::DieselUserRecipeRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use diesel_migrations::{embed_migrations, EmbeddedMigrations};

/// Migrations embedded into the binary and run at startup.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");
