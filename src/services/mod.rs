// Service exports
pub mod cache;
pub mod postgres;

pub use cache::{CatalogCache, CacheError};
pub use postgres::{ShopRepository, RepositoryError};
