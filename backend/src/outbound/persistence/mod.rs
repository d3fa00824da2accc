//! User persistence adapters.
//!
//! `DieselUserRepository` stores users in PostgreSQL through `diesel-async`
//! and a `bb8` pool. `InMemoryUserRepository` keeps them in process for
//! development and tests. Row models and the schema stay private; only
//! domain types cross this boundary.
//!
//! # Example
//!
//! ```ignore
//! use account_service::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_user_repository;
mod memory_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use memory_user_repository::InMemoryUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
