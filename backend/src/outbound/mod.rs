//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL and in-memory user repositories
//! - **security**: Argon2id password hashing and JWT bearer tokens
//!
//! Adapters translate between domain types and infrastructure types. They
//! hold no business rules.

pub mod persistence;
pub mod security;
