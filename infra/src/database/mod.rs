//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management and schema migration
//! - Identity and token record repository implementations

pub mod connection;
pub mod mysql;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::{MySqlIdentityRepository, MySqlTokenRecordRepository};
