//! Storage layer for imported fantasy data
//!
//! This module provides a clean abstraction over the SQLite database,
//! organized into logical components:
//! - `schema`: Database connection and schema management
//! - `queries`: Basic CRUD operations
//! - `store`: The async `PersistencePort` implementation

pub mod queries;
pub mod schema;
pub mod store;

#[cfg(test)]
mod tests;

// Re-export the main types for easy access
pub use schema::FantasyDatabase;
pub use store::SqliteStore;
