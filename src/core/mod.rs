//! Core business logic layer
//!
//! This module contains the record data model, the store trait, the SQL it
//! runs and the `sqlx`-backed implementation.

pub mod data;
pub mod operations;
pub mod query;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
