//! Recordstore - a console client for one SQL table of products or books
//!
//! This library provides the record store, the interactive menu and the
//! command handlers the `recordstore` binary is built from.

pub mod cli;
pub mod config;
pub mod core;
pub mod manager;
pub mod storage;
pub mod utils;

// Re-export core types and traits for easier use
pub use crate::core::{
    data::{BusinessKey, NewRecord, Record, TableKind},
    operations::SqlRecordStore,
    traits::RecordStore,
};
pub use utils::error::{AppError, AppResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
