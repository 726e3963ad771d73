//! Core trait definitions for record management
//!
//! Handlers talk to the database only through [`RecordStore`], so the
//! single live connection is always passed explicitly.

use async_trait::async_trait;

use crate::core::data::{
    BusinessKey, FieldChange, InsertOutcome, NewRecord, Record, SearchQuery, SortOrder, TableKind,
    UpdateOutcome,
};
use crate::utils::error::AppResult;

/// CRUD operations against one table
///
/// Every call re-queries the database; implementations keep no copy of the
/// table between calls.
#[async_trait]
pub trait RecordStore: Send {
    /// The table this store manages
    fn table(&self) -> TableKind;

    /// Fetch every row in storage order
    async fn list_all(&mut self) -> AppResult<Vec<Record>>;

    /// Fetch rows ordered by one of the table's sort columns
    async fn list_sorted(&mut self, order: SortOrder) -> AppResult<Vec<Record>>;

    /// Whether any row already uses this business key
    async fn code_exists(&mut self, key: &BusinessKey) -> AppResult<bool>;

    /// Insert a row and return the server-assigned identifier
    async fn insert(&mut self, record: &NewRecord) -> AppResult<i64>;

    /// Insert unless the business key is already taken.
    ///
    /// The check and the insert are separate statements.
    async fn insert_unique(&mut self, record: &NewRecord) -> AppResult<InsertOutcome> {
        if self.code_exists(&record.code).await? {
            return Ok(InsertOutcome::Duplicate(record.code.clone()));
        }
        let id = self.insert(record).await?;
        Ok(InsertOutcome::Inserted(id))
    }

    async fn find_by_id(&mut self, id: i64) -> AppResult<Option<Record>>;

    async fn find_by_key(&mut self, key: &BusinessKey) -> AppResult<Option<Record>>;

    /// Change one column of the row with this identifier
    async fn update_field(&mut self, id: i64, change: &FieldChange) -> AppResult<UpdateOutcome>;

    /// Overwrite every writable column of the row with this identifier
    async fn update_all(&mut self, id: i64, values: &NewRecord) -> AppResult<UpdateOutcome>;

    /// Delete by identifier, returning the number of rows removed
    async fn delete(&mut self, id: i64) -> AppResult<u64>;

    async fn search(&mut self, query: &SearchQuery) -> AppResult<Vec<Record>>;
}
