//! Core operations implementation
//!
//! [`SqlRecordStore`] implements [`RecordStore`] on top of one live
//! `sqlx` connection. The connection goes through the `Any` driver, so the
//! same code runs against MySQL in production and SQLite in tests.

use async_trait::async_trait;
use sqlx::any::{Any, AnyArguments, AnyQueryResult, AnyRow};
use sqlx::AnyConnection;
use sqlx::query::Query;
use sqlx::{Connection, Row};
use tracing::debug;

use crate::core::data::{
    BusinessKey, FieldChange, NewRecord, Record, SearchQuery, SortOrder, TableKind, UpdateOutcome,
};
use crate::core::query;
use crate::core::traits::RecordStore;
use crate::utils::error::{AppError, AppResult};

type AnyQuery<'q> = Query<'q, Any, AnyArguments<'q>>;

/// Record store backed by a single database connection
pub struct SqlRecordStore {
    conn: AnyConnection,
    table: TableKind,
}

impl SqlRecordStore {
    pub fn new(conn: AnyConnection, table: TableKind) -> Self {
        Self { conn, table }
    }

    /// Close the underlying connection
    pub async fn close(self) -> AppResult<()> {
        debug!(table = %self.table, "closing database connection");
        self.conn.close().await?;
        Ok(())
    }

    async fn fetch_records(&mut self, sql: &str, query: AnyQuery<'_>) -> AppResult<Vec<Record>> {
        debug!(%sql, "fetching rows");
        let rows = query.fetch_all(&mut self.conn).await?;
        rows.iter()
            .map(|row| decode_record(self.table, row))
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::from)
    }

    async fn fetch_record(&mut self, sql: &str, query: AnyQuery<'_>) -> AppResult<Option<Record>> {
        debug!(%sql, "fetching one row");
        let row = query.fetch_optional(&mut self.conn).await?;
        row.map(|row| decode_record(self.table, &row))
            .transpose()
            .map_err(AppError::from)
    }

    /// Run one write statement in its own transaction and commit it
    async fn execute_write(
        &mut self,
        sql: &str,
        query: AnyQuery<'_>,
    ) -> Result<AnyQueryResult, sqlx::Error> {
        debug!(%sql, "executing statement");
        let mut tx = self.conn.begin().await?;
        let result = query.execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(result)
    }

    /// Run an INSERT in its own transaction and return the generated id.
    ///
    /// The SQLite `Any` driver leaves `last_insert_id` empty, so there the id
    /// is read back with `last_insert_rowid()` before committing.
    async fn execute_insert(&mut self, sql: &str, query: AnyQuery<'_>) -> Result<i64, sqlx::Error> {
        debug!(%sql, "executing insert");
        let mut tx = self.conn.begin().await?;
        let result = query.execute(&mut *tx).await?;

        let id = match result.last_insert_id() {
            Some(id) => id,
            None if tx.backend_name().eq_ignore_ascii_case("sqlite") => {
                let row = sqlx::query("SELECT last_insert_rowid()")
                    .fetch_one(&mut *tx)
                    .await?;
                row.try_get::<i64, _>(0)?
            }
            None => {
                return Err(sqlx::Error::Protocol(format!(
                    "{} driver did not report the generated id",
                    tx.backend_name()
                )));
            }
        };

        tx.commit().await?;
        Ok(id)
    }

    async fn count(&mut self, sql: &str, query: AnyQuery<'_>) -> AppResult<i64> {
        debug!(%sql, "counting rows");
        let row = query.fetch_one(&mut self.conn).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }

    fn duplicate_or_database(&self, err: sqlx::Error, key: &BusinessKey) -> AppError {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::DuplicateKey(format!("{} {}", self.table.key_label(), key))
            }
            _ => AppError::from(err),
        }
    }
}

fn bind_key<'q>(query: AnyQuery<'q>, key: &BusinessKey) -> AnyQuery<'q> {
    match key {
        BusinessKey::Numeric(n) => query.bind(*n),
        BusinessKey::Text(s) => query.bind(s.clone()),
    }
}

/// Bind the writable columns in [`TableKind::writable_columns`] order
fn bind_values<'q>(table: TableKind, query: AnyQuery<'q>, values: &NewRecord) -> AnyQuery<'q> {
    let query = query.bind(values.name.clone());
    let query = if table.has_inventory() {
        query.bind(values.price).bind(values.stock_quantity)
    } else {
        query
    };
    bind_key(query, &values.code)
}

fn decode_record(table: TableKind, row: &AnyRow) -> Result<Record, sqlx::Error> {
    let (price, stock_quantity) = if table.has_inventory() {
        (row.try_get("price")?, row.try_get("stock_quantity")?)
    } else {
        (None, None)
    };

    let code = match table {
        TableKind::Products => BusinessKey::Numeric(row.try_get(table.key_column())?),
        TableKind::Books => BusinessKey::Text(row.try_get(table.key_column())?),
    };

    Ok(Record {
        id: row.try_get("id")?,
        name: row.try_get(table.name_column())?,
        price,
        stock_quantity,
        code,
    })
}

#[async_trait]
impl RecordStore for SqlRecordStore {
    fn table(&self) -> TableKind {
        self.table
    }

    async fn list_all(&mut self) -> AppResult<Vec<Record>> {
        let sql = query::select_all(self.table);
        self.fetch_records(&sql, sqlx::query(&sql)).await
    }

    async fn list_sorted(&mut self, order: SortOrder) -> AppResult<Vec<Record>> {
        let sql = query::select_sorted(self.table, &order)?;
        self.fetch_records(&sql, sqlx::query(&sql)).await
    }

    async fn code_exists(&mut self, key: &BusinessKey) -> AppResult<bool> {
        let sql = query::count_by_key(self.table);
        let count = self.count(&sql, bind_key(sqlx::query(&sql), key)).await?;
        Ok(count > 0)
    }

    async fn insert(&mut self, record: &NewRecord) -> AppResult<i64> {
        let sql = query::insert(self.table);
        let statement = bind_values(self.table, sqlx::query(&sql), record);
        self.execute_insert(&sql, statement)
            .await
            .map_err(|err| self.duplicate_or_database(err, &record.code))
    }

    async fn find_by_id(&mut self, id: i64) -> AppResult<Option<Record>> {
        let sql = query::select_by_id(self.table);
        self.fetch_record(&sql, sqlx::query(&sql).bind(id)).await
    }

    async fn find_by_key(&mut self, key: &BusinessKey) -> AppResult<Option<Record>> {
        let sql = query::select_by_key(self.table);
        self.fetch_record(&sql, bind_key(sqlx::query(&sql), key)).await
    }

    async fn update_field(&mut self, id: i64, change: &FieldChange) -> AppResult<UpdateOutcome> {
        if !self.table.editable_fields().contains(&change.field()) {
            return Err(AppError::Input(format!(
                "{} has no {} column",
                self.table,
                change.field().label(self.table).to_lowercase()
            )));
        }

        let sql = query::update_column(self.table, change.column(self.table));
        let statement = sqlx::query(&sql);
        let statement = match change {
            FieldChange::Name(name) => statement.bind(name.clone()),
            FieldChange::Price(price) => statement.bind(*price),
            FieldChange::StockQuantity(stock) => statement.bind(*stock),
            FieldChange::Code(key) => bind_key(statement, key),
        };
        let statement = statement.bind(id);

        let result = match self.execute_write(&sql, statement).await {
            Ok(result) => result,
            Err(err) => {
                return Err(match change {
                    FieldChange::Code(key) => self.duplicate_or_database(err, key),
                    _ => AppError::from(err),
                });
            }
        };
        Ok(UpdateOutcome::from_rows_affected(result.rows_affected()))
    }

    async fn update_all(&mut self, id: i64, values: &NewRecord) -> AppResult<UpdateOutcome> {
        let sql = query::update_all(self.table);
        let statement = bind_values(self.table, sqlx::query(&sql), values).bind(id);
        let result = match self.execute_write(&sql, statement).await {
            Ok(result) => result,
            Err(err) => return Err(self.duplicate_or_database(err, &values.code)),
        };
        Ok(UpdateOutcome::from_rows_affected(result.rows_affected()))
    }

    async fn delete(&mut self, id: i64) -> AppResult<u64> {
        let sql = query::delete(self.table);
        let result = self.execute_write(&sql, sqlx::query(&sql).bind(id)).await?;
        Ok(result.rows_affected())
    }

    async fn search(&mut self, search: &SearchQuery) -> AppResult<Vec<Record>> {
        match search {
            SearchQuery::Id(id) => {
                let sql = query::select_by_id(self.table);
                self.fetch_records(&sql, sqlx::query(&sql).bind(*id)).await
            }
            SearchQuery::NameContains(fragment) => {
                let sql = query::select_name_like(self.table);
                let pattern = query::like_pattern(fragment);
                self.fetch_records(&sql, sqlx::query(&sql).bind(pattern)).await
            }
            SearchQuery::Key(key) => {
                let sql = query::select_by_key(self.table);
                self.fetch_records(&sql, bind_key(sqlx::query(&sql), key)).await
            }
        }
    }
}
