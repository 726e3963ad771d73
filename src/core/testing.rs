//! Shared fixtures for tests that need a live store

use sqlx::Connection;
use sqlx::AnyConnection;

use crate::core::data::{BusinessKey, NewRecord, TableKind};
use crate::core::operations::SqlRecordStore;

const PRODUCTS_DDL: &str = "CREATE TABLE products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    price INTEGER,
    stock_quantity INTEGER,
    code INTEGER UNIQUE
)";

const BOOKS_DDL: &str = "CREATE TABLE books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    isbn TEXT UNIQUE
)";

async fn memory_store(table: TableKind, ddl: &str) -> SqlRecordStore {
    sqlx::any::install_default_drivers();
    let mut conn = AnyConnection::connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open");
    sqlx::query(ddl)
        .execute(&mut conn)
        .await
        .expect("schema should apply");
    SqlRecordStore::new(conn, table)
}

pub async fn products_store() -> SqlRecordStore {
    memory_store(TableKind::Products, PRODUCTS_DDL).await
}

pub async fn books_store() -> SqlRecordStore {
    memory_store(TableKind::Books, BOOKS_DDL).await
}

pub fn product(name: &str, price: i64, stock_quantity: i64, code: i64) -> NewRecord {
    NewRecord::new(name, BusinessKey::Numeric(code)).with_inventory(price, stock_quantity)
}

pub fn book(title: &str, isbn: &str) -> NewRecord {
    NewRecord::new(title, BusinessKey::Text(isbn.to_string()))
}
