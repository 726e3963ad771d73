//! Core data structures for record management
//!
//! A record is one row of the managed table. Which table that is, and which
//! columns it carries, is described by [`TableKind`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// The table a client instance manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    #[default]
    Products,
    Books,
}

impl TableKind {
    pub fn table_name(self) -> &'static str {
        match self {
            TableKind::Products => "products",
            TableKind::Books => "books",
        }
    }

    pub fn name_column(self) -> &'static str {
        match self {
            TableKind::Products => "name",
            TableKind::Books => "title",
        }
    }

    pub fn key_column(self) -> &'static str {
        match self {
            TableKind::Products => "code",
            TableKind::Books => "isbn",
        }
    }

    /// Whether the table carries `price` and `stock_quantity`
    pub fn has_inventory(self) -> bool {
        matches!(self, TableKind::Products)
    }

    /// Columns in selection order
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            TableKind::Products => &["id", "name", "price", "stock_quantity", "code"],
            TableKind::Books => &["id", "title", "isbn"],
        }
    }

    /// Non-key columns written by an insert or a full update
    pub fn writable_columns(self) -> &'static [&'static str] {
        match self {
            TableKind::Products => &["name", "price", "stock_quantity", "code"],
            TableKind::Books => &["title", "isbn"],
        }
    }

    pub fn record_label(self) -> &'static str {
        match self {
            TableKind::Products => "product",
            TableKind::Books => "book",
        }
    }

    pub fn record_title(self) -> &'static str {
        match self {
            TableKind::Products => "Product",
            TableKind::Books => "Book",
        }
    }

    pub fn name_label(self) -> &'static str {
        match self {
            TableKind::Products => "name",
            TableKind::Books => "title",
        }
    }

    pub fn key_label(self) -> &'static str {
        match self {
            TableKind::Products => "code",
            TableKind::Books => "ISBN",
        }
    }

    pub fn sort_columns(self) -> &'static [SortColumn] {
        match self {
            TableKind::Products => &[SortColumn::Price, SortColumn::StockQuantity, SortColumn::Id],
            TableKind::Books => &[SortColumn::Title, SortColumn::Id],
        }
    }

    pub fn editable_fields(self) -> &'static [UpdateField] {
        match self {
            TableKind::Products => &[
                UpdateField::Name,
                UpdateField::Price,
                UpdateField::StockQuantity,
                UpdateField::Code,
                UpdateField::All,
            ],
            TableKind::Books => &[UpdateField::Name, UpdateField::Code, UpdateField::All],
        }
    }

    /// Parse user text into this table's business key type.
    ///
    /// Product codes are integers; ISBNs are kept as text so leading zeros
    /// and hyphens survive.
    pub fn parse_key(self, raw: &str) -> Result<BusinessKey, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(format!("{} cannot be empty", self.key_label()));
        }
        match self {
            TableKind::Products => raw
                .parse::<i64>()
                .map(BusinessKey::Numeric)
                .map_err(|_| format!("'{}' is not a valid number", raw)),
            TableKind::Books => Ok(BusinessKey::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// User-facing unique key of a record (`code` or `isbn`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BusinessKey {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for BusinessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessKey::Numeric(n) => write!(f, "{}", n),
            BusinessKey::Text(s) => f.write_str(s),
        }
    }
}

/// A single row of the managed table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    pub code: BusinessKey,
}

/// Values for an insert or a full update; the identifier is server-assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub name: String,
    pub price: Option<i64>,
    pub stock_quantity: Option<i64>,
    pub code: BusinessKey,
}

impl NewRecord {
    pub fn new(name: impl Into<String>, code: BusinessKey) -> Self {
        Self {
            name: name.into(),
            price: None,
            stock_quantity: None,
            code,
        }
    }

    pub fn with_inventory(mut self, price: i64, stock_quantity: i64) -> Self {
        self.price = Some(price);
        self.stock_quantity = Some(stock_quantity);
        self
    }

    /// Overwrite the field named by `change`
    pub fn apply(&mut self, change: FieldChange) {
        match change {
            FieldChange::Name(name) => self.name = name,
            FieldChange::Price(price) => self.price = Some(price),
            FieldChange::StockQuantity(stock) => self.stock_quantity = Some(stock),
            FieldChange::Code(code) => self.code = code,
        }
    }
}

impl From<Record> for NewRecord {
    fn from(record: Record) -> Self {
        Self {
            name: record.name,
            price: record.price,
            stock_quantity: record.stock_quantity,
            code: record.code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortColumn {
    Id,
    Title,
    Price,
    #[value(name = "stock")]
    StockQuantity,
}

impl SortColumn {
    pub fn column(self, table: TableKind) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Title => table.name_column(),
            SortColumn::Price => "price",
            SortColumn::StockQuantity => "stock_quantity",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Id => "ID",
            SortColumn::Title => "Title",
            SortColumn::Price => "Price",
            SortColumn::StockQuantity => "Stock quantity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowLimit {
    #[default]
    All,
    TopTen,
}

impl RowLimit {
    pub fn sql(self) -> Option<&'static str> {
        match self {
            RowLimit::All => None,
            RowLimit::TopTen => Some("LIMIT 10"),
        }
    }
}

/// Ordering for a sorted listing, built only from fixed choices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
    pub limit: RowLimit,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            column: SortColumn::Id,
            direction: SortDirection::Ascending,
            limit: RowLimit::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Id(i64),
    NameContains(String),
    Key(BusinessKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateField {
    Name,
    Price,
    StockQuantity,
    Code,
    All,
}

impl UpdateField {
    pub fn label(self, table: TableKind) -> &'static str {
        match (self, table) {
            (UpdateField::Name, TableKind::Products) => "Name",
            (UpdateField::Name, TableKind::Books) => "Title",
            (UpdateField::Price, _) => "Price",
            (UpdateField::StockQuantity, _) => "Stock quantity",
            (UpdateField::Code, TableKind::Products) => "Code",
            (UpdateField::Code, TableKind::Books) => "ISBN",
            (UpdateField::All, _) => "All fields",
        }
    }
}

/// A single-column change applied by a targeted update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Name(String),
    Price(i64),
    StockQuantity(i64),
    Code(BusinessKey),
}

impl FieldChange {
    pub fn field(&self) -> UpdateField {
        match self {
            FieldChange::Name(_) => UpdateField::Name,
            FieldChange::Price(_) => UpdateField::Price,
            FieldChange::StockQuantity(_) => UpdateField::StockQuantity,
            FieldChange::Code(_) => UpdateField::Code,
        }
    }

    pub fn column(&self, table: TableKind) -> &'static str {
        match self {
            FieldChange::Name(_) => table.name_column(),
            FieldChange::Price(_) => "price",
            FieldChange::StockQuantity(_) => "stock_quantity",
            FieldChange::Code(_) => table.key_column(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    Duplicate(BusinessKey),
}

/// Result of an UPDATE by identifier.
///
/// Both drivers report matched rows, so zero affected rows means no row has
/// that id, even when the new values equal the old ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(u64),
    NotFound,
}

impl UpdateOutcome {
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows == 0 {
            UpdateOutcome::NotFound
        } else {
            UpdateOutcome::Updated(rows)
        }
    }
}
