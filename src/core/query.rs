//! SQL text for every statement the store runs
//!
//! Only table names, column names and the fixed ORDER BY / LIMIT fragments
//! are ever spliced into statement text. User values are always bound
//! through `?` placeholders.

use crate::core::data::{SortOrder, TableKind};
use crate::utils::error::{AppError, AppResult};

fn column_list(table: TableKind) -> String {
    table.columns().join(", ")
}

pub fn select_all(table: TableKind) -> String {
    format!("SELECT {} FROM {}", column_list(table), table.table_name())
}

pub fn select_sorted(table: TableKind, order: &SortOrder) -> AppResult<String> {
    if !table.sort_columns().contains(&order.column) {
        return Err(AppError::Input(format!(
            "{} cannot be sorted by {}",
            table,
            order.column.label().to_lowercase()
        )));
    }

    let mut sql = format!(
        "{} ORDER BY {} {}",
        select_all(table),
        order.column.column(table),
        order.direction.sql()
    );
    if let Some(limit) = order.limit.sql() {
        sql.push(' ');
        sql.push_str(limit);
    }
    Ok(sql)
}

pub fn select_by_id(table: TableKind) -> String {
    format!("{} WHERE id = ?", select_all(table))
}

pub fn select_by_key(table: TableKind) -> String {
    format!("{} WHERE {} = ?", select_all(table), table.key_column())
}

pub fn select_name_like(table: TableKind) -> String {
    format!(
        "{} WHERE {} LIKE ? ESCAPE '{}'",
        select_all(table),
        table.name_column(),
        LIKE_ESCAPE
    )
}

pub fn count_by_key(table: TableKind) -> String {
    format!(
        "SELECT COUNT(*) FROM {} WHERE {} = ?",
        table.table_name(),
        table.key_column()
    )
}

pub fn insert(table: TableKind) -> String {
    let columns = table.writable_columns();
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {}({}) VALUES({})",
        table.table_name(),
        columns.join(", "),
        placeholders
    )
}

pub fn update_column(table: TableKind, column: &str) -> String {
    format!("UPDATE {} SET {} = ? WHERE id = ?", table.table_name(), column)
}

pub fn update_all(table: TableKind) -> String {
    let assignments = table
        .writable_columns()
        .iter()
        .map(|column| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(", ");
    format!("UPDATE {} SET {} WHERE id = ?", table.table_name(), assignments)
}

pub fn delete(table: TableKind) -> String {
    format!("DELETE FROM {} WHERE id = ?", table.table_name())
}

/// Escape character for `LIKE`. Not a backslash, since MySQL string
/// literals treat that one specially.
const LIKE_ESCAPE: char = '!';

/// Wrap a name fragment for a substring `LIKE` match.
///
/// `%` and `_` in the fragment match literally.
pub fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
