// Query operations - list, sorted list, search

use std::io::{BufRead, Write};

use crate::cli::{ListArgs, ListFormat, SearchArgs};
use crate::core::data::{
    Record, RowLimit, SearchQuery, SortColumn, SortDirection, SortOrder, TableKind, UpdateField,
};
use crate::core::traits::RecordStore;
use crate::manager::{parse_key_arg, prompt_key};
use crate::utils::error::{AppError, AppResult, FlowResult, handle_flow};
use crate::utils::output::{write_json, write_records, write_row_count};
use crate::utils::Console;

#[derive(Clone, Copy)]
enum SearchKind {
    Id,
    Name,
    Key,
}

fn render<W: Write>(
    out: &mut W,
    table: TableKind,
    records: &[Record],
    format: ListFormat,
    empty: &str,
) -> AppResult<()> {
    match format {
        ListFormat::Json => write_json(out, records)?,
        ListFormat::Table if records.is_empty() => handle_flow(
            out,
            FlowResult::EmptyList {
                item_type: empty.to_string(),
            },
        )?,
        ListFormat::Table => {
            write_records(out, table, records)?;
            write_row_count(out, records.len())?;
        }
    }
    Ok(())
}

fn empty_label(table: TableKind) -> String {
    format!("{}s", table.record_label())
}

// List operations
/// Ask for column, direction and limit, then print the ordered rows.
///
/// Direction defaults to ascending and the limit to all rows when the answer
/// is left empty.
pub async fn list_interactive<S: RecordStore, R: BufRead, W: Write>(
    store: &mut S,
    console: &mut Console<R, W>,
) -> AppResult<()> {
    let table = store.table();

    let columns: Vec<(SortColumn, &str)> = table
        .sort_columns()
        .iter()
        .map(|column| (*column, column.label()))
        .collect();
    let column = console.select("Sort by", &columns, Some(SortColumn::Id))?;

    let direction = console.select(
        "Order (default: ascending)",
        &[
            (SortDirection::Ascending, "Ascending"),
            (SortDirection::Descending, "Descending"),
        ],
        Some(SortDirection::Ascending),
    )?;

    let limit = console.select(
        "Rows (default: all)",
        &[(RowLimit::All, "All"), (RowLimit::TopTen, "Top 10")],
        Some(RowLimit::All),
    )?;

    let order = SortOrder {
        column,
        direction,
        limit,
    };
    let records = store.list_sorted(order).await?;
    render(console.output(), table, &records, ListFormat::Table, &empty_label(table))
}

pub async fn handle_list_command<S: RecordStore, W: Write>(
    store: &mut S,
    args: &ListArgs,
    out: &mut W,
) -> AppResult<()> {
    let table = store.table();
    let format = args.format.unwrap_or_default();

    let records = if args.sort.is_none() && !args.desc && !args.top {
        store.list_all().await?
    } else {
        let order = SortOrder {
            column: args.sort.unwrap_or(SortColumn::Id),
            direction: if args.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
            limit: if args.top { RowLimit::TopTen } else { RowLimit::All },
        };
        store.list_sorted(order).await?
    };

    render(out, table, &records, format, &empty_label(table))
}

// Search operations
pub async fn search_interactive<S: RecordStore, R: BufRead, W: Write>(
    store: &mut S,
    console: &mut Console<R, W>,
) -> AppResult<()> {
    let table = store.table();
    let name_option = format!("{} contains", UpdateField::Name.label(table));
    let key_option = UpdateField::Code.label(table);

    let kind = console.select(
        "Search by",
        &[
            (SearchKind::Id, "ID"),
            (SearchKind::Name, name_option.as_str()),
            (SearchKind::Key, key_option),
        ],
        None,
    )?;

    let query = match kind {
        SearchKind::Id => SearchQuery::Id(console.prompt_parsed("Enter the ID >>> ")?),
        SearchKind::Name => SearchQuery::NameContains(
            console.prompt_non_empty(&format!("Enter part of the {} >>> ", table.name_label()))?,
        ),
        SearchKind::Key => SearchQuery::Key(prompt_key(
            console,
            table,
            &format!("Enter the {} >>> ", table.key_label()),
        )?),
    };

    let records = store.search(&query).await?;
    render(console.output(), table, &records, ListFormat::Table, "results")
}

pub async fn handle_search_command<S: RecordStore, W: Write>(
    store: &mut S,
    args: &SearchArgs,
    out: &mut W,
) -> AppResult<()> {
    let table = store.table();

    let query = match (&args.by.id, &args.by.name, &args.by.code) {
        (Some(id), _, _) => SearchQuery::Id(*id),
        (_, Some(name), _) => SearchQuery::NameContains(name.clone()),
        (_, _, Some(code)) => SearchQuery::Key(parse_key_arg(table, code)?),
        _ => {
            return Err(AppError::Input(
                "pass one of --id, --name or --code".to_string(),
            ));
        }
    };

    let records = store.search(&query).await?;
    render(out, table, &records, args.format.unwrap_or_default(), "results")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SearchBy;
    use crate::core::testing::{book, books_store, product, products_store};
    use std::io::Cursor;

    fn console(script: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        colored::control::set_override(false);
        Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn text(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_list_interactive_defaults_and_descending_price() {
        let mut store = products_store().await;
        store.insert(&product("eraser", 100, 50, 1)).await.unwrap();
        store.insert(&product("ballpen", 1500, 10, 2)).await.unwrap();
        store.insert(&product("notebook", 700, 20, 3)).await.unwrap();

        // Price, descending, all rows
        let mut session = console("1\n2\n\n");
        list_interactive(&mut store, &mut session).await.unwrap();
        let output = text(session);

        let ballpen = output.find("ballpen").unwrap();
        let notebook = output.find("notebook").unwrap();
        let eraser = output.find("eraser").unwrap();
        assert!(ballpen < notebook && notebook < eraser);
        assert!(output.contains("Total: 3 row(s)"));
    }

    #[tokio::test]
    async fn test_list_interactive_top_ten() {
        let mut store = products_store().await;
        for code in 1..=12 {
            store
                .insert(&product(&format!("item{:02}", code), code * 10, code, code))
                .await
                .unwrap();
        }

        // ID, default direction, top 10
        let mut session = console("3\n\n2\n");
        list_interactive(&mut store, &mut session).await.unwrap();
        let output = text(session);

        assert!(output.contains("Total: 10 row(s)"));
        assert!(!output.contains("item11"));
    }

    #[tokio::test]
    async fn test_list_interactive_empty_table_with_defaults() {
        let mut store = books_store().await;
        let mut session = console("\n\n\n");
        list_interactive(&mut store, &mut session).await.unwrap();
        assert!(text(session).contains("No books found."));
    }

    #[tokio::test]
    async fn test_search_interactive_by_name() {
        let mut store = products_store().await;
        store.insert(&product("ballpen", 1500, 10, 1)).await.unwrap();
        store.insert(&product("pencil case", 800, 4, 2)).await.unwrap();
        store.insert(&product("eraser", 100, 50, 3)).await.unwrap();

        let mut session = console("2\npen\n");
        search_interactive(&mut store, &mut session).await.unwrap();
        let output = text(session);

        assert!(output.contains("ballpen"));
        assert!(output.contains("pencil case"));
        assert!(!output.contains("eraser"));
        assert!(output.contains("Total: 2 row(s)"));
    }

    #[tokio::test]
    async fn test_search_interactive_no_results() {
        let mut store = books_store().await;
        store.insert(&book("Dune", "9780441013593")).await.unwrap();

        let mut session = console("3\n0000000000\n");
        search_interactive(&mut store, &mut session).await.unwrap();
        assert!(text(session).contains("No results found."));
    }

    #[tokio::test]
    async fn test_list_command_json() {
        let mut store = books_store().await;
        store.insert(&book("Dune", "9780441013593")).await.unwrap();

        let args = ListArgs {
            sort: Some(SortColumn::Title),
            desc: false,
            top: false,
            format: Some(ListFormat::Json),
        };
        let mut out = Vec::new();
        handle_list_command(&mut store, &args, &mut out).await.unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json[0]["name"], "Dune");
        assert_eq!(json[0]["code"], "9780441013593");
    }

    #[tokio::test]
    async fn test_list_command_rejects_price_sort_for_books() {
        let mut store = books_store().await;
        let args = ListArgs {
            sort: Some(SortColumn::Price),
            desc: true,
            top: false,
            format: None,
        };
        let mut out = Vec::new();
        let err = handle_list_command(&mut store, &args, &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Input(_)));
    }

    #[tokio::test]
    async fn test_search_command_by_code() {
        colored::control::set_override(false);
        let mut store = products_store().await;
        store.insert(&product("ballpen", 1500, 10, 1234)).await.unwrap();

        let args = SearchArgs {
            by: SearchBy {
                id: None,
                name: None,
                code: Some("1234".to_string()),
            },
            format: None,
        };
        let mut out = Vec::new();
        handle_search_command(&mut store, &args, &mut out).await.unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("ballpen"));
        assert!(output.contains("Total: 1 row(s)"));
    }
}
