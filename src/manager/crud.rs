// Write operations - add, update, delete
// Each has an interactive form used by the menu and a flag-driven form used
// by the CLI subcommands.

use std::io::{BufRead, Write};
use tracing::info;

use crate::cli::{AddArgs, DeleteArgs, UpdateArgs};
use crate::core::data::{
    FieldChange, InsertOutcome, NewRecord, Record, TableKind, UpdateField, UpdateOutcome,
};
use crate::core::traits::RecordStore;
use crate::manager::{parse_key_arg, prompt_key};
use crate::utils::error::{AppError, AppResult, FlowResult, handle_flow};
use crate::utils::format::format_optional;
use crate::utils::output::{describe_update, write_record_summary};
use crate::utils::Console;

#[derive(Clone, Copy)]
enum Lookup {
    Id,
    Key,
}

fn prompt_new_record<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    table: TableKind,
) -> AppResult<NewRecord> {
    let name = console.prompt_non_empty(&format!("Enter the {} >>> ", table.name_label()))?;

    let (price, stock_quantity) = if table.has_inventory() {
        let price = console.prompt_parsed::<i64>("Enter the price >>> ")?;
        let stock = console.prompt_parsed::<i64>("Enter the stock quantity >>> ")?;
        (Some(price), Some(stock))
    } else {
        (None, None)
    };

    let code = prompt_key(console, table, &format!("Enter the {} >>> ", table.key_label()))?;

    Ok(NewRecord {
        name,
        price,
        stock_quantity,
        code,
    })
}

/// Ask for the new value of one field. `None` means every field is replaced.
fn prompt_change<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    table: TableKind,
    field: UpdateField,
    current: &Record,
) -> AppResult<Option<FieldChange>> {
    let change = match field {
        UpdateField::Name => FieldChange::Name(console.prompt_non_empty(&format!(
            "New {} (current: {}) >>> ",
            table.name_label(),
            current.name
        ))?),
        UpdateField::Price => FieldChange::Price(console.prompt_parsed(&format!(
            "New price (current: {}) >>> ",
            format_optional(current.price)
        ))?),
        UpdateField::StockQuantity => FieldChange::StockQuantity(console.prompt_parsed(&format!(
            "New stock quantity (current: {}) >>> ",
            format_optional(current.stock_quantity)
        ))?),
        UpdateField::Code => FieldChange::Code(prompt_key(
            console,
            table,
            &format!("New {} (current: {}) >>> ", table.key_label(), current.code),
        )?),
        UpdateField::All => return Ok(None),
    };
    Ok(Some(change))
}

fn reject_inventory_args(table: TableKind, price: Option<i64>, stock: Option<i64>) -> AppResult<()> {
    if !table.has_inventory() && (price.is_some() || stock.is_some()) {
        return Err(AppError::Input(format!(
            "{} have no price or stock quantity",
            table
        )));
    }
    Ok(())
}

fn report_insert<W: Write>(out: &mut W, table: TableKind, outcome: InsertOutcome) -> AppResult<()> {
    match outcome {
        InsertOutcome::Inserted(id) => {
            info!(%table, id, "record inserted");
            handle_flow(
                out,
                FlowResult::Success(format!("{} added (ID: {})", table.record_title(), id)),
            )?;
        }
        InsertOutcome::Duplicate(key) => {
            handle_flow(
                out,
                FlowResult::Warning(format!(
                    "{} {} already exists, use a different one",
                    table.key_label(),
                    key
                )),
            )?;
        }
    }
    Ok(())
}

fn report_update<W: Write>(
    out: &mut W,
    table: TableKind,
    id: i64,
    outcome: UpdateOutcome,
) -> AppResult<()> {
    let flow = match outcome {
        UpdateOutcome::Updated(_) => {
            info!(%table, id, "record updated");
            FlowResult::Success(describe_update(table, id, outcome))
        }
        UpdateOutcome::NotFound => FlowResult::NotFound {
            item_type: table.record_title().to_string(),
            search_term: id.to_string(),
        },
    };
    handle_flow(out, flow)?;
    Ok(())
}

fn report_delete<W: Write>(out: &mut W, table: TableKind, id: i64, deleted: u64) -> AppResult<()> {
    let flow = if deleted > 0 {
        info!(%table, id, deleted, "record deleted");
        FlowResult::Success(format!("Deleted {} row(s)", deleted))
    } else {
        FlowResult::Warning(format!(
            "Deleted 0 row(s): no {} with ID {}",
            table.record_label(),
            id
        ))
    };
    handle_flow(out, flow)?;
    Ok(())
}

// Create operations
pub async fn add_interactive<S: RecordStore, R: BufRead, W: Write>(
    store: &mut S,
    console: &mut Console<R, W>,
) -> AppResult<()> {
    let table = store.table();
    let record = prompt_new_record(console, table)?;
    let outcome = store.insert_unique(&record).await?;
    report_insert(console.output(), table, outcome)
}

pub async fn handle_add_command<S: RecordStore, W: Write>(
    store: &mut S,
    args: &AddArgs,
    out: &mut W,
) -> AppResult<()> {
    let table = store.table();
    reject_inventory_args(table, args.price, args.stock)?;

    let record = NewRecord {
        name: args.name.clone(),
        price: args.price,
        stock_quantity: args.stock,
        code: parse_key_arg(table, &args.code)?,
    };
    let outcome = store.insert_unique(&record).await?;
    report_insert(out, table, outcome)
}

// Update operations
pub async fn update_interactive<S: RecordStore, R: BufRead, W: Write>(
    store: &mut S,
    console: &mut Console<R, W>,
) -> AppResult<()> {
    let table = store.table();
    let key_title = UpdateField::Code.label(table);

    let lookup = console.select(
        &format!("Find the {} to update", table.record_label()),
        &[(Lookup::Id, "ID"), (Lookup::Key, key_title)],
        None,
    )?;

    let (found, search_term) = match lookup {
        Lookup::Id => {
            let id: i64 = console.prompt_parsed(&format!(
                "Enter the ID of the {} to update >>> ",
                table.record_label()
            ))?;
            (store.find_by_id(id).await?, id.to_string())
        }
        Lookup::Key => {
            let key = prompt_key(
                console,
                table,
                &format!("Enter the {} of the {} to update >>> ", table.key_label(), table.record_label()),
            )?;
            let term = key.to_string();
            (store.find_by_key(&key).await?, term)
        }
    };

    let Some(record) = found else {
        handle_flow(
            console.output(),
            FlowResult::NotFound {
                item_type: table.record_title().to_string(),
                search_term,
            },
        )?;
        return Ok(());
    };

    write_record_summary(console.output(), table, &record)?;

    let options: Vec<(UpdateField, &str)> = table
        .editable_fields()
        .iter()
        .map(|field| (*field, field.label(table)))
        .collect();
    let field = console.select("Field to change", &options, None)?;

    let outcome = match prompt_change(console, table, field, &record)? {
        Some(change) => store.update_field(record.id, &change).await?,
        None => {
            let values = prompt_new_record(console, table)?;
            store.update_all(record.id, &values).await?
        }
    };
    report_update(console.output(), table, record.id, outcome)
}

pub async fn handle_update_command<S: RecordStore, W: Write>(
    store: &mut S,
    args: &UpdateArgs,
    out: &mut W,
) -> AppResult<()> {
    let table = store.table();
    reject_inventory_args(table, args.price, args.stock)?;

    let mut changes = Vec::new();
    if let Some(name) = &args.name {
        changes.push(FieldChange::Name(name.clone()));
    }
    if let Some(price) = args.price {
        changes.push(FieldChange::Price(price));
    }
    if let Some(stock) = args.stock {
        changes.push(FieldChange::StockQuantity(stock));
    }
    if let Some(code) = &args.code {
        changes.push(FieldChange::Code(parse_key_arg(table, code)?));
    }

    let outcome = match changes.as_slice() {
        [] => {
            return Err(AppError::Input(
                "nothing to update, pass at least one field".to_string(),
            ));
        }
        [change] => store.update_field(args.id, change).await?,
        _ => {
            let Some(current) = store.find_by_id(args.id).await? else {
                return report_update(out, table, args.id, UpdateOutcome::NotFound);
            };
            let mut values = NewRecord::from(current);
            for change in changes {
                values.apply(change);
            }
            store.update_all(args.id, &values).await?
        }
    };
    report_update(out, table, args.id, outcome)
}

// Delete operations
pub async fn delete_interactive<S: RecordStore, R: BufRead, W: Write>(
    store: &mut S,
    console: &mut Console<R, W>,
) -> AppResult<()> {
    let table = store.table();
    let id: i64 = console.prompt_parsed(&format!(
        "Enter the ID of the {} to delete >>> ",
        table.record_label()
    ))?;
    let deleted = store.delete(id).await?;
    report_delete(console.output(), table, id, deleted)
}

pub async fn handle_delete_command<S: RecordStore, W: Write>(
    store: &mut S,
    args: &DeleteArgs,
    out: &mut W,
) -> AppResult<()> {
    let table = store.table();
    let deleted = store.delete(args.id).await?;
    report_delete(out, table, args.id, deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::BusinessKey;
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
    async fn test_add_interactive_reports_id_and_duplicates() {
        let mut store = products_store().await;

        let mut first = console("ballpen\n1500\n10\n1234\n");
        add_interactive(&mut store, &mut first).await.unwrap();
        assert!(text(first).contains("Product added (ID: 1)"));

        let mut second = console("pencil\nnine hundred\n900\n3\n1234\n");
        add_interactive(&mut store, &mut second).await.unwrap();
        let output = text(second);
        assert!(output.contains("'nine hundred' is not a valid number"));
        assert!(output.contains("code 1234 already exists"));

        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_interactive_by_code_changes_stock() {
        let mut store = products_store().await;
        let id = store.insert(&product("ballpen", 1500, 10, 1234)).await.unwrap();

        // lookup by code, pick "Stock quantity" (third option), enter 25
        let mut session = console("2\n1234\n3\n25\n");
        update_interactive(&mut store, &mut session).await.unwrap();
        let output = text(session);

        assert!(output.contains("ID 1 | name: ballpen, price: 1500, stock quantity: 10, code: 1234"));
        assert!(output.contains("Updated 1 row(s)"));
        let record = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(record.stock_quantity, Some(25));
    }

    #[tokio::test]
    async fn test_update_interactive_unknown_id() {
        let mut store = products_store().await;

        let mut session = console("1\n99\n");
        update_interactive(&mut store, &mut session).await.unwrap();
        assert!(text(session).contains("Product '99' not found"));
    }

    #[tokio::test]
    async fn test_update_interactive_all_fields_of_book() {
        let mut store = books_store().await;
        let id = store.insert(&book("Dune", "9780441013593")).await.unwrap();

        // lookup by ID, pick "All fields" (third option for books)
        let mut session = console(&format!("1\n{}\n3\nDune Messiah\n9780593098233\n", id));
        update_interactive(&mut store, &mut session).await.unwrap();
        assert!(text(session).contains("Updated 1 row(s)"));

        let record = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(record.name, "Dune Messiah");
        assert_eq!(record.code, BusinessKey::Text("9780593098233".to_string()));
    }

    #[tokio::test]
    async fn test_update_command_merges_several_fields() {
        let mut store = products_store().await;
        let id = store.insert(&product("ballpen", 1500, 10, 1234)).await.unwrap();

        let args = UpdateArgs {
            id,
            name: Some("gel pen".to_string()),
            price: Some(1800),
            stock: None,
            code: None,
        };
        let mut out = Vec::new();
        handle_update_command(&mut store, &args, &mut out).await.unwrap();

        let record = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(record.name, "gel pen");
        assert_eq!(record.price, Some(1800));
        assert_eq!(record.stock_quantity, Some(10));
        assert_eq!(record.code, BusinessKey::Numeric(1234));
    }

    #[tokio::test]
    async fn test_update_command_requires_a_field() {
        let mut store = products_store().await;
        let args = UpdateArgs {
            id: 1,
            name: None,
            price: None,
            stock: None,
            code: None,
        };
        let mut out = Vec::new();
        let err = handle_update_command(&mut store, &args, &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Input(_)));
    }

    #[tokio::test]
    async fn test_add_command_rejects_price_for_books() {
        let mut store = books_store().await;
        let args = AddArgs {
            name: "Dune".to_string(),
            price: Some(100),
            stock: None,
            code: "9780441013593".to_string(),
        };
        let mut out = Vec::new();
        let err = handle_add_command(&mut store, &args, &mut out).await.unwrap_err();
        assert!(matches!(err, AppError::Input(_)));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_affected_rows() {
        colored::control::set_override(false);
        let mut store = products_store().await;
        let id = store.insert(&product("ballpen", 1500, 10, 1234)).await.unwrap();

        let mut out = Vec::new();
        handle_delete_command(&mut store, &DeleteArgs { id }, &mut out)
            .await
            .unwrap();
        handle_delete_command(&mut store, &DeleteArgs { id }, &mut out)
            .await
            .unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Deleted 1 row(s)"));
        assert!(output.contains("Deleted 0 row(s): no product with ID 1"));
    }
}
