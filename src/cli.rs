use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::PathBuf;

use crate::config::DEFAULT_SECTION;
use crate::core::data::{SortColumn, TableKind};
use crate::core::traits::RecordStore;
use crate::manager::{crud, menu, query};
use crate::utils::error::AppResult;
use crate::utils::Console;

#[derive(Parser)]
#[command(name = "recordstore")]
#[command(about = "Manage product and book records in a SQL table")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, value_name = "NAME", default_value = DEFAULT_SECTION, help = "Config section holding the connection settings")]
    pub section: String,

    #[arg(short, long, value_enum, help = "Table to manage (overrides config)")]
    pub table: Option<TableKind>,

    #[arg(short, long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Commands {
    pub async fn execute<S: RecordStore>(self, store: &mut S) -> AppResult<()> {
        let mut stdout = io::stdout();
        match self {
            Commands::Menu => {
                let mut console = Console::stdio();
                menu::run_menu(store, &mut console).await?;
            }
            Commands::List(args) => {
                query::handle_list_command(store, &args, &mut stdout).await?;
            }
            Commands::Search(args) => {
                query::handle_search_command(store, &args, &mut stdout).await?;
            }
            Commands::Add(args) => {
                crud::handle_add_command(store, &args, &mut stdout).await?;
            }
            Commands::Update(args) => {
                crud::handle_update_command(store, &args, &mut stdout).await?;
            }
            Commands::Delete(args) => {
                crud::handle_delete_command(store, &args, &mut stdout).await?;
            }
        }
        Ok(())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive menu (default)
    Menu,

    /// List records, optionally sorted
    List(ListArgs),

    /// Search records by ID, name or code
    Search(SearchArgs),

    /// Add a record
    Add(AddArgs),

    /// Update fields of a record by ID
    Update(UpdateArgs),

    /// Delete a record by ID
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short, long, value_enum)]
    pub sort: Option<SortColumn>,

    #[arg(long, help = "Sort in descending order")]
    pub desc: bool,

    #[arg(long, help = "Show only the first 10 rows")]
    pub top: bool,

    #[arg(short, long, value_enum)]
    pub format: Option<ListFormat>,
}

#[derive(Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub by: SearchBy,

    #[arg(short, long, value_enum)]
    pub format: Option<ListFormat>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct SearchBy {
    #[arg(long)]
    pub id: Option<i64>,

    #[arg(long, help = "Match names containing this text")]
    pub name: Option<String>,

    #[arg(long, help = "Product code or ISBN")]
    pub code: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(short, long, help = "Product name or book title")]
    pub name: String,

    #[arg(short, long)]
    pub price: Option<i64>,

    #[arg(short, long)]
    pub stock: Option<i64>,

    #[arg(short, long, help = "Product code or ISBN")]
    pub code: String,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(help = "ID of the record to update")]
    pub id: i64,

    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub price: Option<i64>,

    #[arg(short, long)]
    pub stock: Option<i64>,

    #[arg(short, long)]
    pub code: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[arg(help = "ID of the record to delete")]
    pub id: i64,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ListFormat {
    #[default]
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_menu() {
        let cli = Cli::try_parse_from(["recordstore"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.section, "mysql");
        assert!(cli.table.is_none());
    }

    #[test]
    fn test_list_args() {
        let cli = Cli::try_parse_from([
            "recordstore", "--table", "products", "list", "--sort", "stock", "--desc", "--top",
        ])
        .unwrap();

        assert_eq!(cli.table, Some(TableKind::Products));
        match cli.command {
            Some(Commands::List(args)) => {
                assert_eq!(args.sort, Some(SortColumn::StockQuantity));
                assert!(args.desc);
                assert!(args.top);
                assert!(args.format.is_none());
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_search_requires_exactly_one_criterion() {
        assert!(Cli::try_parse_from(["recordstore", "search"]).is_err());
        assert!(Cli::try_parse_from(["recordstore", "search", "--id", "1", "--name", "pen"]).is_err());

        let cli = Cli::try_parse_from(["recordstore", "search", "--name", "pen"]).unwrap();
        match cli.command {
            Some(Commands::Search(args)) => {
                assert_eq!(args.by.name.as_deref(), Some("pen"));
                assert!(args.by.id.is_none());
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_update_args() {
        let cli = Cli::try_parse_from(["recordstore", "update", "37", "--name", "The Giant Book of Poetry"])
            .unwrap();
        match cli.command {
            Some(Commands::Update(args)) => {
                assert_eq!(args.id, 37);
                assert_eq!(args.name.as_deref(), Some("The Giant Book of Poetry"));
                assert!(args.price.is_none());
            }
            _ => panic!("expected update command"),
        }
    }
}
