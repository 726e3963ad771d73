// Interactive menu - read a choice, dispatch to a handler, repeat

use std::io::{BufRead, Write};
use tracing::{debug, warn};

use crate::core::traits::RecordStore;
use crate::manager::{crud, query};
use crate::utils::error::{AppError, AppResult, write_error};
use crate::utils::{Console, OutputStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Update,
    Delete,
    Search,
    List,
    Quit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::Add,
        MenuChoice::Update,
        MenuChoice::Delete,
        MenuChoice::Search,
        MenuChoice::List,
        MenuChoice::Quit,
    ];

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Add),
            "2" => Some(MenuChoice::Update),
            "3" => Some(MenuChoice::Delete),
            "4" => Some(MenuChoice::Search),
            "5" => Some(MenuChoice::List),
            "6" => Some(MenuChoice::Quit),
            _ => None,
        }
    }

    fn label(self, record: &str) -> String {
        match self {
            MenuChoice::Add => format!("Add a {}", record),
            MenuChoice::Update => format!("Update a {}", record),
            MenuChoice::Delete => format!("Delete a {}", record),
            MenuChoice::Search => format!("Search {}s", record),
            MenuChoice::List => format!("List {}s (sort / limit)", record),
            MenuChoice::Quit => "Quit".to_string(),
        }
    }
}

fn print_menu<R: BufRead, W: Write>(console: &mut Console<R, W>, record: &str) -> AppResult<()> {
    console.say("")?;
    console.say(&OutputStyle::title(&format!("{} manager", capitalize(record))).to_string())?;
    console.say(&OutputStyle::separator())?;
    for (i, choice) in MenuChoice::ALL.iter().enumerate() {
        console.say(&format!("{}. {}", i + 1, choice.label(record)))?;
    }
    console.say(&OutputStyle::separator())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Run the menu until the user quits or input runs out.
///
/// Statement errors from a handler are reported and the menu is shown
/// again. Console I/O errors end the loop and are returned.
pub async fn run_menu<S: RecordStore, R: BufRead, W: Write>(
    store: &mut S,
    console: &mut Console<R, W>,
) -> AppResult<()> {
    let record = store.table().record_label();

    loop {
        print_menu(console, record)?;

        let input = match console.prompt_input("Select >>> ") {
            Ok(input) => input,
            Err(AppError::EndOfInput) => break,
            Err(e) => return Err(e),
        };

        let Some(choice) = MenuChoice::parse(&input) else {
            let msg = format!("Invalid choice '{}', enter a number from 1 to 6", input);
            console.say(&format!("❌ {}", OutputStyle::error(&msg)))?;
            continue;
        };
        debug!(?choice, "menu selection");

        let result = match choice {
            MenuChoice::Add => crud::add_interactive(store, console).await,
            MenuChoice::Update => crud::update_interactive(store, console).await,
            MenuChoice::Delete => crud::delete_interactive(store, console).await,
            MenuChoice::Search => query::search_interactive(store, console).await,
            MenuChoice::List => query::list_interactive(store, console).await,
            MenuChoice::Quit => break,
        };

        match result {
            Ok(()) => {}
            Err(AppError::EndOfInput) => break,
            Err(e @ AppError::Io(_)) => return Err(e),
            Err(e) => {
                warn!(?choice, error = %e, "command failed");
                write_error(console.output(), &e)?;
            }
        }
    }

    console.say(&OutputStyle::muted("Goodbye.").to_string())
}
