// Command handlers and the interactive menu
pub mod crud; // add, update, delete
pub mod menu; // interactive dispatcher
pub mod query; // list, sorted list, search

use std::io::{BufRead, Write};

use crate::core::data::{BusinessKey, TableKind};
use crate::utils::error::{AppError, AppResult};
use crate::utils::Console;

pub(crate) fn prompt_key<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    table: TableKind,
    prompt: &str,
) -> AppResult<BusinessKey> {
    console.prompt_with(prompt, |input| table.parse_key(input))
}

pub(crate) fn parse_key_arg(table: TableKind, raw: &str) -> AppResult<BusinessKey> {
    table.parse_key(raw).map_err(AppError::Input)
}
