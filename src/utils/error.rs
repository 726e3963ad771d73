use crate::utils::output::OutputStyle;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Duplicate key: {0} already exists")]
    DuplicateKey(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Input closed")]
    EndOfInput,
}

/// Result type alias for consistent error handling across the application
pub type AppResult<T> = Result<T, AppError>;

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

pub enum FlowResult {
    NotFound {
        item_type: String,
        search_term: String,
    },
    EmptyList {
        item_type: String,
    },
    Warning(String),
    Success(String),
}

/// Print an error on the console without ending the session.
pub fn write_error<W: Write>(out: &mut W, err: &AppError) -> io::Result<()> {
    match err {
        AppError::DuplicateKey(_) | AppError::Input(_) => {
            writeln!(out, "⚠️  {}", OutputStyle::warning(&err.to_string()))
        }
        _ => writeln!(out, "❌ {}", OutputStyle::error(&err.to_string())),
    }
}

pub fn handle_flow<W: Write>(out: &mut W, flow: FlowResult) -> io::Result<()> {
    match flow {
        FlowResult::NotFound {
            item_type,
            search_term,
        } => {
            let msg = format!("{} '{}' not found", item_type, search_term);
            writeln!(out, "⚠️  {}", OutputStyle::warning(&msg))
        }
        FlowResult::EmptyList { item_type } => {
            let msg = format!("No {} found.", item_type);
            writeln!(out, "{}", OutputStyle::muted(&msg))
        }
        FlowResult::Warning(msg) => writeln!(out, "⚠️  {}", OutputStyle::warning(&msg)),
        FlowResult::Success(msg) => writeln!(out, "✅ {}", OutputStyle::success(&msg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_messages() {
        colored::control::set_override(false);
        let mut out = Vec::new();

        handle_flow(
            &mut out,
            FlowResult::NotFound {
                item_type: "Product".to_string(),
                search_term: "42".to_string(),
            },
        )
        .unwrap();
        handle_flow(
            &mut out,
            FlowResult::EmptyList {
                item_type: "results".to_string(),
            },
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Product '42' not found"));
        assert!(text.contains("No results found."));
    }

    #[test]
    fn test_io_error_conversion() {
        let err: AppError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed").into();
        assert_eq!(err, AppError::Io("pipe closed".to_string()));
    }
}
