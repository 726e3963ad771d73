pub mod error;
pub mod format;
pub mod interactive;
pub mod logging;
pub mod output;

pub use error::{AppError, AppResult};
pub use interactive::Console;
pub use output::OutputStyle;
