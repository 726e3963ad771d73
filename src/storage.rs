use sqlx::Connection;
use sqlx::AnyConnection;
use tracing::{error, info};

use crate::config::ConnectionSettings;
use crate::utils::error::{AppError, AppResult};

/// Open the single database connection the client works with.
///
/// Failure is logged and returned; no retry is attempted.
pub async fn connect(settings: &ConnectionSettings) -> AppResult<AnyConnection> {
    sqlx::any::install_default_drivers();

    let url = settings.url()?;
    let target = settings.redacted_url();
    info!(%target, "connecting to database");

    match AnyConnection::connect(&url).await {
        Ok(conn) => {
            info!(%target, backend = conn.backend_name(), "connected");
            Ok(conn)
        }
        Err(err) => {
            error!(%target, error = %err, "failed to connect to database");
            Err(AppError::Database(format!("Could not connect to {}: {}", target, err)))
        }
    }
}
