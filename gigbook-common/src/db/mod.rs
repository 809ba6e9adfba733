//! Entity store: SQLite schema and queries
//!
//! Every write runs inside one transaction. On failure the transaction is
//! rolled back and the typed error is returned to the caller.

pub mod artists;
pub mod init;
pub mod models;
pub mod shows;
pub mod venues;

pub use init::*;
pub use models::*;

use sqlx::{Sqlite, Transaction};
use tracing::{error, warn};

/// Commit on success, roll back and pass the error through on failure
pub(crate) async fn finish<T>(
    tx: Transaction<'_, Sqlite>,
    outcome: crate::Result<T>,
    operation: &str,
) -> crate::Result<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            warn!("{} failed, rolling back: {}", operation, e);
            if let Err(rollback_err) = tx.rollback().await {
                error!("Rollback of {} failed: {}", operation, rollback_err);
            }
            Err(e)
        }
    }
}
