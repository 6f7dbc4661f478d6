pub mod auth;
pub mod error;
pub mod finances;
pub mod harmony;
pub mod itineraries;
pub mod memories;
pub mod messages;
pub mod profiles;
pub mod requests;
pub mod storage;
pub mod summary;
pub mod tasks;
pub mod uploads;
pub mod visions;

use std::sync::Arc;

use tandem_db::Database;
use tandem_gateway::dispatcher::Dispatcher;

use crate::harmony::Harmony;
use crate::storage::Storage;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    /// Shared with gateway connections, which identify clients against it.
    pub db: Arc<Database>,
    pub dispatcher: Dispatcher,
    pub storage: Storage,
    pub harmony: Harmony,
}

/// Run a blocking DB closure off the async runtime and fold both the
/// join error and the query error into an ApiError.
pub(crate) async fn blocking<T: Send + 'static>(
    f: impl FnOnce() -> anyhow::Result<T> + Send + 'static,
) -> Result<T, error::ApiError> {
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            tracing::error!("spawn_blocking join error: {}", e);
            error::ApiError::Internal(anyhow::anyhow!("blocking task failed: {e}"))
        })?
        .map_err(error::ApiError::from)
}
