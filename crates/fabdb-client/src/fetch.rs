//! One-record lookups by identifier.

use crate::transport::Transport;
use fabdb_core::{decode_single, FabDbError, FromRecord, Result};
use tracing::debug;

/// Fetch and map the single entity at `path`
///
/// A 404 from the transport, or an empty payload, becomes
/// [`FabDbError::NotFound`]; every other failure is passed through.
pub(crate) async fn fetch_one<T: FromRecord>(transport: &dyn Transport, path: &str) -> Result<T> {
    debug!(path, kind = T::KIND, "fetching single entity");

    let payload = match transport.fetch(path, &[]).await {
        Err(FabDbError::Transport {
            status: Some(404), ..
        }) => {
            return Err(FabDbError::NotFound {
                resource: path.to_string(),
            })
        }
        other => other?,
    };

    let record = decode_single(payload, path)?;
    T::from_record(&record)
}
