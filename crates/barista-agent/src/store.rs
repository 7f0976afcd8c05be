//! Flat-file order persistence.

use crate::error::AgentError;
use barista_types::OrderRecord;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Directory orders are written to when nothing else is configured.
pub const DEFAULT_ORDERS_DIR: &str = "orders";

/// Builds the file name for an order saved by `name` at `saved_at`:
/// `<name>_<YYYYMMDD_HHMMSS>.json`.
///
/// Path separators in the name are replaced so the file always lands
/// directly inside the orders directory.
pub fn order_file_name(name: &str, saved_at: DateTime<Local>) -> String {
    let safe_name: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect();
    format!("{}_{}.json", safe_name, saved_at.format("%Y%m%d_%H%M%S"))
}

/// Writes finalized orders as pretty-printed JSON files.
///
/// Two orders for the same name within the same second map to the same
/// file; the later write replaces the earlier one.
#[derive(Debug, Clone)]
pub struct OrderStore {
    dir: PathBuf,
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new(DEFAULT_ORDERS_DIR)
    }
}

impl OrderStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves `record` and returns the path of the written file.
    ///
    /// Creates the orders directory if needed. The customer name is taken
    /// from the record; callers only save complete orders.
    pub async fn save(
        &self,
        record: &OrderRecord,
        saved_at: DateTime<Local>,
    ) -> Result<PathBuf, AgentError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| AgentError::CreateDir {
                path: self.dir.clone(),
                source,
            })?;

        let name = record.name.as_deref().unwrap_or_default();
        let path = self.dir.join(order_file_name(name, saved_at));
        let json = serde_json::to_string_pretty(record)?;

        fs::write(&path, json)
            .await
            .map_err(|source| AgentError::Write {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), "order saved");
        Ok(path)
    }
}
