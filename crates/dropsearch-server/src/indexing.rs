//! Dry-run indexing sink

use async_trait::async_trait;
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;
use tracing::debug;

use dropsearch_core::{ConnectorError, IndexingService, PushItem, Result};

#[derive(Debug, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
enum IndexOperation<'a> {
    PushItem { name: &'a str, item: &'a PushItem },
    DeleteItem { name: &'a str },
}

/// Writes every indexing operation as one JSON line instead of calling a host
pub struct LoggingIndexingService<W: Write + Send> {
    out: Mutex<W>,
}

impl LoggingIndexingService<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> LoggingIndexingService<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, operation: &IndexOperation<'_>) -> Result<()> {
        let line = serde_json::to_string(operation)
            .map_err(|e| ConnectorError::indexing(format!("Failed to encode operation: {}", e)))?;

        let mut out = self
            .out
            .lock()
            .map_err(|_| ConnectorError::internal_error("Indexing output lock poisoned"))?;
        writeln!(out, "{}", line)
            .map_err(|e| ConnectorError::indexing(format!("Failed to write operation: {}", e)))
    }
}

#[async_trait]
impl<W: Write + Send + 'static> IndexingService for LoggingIndexingService<W> {
    async fn push_item(&self, name: &str, item: &PushItem) -> Result<()> {
        debug!("push_item {}", name);
        self.write(&IndexOperation::PushItem { name, item })
    }

    async fn delete_item(&self, name: &str) -> Result<()> {
        debug!("delete_item {}", name);
        self.write(&IndexOperation::DeleteItem { name })
    }
}
