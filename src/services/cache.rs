//! Time-boxed memo of the last audit snapshot.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::audit_source::AuditSource;
use crate::audit::AuditTable;

/// Wraps a source and serves its last snapshot until `ttl` has elapsed.
///
/// Holds at most one entry. Entries expire purely by age; failed fetches
/// are not cached.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    entry: Mutex<Option<(Instant, AuditTable)>>,
}

impl<S: AuditSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entry: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<S: AuditSource> AuditSource for CachedSource<S> {
    async fn snapshot(&self) -> Result<AuditTable> {
        let mut entry = self.entry.lock().await;

        if let Some((fetched_at, table)) = entry.as_ref() {
            if fetched_at.elapsed() < self.ttl {
                debug!(age_ms = fetched_at.elapsed().as_millis() as u64, "Serving cached audit sheet");
                return Ok(table.clone());
            }
        }

        let table = self.inner.snapshot().await?;
        *entry = Some((Instant::now(), table.clone()));
        Ok(table)
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}
