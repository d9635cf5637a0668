//! Read-only access to the audit sheet snapshot.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use crate::audit::AuditTable;
use crate::fetch::{BasicClient, HttpClient, fetch_bytes, sheet_export_url};
use crate::parser::parse_audit_csv;

/// Abstraction over where audit rows come from (published sheet, local
/// export, ...). Every call returns a fresh snapshot.
#[async_trait]
pub trait AuditSource: Send + Sync {
    async fn snapshot(&self) -> Result<AuditTable>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

#[async_trait]
impl AuditSource for Box<dyn AuditSource> {
    async fn snapshot(&self) -> Result<AuditTable> {
        (**self).snapshot().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// A published spreadsheet fetched as CSV over HTTP.
pub struct SheetSource<C> {
    client: C,
    url: String,
}

impl<C: HttpClient> SheetSource<C> {
    pub fn new(client: C, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn from_sheet_id(client: C, sheet_id: &str) -> Self {
        Self::new(client, sheet_export_url(sheet_id))
    }
}

#[async_trait]
impl<C: HttpClient> AuditSource for SheetSource<C> {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn snapshot(&self) -> Result<AuditTable> {
        let bytes = fetch_bytes(&self.client, &self.url)
            .await
            .with_context(|| format!("failed to fetch audit sheet from {}", self.url))?;
        info!(bytes = bytes.len(), "Audit sheet downloaded");
        parse_audit_csv(&bytes)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// A CSV export saved on disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AuditSource for FileSource {
    async fn snapshot(&self) -> Result<AuditTable> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        parse_audit_csv(&bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Resolves a CLI source argument: an `http(s)` URL, an existing file, or
/// otherwise a published sheet identifier.
pub fn source_from_arg(arg: &str) -> Result<Box<dyn AuditSource>> {
    if arg.starts_with("http://") || arg.starts_with("https://") {
        Ok(Box::new(SheetSource::new(BasicClient::new()?, arg)))
    } else if std::path::Path::new(arg).is_file() {
        Ok(Box::new(FileSource::new(arg)))
    } else {
        Ok(Box::new(SheetSource::from_sheet_id(BasicClient::new()?, arg)))
    }
}
