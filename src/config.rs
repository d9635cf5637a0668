//! Dashboard settings loaded from an optional JSON file.
//!
//! ```json
//! {
//!   "sheet_id": "1fQk...",
//!   "refresh_secs": 60,
//!   "cache_ttl_secs": 60,
//!   "output": "reporte_5s_ejecutivo.html",
//!   "logo": "EA_2.png",
//!   "score_aliases": { "sí cumple": "complies", "complies": "complies" }
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::DEFAULT_SHEET_ID;
use crate::score::{Response, ScoreMap};

pub const DEFAULT_REFRESH_SECS: u64 = 60;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;
pub const DEFAULT_OUTPUT: &str = "reporte_5s_ejecutivo.html";
pub const SHEET_ID_ENV: &str = "FIVES_SHEET_ID";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub sheet_id: String,
    pub refresh_secs: u64,
    pub cache_ttl_secs: u64,
    pub output: PathBuf,
    pub logo: Option<PathBuf>,
    pub score_aliases: BTreeMap<String, Response>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sheet_id: DEFAULT_SHEET_ID.to_string(),
            refresh_secs: DEFAULT_REFRESH_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            output: PathBuf::from(DEFAULT_OUTPUT),
            logo: None,
            score_aliases: BTreeMap::new(),
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        Self::from_json(&content).with_context(|| format!("invalid config file {path}"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Config file if given, else defaults; `FIVES_SHEET_ID` then
    /// overrides the sheet identifier.
    pub fn resolve(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        if let Ok(id) = std::env::var(SHEET_ID_ENV) {
            if !id.trim().is_empty() {
                config.sheet_id = id.trim().to_string();
            }
        }
        Ok(config)
    }

    pub fn score_map(&self) -> ScoreMap {
        ScoreMap::default().with_aliases(
            self.score_aliases
                .iter()
                .map(|(alias, response)| (alias.as_str(), *response)),
        )
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
