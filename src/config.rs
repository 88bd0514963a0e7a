use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entities::column::ColumnDescriptor;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_LENGTH: i64 = 10;
pub const DEFAULT_PAGE_PATH: &str = "/";

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub records_url: Option<String>,
    pub timeout: Option<u64>,
    pub page_length: Option<i64>,
    pub page_path: Option<String>,
    pub state_db: Option<String>,
    pub additional_criteria: Option<Map<String, Value>>,
    pub columns: Option<Vec<String>>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub url: String,
    pub records_url: Option<String>,
    pub timeout: Duration,
    pub page_length: i64,
    pub page_path: String,
    pub state_db: Option<PathBuf>,
    pub additional_criteria: Map<String, Value>,
    pub columns: Vec<ColumnDescriptor>,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "hellhbbd", "grid-pager")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.yml"))
}

pub fn default_state_db_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join("grid-state.sqlite"))
}

pub fn parse_config(contents: &str) -> Result<ConfigFile> {
    serde_yaml::from_str::<ConfigFile>(contents).context("invalid config yaml")
}

/// Reads a config file. A missing file yields the defaults only when
/// `allow_missing` is set, which is the case for the default location.
pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents)
            .with_context(|| format!("failed to parse config '{}'", path.display())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(err) => {
            Err(err).with_context(|| format!("failed to read config '{}'", path.display()))
        }
    }
}

impl ConfigFile {
    pub fn resolve(self) -> Result<Settings> {
        let url = self
            .url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| anyhow!("an id-list url is required"))?;

        let page_length = self.page_length.unwrap_or(DEFAULT_PAGE_LENGTH);
        if page_length == 0 || page_length < -1 {
            anyhow::bail!("page_length must be positive or -1, got {page_length}");
        }

        let state_db = match self.state_db {
            Some(path) if path.trim().is_empty() => None,
            Some(path) => Some(PathBuf::from(path)),
            None => default_state_db_path().ok(),
        };

        Ok(Settings {
            url,
            records_url: self.records_url.filter(|url| !url.trim().is_empty()),
            timeout: Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            page_length,
            page_path: self
                .page_path
                .unwrap_or_else(|| DEFAULT_PAGE_PATH.to_string()),
            state_db,
            additional_criteria: self.additional_criteria.unwrap_or_default(),
            columns: self
                .columns
                .unwrap_or_default()
                .into_iter()
                .map(ColumnDescriptor::new)
                .collect(),
        })
    }
}
