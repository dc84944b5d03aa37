use std::{
    collections::BTreeMap,
    fs::read_to_string,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use derive_getters::Getters;
use log::debug;
use serde::Deserialize;

use crate::{
    config::{ConfigError, TenantConfig, default_location},
    roster::DEFAULT_PAGE_SIZE,
};

#[derive(Debug, Deserialize, Getters)]
pub struct Config {
    #[serde(default = "page_size")]
    #[getter(skip)]
    page_size: NonZeroUsize,
    #[serde(default = "shell")]
    shell: String,
    #[serde(default)]
    tenants: BTreeMap<String, TenantConfig>,
}

impl Config {
    pub fn load_from_file(file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = match file {
            Some(file) => file,
            None => default_location()?,
        };
        debug!("loading config from {}", path.display());
        let contents = read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&contents, &path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn override_page_size(&mut self, page_size: NonZeroUsize) {
        self.page_size = page_size;
    }

    /// Picks the named tenant, or the only one if no name is given.
    pub fn tenant(&self, name: Option<&str>) -> Result<(&str, &TenantConfig), ConfigError> {
        if let Some(name) = name {
            return self
                .tenants
                .get_key_value(name)
                .map(|(name, tenant)| (name.as_str(), tenant))
                .ok_or_else(|| ConfigError::UnknownTenant(name.to_string()));
        }
        let mut tenants = self.tenants.iter();
        match (tenants.next(), tenants.next()) {
            (None, _) => Err(ConfigError::NoTenant),
            (Some((name, tenant)), None) => Ok((name.as_str(), tenant)),
            (Some(_), Some(_)) => Err(ConfigError::AmbiguousTenant(
                self.tenants
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            )),
        }
    }
}

fn page_size() -> NonZeroUsize {
    DEFAULT_PAGE_SIZE
}

fn shell() -> String {
    "pwsh".to_string()
}
