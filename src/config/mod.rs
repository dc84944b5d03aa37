mod mailflip;
mod tenant;

use std::{env, path::PathBuf};

use thiserror::Error;

pub use mailflip::Config;
pub use tenant::AuthConfig;
pub use tenant::TenantConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    NoConfigHome,
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("config file {path} is invalid: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("no tenant configured")]
    NoTenant,
    #[error("several tenants configured, pick one of {0}")]
    AmbiguousTenant(String),
    #[error("tenant {0} is not configured")]
    UnknownTenant(String),
}

fn config_home() -> Result<PathBuf, ConfigError> {
    if let Some(config_home) = env::var_os("XDG_CONFIG_HOME").filter(|home| !home.is_empty()) {
        return Ok(PathBuf::from(config_home));
    }
    let home = env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .ok_or(ConfigError::NoConfigHome)?;
    let mut config_home = PathBuf::from(home);
    config_home.push(".config");
    Ok(config_home)
}

fn default_location() -> Result<PathBuf, ConfigError> {
    let mut config_file = config_home()?;
    config_file.push(env!("CARGO_PKG_NAME"));
    config_file.push("config.toml");
    Ok(config_file)
}
