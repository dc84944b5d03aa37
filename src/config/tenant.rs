use std::io;

use derive_getters::Getters;
use serde::Deserialize;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Clone, Deserialize, Getters)]
pub struct TenantConfig {
    organization: String,
    auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthConfig {
    /// Browser based sign in as `user`.
    Interactive { user: String },
    /// App only sign in with a certificate from the user's store.
    Certificate { app_id: String, thumbprint: String },
    Password(PasswordAuthConfig),
}

#[derive(Debug, Clone, Deserialize, Getters)]
pub struct PasswordAuthConfig {
    user: String,
    #[getter(skip)]
    password_cmd: String,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password_cmd is empty")]
    EmptyCommand,
    #[error("password_cmd could not be run: {0}")]
    Io(#[from] io::Error),
    #[error("password_cmd exited with {0}")]
    Failed(std::process::ExitStatus),
    #[error("password_cmd produced no password")]
    NoPassword,
}

impl PasswordAuthConfig {
    pub async fn password(&self) -> Result<String, CredentialError> {
        let mut cmd_parts = self.password_cmd.split_whitespace();
        let mut cmd = Command::new(cmd_parts.next().ok_or(CredentialError::EmptyCommand)?);
        cmd.args(cmd_parts);
        let output = cmd.output().await?;
        if !output.status.success() {
            return Err(CredentialError::Failed(output.status));
        }

        let password = String::from_utf8_lossy(&output.stdout)
            .trim_end()
            .to_string();
        if password.is_empty() {
            Err(CredentialError::NoPassword)
        } else {
            Ok(password)
        }
    }
}
