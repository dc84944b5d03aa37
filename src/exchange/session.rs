use log::{debug, info};
use serde_json::Value;

use crate::{
    config::{AuthConfig, TenantConfig},
    exchange::{
        ShellConnection,
        remote_mailbox::RemoteMailbox,
        script::{Login, Script},
    },
    mailbox::{MailboxRecord, PrincipalId},
    service::{
        ConnectError, DisconnectError, FetchError, MailboxService, MailboxSession, MutationError,
        ServiceError,
    },
};

/// Exchange Online, reached through the ExchangeOnlineManagement module.
#[derive(Debug, Clone)]
pub struct ExchangeOnline {
    shell: String,
    tenant: TenantConfig,
}

impl ExchangeOnline {
    pub fn new(shell: String, tenant: TenantConfig) -> Self {
        Self { shell, tenant }
    }
}

impl MailboxService for ExchangeOnline {
    type Session = ExchangeSession;

    async fn connect(&self) -> Result<Self::Session, ConnectError> {
        let password;
        let login = match self.tenant.auth() {
            AuthConfig::Interactive { user } => Login::Interactive { user },
            AuthConfig::Certificate { app_id, thumbprint } => {
                Login::Certificate { app_id, thumbprint }
            }
            AuthConfig::Password(auth) => {
                password = auth
                    .password()
                    .await
                    .map_err(|error| ServiceError::Unavailable(error.to_string()))?;
                Login::Password {
                    user: auth.user(),
                    password: &password,
                }
            }
        };

        let mut connection = ShellConnection::start(&self.shell).map_err(ServiceError::from)?;
        connection
            .send(&Script::connect(self.tenant.organization(), login))
            .await
            .map_err(ServiceError::from)?;
        info!("connected to {}", self.tenant.organization());

        Ok(ExchangeSession { connection })
    }
}

#[derive(Debug)]
pub struct ExchangeSession {
    connection: ShellConnection,
}

impl MailboxSession for ExchangeSession {
    async fn list_synced_mailboxes(&mut self) -> Result<Vec<MailboxRecord>, FetchError> {
        let data = self
            .connection
            .send(&Script::list_synced_mailboxes())
            .await
            .map_err(ServiceError::from)?;
        let records = decode_mailboxes(data)?;
        debug!("received {} directory synced mailboxes", records.len());
        Ok(records)
    }

    async fn set_cloud_managed(
        &mut self,
        principal_id: &PrincipalId,
        value: bool,
    ) -> Result<(), MutationError> {
        self.connection
            .send(&Script::set_cloud_managed(principal_id, value))
            .await
            .map_err(ServiceError::from)?;
        Ok(())
    }

    async fn disconnect(mut self) -> Result<(), DisconnectError> {
        let disconnected = self
            .connection
            .send(&Script::disconnect())
            .await
            .map_err(ServiceError::from);
        let closed = self.connection.close().await.map_err(ServiceError::from);
        disconnected?;
        closed?;
        Ok(())
    }
}

fn decode_mailboxes(data: Value) -> Result<Vec<MailboxRecord>, ServiceError> {
    let mailboxes: Vec<RemoteMailbox> = serde_json::from_value(data).map_err(|error| {
        ServiceError::Remote(format!("unexpected mailbox listing: {error}"))
    })?;

    Ok(mailboxes
        .into_iter()
        .filter_map(RemoteMailbox::into_synced_record)
        .collect())
}
