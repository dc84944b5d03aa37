use log::debug;
use serde::Deserialize;

use crate::mailbox::{MailboxRecord, PrincipalId};

/// A mailbox as projected by the listing script.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteMailbox {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    primary_smtp_address: Option<String>,
    #[serde(default)]
    identity: Option<String>,
    #[serde(default)]
    is_exchange_cloud_managed: bool,
    #[serde(default)]
    is_dir_synced: bool,
}

impl RemoteMailbox {
    /// Keeps directory synced mailboxes with a usable identity.
    pub fn into_synced_record(self) -> Option<MailboxRecord> {
        if !self.is_dir_synced {
            debug!(
                "skipping cloud only mailbox {}",
                self.display_name.as_deref().unwrap_or_default()
            );
            return None;
        }
        let Some(principal_id) = self
            .identity
            .and_then(|identity| PrincipalId::try_from(identity).ok())
        else {
            debug!(
                "skipping mailbox {} without identity",
                self.display_name.as_deref().unwrap_or_default()
            );
            return None;
        };

        Some(MailboxRecord::new(
            self.display_name.unwrap_or_default(),
            self.primary_smtp_address.unwrap_or_default(),
            principal_id,
            self.is_exchange_cloud_managed,
            true,
        ))
    }
}
