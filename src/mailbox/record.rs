use derive_getters::Getters;
use serde::{Deserialize, Serialize};

use crate::mailbox::{Intent, PrincipalId};

/// One directory-synced mailbox as last seen on the remote service.
///
/// Everything but `cloud_managed` is treated as immutable snapshot data.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MailboxRecord {
    display_name: String,
    primary_address: String,
    principal_id: PrincipalId,
    #[getter(skip)]
    cloud_managed: bool,
    #[getter(skip)]
    directory_synced: bool,
}

impl MailboxRecord {
    pub fn new(
        display_name: String,
        primary_address: String,
        principal_id: PrincipalId,
        cloud_managed: bool,
        directory_synced: bool,
    ) -> Self {
        Self {
            display_name,
            primary_address,
            principal_id,
            cloud_managed,
            directory_synced,
        }
    }

    pub fn cloud_managed(&self) -> bool {
        self.cloud_managed
    }

    pub fn directory_synced(&self) -> bool {
        self.directory_synced
    }

    pub fn set_cloud_managed(&mut self, cloud_managed: bool) {
        self.cloud_managed = cloud_managed;
    }

    pub fn is_in_state(&self, intent: Intent) -> bool {
        self.cloud_managed == intent.value()
    }
}
