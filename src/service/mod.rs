mod error;
#[cfg(test)]
pub mod fake;

pub use error::ConnectError;
pub use error::DisconnectError;
pub use error::FetchError;
pub use error::MutationError;
pub use error::ServiceError;

use crate::mailbox::{MailboxRecord, PrincipalId};

/// Remote directory/mailbox service the console talks to.
pub trait MailboxService {
    type Session: MailboxSession;

    async fn connect(&self) -> Result<Self::Session, ConnectError>;
}

/// An established session with the remote service.
pub trait MailboxSession {
    /// Only records flagged as directory synced are returned.
    async fn list_synced_mailboxes(&mut self) -> Result<Vec<MailboxRecord>, FetchError>;

    async fn set_cloud_managed(
        &mut self,
        principal_id: &PrincipalId,
        value: bool,
    ) -> Result<(), MutationError>;

    async fn disconnect(self) -> Result<(), DisconnectError>;
}
