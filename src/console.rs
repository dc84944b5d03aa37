use std::{fmt::Display, mem, num::NonZeroUsize};

use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    batch::{BatchEvent, BatchResult, apply_batch},
    mailbox::{Intent, PrincipalId},
    roster::{Page, Roster},
    service::{
        ConnectError, DisconnectError, FetchError, MailboxService, MailboxSession, MutationError,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}

#[derive(Debug)]
enum Connection<T> {
    Disconnected,
    Connecting,
    Connected(T),
}

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("not connected")]
    NotConnected,
    #[error("a connection attempt is already in progress")]
    ConnectInProgress,
    #[error("no mailboxes selected")]
    EmptySelection,
    #[error(transparent)]
    Connect(#[from] ConnectError),
    #[error(transparent)]
    Disconnect(#[from] DisconnectError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
}

/// Owns the session with the remote service and the roster fetched through it.
///
/// Every roster or remote operation is only allowed while connected.
pub struct Console<S: MailboxService> {
    service: S,
    connection: Connection<S::Session>,
    roster: Roster,
}

impl<S: MailboxService> Console<S> {
    pub fn new(service: S, page_size: NonZeroUsize) -> Self {
        Self {
            service,
            connection: Connection::Disconnected,
            roster: Roster::new(page_size),
        }
    }

    /// Available in every state, unlike the roster itself.
    pub fn page_size(&self) -> NonZeroUsize {
        self.roster.page_size()
    }

    pub fn state(&self) -> ConnectionState {
        match self.connection {
            Connection::Disconnected => ConnectionState::Disconnected,
            Connection::Connecting => ConnectionState::Connecting,
            Connection::Connected(_) => ConnectionState::Connected,
        }
    }

    pub async fn connect(&mut self) -> Result<(), ConsoleError> {
        match self.connection {
            Connection::Connecting => return Err(ConsoleError::ConnectInProgress),
            Connection::Connected(_) => {
                debug!("already connected");
                return Ok(());
            }
            Connection::Disconnected => {}
        }

        self.connection = Connection::Connecting;
        match self.service.connect().await {
            Ok(session) => {
                self.connection = Connection::Connected(session);
                Ok(())
            }
            Err(error) => {
                warn!("{error}");
                self.connection = Connection::Disconnected;
                Err(error.into())
            }
        }
    }

    /// Always ends disconnected with an empty roster, even if the remote side
    /// reports an error.
    pub async fn disconnect(&mut self) -> Result<(), ConsoleError> {
        let previous = mem::replace(&mut self.connection, Connection::Disconnected);
        self.roster.clear();
        if let Connection::Connected(session) = previous {
            session.disconnect().await?;
            info!("disconnected");
        }
        Ok(())
    }

    /// Replaces the roster with a fresh listing. A failed fetch keeps the old one.
    pub async fn refresh(&mut self) -> Result<usize, ConsoleError> {
        let Connection::Connected(session) = &mut self.connection else {
            return Err(ConsoleError::NotConnected);
        };
        let records = session.list_synced_mailboxes().await?;
        self.roster.replace(records);
        info!("loaded {} directory synced mailboxes", self.roster.len());
        Ok(self.roster.len())
    }

    pub fn roster(&self) -> Result<&Roster, ConsoleError> {
        match self.connection {
            Connection::Connected(_) => Ok(&self.roster),
            _ => Err(ConsoleError::NotConnected),
        }
    }

    pub fn current(&self) -> Result<Page<'_>, ConsoleError> {
        Ok(self.roster()?.current())
    }

    pub fn go_to(&mut self, page_number: usize) -> Result<Page<'_>, ConsoleError> {
        self.roster()?;
        self.roster.go_to(page_number);
        Ok(self.roster.current())
    }

    pub fn advance(&mut self, delta: isize) -> Result<Page<'_>, ConsoleError> {
        self.roster()?;
        self.roster.advance_page(delta);
        Ok(self.roster.current())
    }

    /// Runs one batch over the records with the given ids.
    ///
    /// Ids that are not part of the roster are skipped. If nothing is left to
    /// convert no remote call is made.
    pub async fn convert(
        &mut self,
        ids: &[PrincipalId],
        intent: Intent,
        progress: Option<mpsc::UnboundedSender<BatchEvent>>,
    ) -> Result<BatchResult, ConsoleError> {
        let Connection::Connected(session) = &mut self.connection else {
            return Err(ConsoleError::NotConnected);
        };
        let selection = self.roster.select_mut(ids);
        for id in &selection.missing {
            warn!("{id} is not in the current snapshot, skipping");
        }
        if selection.records.is_empty() {
            return Err(ConsoleError::EmptySelection);
        }

        let result = apply_batch(
            selection.records,
            intent,
            async |id: &PrincipalId, value: bool| -> Result<(), MutationError> {
                session.set_cloud_managed(id, value).await
            },
            progress,
        )
        .await;
        info!("{result}");

        Ok(result)
    }

    /// Sets a single mailbox, whether or not it is part of the roster.
    pub async fn set_one(&mut self, id: &PrincipalId, intent: Intent) -> Result<(), ConsoleError> {
        let Connection::Connected(session) = &mut self.connection else {
            return Err(ConsoleError::NotConnected);
        };
        session.set_cloud_managed(id, intent.value()).await?;
        info!("{id} set to {intent}");
        if !self.roster.apply_local_update(id, intent.value()) {
            debug!("{id} not in roster, refresh to see it");
        }
        Ok(())
    }
}
