use std::{cell::RefCell, collections::HashSet, rc::Rc};

use crate::{
    mailbox::{MailboxRecord, PrincipalId},
    service::{
        ConnectError, DisconnectError, FetchError, MailboxService, MailboxSession, MutationError,
        ServiceError,
    },
};

#[derive(Debug, Default)]
pub struct FakeRemote {
    pub mailboxes: Vec<MailboxRecord>,
    pub failing: HashSet<PrincipalId>,
    pub refuse_connect: bool,
    pub refuse_fetch: bool,
    pub refuse_disconnect: bool,
    pub calls: Vec<(PrincipalId, bool)>,
    pub connects: usize,
    pub disconnects: usize,
}

/// In-memory stand-in for the remote service. Clones share one remote.
#[derive(Debug, Clone, Default)]
pub struct FakeService {
    pub remote: Rc<RefCell<FakeRemote>>,
}

impl FakeService {
    pub fn with_mailboxes(mailboxes: Vec<MailboxRecord>) -> Self {
        let service = Self::default();
        service.remote.borrow_mut().mailboxes = mailboxes;
        service
    }

    pub fn fail_for(&self, principal_id: &PrincipalId) {
        self.remote
            .borrow_mut()
            .failing
            .insert(principal_id.clone());
    }
}

#[derive(Debug)]
pub struct FakeSession {
    remote: Rc<RefCell<FakeRemote>>,
}

impl MailboxService for FakeService {
    type Session = FakeSession;

    async fn connect(&self) -> Result<Self::Session, ConnectError> {
        let mut remote = self.remote.borrow_mut();
        remote.connects += 1;
        if remote.refuse_connect {
            return Err(ServiceError::Unavailable("tenant unreachable".to_string()).into());
        }
        Ok(FakeSession {
            remote: Rc::clone(&self.remote),
        })
    }
}

impl MailboxSession for FakeSession {
    async fn list_synced_mailboxes(&mut self) -> Result<Vec<MailboxRecord>, FetchError> {
        let remote = self.remote.borrow();
        if remote.refuse_fetch {
            return Err(ServiceError::Remote("access denied".to_string()).into());
        }
        Ok(remote
            .mailboxes
            .iter()
            .filter(|mailbox| mailbox.directory_synced())
            .cloned()
            .collect())
    }

    async fn set_cloud_managed(
        &mut self,
        principal_id: &PrincipalId,
        value: bool,
    ) -> Result<(), MutationError> {
        let mut remote = self.remote.borrow_mut();
        remote.calls.push((principal_id.clone(), value));
        if remote.failing.contains(principal_id) {
            return Err(ServiceError::Remote(format!("{principal_id} is not writable")).into());
        }
        match remote
            .mailboxes
            .iter_mut()
            .find(|mailbox| mailbox.principal_id() == principal_id)
        {
            Some(mailbox) => {
                mailbox.set_cloud_managed(value);
                Ok(())
            }
            None => Err(ServiceError::Remote(format!("{principal_id} not found")).into()),
        }
    }

    async fn disconnect(self) -> Result<(), DisconnectError> {
        let mut remote = self.remote.borrow_mut();
        remote.disconnects += 1;
        if remote.refuse_disconnect {
            return Err(ServiceError::Unavailable("session already gone".to_string()).into());
        }
        Ok(())
    }
}
