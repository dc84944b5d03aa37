use std::fmt::Display;

use jiff::{SignedDuration, Timestamp};
use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::{
    mailbox::{Intent, MailboxRecord, PrincipalId},
    service::MutationError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub principal_id: PrincipalId,
    pub display_name: String,
    pub error: String,
}

/// Outcome of one batch. `success_count + failures.len()` equals the batch size.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub intent: Intent,
    pub success_count: usize,
    pub failures: Vec<BatchFailure>,
    pub started: Timestamp,
    pub finished: Timestamp,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.success_count + self.failures.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn elapsed(&self) -> SignedDuration {
        self.finished.duration_since(self.started)
    }
}

impl Display for BatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} mailboxes set to {} ({} failed) in {:.1}s",
            self.success_count,
            self.total(),
            self.intent,
            self.failures.len(),
            self.elapsed().as_secs_f64()
        )
    }
}

/// Progress notification for a single processed record.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEvent {
    pub position: usize,
    pub total: usize,
    pub principal_id: PrincipalId,
    pub display_name: String,
    pub outcome: Result<(), String>,
}

/// Applies `intent` to every record, strictly one after another.
///
/// `mutate` is called exactly once per record, in iteration order. A failing
/// record is recorded in [`BatchResult::failures`] and keeps its flag, every
/// other record gets its flag updated as soon as the remote call returns.
/// Progress events go to `progress` if given; a closed receiver is ignored.
pub async fn apply_batch<'r, I, M>(
    records: I,
    intent: Intent,
    mut mutate: M,
    progress: Option<mpsc::UnboundedSender<BatchEvent>>,
) -> BatchResult
where
    I: IntoIterator<Item = &'r mut MailboxRecord>,
    M: AsyncFnMut(&PrincipalId, bool) -> Result<(), MutationError>,
{
    let records: Vec<&mut MailboxRecord> = records.into_iter().collect();
    let total = records.len();
    let value = intent.value();
    let started = Timestamp::now();
    debug!("applying {intent} to {total} mailboxes");

    let mut success_count = 0;
    let mut failures = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        let outcome = mutate(record.principal_id(), value).await;
        let event_outcome = match outcome {
            Ok(()) => {
                info!(
                    "{} ({}) set to {intent}",
                    record.display_name(),
                    record.principal_id()
                );
                record.set_cloud_managed(value);
                success_count += 1;
                Ok(())
            }
            Err(error) => {
                warn!(
                    "setting {} ({}) to {intent} failed: {error}",
                    record.display_name(),
                    record.principal_id()
                );
                let message = error.to_string();
                failures.push(BatchFailure {
                    principal_id: record.principal_id().clone(),
                    display_name: record.display_name().clone(),
                    error: message.clone(),
                });
                Err(message)
            }
        };

        if let Some(progress) = &progress {
            let event = BatchEvent {
                position: index + 1,
                total,
                principal_id: record.principal_id().clone(),
                display_name: record.display_name().clone(),
                outcome: event_outcome,
            };
            if progress.send(event).is_err() {
                debug!("progress receiver went away");
            }
        }
    }

    BatchResult {
        intent,
        success_count,
        failures,
        started,
        finished: Timestamp::now(),
    }
}
