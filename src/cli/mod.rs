mod interactive;
mod prompt;
mod render;
mod selection;

use std::io::{self, IsTerminal as _, Write};

use anyhow::bail;
use log::warn;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    Command,
    batch::BatchResult,
    console::{Console, ConsoleError},
    mailbox::{Intent, PrincipalId},
    service::MailboxService,
};
use render::Renderer;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Console(#[from] ConsoleError),
    #[error("writing output failed: {0}")]
    Io(#[from] io::Error),
    #[error("encoding mailboxes failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub async fn run<S: MailboxService>(
    command: Command,
    console: &mut Console<S>,
) -> anyhow::Result<()> {
    let renderer = Renderer::new(io::stdout().is_terminal());
    match command {
        Command::Interactive => interactive::run(console, renderer).await,
        Command::List { page, json } => {
            console.connect().await?;
            let listed = list(console, page, json, renderer, &mut io::stdout()).await;
            finish(console, listed).await
        }
        Command::Convert { to, ids } => {
            console.connect().await?;
            let converted = async {
                console.refresh().await?;
                convert_with_progress(console, &ids, to, renderer, &mut io::stdout()).await
            }
            .await;
            let result = finish(console, converted).await?;
            if !result.is_complete_success() {
                bail!(
                    "{} of {} mailboxes could not be set to {to}",
                    result.failures.len(),
                    result.total()
                );
            }
            Ok(())
        }
    }
}

/// Disconnects, preferring the command's own error over a disconnect error.
async fn finish<S: MailboxService, T>(
    console: &mut Console<S>,
    outcome: Result<T, CommandError>,
) -> anyhow::Result<T> {
    let disconnected = console.disconnect().await;
    let value = outcome?;
    disconnected?;
    Ok(value)
}

async fn list<S: MailboxService>(
    console: &mut Console<S>,
    page: usize,
    json: bool,
    renderer: Renderer,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    console.refresh().await?;
    if json {
        let records: Vec<_> = console.roster()?.iter().collect();
        serde_json::to_writer_pretty(&mut *out, &records)?;
        writeln!(out)?;
    } else {
        renderer.page(&console.go_to(page)?, out)?;
    }
    Ok(())
}

/// Runs a batch while printing each record's outcome as it arrives.
async fn convert_with_progress<S: MailboxService>(
    console: &mut Console<S>,
    ids: &[PrincipalId],
    intent: Intent,
    renderer: Renderer,
    out: &mut impl Write,
) -> Result<BatchResult, CommandError> {
    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel();
    let (result, rendered) = tokio::join!(console.convert(ids, intent, Some(progress_tx)), async {
        while let Some(event) = progress_rx.recv().await {
            renderer.progress(&event, out)?;
        }
        Ok::<(), io::Error>(())
    });
    if let Err(error) = rendered {
        warn!("progress output failed: {error}");
    }

    let result = result?;
    renderer.summary(&result, out)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;
    use crate::{
        mailbox::MailboxRecord, roster::DEFAULT_PAGE_SIZE, roster::tests::records,
        service::fake::FakeService,
    };

    fn id(n: usize) -> PrincipalId {
        assert_ok!(PrincipalId::try_from(format!("id-{n}")))
    }

    #[fixture]
    fn console() -> Console<FakeService> {
        Console::new(FakeService::with_mailboxes(records(3)), DEFAULT_PAGE_SIZE)
    }

    #[rstest]
    #[tokio::test]
    async fn test_list_prints_json(mut console: Console<FakeService>) {
        assert_ok!(console.connect().await);
        let mut out = Vec::new();

        assert_ok!(list(&mut console, 1, true, Renderer::new(false), &mut out).await);

        let listed: Vec<MailboxRecord> = assert_ok!(serde_json::from_slice(&out));
        assert_eq!(records(3), listed);
    }

    #[rstest]
    #[tokio::test]
    async fn test_list_prints_requested_page(mut console: Console<FakeService>) {
        assert_ok!(console.connect().await);
        let mut out = Vec::new();

        assert_ok!(list(&mut console, 7, false, Renderer::new(false), &mut out).await);

        let output = assert_ok!(String::from_utf8(out));
        assert_ends_with!(output, "page 1 of 1 (3 mailboxes)\n");
    }

    #[rstest]
    #[tokio::test]
    async fn test_convert_with_progress_prints_every_record(mut console: Console<FakeService>) {
        assert_ok!(console.connect().await);
        assert_ok!(console.refresh().await);
        let mut out = Vec::new();

        let result = assert_ok!(
            convert_with_progress(
                &mut console,
                &[id(2), id(0)],
                Intent::SetCloudManaged,
                Renderer::new(false),
                &mut out,
            )
            .await
        );

        assert_eq!(2, result.success_count);
        let output = assert_ok!(String::from_utf8(out));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!("[1/2] User 2 (id-2) ok", lines[0]);
        assert_eq!("[2/2] User 0 (id-0) ok", lines[1]);
        assert_starts_with!(lines[2], "2 of 2 mailboxes set to cloud (0 failed)");
    }

    #[rstest]
    #[tokio::test]
    async fn test_finish_disconnects_after_failure(mut console: Console<FakeService>) {
        assert_ok!(console.connect().await);

        let outcome: Result<(), CommandError> = Err(ConsoleError::EmptySelection.into());
        let error = assert_err!(finish(&mut console, outcome).await);

        assert_eq!("no mailboxes selected", error.to_string());
        assert_eq!(
            crate::console::ConnectionState::Disconnected,
            console.state()
        );
    }
}
