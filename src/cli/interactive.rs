use std::{
    io::{self, ErrorKind, Write},
    mem,
};

use futures::{Stream, StreamExt};
use log::warn;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

use crate::{
    cli::{
        CommandError, convert_with_progress,
        prompt::{HELP, PromptCommand, parse_command},
        render::Renderer,
    },
    console::{Console, ConnectionState},
    service::MailboxService,
};

pub async fn run<S: MailboxService>(
    console: &mut Console<S>,
    renderer: Renderer,
) -> anyhow::Result<()> {
    let lines = FramedRead::new(tokio::io::stdin(), LinesCodec::new());
    prompt_loop(console, lines, renderer, &mut io::stdout()).await
}

/// Runs prompt commands until `quit`, end of input, or a failed read or
/// write. The console is disconnected in every case.
async fn prompt_loop<S, L>(
    console: &mut Console<S>,
    mut lines: L,
    renderer: Renderer,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    S: MailboxService,
    L: Stream<Item = Result<String, LinesCodecError>> + Unpin,
{
    let outcome = read_commands(console, &mut lines, renderer, out).await;
    if let Err(error) = console.disconnect().await {
        warn!("{error}");
    }
    outcome
}

async fn read_commands<S, L>(
    console: &mut Console<S>,
    lines: &mut L,
    renderer: Renderer,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    S: MailboxService,
    L: Stream<Item = Result<String, LinesCodecError>> + Unpin,
{
    writeln!(out, "{HELP}")?;
    execute(console, PromptCommand::Connect, renderer, out).await?;

    let mut after_bad_line = false;
    loop {
        if !after_bad_line {
            write!(out, "{}", prompt(console))?;
            out.flush()?;
        }
        let line = match lines.next().await {
            Some(Ok(line)) => line,
            Some(Err(LinesCodecError::Io(error))) if error.kind() != ErrorKind::InvalidData => {
                return Err(error.into());
            }
            Some(Err(error)) => {
                writeln!(out, "ignoring unreadable input: {error}")?;
                after_bad_line = true;
                continue;
            }
            // the codec ends the stream once after a decode error, then reads on
            None if mem::take(&mut after_bad_line) => continue,
            None => {
                writeln!(out)?;
                return Ok(());
            }
        };
        after_bad_line = false;

        match parse_command(&line, console.page_size().get()) {
            Ok(None) => {}
            Ok(Some(PromptCommand::Quit)) => return Ok(()),
            Ok(Some(command)) => execute(console, command, renderer, out).await?,
            Err(error) => writeln!(out, "{error}")?,
        }
    }
}

fn prompt<S: MailboxService>(console: &Console<S>) -> String {
    match console.current() {
        Ok(page) => format!(
            "mailflip [page {}/{}]> ",
            page.page_number,
            page.total_pages.max(1)
        ),
        Err(_) => format!("mailflip [{}]> ", console.state()),
    }
}

/// Runs one prompt command. Console errors are shown to the user, only
/// failing output is returned as an error.
pub async fn execute<S: MailboxService>(
    console: &mut Console<S>,
    command: PromptCommand,
    renderer: Renderer,
    out: &mut impl Write,
) -> io::Result<()> {
    match dispatch(console, command, renderer, out).await {
        Ok(()) => Ok(()),
        Err(CommandError::Io(error)) => Err(error),
        Err(error) => writeln!(out, "{error}"),
    }
}

async fn dispatch<S: MailboxService>(
    console: &mut Console<S>,
    command: PromptCommand,
    renderer: Renderer,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match command {
        PromptCommand::Help => writeln!(out, "{HELP}")?,
        PromptCommand::Connect => {
            console.connect().await?;
            console.refresh().await?;
            renderer.page(&console.current()?, out)?;
        }
        PromptCommand::Disconnect => {
            console.disconnect().await?;
            writeln!(out, "disconnected")?;
        }
        PromptCommand::Refresh => {
            console.refresh().await?;
            renderer.page(&console.current()?, out)?;
        }
        PromptCommand::Page(None) => renderer.page(&console.current()?, out)?,
        PromptCommand::Page(Some(page_number)) => {
            renderer.page(&console.go_to(page_number)?, out)?;
        }
        PromptCommand::Next => renderer.page(&console.advance(1)?, out)?,
        PromptCommand::Prev => renderer.page(&console.advance(-1)?, out)?,
        PromptCommand::Convert { intent, rows } => {
            let (ids, out_of_range) = console.roster()?.principals_on_current_page(&rows);
            if !out_of_range.is_empty() {
                let rows: Vec<String> = out_of_range.iter().map(ToString::to_string).collect();
                writeln!(out, "not on this page: {}", rows.join(", "))?;
                return Ok(());
            }
            convert_with_progress(console, &ids, intent, renderer, out).await?;
        }
        PromptCommand::Set { id, intent } => {
            console.set_one(&id, intent).await?;
            writeln!(out, "{id} set to {intent}")?;
        }
        PromptCommand::Status => {
            writeln!(out, "{}", console.state())?;
            if console.state() == ConnectionState::Connected {
                let roster = console.roster()?;
                let (cloud, on_prem) = roster.counts();
                writeln!(
                    out,
                    "{} mailboxes, {cloud} cloud managed, {on_prem} on-premises managed",
                    roster.len()
                )?;
                writeln!(
                    out,
                    "page {} of {}, {} per page",
                    roster.current_page(),
                    roster.total_pages(),
                    roster.page_size()
                )?;
            }
        }
        PromptCommand::Quit => {}
    }
    Ok(())
}
