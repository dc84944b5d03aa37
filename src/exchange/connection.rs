use std::{io, process::Stdio};

use futures::{SinkExt, StreamExt};
use log::{debug, trace};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};

use crate::{
    exchange::{script::Script, tag_generator::TagGenerator},
    service::ServiceError,
};

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("could not start {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("shell pipes are unavailable")]
    Pipes,
    #[error("talking to the shell failed: {0}")]
    Io(#[from] LinesCodecError),
    #[error("shell exited unexpectedly")]
    Closed,
    #[error("shell finished without a reply to {0}")]
    NoReply(String),
    #[error("{0}")]
    Command(String),
}

impl From<ShellError> for ServiceError {
    fn from(value: ShellError) -> Self {
        match value {
            ShellError::Command(message) => ServiceError::Remote(message),
            other => ServiceError::Unavailable(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<String>,
}

impl Envelope {
    fn into_result(self) -> Result<Value, ShellError> {
        if self.ok {
            Ok(self.data)
        } else {
            Err(ShellError::Command(
                self.error
                    .unwrap_or_else(|| "command failed without message".to_string()),
            ))
        }
    }
}

/// Long lived PowerShell process fed one script line at a time.
#[derive(Debug)]
pub struct ShellConnection {
    child: Child,
    writer: FramedWrite<ChildStdin, LinesCodec>,
    reader: FramedRead<ChildStdout, LinesCodec>,
    tag_generator: TagGenerator,
}

impl ShellConnection {
    pub fn start(program: &str) -> Result<Self, ShellError> {
        debug!("starting {program}");
        let mut child = Command::new(program)
            .args(["-NoLogo", "-NoProfile", "-NonInteractive", "-Command", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ShellError::Spawn {
                program: program.to_string(),
                source,
            })?;
        let stdin = child.stdin.take().ok_or(ShellError::Pipes)?;
        let stdout = child.stdout.take().ok_or(ShellError::Pipes)?;

        Ok(Self {
            child,
            writer: FramedWrite::new(stdin, LinesCodec::new()),
            reader: FramedRead::new(stdout, LinesCodec::new()),
            tag_generator: TagGenerator::default(),
        })
    }

    /// Runs `script` and returns the `data` it produced.
    pub async fn send(&mut self, script: &Script) -> Result<Value, ShellError> {
        let marker = self.tag_generator.next();
        debug!("{marker}: {script}");
        self.writer.send(script.framed(&marker)).await?;

        let mut envelope = None;
        loop {
            let Some(line) = self.reader.next().await else {
                return Err(ShellError::Closed);
            };
            let line = line?;
            if line == marker {
                break;
            }
            match serde_json::from_str::<Envelope>(&line) {
                Ok(reply) => envelope = Some(reply),
                Err(_) => trace!("{marker}: {line}"),
            }
        }

        envelope
            .ok_or_else(|| ShellError::NoReply(script.to_string()))?
            .into_result()
    }

    /// Asks the shell to exit and waits for it.
    pub async fn close(mut self) -> Result<(), ShellError> {
        self.writer.send("exit").await?;
        let status = self
            .child
            .wait()
            .await
            .map_err(|error| ShellError::Io(error.into()))?;
        debug!("shell exited with {status}");
        Ok(())
    }
}
