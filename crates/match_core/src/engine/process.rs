//! Engine child process over piped stdin/stdout.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

use super::protocol::EngineCommand;
use crate::config::EngineConfig;
use crate::error::ProcessError;

const SHUTDOWN_TIMEOUT_SECS: u64 = 2;

/// Line stream of the engine's stdout.
pub type EngineLines = Lines<BufReader<ChildStdout>>;

/// Write half of a running engine. The child is killed when this is dropped.
pub struct EngineProcess {
    program: String,
    child: Child,
    stdin: ChildStdin,
}

impl EngineProcess {
    /// Launch the engine. Must be called inside a tokio runtime.
    pub fn spawn(config: &EngineConfig) -> Result<(Self, EngineLines), ProcessError> {
        let program = config.path.display().to_string();
        let mut child = Command::new(&config.path)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(ProcessError::MissingPipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(ProcessError::MissingPipe("stdout"))?;
        info!(%program, pid = ?child.id(), "engine process started");

        Ok((
            Self {
                program,
                child,
                stdin,
            },
            BufReader::new(stdout).lines(),
        ))
    }

    pub async fn send(&mut self, command: &EngineCommand) -> Result<(), ProcessError> {
        debug!(%command, "-> engine");
        let line = format!("{command}\n");
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Ask the engine to quit, killing it if it does not exit in time.
    pub async fn shutdown(&mut self) -> Result<(), ProcessError> {
        if let Err(err) = self.send(&EngineCommand::Quit).await {
            debug!("quit not delivered: {err}");
        }
        let wait = tokio::time::timeout(
            Duration::from_secs(SHUTDOWN_TIMEOUT_SECS),
            self.child.wait(),
        );
        match wait.await {
            Ok(status) => {
                let status = status?;
                info!(program = %self.program, %status, "engine exited");
            }
            Err(_) => {
                warn!(program = %self.program, "engine ignored quit, killing");
                self.child.kill().await?;
            }
        }
        Ok(())
    }
}
