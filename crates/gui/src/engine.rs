//! Background worker that owns the engine process.
//!
//! The worker forwards every stdout line to the UI as an [`EngineEvent`] and
//! writes whatever commands arrive through the [`EngineHandle`].

use iced::futures::{SinkExt, Stream};
use iced::stream;
use match_core::{EngineCommand, EngineConfig, EngineProcess};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

const EVENT_BUFFER: usize = 100;

#[derive(Debug, Clone)]
pub enum EngineEvent {
    Connected(EngineHandle),
    Line(String),
    /// The worker is gone; the reason is shown to the user.
    Exited(String),
}

/// Sending side of the worker's command queue.
#[derive(Debug, Clone)]
pub struct EngineHandle(mpsc::UnboundedSender<EngineCommand>);

impl EngineHandle {
    /// Returns `false` once the worker has stopped.
    pub fn send(&self, command: EngineCommand) -> bool {
        self.0.send(command).is_ok()
    }
}

/// Spawn the engine and pump it until either side goes away.
pub fn worker(config: EngineConfig) -> impl Stream<Item = EngineEvent> {
    stream::channel(EVENT_BUFFER, move |mut output| async move {
        let (mut process, mut lines) = match EngineProcess::spawn(&config) {
            Ok(spawned) => spawned,
            Err(err) => {
                error!("{err}");
                let _ = output.send(EngineEvent::Exited(err.to_string())).await;
                return;
            }
        };

        let (sender, mut commands) = mpsc::unbounded_channel();
        if output
            .send(EngineEvent::Connected(EngineHandle(sender)))
            .await
            .is_err()
        {
            return;
        }

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let event = match line {
                        Ok(Some(line)) => EngineEvent::Line(line),
                        Ok(None) => EngineEvent::Exited("engine closed its output".to_string()),
                        Err(err) => EngineEvent::Exited(err.to_string()),
                    };
                    let exited = matches!(event, EngineEvent::Exited(_));
                    if output.send(event).await.is_err() || exited {
                        break;
                    }
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        debug!("engine handle dropped");
                        break;
                    };
                    if let Err(err) = process.send(&command).await {
                        warn!("engine write failed: {err}");
                        let _ = output.send(EngineEvent::Exited(err.to_string())).await;
                        break;
                    }
                }
            }
        }

        if let Err(err) = process.shutdown().await {
            warn!("engine shutdown failed: {err}");
        }
    })
}
