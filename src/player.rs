//! External player surface.
//!
//! Streams are never decoded in-process. A channel pick hands the stream
//! link either to a configured player command (`mpv`, `vlc`, ...) or to the
//! system opener. The launch reports back through [`AppEvent`]s tagged
//! with a generation counter, so a slow launch that completes after the
//! user already picked another channel is ignored.
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app::AppEvent;
use crate::util::{validate_stream_url, StreamUrlError};

/// A player still running after this long counts as loaded.
const SETTLE_TIME: Duration = Duration::from_millis(750);

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error(transparent)]
    InvalidStream(#[from] StreamUrlError),

    #[error("Player command is empty")]
    EmptyCommand,

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Owns the currently running player launch.
pub struct PlayerSurface {
    command: Option<String>,
    handle: Option<JoinHandle<()>>,
}

impl PlayerSurface {
    /// `command` is the configured command line; `None` uses the system opener.
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
            handle: None,
        }
    }

    /// Human-readable name of the launcher, for the status bar.
    pub fn launcher_name(&self) -> &str {
        self.command
            .as_deref()
            .and_then(|c| c.split_whitespace().next())
            .unwrap_or("system opener")
    }

    /// Start playing `stream`, replacing whatever was playing before.
    ///
    /// The previous player is stopped even when the new launch fails.
    /// Errors are returned for problems known before anything runs (bad
    /// link, missing binary). Later failures arrive as
    /// [`AppEvent::PlayerFailed`]; success as [`AppEvent::PlayerLoaded`].
    pub fn launch(
        &mut self,
        stream: &str,
        volume: u8,
        generation: u64,
        tx: mpsc::Sender<AppEvent>,
    ) -> Result<(), PlayerError> {
        self.stop();
        let url = validate_stream_url(stream)?;

        let handle = match &self.command {
            Some(template) => {
                let (program, args) = build_command(template, url.as_str(), volume)?;
                let child = tokio::process::Command::new(&program)
                    .args(&args)
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .kill_on_drop(true)
                    .spawn()
                    .map_err(|source| PlayerError::Spawn {
                        program: program.clone(),
                        source,
                    })?;

                tracing::info!(program = %program, generation, "Player process started");
                tokio::spawn(watch_child(child, generation, tx))
            }
            None => {
                let target = url.to_string();
                tracing::info!(generation, "Opening stream with system opener");
                tokio::spawn(async move {
                    let opened = tokio::task::spawn_blocking(move || open::that(target)).await;
                    let event = match opened {
                        Ok(Ok(())) => AppEvent::PlayerLoaded { generation },
                        Ok(Err(e)) => AppEvent::PlayerFailed {
                            generation,
                            error: e.to_string(),
                        },
                        Err(e) => AppEvent::PlayerFailed {
                            generation,
                            error: format!("Opener task failed: {}", e),
                        },
                    };
                    if tx.send(event).await.is_err() {
                        tracing::debug!("Player event dropped (receiver closed)");
                    }
                })
            }
        };

        self.handle = Some(handle);
        Ok(())
    }

    /// Stop the current player, if any. Dropping the child kills it.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("Stopped previous player");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for PlayerSurface {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Wait for the player to either settle or die, then report its exit.
async fn watch_child(mut child: tokio::process::Child, generation: u64, tx: mpsc::Sender<AppEvent>) {
    let early = tokio::select! {
        status = child.wait() => Some(status),
        _ = tokio::time::sleep(SETTLE_TIME) => None,
    };

    let event = match early {
        // Launchers that hand off to another process exit at once with success.
        Some(Ok(status)) if status.success() => AppEvent::PlayerLoaded { generation },
        Some(Ok(status)) => AppEvent::PlayerFailed {
            generation,
            error: format!("Player exited with {}", status),
        },
        Some(Err(e)) => AppEvent::PlayerFailed {
            generation,
            error: e.to_string(),
        },
        None => {
            if tx.send(AppEvent::PlayerLoaded { generation }).await.is_err() {
                return;
            }
            let code = child.wait().await.ok().and_then(|s| s.code());
            AppEvent::PlayerExited { generation, code }
        }
    };

    if tx.send(event).await.is_err() {
        tracing::debug!("Player event dropped (receiver closed)");
    }
}

/// Split a command template into program and arguments.
///
/// `{url}` and `{volume}` are substituted in every argument. When the
/// template has no `{url}`, the link is appended as the last argument.
pub fn build_command(template: &str, url: &str, volume: u8) -> Result<(String, Vec<String>), PlayerError> {
    let mut parts = template.split_whitespace();
    let program = parts.next().ok_or(PlayerError::EmptyCommand)?.to_string();

    let volume = volume.min(100).to_string();
    let mut saw_url = false;
    let mut args: Vec<String> = parts
        .map(|part| {
            saw_url |= part.contains("{url}");
            part.replace("{url}", url).replace("{volume}", &volume)
        })
        .collect();

    if !saw_url {
        args.push(url.to_string());
    }
    Ok((program, args))
}
