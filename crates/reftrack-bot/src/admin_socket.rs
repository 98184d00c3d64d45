//! Unix socket server for operator commands.
//!
//! Provides a local IPC interface for checking a referrer's count and
//! purging a user whose leave event never arrived.

use crate::error::Result;
use reftrack_ledger::{Ledger, UserId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

/// Operator command sent over the socket.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum AdminCommand {
    /// Number of users credited to a referrer
    Count { referrer_id: UserId },
    /// Remove every credit of a user
    Forget { user_id: UserId },
    /// Ping (health check)
    Ping,
}

/// Response to an operator command.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdminResponse {
    Count { value: usize },
    Removed { value: usize },
    Error { error: String },
    Pong,
}

/// Operator socket server.
pub struct AdminSocket {
    ledger: Arc<Ledger>,
    socket_path: PathBuf,
}

impl AdminSocket {
    pub fn new(ledger: Arc<Ledger>, socket_path: impl AsRef<Path>) -> Self {
        Self {
            ledger,
            socket_path: socket_path.as_ref().to_path_buf(),
        }
    }

    /// Accept connections until the process exits.
    pub async fn run(&self) -> Result<()> {
        // Remove a stale socket file left by a previous run
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;
        tracing::info!("Admin socket listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let ledger = Arc::clone(&self.ledger);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, ledger).await {
                            tracing::error!("Admin connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to accept admin connection: {}", e);
                }
            }
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

async fn handle_connection(stream: UnixStream, ledger: Arc<Ledger>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    while reader.read_line(&mut line).await? > 0 {
        let response = match serde_json::from_str::<AdminCommand>(&line) {
            Ok(cmd) => {
                let ledger = Arc::clone(&ledger);
                tokio::task::spawn_blocking(move || execute_command(cmd, &ledger)).await?
            }
            Err(e) => AdminResponse::Error {
                error: format!("Invalid command: {}", e),
            },
        };

        let response_json = serde_json::to_string(&response)? + "\n";
        writer.write_all(response_json.as_bytes()).await?;
        line.clear();
    }

    Ok(())
}

fn execute_command(cmd: AdminCommand, ledger: &Ledger) -> AdminResponse {
    match cmd {
        AdminCommand::Count { referrer_id } => match ledger.count(referrer_id) {
            Ok(value) => AdminResponse::Count { value },
            Err(e) => AdminResponse::Error {
                error: e.to_string(),
            },
        },

        AdminCommand::Forget { user_id } => match ledger.delete_by_user(user_id) {
            Ok(value) => {
                tracing::info!(user_id, removed = value, "Operator purged user");
                AdminResponse::Removed { value }
            }
            Err(e) => AdminResponse::Error {
                error: e.to_string(),
            },
        },

        AdminCommand::Ping => AdminResponse::Pong,
    }
}
