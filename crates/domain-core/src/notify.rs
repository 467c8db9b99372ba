//! Outgoing notifications
//!
//! Nothing is actually mailed: [`OutboxNotifier`] appends each message as a
//! JSON line to an outbox file for an external mailer to pick up, and
//! [`RecordingNotifier`] keeps messages in memory.

use std::fs::{self, OpenOptions};
use std::io::Write;

use chrono::{DateTime, Utc};
use domain_fs::NormalizedPath;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Template of the invitation message
pub const INVITATION_TEMPLATE: &str = "invitation";

/// A message handed to a [`Notifier`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub sender: String,
    pub recipient: String,
    pub template: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

/// Sends messages to people
pub trait Notifier {
    /// Send a message rendered from `template` with `data`.
    ///
    /// Delivery is fire-and-forget; callers log failures and carry on.
    fn send(&mut self, recipient: &str, template: &str, data: Value) -> Result<()>;
}

/// Appends notifications to a JSON-lines file
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    path: NormalizedPath,
    sender: String,
}

impl OutboxNotifier {
    pub fn new(path: impl Into<NormalizedPath>, sender: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sender: sender.into(),
        }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// All notifications written so far, oldest first.
    pub fn read_all(&self) -> Result<Vec<Notification>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = domain_fs::io::read_text_locked(&self.path)?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(Error::from))
            .collect()
    }
}

impl Notifier for OutboxNotifier {
    fn send(&mut self, recipient: &str, template: &str, data: Value) -> Result<()> {
        let notification = Notification {
            sender: self.sender.clone(),
            recipient: recipient.to_string(),
            template: template.to_string(),
            data,
            created_at: Utc::now(),
        };
        let line = serde_json::to_string(&notification)?;

        let native = self.path.to_native();
        if let Some(parent) = native.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&native)?;
        file.lock_exclusive().map_err(|e| Error::Notify {
            message: format!("cannot lock {}: {}", self.path, e),
        })?;
        writeln!(file, "{line}")?;

        tracing::debug!(recipient, template, outbox = %self.path, "Queued notification");
        Ok(())
    }
}

/// Keeps notifications in memory
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Vec<Notification>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every send fails.
    pub fn failing() -> Self {
        Self {
            sent: Vec::new(),
            fail: true,
        }
    }

    pub fn sent(&self) -> &[Notification] {
        &self.sent
    }
}

impl Notifier for RecordingNotifier {
    fn send(&mut self, recipient: &str, template: &str, data: Value) -> Result<()> {
        if self.fail {
            return Err(Error::Notify {
                message: format!("cannot deliver to {recipient}"),
            });
        }
        self.sent.push(Notification {
            sender: String::new(),
            recipient: recipient.to_string(),
            template: template.to_string(),
            data,
            created_at: Utc::now(),
        });
        Ok(())
    }
}
