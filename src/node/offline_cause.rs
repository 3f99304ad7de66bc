use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Why a node went offline, stamped with the moment the cause was raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfflineCause {
    pub kind: OfflineCauseKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OfflineCauseKind {
    UserAction { user: String, message: String },
    ByCli { message: String },
    ChannelTermination,
    Idle,
}

impl OfflineCause {
    pub fn new(kind: OfflineCauseKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }

    pub fn user_action(user: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(OfflineCauseKind::UserAction {
            user: user.into(),
            message: message.into(),
        })
    }

    pub fn by_cli(message: impl Into<String>) -> Self {
        Self::new(OfflineCauseKind::ByCli {
            message: message.into(),
        })
    }

    pub fn channel_termination() -> Self {
        Self::new(OfflineCauseKind::ChannelTermination)
    }

    pub fn idle() -> Self {
        Self::new(OfflineCauseKind::Idle)
    }
}

impl fmt::Display for OfflineCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            OfflineCauseKind::UserAction { user, message } if message.is_empty() => {
                write!(f, "Disconnected by {}", user)
            }
            OfflineCauseKind::UserAction { user, message } => {
                write!(f, "Disconnected by {}: {}", user, message)
            }
            OfflineCauseKind::ByCli { message } => write!(f, "Disconnected via CLI: {}", message),
            OfflineCauseKind::ChannelTermination => write!(f, "Connection was terminated"),
            OfflineCauseKind::Idle => write!(f, "Disconnected because idle"),
        }
    }
}
