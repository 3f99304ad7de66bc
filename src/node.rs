mod computer;
mod connector;
mod environment;
mod error;
mod offline_cause;
mod retention;

use crate::utils::fix_empty_and_trim;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use strum_macros::{Display, EnumString};

pub use computer::{precomputed, Computer, NodeComputer, NodeState, Precomputed};
pub use connector::{Connector, NullConnector, TaskListener};
pub use environment::{
    Charset, EnvVars, LogRecord, MonitorData, SystemProperties, ThreadDump, EMPTY_ENV_VARS,
};
pub use error::ValidationError;
pub use offline_cause::{OfflineCause, OfflineCauseKind};
pub use retention::RetentionStrategy;

pub const DESCRIPTOR: NodeDescriptor = NodeDescriptor {
    display_name: "External Agent",
    symbol: "externalAgent",
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub display_name: &'static str,
    pub symbol: &'static str,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, EnumString, Serialize)]
pub enum Mode {
    /// Run any job that fits.
    Normal,
    /// Only run jobs bound to this node.
    Exclusive,
}

/// A node registered with the orchestrator but provisioned outside of it.
#[derive(Debug, Clone)]
pub struct ExternalNode {
    name: String,
    host: Option<String>,
    connector: Arc<dyn Connector>,
}

impl ExternalNode {
    pub const DESCRIPTION: &'static str = "External agent";
    pub const REMOTE_FS: &'static str = "/dev/null";
    pub const NUM_EXECUTORS: usize = 1;

    pub fn new(name: &str, host: &str) -> Result<Self, ValidationError> {
        let name = fix_empty_and_trim(Some(name)).ok_or(ValidationError::BlankName)?;

        Ok(Self {
            name,
            host: fix_empty_and_trim(Some(host)),
            connector: Arc::new(NullConnector),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn set_host(&mut self, value: &str) {
        self.host = fix_empty_and_trim(Some(value));
    }

    pub fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    pub fn mode(&self) -> Mode {
        Mode::Exclusive
    }

    pub fn num_executors(&self) -> usize {
        Self::NUM_EXECUTORS
    }

    pub fn remote_fs(&self) -> &'static str {
        Self::REMOTE_FS
    }

    pub fn retention_strategy(&self) -> RetentionStrategy {
        RetentionStrategy::Always
    }

    pub fn connector(&self) -> Arc<dyn Connector> {
        Arc::clone(&self.connector)
    }

    pub fn descriptor(&self) -> &'static NodeDescriptor {
        &DESCRIPTOR
    }

    pub fn create_computer(&self) -> Arc<NodeComputer> {
        Arc::new(NodeComputer::new(self.name.clone()))
    }
}

impl fmt::Display for ExternalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host {
            Some(host) => write!(f, "{} ({})", self.name, host),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_is_rejected() {
        assert_eq!(
            ValidationError::BlankName,
            ExternalNode::new("", "h1").unwrap_err()
        );
        assert_eq!(
            ValidationError::BlankName,
            ExternalNode::new("   ", "h1").unwrap_err()
        );
    }

    #[test]
    fn test_identity_is_normalized() -> Result<(), Box<dyn std::error::Error>> {
        let node = ExternalNode::new("agent-1", "")?;
        assert_eq!("agent-1", node.name());
        assert_eq!(None, node.host());

        let node = ExternalNode::new("  agent-2 ", " h2 ")?;
        assert_eq!("agent-2", node.name());
        assert_eq!(Some("h2"), node.host());
        assert_eq!("agent-2 (h2)", node.to_string());

        Ok(())
    }

    #[test]
    fn test_set_host() -> Result<(), Box<dyn std::error::Error>> {
        let mut node = ExternalNode::new("agent-1", "")?;

        node.set_host("  10.0.0.5  ");
        assert_eq!(Some("10.0.0.5"), node.host());

        node.set_host(" ");
        assert_eq!(None, node.host());
        assert_eq!("agent-1", node.to_string());

        Ok(())
    }

    #[test]
    fn test_fixed_attributes() -> Result<(), Box<dyn std::error::Error>> {
        let node = ExternalNode::new("agent-1", "h1")?;

        assert_eq!("External agent", node.description());
        assert_eq!(Mode::Exclusive, node.mode());
        assert_eq!(1, node.num_executors());
        assert_eq!("/dev/null", node.remote_fs());
        assert_eq!(RetentionStrategy::Always, node.retention_strategy());
        assert_eq!("External Agent", node.descriptor().display_name);
        assert_eq!("externalAgent", node.descriptor().symbol);

        Ok(())
    }

    #[test]
    fn test_each_computer_starts_offline() -> Result<(), Box<dyn std::error::Error>> {
        let node = ExternalNode::new("agent-1", "h1")?;

        let first = node.create_computer();
        let _ = first.connect(false);

        let second = node.create_computer();
        assert!(!first.is_offline());
        assert!(second.is_offline());
        assert_eq!("agent-1", second.name());

        Ok(())
    }
}
