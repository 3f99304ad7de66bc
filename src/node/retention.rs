use super::computer::Computer;
use serde::Serialize;
use strum_macros::Display;
use tracing::info;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, Serialize)]
pub enum RetentionStrategy {
    /// Keep the node online, reconnect whenever it is found offline.
    Always,
    /// Leave connectivity entirely to explicit commands.
    Manual,
}

impl RetentionStrategy {
    /// Returns whether a reconnect was issued.
    pub fn check(&self, computer: &dyn Computer) -> bool {
        match self {
            Self::Always if computer.is_offline() && !computer.is_connecting() => {
                info!(node = computer.name(), "Reconnecting offline node");
                let _ = computer.connect(false);

                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ExternalNode, OfflineCause};

    #[test]
    fn test_always_reconnects_offline_node() -> Result<(), Box<dyn std::error::Error>> {
        let computer = ExternalNode::new("w1", "")?.create_computer();

        assert!(RetentionStrategy::Always.check(&*computer));
        assert!(!computer.is_offline());

        assert!(!RetentionStrategy::Always.check(&*computer));

        let _ = computer.disconnect(OfflineCause::channel_termination());
        assert!(RetentionStrategy::Always.check(&*computer));
        assert!(!computer.is_offline());

        Ok(())
    }

    #[test]
    fn test_manual_never_reconnects() -> Result<(), Box<dyn std::error::Error>> {
        let computer = ExternalNode::new("w1", "")?.create_computer();

        assert!(!RetentionStrategy::Manual.check(&*computer));
        assert!(computer.is_offline());

        Ok(())
    }
}
