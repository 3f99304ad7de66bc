use super::computer::Computer;
use async_trait::async_trait;
use std::fmt::{self, Debug};
use std::io::{self, Write};

/// Sink for progress output produced while bringing a node online.
pub struct TaskListener {
    sink: Box<dyn Write + Send>,
}

impl TaskListener {
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    pub fn null() -> Self {
        Self::new(io::sink())
    }

    pub fn logger(&mut self) -> &mut (dyn Write + Send) {
        self.sink.as_mut()
    }
}

impl fmt::Debug for TaskListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskListener")
    }
}

/// Strategy for establishing connectivity to a node's execution environment.
#[async_trait]
pub trait Connector: Send + Sync + Debug {
    async fn launch(
        &self,
        computer: &dyn Computer,
        listener: &mut TaskListener,
    ) -> anyhow::Result<()>;
}

/// Connector for nodes that are brought online outside of the orchestrator.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullConnector;

#[async_trait]
impl Connector for NullConnector {
    async fn launch(
        &self,
        _computer: &dyn Computer,
        _listener: &mut TaskListener,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ExternalNode;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_null_connector_does_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let node = ExternalNode::new("agent-1", "")?;
        let computer = node.create_computer();
        let buffer = SharedBuffer::default();
        let mut listener = TaskListener::new(buffer.clone());

        NullConnector.launch(&*computer, &mut listener).await?;

        assert!(buffer.0.lock().unwrap().is_empty());
        assert!(computer.is_offline());
        assert!(!computer.is_connecting());

        Ok(())
    }

    #[test]
    fn test_task_listener_writes_to_sink() -> Result<(), Box<dyn std::error::Error>> {
        let buffer = SharedBuffer::default();
        let mut listener = TaskListener::new(buffer.clone());

        write!(listener.logger(), "launching")?;

        assert_eq!(b"launching".to_vec(), *buffer.0.lock().unwrap());

        Ok(())
    }
}
