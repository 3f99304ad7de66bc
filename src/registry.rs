use crate::actor::{self, ErrorKind};
use crate::config;
use crate::node::{Computer, ExternalNode, NodeComputer, NodeState, OfflineCause, TaskListener};
use act_zero::runtimes::tokio::Timer;
use act_zero::timer::Tick;
use act_zero::{call, send, Actor, ActorError, ActorResult, Addr, Produces, WeakAddr};
use anyhow::anyhow;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Snapshot of a registered node as reported to the outside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStatus {
    pub name: String,
    pub host: Option<String>,
    pub state: NodeState,
    pub temporarily_offline: bool,
    pub accepting_tasks: bool,
    pub offline_cause: Option<String>,
}

impl NodeStatus {
    fn new(node: &ExternalNode, computer: &NodeComputer) -> Self {
        Self {
            name: node.name().to_owned(),
            host: node.host().map(String::from),
            state: computer.state(),
            temporarily_offline: computer.is_temporarily_offline(),
            accepting_tasks: computer.is_accepting_tasks(),
            offline_cause: computer.offline_cause().map(|cause| cause.to_string()),
        }
    }
}

struct RegisteredNode {
    node: ExternalNode,
    computer: Arc<NodeComputer>,
}

/// Owns the registered external nodes and drives their lifecycle.
pub struct NodeRegistry {
    config: config::NodeRegistry,
    nodes: HashMap<String, RegisteredNode>,
    retention_timer: Timer,
    addr: WeakAddr<Self>,
}

impl NodeRegistry {
    pub fn new(config: config::NodeRegistry) -> Self {
        Self {
            config,
            nodes: HashMap::new(),
            retention_timer: Default::default(),
            addr: Default::default(),
        }
    }
}

impl fmt::Display for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRegistry ({} nodes)", self.nodes.len())
    }
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[async_trait]
impl Actor for NodeRegistry {
    #[tracing::instrument(
        name = "NodeRegistry::started",
        skip(self, addr),
        fields(retention_check_interval = ?self.config.retention_check_interval)
    )]
    async fn started(&mut self, addr: Addr<Self>) -> ActorResult<()>
    where
        Self: Sized,
    {
        info!("Started");

        self.addr = addr.downgrade();

        self.retention_timer
            .set_interval_weak(self.addr.clone(), self.config.retention_check_interval);

        Produces::ok(())
    }

    async fn error(&mut self, error: ActorError) -> bool {
        actor::handle_error(error)
    }
}

#[async_trait]
impl Tick for NodeRegistry {
    async fn tick(&mut self) -> ActorResult<()> {
        if self.retention_timer.tick() {
            send!(self.addr.apply_retention());
        }

        Produces::ok(())
    }
}

impl Drop for NodeRegistry {
    fn drop(&mut self) {
        info!("Drop {}", self);
    }
}

impl NodeRegistry {
    /// Launches the node through its connector and applies its retention strategy once.
    #[tracing::instrument(
        name = "NodeRegistry::register_node",
        skip(self, node),
        fields(node = %node)
    )]
    pub async fn register_node(&mut self, node: ExternalNode) -> ActorResult<Arc<NodeComputer>> {
        if self.nodes.contains_key(node.name()) {
            return Err(actor::Error::from(ErrorKind::DuplicateNode(node.name().to_owned())).into());
        }

        let computer = node.create_computer();

        node.connector()
            .launch(&*computer, &mut TaskListener::null())
            .await
            .map_err(actor::Error::from)?;

        node.retention_strategy().check(&*computer);

        info!(state = %computer.state(), "Registered node");

        self.nodes.insert(
            node.name().to_owned(),
            RegisteredNode {
                node,
                computer: Arc::clone(&computer),
            },
        );

        Produces::ok(computer)
    }

    #[tracing::instrument(name = "NodeRegistry::remove_node", skip(self))]
    pub async fn remove_node(&mut self, name: String) -> ActorResult<bool> {
        let removed = match self.nodes.remove(&name) {
            Some(registered) => {
                let _ = registered.computer.disconnect(OfflineCause::by_cli("removed"));
                info!("Removed node");

                true
            }
            None => false,
        };

        Produces::ok(removed)
    }

    #[tracing::instrument(name = "NodeRegistry::connect_node", skip(self))]
    pub async fn connect_node(&mut self, name: String, force_reconnect: bool) -> ActorResult<bool> {
        Produces::ok(self.with_computer(&name, |computer| {
            let _ = computer.connect(force_reconnect);
        }))
    }

    #[tracing::instrument(name = "NodeRegistry::disconnect_node", skip(self))]
    pub async fn disconnect_node(&mut self, name: String, cause: OfflineCause) -> ActorResult<bool> {
        Produces::ok(self.with_computer(&name, |computer| {
            let _ = computer.disconnect(cause);
        }))
    }

    #[tracing::instrument(name = "NodeRegistry::set_temporarily_offline", skip(self))]
    pub async fn set_temporarily_offline(
        &mut self,
        name: String,
        temporarily_offline: bool,
        cause: Option<OfflineCause>,
    ) -> ActorResult<bool> {
        Produces::ok(self.with_computer(&name, |computer| {
            computer.set_temporarily_offline(temporarily_offline, cause);
        }))
    }

    #[tracing::instrument(name = "NodeRegistry::set_node_host", skip(self))]
    pub async fn set_node_host(&mut self, name: String, host: String) -> ActorResult<bool> {
        let updated = match self.nodes.get_mut(&name) {
            Some(registered) => {
                registered.node.set_host(&host);
                true
            }
            None => {
                warn!("Unknown node");
                false
            }
        };

        Produces::ok(updated)
    }

    pub async fn computer(&mut self, name: String) -> ActorResult<Option<Arc<NodeComputer>>> {
        Produces::ok(
            self.nodes
                .get(&name)
                .map(|registered| Arc::clone(&registered.computer)),
        )
    }

    /// Returns the number of reconnected nodes.
    pub async fn check_retention(&mut self) -> ActorResult<usize> {
        Produces::ok(self.reconnect_retained_nodes())
    }

    pub async fn node_statuses(&mut self) -> ActorResult<Vec<NodeStatus>> {
        let mut statuses = self
            .nodes
            .values()
            .map(|registered| NodeStatus::new(&registered.node, &registered.computer))
            .collect::<Vec<_>>();

        statuses.sort_by(|a, b| a.name.cmp(&b.name));

        Produces::ok(statuses)
    }

    #[tracing::instrument(name = "NodeRegistry::apply_retention", skip(self))]
    async fn apply_retention(&mut self) -> ActorResult<()> {
        self.reconnect_retained_nodes();

        Produces::ok(())
    }

    fn reconnect_retained_nodes(&self) -> usize {
        let reconnected = self
            .nodes
            .values()
            .filter(|registered| {
                registered
                    .node
                    .retention_strategy()
                    .check(&*registered.computer)
            })
            .count();

        if reconnected > 0 {
            info!(reconnected, "Retention check reconnected nodes");
        }

        reconnected
    }

    fn with_computer(&self, name: &str, f: impl FnOnce(&NodeComputer)) -> bool {
        match self.nodes.get(name) {
            Some(registered) => {
                f(&registered.computer);
                true
            }
            None => {
                warn!("Unknown node");
                false
            }
        }
    }
}

/// Logs the node statuses every `interval` until the registry is gone.
pub async fn report_status(
    node_registry: WeakAddr<NodeRegistry>,
    interval: Duration,
) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(interval);

    loop {
        interval.tick().await;

        let statuses = call!(node_registry.node_statuses())
            .await
            .map_err(|e| anyhow!("Node registry is gone: {}", e))?;

        match serde_json::to_string(&statuses) {
            Ok(json) => info!(nodes = statuses.len(), statuses = %json, "Node status"),
            Err(e) => error!("Failed to serialize node statuses {:?}", e),
        }
    }
}
