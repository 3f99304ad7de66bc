use super::connector::TaskListener;
use super::environment::{
    Charset, EnvVars, LogRecord, MonitorData, SystemProperties, ThreadDump, EMPTY_ENV_VARS,
};
use super::offline_cause::OfflineCause;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use strum_macros::{Display, EnumString};
use tracing::debug;

/// Result of an asynchronous node operation that completed before it was returned.
pub type Precomputed<T> = futures::future::Ready<T>;

pub fn precomputed<T>(value: T) -> Precomputed<T> {
    futures::future::ready(value)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, EnumString, Serialize)]
pub enum NodeState {
    Offline,
    Connecting,
    Online,
}

/// The orchestrator facing side of a node.
///
/// Implementors only have to provide the lifecycle operations, the telemetry
/// accessors default to empty values which consumers treat as "not applicable".
pub trait Computer: Send + Sync {
    fn name(&self) -> &str;

    fn is_offline(&self) -> bool;

    fn is_connecting(&self) -> bool;

    fn connect(&self, force_reconnect: bool) -> Precomputed<()>;

    fn disconnect(&self, cause: OfflineCause) -> Precomputed<()>;

    fn state(&self) -> NodeState {
        if self.is_connecting() {
            NodeState::Connecting
        } else if self.is_offline() {
            NodeState::Offline
        } else {
            NodeState::Online
        }
    }

    fn environment(&self) -> &EnvVars {
        &EMPTY_ENV_VARS
    }

    fn build_environment(&self, _listener: &mut TaskListener) -> &EnvVars {
        &EMPTY_ENV_VARS
    }

    fn monitor_data(&self) -> MonitorData {
        MonitorData::new()
    }

    fn thread_dump(&self) -> ThreadDump {
        ThreadDump::new()
    }

    fn system_properties(&self) -> SystemProperties {
        SystemProperties::new()
    }

    fn log_records(&self) -> Vec<LogRecord> {
        vec![]
    }

    fn default_charset(&self) -> Charset {
        Charset::Utf8
    }
}

/// Computer of an external node, its connectivity is nothing but a flag.
#[derive(Debug)]
pub struct NodeComputer {
    name: String,
    offline: AtomicBool,
    temporarily_offline: AtomicBool,
    offline_cause: Mutex<Option<OfflineCause>>,
}

impl NodeComputer {
    pub(super) fn new(name: String) -> Self {
        Self {
            name,
            offline: AtomicBool::new(true),
            temporarily_offline: AtomicBool::new(false),
            offline_cause: Mutex::new(None),
        }
    }

    /// Sets the administrative offline override and replaces the recorded cause.
    pub fn set_temporarily_offline(&self, temporarily_offline: bool, cause: Option<OfflineCause>) {
        let mut slot = self.cause_slot();
        *slot = cause;
        self.temporarily_offline
            .store(temporarily_offline, Ordering::Release);
        drop(slot);

        debug!(node = %self.name, temporarily_offline, "Updated offline override");
    }

    pub fn is_temporarily_offline(&self) -> bool {
        self.temporarily_offline.load(Ordering::Acquire)
    }

    pub fn offline_cause(&self) -> Option<OfflineCause> {
        self.cause_slot().clone()
    }

    /// Reads the override together with the cause it was set with.
    pub fn offline_override(&self) -> (bool, Option<OfflineCause>) {
        let slot = self.cause_slot();

        (self.is_temporarily_offline(), slot.clone())
    }

    /// Online and not excluded from scheduling by an operator.
    pub fn is_accepting_tasks(&self) -> bool {
        !self.is_offline() && !self.is_temporarily_offline()
    }

    fn cause_slot(&self) -> MutexGuard<'_, Option<OfflineCause>> {
        self.offline_cause
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Computer for NodeComputer {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_offline(&self) -> bool {
        self.offline.load(Ordering::Acquire)
    }

    fn is_connecting(&self) -> bool {
        false
    }

    fn connect(&self, force_reconnect: bool) -> Precomputed<()> {
        if self
            .offline
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            debug!(node = %self.name, force_reconnect, "Node is online");
        }

        precomputed(())
    }

    fn disconnect(&self, cause: OfflineCause) -> Precomputed<()> {
        if self
            .offline
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            debug!(node = %self.name, %cause, "Node is offline");
        }

        self.set_temporarily_offline(false, Some(cause));

        precomputed(())
    }
}
