//! Queueing discipline requests (`tc qdisc ...`).

use std::fmt;

use crate::command::Action;
use crate::handle::TcHandle;

/// Re-hash interval of the stochastic fair queue, in seconds.
pub const DEFAULT_SFQ_PERTURB_SECS: u32 = 10;

/// The qdisc types we know how to configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QdiscKind {
    /// Hierarchical token bucket. Unclassified traffic goes to class `major:default_class`.
    Htb {
        /// Minor number of the default class.
        default_class: u16,
    },
    /// Stochastic fair queueing, used as the leaf of an htb class so a single flow can't
    /// monopolize it.
    Sfq {
        /// Re-hash interval in seconds.
        perturb_secs: u32,
    },
}

impl fmt::Display for QdiscKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Htb { default_class } => write!(f, "htb default {default_class:x}"),
            Self::Sfq { perturb_secs } => write!(f, "sfq perturb {perturb_secs}"),
        }
    }
}

/// A `tc qdisc` command.
///
/// The parent defaults to [`TcHandle::Root`]. Using [`TcHandle::Ingress`] as parent addresses
/// the ingress qdisc itself.
///
/// # Example
///
/// ```
/// use netbw_tc::handle::TcHandle;
/// use netbw_tc::qdisc::{QdiscKind, QdiscRequest};
///
/// let request = QdiscRequest::add("eth0")
///     .with_handle(TcHandle::root_qdisc())
///     .with_kind(QdiscKind::Htb { default_class: 1 });
///
/// assert_eq!(request.to_string(), "qdisc add dev eth0 root handle 1: htb default 1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QdiscRequest {
    pub action: Action,
    pub device: String,
    pub parent: TcHandle,
    pub handle: Option<TcHandle>,
    pub kind: Option<QdiscKind>,
}

impl QdiscRequest {
    /// Create a new request for the given device, attached at the root.
    pub fn new(action: Action, device: impl Into<String>) -> Self {
        Self { action, device: device.into(), parent: TcHandle::Root, handle: None, kind: None }
    }

    /// Shorthand for [`Action::Add`].
    pub fn add(device: impl Into<String>) -> Self {
        Self::new(Action::Add, device)
    }

    /// Shorthand for [`Action::Delete`].
    pub fn delete(device: impl Into<String>) -> Self {
        Self::new(Action::Delete, device)
    }

    /// Set the parent handle.
    pub fn with_parent(mut self, parent: TcHandle) -> Self {
        self.parent = parent;
        self
    }

    /// Set this qdisc's handle.
    pub fn with_handle(mut self, handle: TcHandle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Set the qdisc type and its parameters.
    pub fn with_kind(mut self, kind: QdiscKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

impl fmt::Display for QdiscRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "qdisc {} dev {} ", self.action, self.device)?;

        match self.parent {
            TcHandle::Root | TcHandle::Ingress => write!(f, "{}", self.parent)?,
            parent => write!(f, "parent {parent}")?,
        }

        if let Some(handle) = self.handle {
            write!(f, " handle {handle}")?;
        }

        if let Some(kind) = self.kind {
            write!(f, " {kind}")?;
        }

        Ok(())
    }
}
