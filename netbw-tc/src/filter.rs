//! TC filter support (fw and u32 filters, u32 policing).
//!
//! Filters classify packets and route them to appropriate classes. On the ingress qdisc there
//! are no classes to route to, so a catch-all u32 filter carries a policing action instead.

use std::fmt;
use std::net::Ipv4Addr;

use crate::command::Action;
use crate::handle::{FlowId, TcHandle};
use crate::units::{Kb, Kbps};

/// Maximum packet size accepted by the policer.
pub const DEFAULT_POLICE_MTU: Kb = Kb(64);

/// The protocol a filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Ip,
    All,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip => f.write_str("ip"),
            Self::All => f.write_str("all"),
        }
    }
}

/// A single u32 selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum U32Match {
    /// Match the IPv4 source network, e.g. `ip src 0.0.0.0/0`.
    IpSrc { network: Ipv4Addr, prefix: u8 },
    /// Match 16 bits at byte offset `at`, e.g. `u16 0x0800 0xffff at -2`.
    U16 { value: u16, mask: u16, at: i32 },
    /// Match 32 bits at byte offset `at`.
    U32 { value: u32, mask: u32, at: i32 },
}

impl U32Match {
    /// Matches every IPv4 source.
    pub const fn any_ip_src() -> Self {
        Self::IpSrc { network: Ipv4Addr::UNSPECIFIED, prefix: 0 }
    }
}

impl fmt::Display for U32Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IpSrc { network, prefix } => write!(f, "ip src {network}/{prefix}"),
            Self::U16 { value, mask, at } => write!(f, "u16 0x{value:04x} 0x{mask:04x} at {at}"),
            Self::U32 { value, mask, at } => write!(f, "u32 0x{value:08x} 0x{mask:08x} at {at}"),
        }
    }
}

/// A policing action: traffic exceeding `rate` (with `burst` of slack) is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Police {
    pub rate: Kbps,
    pub burst: Option<Kb>,
    pub mtu: Kb,
}

impl Police {
    /// Create a policer with the given rate and the default MTU.
    pub fn new(rate: Kbps) -> Self {
        Self { rate, burst: None, mtu: DEFAULT_POLICE_MTU }
    }

    /// Set the bucket size, if any.
    pub fn with_burst(mut self, burst: Option<Kb>) -> Self {
        self.burst = burst;
        self
    }

    /// Set the maximum packet size accepted by the policer.
    pub fn with_mtu(mut self, mtu: Kb) -> Self {
        self.mtu = mtu;
        self
    }
}

impl fmt::Display for Police {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "police rate {}", self.rate)?;

        if let Some(burst) = self.burst {
            write!(f, " burst {burst}")?;
        }

        write!(f, " mtu {} drop", self.mtu)
    }
}

/// The classifier of a filter and its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Classifier {
    /// Match on the firewall mark set by netfilter.
    Fw { handle: u32 },
    /// Match on packet contents, optionally policing what matched.
    U32 { matches: Vec<U32Match>, police: Option<Police> },
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fw { handle } => write!(f, "handle {handle} fw"),
            Self::U32 { matches, police } => {
                f.write_str("u32")?;
                for m in matches {
                    write!(f, " match {m}")?;
                }
                if let Some(police) = police {
                    write!(f, " {police}")?;
                }
                Ok(())
            }
        }
    }
}

/// A `tc filter` command.
///
/// # Example
///
/// ```
/// use netbw_tc::filter::{Classifier, FilterRequest, Protocol};
/// use netbw_tc::handle::{FlowId, TcHandle};
///
/// let request = FilterRequest::add("eth0")
///     .with_parent(TcHandle::root_filter_parent())
///     .with_protocol(Protocol::Ip)
///     .with_classifier(Classifier::Fw { handle: 1 })
///     .with_flow_id(FlowId::Bare(1));
///
/// assert_eq!(request.to_string(), "filter add dev eth0 parent 1:0 protocol ip handle 1 fw flowid 1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterRequest {
    pub action: Action,
    pub device: String,
    pub parent: Option<TcHandle>,
    pub protocol: Option<Protocol>,
    /// Filter preference. Also used to address the filter when deleting it.
    pub prio: Option<u32>,
    pub classifier: Option<Classifier>,
    pub flow_id: Option<FlowId>,
}

impl FilterRequest {
    /// Create a new filter request for the given device.
    pub fn new(action: Action, device: impl Into<String>) -> Self {
        Self {
            action,
            device: device.into(),
            parent: None,
            protocol: None,
            prio: None,
            classifier: None,
            flow_id: None,
        }
    }

    /// Shorthand for [`Action::Add`].
    pub fn add(device: impl Into<String>) -> Self {
        Self::new(Action::Add, device)
    }

    /// Shorthand for [`Action::Delete`].
    pub fn delete(device: impl Into<String>) -> Self {
        Self::new(Action::Delete, device)
    }

    /// Set the qdisc handle the filter attaches to.
    pub fn with_parent(mut self, parent: TcHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the protocol the filter applies to.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Set the filter preference.
    pub fn with_prio(mut self, prio: u32) -> Self {
        self.prio = Some(prio);
        self
    }

    /// Set the classifier and its matches.
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Set the class matching traffic is routed to.
    pub fn with_flow_id(mut self, flow_id: FlowId) -> Self {
        self.flow_id = Some(flow_id);
        self
    }
}

impl fmt::Display for FilterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "filter {} dev {}", self.action, self.device)?;

        if let Some(parent) = self.parent {
            write!(f, " parent {parent}")?;
        }
        if let Some(protocol) = self.protocol {
            write!(f, " protocol {protocol}")?;
        }
        if let Some(prio) = self.prio {
            write!(f, " prio {prio}")?;
        }
        if let Some(classifier) = &self.classifier {
            write!(f, " {classifier}")?;
        }
        if let Some(flow_id) = self.flow_id {
            write!(f, " flowid {flow_id}")?;
        }

        Ok(())
    }
}
