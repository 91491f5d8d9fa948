//! HTB (Hierarchical Token Bucket) class support (`tc class ...`).
//!
//! Every shaped interface gets an htb root qdisc (`1:`) and one or more classes below it. A class
//! has a guaranteed `rate`, a `ceil` it may borrow up to from its parent, and an optional
//! `burst` size for its token bucket.

use std::fmt;

use crate::command::Action;
use crate::handle::TcHandle;
use crate::units::{Kb, Kbps};

/// The shaping parameters of an htb class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HtbClassParams {
    /// Guaranteed rate.
    pub rate: Kbps,
    /// Ceiling rate. `tc` defaults it to `rate` when omitted.
    pub ceil: Option<Kbps>,
    /// Bucket size. `tc` computes one from the rate when omitted.
    pub burst: Option<Kb>,
}

impl HtbClassParams {
    /// Create class parameters with the given rate and no ceil or burst.
    pub fn new(rate: Kbps) -> Self {
        Self { rate, ceil: None, burst: None }
    }

    /// Set the ceiling rate.
    pub fn with_ceil(mut self, ceil: Kbps) -> Self {
        self.ceil = Some(ceil);
        self
    }

    /// Set the bucket size, if any.
    pub fn with_burst(mut self, burst: Option<Kb>) -> Self {
        self.burst = burst;
        self
    }
}

impl fmt::Display for HtbClassParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "htb rate {}", self.rate)?;

        if let Some(ceil) = self.ceil {
            write!(f, " ceil {ceil}")?;
        }

        if let Some(burst) = self.burst {
            write!(f, " burst {burst}")?;
        }

        Ok(())
    }
}

/// A `tc class` command targeting an htb class.
///
/// # Example
///
/// ```
/// use netbw_tc::handle::TcHandle;
/// use netbw_tc::htb::{HtbClassParams, HtbClassRequest};
/// use netbw_tc::units::Kbps;
///
/// let request = HtbClassRequest::add("eth0", TcHandle::root_class(1))
///     .with_parent(TcHandle::root_qdisc())
///     .with_params(HtbClassParams::new(Kbps(1000)).with_ceil(Kbps(5000)));
///
/// assert_eq!(
///     request.to_string(),
///     "class add dev eth0 parent 1: classid 1:1 htb rate 1000kbps ceil 5000kbps"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HtbClassRequest {
    pub action: Action,
    pub device: String,
    pub parent: Option<TcHandle>,
    pub class_id: TcHandle,
    pub params: Option<HtbClassParams>,
}

impl HtbClassRequest {
    /// Create a new class request for the given device and class id.
    pub fn new(action: Action, device: impl Into<String>, class_id: TcHandle) -> Self {
        Self { action, device: device.into(), parent: None, class_id, params: None }
    }

    /// Shorthand for [`Action::Add`].
    pub fn add(device: impl Into<String>, class_id: TcHandle) -> Self {
        Self::new(Action::Add, device, class_id)
    }

    /// Shorthand for [`Action::Change`]. Used to update the rate of an existing class.
    pub fn change(device: impl Into<String>, class_id: TcHandle) -> Self {
        Self::new(Action::Change, device, class_id)
    }

    /// Shorthand for [`Action::Delete`].
    pub fn delete(device: impl Into<String>, class_id: TcHandle) -> Self {
        Self::new(Action::Delete, device, class_id)
    }

    /// Set the parent handle (a qdisc or another class).
    pub fn with_parent(mut self, parent: TcHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the htb shaping parameters.
    pub fn with_params(mut self, params: HtbClassParams) -> Self {
        self.params = Some(params);
        self
    }
}

impl fmt::Display for HtbClassRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {} dev {}", self.action, self.device)?;

        if let Some(parent) = self.parent {
            write!(f, " parent {parent}")?;
        }

        write!(f, " classid {}", self.class_id)?;

        if let Some(params) = self.params {
            write!(f, " {params}")?;
        }

        Ok(())
    }
}
