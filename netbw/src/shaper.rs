//! Compiling a [`Bandwidth`] into `tc` commands.
//!
//! The interface handed to the [`Shaper`] is the host side of the endpoint: inbound traffic (to
//! the endpoint) leaves through it and is shaped by an htb class tree, outbound traffic (from the
//! endpoint) arrives on it and is policed on ingress, where no queueing is available.
//!
//! Command order matters: later commands reference handles created by earlier ones.

use netbw_tc::filter::{Classifier, FilterRequest, Police, Protocol, U32Match};
use netbw_tc::handle::{FlowId, TcHandle};
use netbw_tc::htb::HtbClassParams;
use netbw_tc::qdisc::{QdiscKind, QdiscRequest};
use netbw_tc::units::{Kb, Kbps};
use netbw_tc::{Executor, TcCommand};

use crate::config::ShaperConfig;
use crate::error::{Error, Result};
use crate::rate::{Bandwidth, Rate};
use crate::tree::{class_tree, ClassTree};

/// Firewall mark matched by the root fw filter.
const FW_HANDLE: u32 = 1;

/// Generates, and optionally applies, the traffic control configuration of a device.
#[derive(Debug, Clone, Default)]
pub struct Shaper {
    config: ShaperConfig,
}

impl Shaper {
    /// Create a shaper with the given tunables.
    pub fn new(config: ShaperConfig) -> Self {
        Self { config }
    }

    /// Returns the shaper's tunables.
    pub fn config(&self) -> &ShaperConfig {
        &self.config
    }

    /// Commands removing any root and ingress qdisc from `device`.
    ///
    /// Both deletions fail when there is nothing to delete; executors are expected to tolerate
    /// that.
    pub fn clear(&self, device: &str) -> Result<Vec<TcCommand>> {
        validate_device(device)?;

        Ok(vec![
            QdiscRequest::delete(device).into(),
            QdiscRequest::delete(device).with_parent(TcHandle::Ingress).into(),
        ])
    }

    /// Compiles `bandwidth` into the ordered commands enforcing it on `device`.
    ///
    /// The sequence always starts by clearing the device; an absent `bandwidth` yields just
    /// that. `hierarchical` selects the [`SharedTree`](crate::SharedTree) class layout instead
    /// of the [`FlatTree`](crate::FlatTree) one.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `device` is empty or contains whitespace.
    pub fn generate(
        &self,
        device: &str,
        bandwidth: Option<&Bandwidth>,
        hierarchical: bool,
    ) -> Result<Vec<TcCommand>> {
        self.generate_with(device, bandwidth, class_tree(hierarchical))
    }

    /// Like [`Shaper::generate`], with an explicit class layout.
    pub fn generate_with(
        &self,
        device: &str,
        bandwidth: Option<&Bandwidth>,
        tree: &dyn ClassTree,
    ) -> Result<Vec<TcCommand>> {
        let mut commands = self.clear(device)?;

        let Some(bandwidth) = bandwidth else {
            tracing::debug!(device, "no bandwidth configured, clearing only");
            return Ok(commands);
        };

        if let Some(rate) = bandwidth.inbound() {
            self.shape(device, rate, tree, &mut commands);
        }

        if let Some(rate) = bandwidth.outbound() {
            self.police(device, rate, &mut commands);
        }

        tracing::debug!(device, ?tree, commands = commands.len(), "generated tc commands");

        Ok(commands)
    }

    /// Egress shaping: htb root, the tree's classes, an sfq leaf and the fw filter.
    fn shape(
        &self,
        device: &str,
        rate: &Rate,
        tree: &dyn ClassTree,
        commands: &mut Vec<TcCommand>,
    ) {
        let Some(average) = rate.average() else {
            tracing::debug!(device, ?rate, "inbound rate without average, not shaping");
            return;
        };

        let params = HtbClassParams::new(Kbps(average))
            .with_ceil(Kbps(rate.peak().unwrap_or(average)))
            .with_burst(rate.burst().map(Kb));

        commands.push(
            QdiscRequest::add(device)
                .with_handle(TcHandle::root_qdisc())
                .with_kind(QdiscKind::Htb { default_class: tree.default_class() })
                .into(),
        );

        commands.extend(tree.classes(device, params));

        commands.push(
            QdiscRequest::add(device)
                .with_parent(tree.leaf_class())
                .with_handle(TcHandle::Qdisc(self.config.leaf_major))
                .with_kind(QdiscKind::Sfq { perturb_secs: self.config.sfq_perturb_secs })
                .into(),
        );

        commands.push(
            FilterRequest::add(device)
                .with_parent(TcHandle::root_filter_parent())
                .with_protocol(Protocol::Ip)
                .with_classifier(Classifier::Fw { handle: FW_HANDLE })
                .with_flow_id(FlowId::Bare(1))
                .into(),
        );
    }

    /// Ingress policing: the ingress qdisc and a match-all u32 filter dropping excess traffic.
    fn police(&self, device: &str, rate: &Rate, commands: &mut Vec<TcCommand>) {
        let Some(average) = rate.average() else {
            tracing::debug!(device, ?rate, "outbound rate without average, not policing");
            return;
        };

        if rate.floor().is_some() {
            tracing::debug!(device, "ignoring floor on outbound rate");
        }

        let police = Police::new(Kbps(average))
            .with_burst(rate.burst().map(Kb))
            .with_mtu(self.config.police_mtu);

        commands.push(QdiscRequest::add(device).with_parent(TcHandle::Ingress).into());

        commands.push(
            FilterRequest::add(device)
                .with_parent(TcHandle::ingress_parent())
                .with_protocol(Protocol::Ip)
                .with_classifier(Classifier::U32 {
                    matches: vec![U32Match::any_ip_src()],
                    police: Some(police),
                })
                .with_flow_id(FlowId::Minor(1))
                .into(),
        );
    }

    /// Executes `commands` in order. See [`Executor::apply`] for failure semantics.
    pub fn apply<E: Executor + ?Sized>(
        &self,
        executor: &mut E,
        commands: &[TcCommand],
    ) -> Result<()> {
        executor.apply(commands).map_err(Error::from)
    }

    /// Generates the configuration of `device` and applies it.
    ///
    /// If a command fails, the device is left partially configured.
    pub fn set<E: Executor + ?Sized>(
        &self,
        executor: &mut E,
        device: &str,
        bandwidth: Option<&Bandwidth>,
        hierarchical: bool,
    ) -> Result<()> {
        let commands = self.generate(device, bandwidth, hierarchical)?;
        self.apply(executor, &commands)
    }

    /// Removes any shaping and policing from `device`.
    pub fn unset<E: Executor + ?Sized>(&self, executor: &mut E, device: &str) -> Result<()> {
        let commands = self.clear(device)?;
        self.apply(executor, &commands)
    }
}

/// Compiles `bandwidth` for `device` with the default [`ShaperConfig`].
pub fn generate(
    device: &str,
    bandwidth: Option<&Bandwidth>,
    hierarchical: bool,
) -> Result<Vec<TcCommand>> {
    Shaper::default().generate(device, bandwidth, hierarchical)
}

/// The device name becomes a single `tc` argument.
pub(crate) fn validate_device(device: &str) -> Result<()> {
    if device.is_empty() {
        return Err(Error::invalid("empty interface name"));
    }

    if device.chars().any(char::is_whitespace) {
        return Err(Error::invalid(format!("interface name '{device}' contains whitespace")));
    }

    Ok(())
}
