//! Guaranteed-floor classes on a bridge shaped with a [`SharedTree`].
//!
//! Each interface with an inbound floor gets its own class `1:id` below the aggregate class
//! `1:1`, guaranteed `floor` and allowed to borrow up to the network's ceiling. Traffic is
//! steered into it by destination MAC address, the only thing known about the interface at this
//! level.

use netbw_tc::filter::{Classifier, FilterRequest, Protocol, U32Match};
use netbw_tc::handle::{FlowId, TcHandle};
use netbw_tc::htb::{HtbClassParams, HtbClassRequest};
use netbw_tc::qdisc::{QdiscKind, QdiscRequest};
use netbw_tc::units::Kbps;
use netbw_tc::TcCommand;
use pnet::util::MacAddr;

use crate::error::{Error, Result};
use crate::rate::{Bandwidth, Rate};
use crate::shaper::{validate_device, Shaper};
use crate::tree::{SharedTree, UNGUARANTEED_MINOR};

const ETH_P_IP: u16 = 0x0800;

impl Shaper {
    /// Commands adding a floor class for the interface with address `mac` to `bridge`.
    ///
    /// `network` is the bandwidth of the bridge's network, which must have an inbound average;
    /// `bandwidth` is the interface's, which must have an inbound floor. `id` must be above the
    /// minors reserved by [`SharedTree`].
    pub fn plug(
        &self,
        bridge: &str,
        network: &Bandwidth,
        mac: MacAddr,
        bandwidth: &Bandwidth,
        id: u16,
    ) -> Result<Vec<TcCommand>> {
        validate_device(bridge)?;
        validate_floor_id(id)?;

        let ceil = network_ceil(network)?;
        let floor = bandwidth
            .inbound()
            .and_then(Rate::floor)
            .ok_or_else(|| Error::invalid("interface has no inbound floor"))?;

        let class_id = SharedTree::floor_class(id);
        tracing::debug!(bridge, %mac, id, floor, ceil, "plugging floor class");

        Ok(vec![
            HtbClassRequest::add(bridge, class_id)
                .with_parent(SharedTree::shared_parent())
                .with_params(HtbClassParams::new(Kbps(floor)).with_ceil(Kbps(ceil)))
                .into(),
            QdiscRequest::add(bridge)
                .with_parent(class_id)
                .with_handle(TcHandle::Qdisc(id))
                .with_kind(QdiscKind::Sfq { perturb_secs: self.config().sfq_perturb_secs })
                .into(),
            FilterRequest::add(bridge)
                .with_parent(TcHandle::root_filter_parent())
                .with_protocol(Protocol::All)
                .with_prio(id.into())
                .with_classifier(Classifier::U32 { matches: ether_dst_matches(mac), police: None })
                .with_flow_id(FlowId::Class(class_id))
                .into(),
        ])
    }

    /// Commands removing the floor class `id` from `bridge`, in reverse order of creation.
    pub fn unplug(&self, bridge: &str, id: u16) -> Result<Vec<TcCommand>> {
        validate_device(bridge)?;
        validate_floor_id(id)?;

        let class_id = SharedTree::floor_class(id);
        tracing::debug!(bridge, id, "unplugging floor class");

        Ok(vec![
            QdiscRequest::delete(bridge)
                .with_parent(class_id)
                .with_handle(TcHandle::Qdisc(id))
                .into(),
            FilterRequest::delete(bridge).with_prio(id.into()).into(),
            HtbClassRequest::delete(bridge, class_id).into(),
        ])
    }

    /// Command changing the guaranteed rate of class `id` on `bridge` to `rate` kbps.
    ///
    /// Used both for floor classes and for the class of non-guaranteed traffic, whose rate is
    /// what remains of the network's average once the floors are taken out.
    pub fn update_rate(
        &self,
        bridge: &str,
        id: u16,
        network: &Bandwidth,
        rate: u64,
    ) -> Result<Vec<TcCommand>> {
        validate_device(bridge)?;

        if id < UNGUARANTEED_MINOR {
            return Err(Error::invalid(format!("class 1:{id:x} can't have its rate updated")));
        }
        if rate == 0 {
            return Err(Error::invalid("rate must be greater than zero"));
        }

        let ceil = network_ceil(network)?;
        tracing::debug!(bridge, id, rate, ceil, "updating class rate");

        Ok(vec![HtbClassRequest::change(bridge, SharedTree::floor_class(id))
            .with_params(HtbClassParams::new(Kbps(rate)).with_ceil(Kbps(ceil)))
            .into()])
    }
}

fn validate_floor_id(id: u16) -> Result<()> {
    if id <= UNGUARANTEED_MINOR {
        return Err(Error::invalid(format!(
            "floor class id must be greater than {UNGUARANTEED_MINOR}, got {id}"
        )));
    }

    Ok(())
}

/// The rate floor classes may borrow up to: the network's inbound peak, or its average.
fn network_ceil(network: &Bandwidth) -> Result<u64> {
    network
        .inbound()
        .filter(|rate| rate.average().is_some())
        .and_then(Rate::ceil)
        .ok_or_else(|| Error::invalid("network has no inbound average"))
}

/// Selectors matching IPv4 frames destined to `mac`.
///
/// Offsets are relative to the IP header: the ethertype sits 2 bytes before it and the
/// destination address starts 14 bytes before it.
fn ether_dst_matches(mac: MacAddr) -> Vec<U32Match> {
    let MacAddr(a, b, c, d, e, f) = mac;

    vec![
        U32Match::U16 { value: ETH_P_IP, mask: 0xffff, at: -2 },
        U32Match::U32 { value: u32::from_be_bytes([c, d, e, f]), mask: 0xffff_ffff, at: -12 },
        U32Match::U16 { value: u16::from_be_bytes([a, b]), mask: 0xffff, at: -14 },
    ]
}
