use netbw_tc::filter::DEFAULT_POLICE_MTU;
use netbw_tc::qdisc::DEFAULT_SFQ_PERTURB_SECS;
use netbw_tc::units::Kb;

/// Major number of the sfq leaf qdisc attached below the shaped class (`2:`).
pub const DEFAULT_LEAF_MAJOR: u16 = 2;

/// Tunables of the generated command sequence.
///
/// The defaults produce the canonical layout; they only need changing to interoperate with
/// devices configured by other tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaperConfig {
    /// Re-hash interval of the sfq leaf, in seconds.
    pub sfq_perturb_secs: u32,
    /// Maximum packet size accepted by the ingress policer.
    pub police_mtu: Kb,
    /// Major number of the sfq leaf qdisc on a shaped interface.
    pub leaf_major: u16,
}

impl Default for ShaperConfig {
    fn default() -> Self {
        Self {
            sfq_perturb_secs: DEFAULT_SFQ_PERTURB_SECS,
            police_mtu: DEFAULT_POLICE_MTU,
            leaf_major: DEFAULT_LEAF_MAJOR,
        }
    }
}

impl ShaperConfig {
    /// Set the sfq re-hash interval, in seconds.
    pub fn with_sfq_perturb_secs(mut self, secs: u32) -> Self {
        self.sfq_perturb_secs = secs;
        self
    }

    /// Set the largest packet the ingress policer lets through.
    pub fn with_police_mtu(mut self, mtu: Kb) -> Self {
        self.police_mtu = mtu;
        self
    }

    /// Set the major number of the sfq leaf qdisc.
    pub fn with_leaf_major(mut self, major: u16) -> Self {
        self.leaf_major = major;
        self
    }
}
