//! Bandwidth specifications.
//!
//! A [`Bandwidth`] holds an optional inbound and an optional outbound [`Rate`]. Every rate field
//! is optional on its own, and the value `0` always means "unset": the setters map it to `None`,
//! so there is no way to build a rate of zero that behaves differently from an absent one.

use std::num::NonZeroU64;

/// Rate limits for one direction of traffic.
///
/// # Example
///
/// ```
/// use netbw::Rate;
///
/// let rate = Rate::new().with_average(1000).with_peak(5000).with_burst(5120);
///
/// assert_eq!(rate.average(), Some(1000));
/// assert_eq!(rate.floor(), None);
/// assert_eq!(Rate::new().with_average(0), Rate::new());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rate {
    average: Option<NonZeroU64>,
    peak: Option<NonZeroU64>,
    floor: Option<NonZeroU64>,
    burst: Option<NonZeroU64>,
}

impl Rate {
    /// A rate with every field unset.
    pub const fn new() -> Self {
        Self { average: None, peak: None, floor: None, burst: None }
    }

    /// Set the sustained rate, in kbps. `0` unsets it.
    pub fn with_average(mut self, average: u64) -> Self {
        self.average = NonZeroU64::new(average);
        self
    }

    /// Set the maximum rate, in kbps. `0` unsets it.
    pub fn with_peak(mut self, peak: u64) -> Self {
        self.peak = NonZeroU64::new(peak);
        self
    }

    /// Set the guaranteed minimum rate, in kbps. `0` unsets it.
    ///
    /// Only meaningful for inbound traffic on a hierarchical class tree.
    pub fn with_floor(mut self, floor: u64) -> Self {
        self.floor = NonZeroU64::new(floor);
        self
    }

    /// Set the bucket size, in KB. `0` unsets it.
    pub fn with_burst(mut self, burst: u64) -> Self {
        self.burst = NonZeroU64::new(burst);
        self
    }

    /// The sustained rate in kbps, if set.
    pub fn average(&self) -> Option<u64> {
        self.average.map(NonZeroU64::get)
    }

    /// The maximum rate in kbps, if set.
    pub fn peak(&self) -> Option<u64> {
        self.peak.map(NonZeroU64::get)
    }

    /// The guaranteed minimum rate in kbps, if set.
    pub fn floor(&self) -> Option<u64> {
        self.floor.map(NonZeroU64::get)
    }

    /// The bucket size in KB, if set.
    pub fn burst(&self) -> Option<u64> {
        self.burst.map(NonZeroU64::get)
    }

    /// The rate a class may borrow up to: the peak if set, the average otherwise.
    pub fn ceil(&self) -> Option<u64> {
        self.peak().or_else(|| self.average())
    }

    /// Returns true if no field is set.
    pub const fn is_empty(&self) -> bool {
        self.average.is_none()
            && self.peak.is_none()
            && self.floor.is_none()
            && self.burst.is_none()
    }

    /// Field-wise maximum of two rates, an unset field losing to a set one.
    pub(crate) fn merge(&self, other: &Self) -> Self {
        // `None < Some(_)` for `Option`'s ordering.
        Self {
            average: self.average.max(other.average),
            peak: self.peak.max(other.peak),
            floor: self.floor.max(other.floor),
            burst: self.burst.max(other.burst),
        }
    }

    /// `None` if the rate has no field set.
    pub(crate) fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

/// The bandwidth configuration of one endpoint.
///
/// A direction with no field set is stored as absent, so comparing, merging and formatting never
/// see the difference between the two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bandwidth {
    inbound: Option<Rate>,
    outbound: Option<Rate>,
}

impl Bandwidth {
    /// A specification with neither direction set.
    pub const fn new() -> Self {
        Self { inbound: None, outbound: None }
    }

    /// Set the limits for traffic towards the endpoint.
    pub fn with_inbound(mut self, rate: Rate) -> Self {
        self.inbound = rate.non_empty();
        self
    }

    /// Set the limits for traffic leaving the endpoint.
    pub fn with_outbound(mut self, rate: Rate) -> Self {
        self.outbound = rate.non_empty();
        self
    }

    /// Limits for traffic towards the endpoint, shaped on the host side.
    pub const fn inbound(&self) -> Option<&Rate> {
        self.inbound.as_ref()
    }

    /// Limits for traffic leaving the endpoint, policed on the host side.
    pub const fn outbound(&self) -> Option<&Rate> {
        self.outbound.as_ref()
    }

    /// Returns true if neither direction is set.
    pub const fn is_empty(&self) -> bool {
        self.inbound.is_none() && self.outbound.is_none()
    }

    /// Builds a specification from already merged directions.
    pub(crate) fn from_parts(inbound: Option<Rate>, outbound: Option<Rate>) -> Self {
        Self {
            inbound: inbound.and_then(Rate::non_empty),
            outbound: outbound.and_then(Rate::non_empty),
        }
    }
}

/// Structural equality of two optional specifications.
///
/// Two absent specifications are equal, an absent one never equals a present one, and present
/// ones are equal when every field of both directions is set to the same value or unset in both.
pub fn equal(a: Option<&Bandwidth>, b: Option<&Bandwidth>) -> bool {
    a == b
}
