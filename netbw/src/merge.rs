//! Combining the bandwidth requirements of two endpoints.
//!
//! An interface and the network it attaches to each carry their own [`Bandwidth`]. The
//! specification applied to the underlying device is their [`minimal`] combination: every field
//! set by either side is kept, and a field set by both takes the larger value.

use crate::rate::{Bandwidth, Rate};

/// Returns the smallest specification satisfying the per-field requirements of both `a` and `b`.
///
/// - `minimal(None, None)` is `None`;
/// - `minimal(Some(x), None)` and `minimal(None, Some(x))` are `Some(x)`;
/// - otherwise each field of each direction is merged on its own: unset in both stays unset, set
///   in one takes that value, set in both takes the larger one. A merged direction with no field
///   set is absent.
///
/// The operation is commutative.
///
/// # Example
///
/// ```
/// use netbw::{minimal, Bandwidth, Rate};
///
/// let iface = Bandwidth::new().with_inbound(Rate::new().with_average(1).with_burst(4));
/// let net = Bandwidth::new().with_inbound(Rate::new().with_average(3).with_peak(6));
///
/// let merged = minimal(Some(&iface), Some(&net)).unwrap();
/// assert_eq!(merged.inbound(), Some(&Rate::new().with_average(3).with_peak(6).with_burst(4)));
/// ```
pub fn minimal(a: Option<&Bandwidth>, b: Option<&Bandwidth>) -> Option<Bandwidth> {
    match (a, b) {
        (None, None) => None,
        (Some(x), None) | (None, Some(x)) => Some(*x),
        (Some(a), Some(b)) => {
            let inbound = merge_direction(a.inbound(), b.inbound());
            let outbound = merge_direction(a.outbound(), b.outbound());

            tracing::trace!(?inbound, ?outbound, "merged bandwidth");

            Some(Bandwidth::from_parts(inbound, outbound))
        }
    }
}

fn merge_direction(a: Option<&Rate>, b: Option<&Rate>) -> Option<Rate> {
    match (a, b) {
        (None, None) => None,
        (Some(x), None) | (None, Some(x)) => Some(*x),
        (Some(a), Some(b)) => Some(a.merge(b)),
    }
}
