//! Class layouts under the htb root qdisc.
//!
//! ```text
//!   FlatTree                          SharedTree
//!
//!   ┌──────────────┐                  ┌──────────────┐
//!   │ qdisc 1:     │                  │ qdisc 1:     │
//!   │ default 1    │                  │ default 2    │
//!   └──────┬───────┘                  └──────┬───────┘
//!          ▼                                 ▼
//!   ┌──────────────┐                  ┌──────────────┐
//!   │ class 1:1    │                  │ class 1:1    │  aggregate limit of the link
//!   └──────┬───────┘                  └──────┬───────┘
//!          ▼                        ┌────────┼──────────────┐
//!   ┌──────────────┐                ▼        ▼              ▼
//!   │ sfq 2:       │         ┌───────────┐ ┌───────────┐ ┌───────────┐
//!   └──────────────┘         │ class 1:2 │ │ class 1:3 │ │ class 1:n │
//!                            │ no floor  │ │ floor     │ │ floor     │
//!                            └─────┬─────┘ └─────┬─────┘ └─────┬─────┘
//!                                  ▼             ▼             ▼
//!                               sfq 2:        sfq 3:        sfq n:
//! ```
//!
//! In the shared layout every interface with a guaranteed floor gets its own class below the
//! aggregate one (see [`Shaper::plug`](crate::Shaper::plug)); everything else shares `1:2`.

use std::fmt;

use netbw_tc::handle::TcHandle;
use netbw_tc::htb::{HtbClassParams, HtbClassRequest};
use netbw_tc::TcCommand;

/// Minor of the class holding the aggregate limit in a [`SharedTree`].
pub const SHARED_PARENT_MINOR: u16 = 1;

/// Minor of the class for traffic without a guaranteed floor in a [`SharedTree`].
pub const UNGUARANTEED_MINOR: u16 = 2;

/// Builds the htb classes of a shaped device.
pub trait ClassTree: fmt::Debug + Send + Sync {
    /// Minor number of the class unclassified traffic falls into.
    fn default_class(&self) -> u16;

    /// The class the sfq leaf qdisc attaches to.
    fn leaf_class(&self) -> TcHandle;

    /// The commands creating the classes, parents first.
    fn classes(&self, device: &str, params: HtbClassParams) -> Vec<TcCommand>;
}

/// A single class `1:1` directly below the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTree;

impl ClassTree for FlatTree {
    fn default_class(&self) -> u16 {
        1
    }

    fn leaf_class(&self) -> TcHandle {
        TcHandle::root_class(1)
    }

    fn classes(&self, device: &str, params: HtbClassParams) -> Vec<TcCommand> {
        vec![HtbClassRequest::add(device, TcHandle::root_class(1))
            .with_parent(TcHandle::root_qdisc())
            .with_params(params)
            .into()]
    }
}

/// An aggregate class `1:1` shared by several interfaces on one link, with `1:2` below it for
/// traffic that has no guaranteed floor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedTree;

impl SharedTree {
    /// The class floor classes are plugged under.
    pub const fn shared_parent() -> TcHandle {
        TcHandle::root_class(SHARED_PARENT_MINOR)
    }

    /// The class of a plugged interface.
    pub const fn floor_class(id: u16) -> TcHandle {
        TcHandle::root_class(id)
    }
}

impl ClassTree for SharedTree {
    fn default_class(&self) -> u16 {
        UNGUARANTEED_MINOR
    }

    fn leaf_class(&self) -> TcHandle {
        TcHandle::root_class(UNGUARANTEED_MINOR)
    }

    fn classes(&self, device: &str, params: HtbClassParams) -> Vec<TcCommand> {
        // The aggregate class only caps the link; guarantees are handed out below it.
        let limit = params.ceil.unwrap_or(params.rate);

        vec![
            HtbClassRequest::add(device, Self::shared_parent())
                .with_parent(TcHandle::root_qdisc())
                .with_params(HtbClassParams::new(limit).with_ceil(limit))
                .into(),
            HtbClassRequest::add(device, TcHandle::root_class(UNGUARANTEED_MINOR))
                .with_parent(Self::shared_parent())
                .with_params(params)
                .into(),
        ]
    }
}

/// Returns the layout selected by the `hierarchical` flag.
pub fn class_tree(hierarchical: bool) -> &'static dyn ClassTree {
    if hierarchical {
        &SharedTree
    } else {
        &FlatTree
    }
}
