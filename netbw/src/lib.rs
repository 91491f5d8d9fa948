#![doc(issue_tracker_base_url = "https://github.com/chainbound/netbw/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! # Interface Bandwidth
//!
//! Per-interface quality of service: a [`Bandwidth`] specification holds an optional [`Rate`]
//! for each direction of traffic, and the [`Shaper`] compiles it into the `tc` commands that
//! enforce it.
//!
//! ```
//! use netbw::{Bandwidth, Rate};
//! use netbw_tc::DryRun;
//!
//! let bandwidth = Bandwidth::new()
//!     .with_inbound(Rate::new().with_average(1000).with_peak(5000))
//!     .with_outbound(Rate::new().with_average(128));
//!
//! let mut dry_run = DryRun::default();
//! netbw::Shaper::default().set(&mut dry_run, "vnet0", Some(&bandwidth), false).unwrap();
//!
//! assert!(dry_run.buffer().starts_with("/sbin/tc qdisc del dev vnet0 root\n"));
//! ```
//!
//! Specifications are combined with [`minimal`], compared with [`equal`], and stored in their
//! XML form with [`format`] and [`parse`].

mod config;
pub use config::{ShaperConfig, DEFAULT_LEAF_MAJOR};

mod error;
pub use error::{Error, Result};

mod floor;

mod merge;
pub use merge::minimal;

mod rate;
pub use rate::{equal, Bandwidth, Rate};

mod shaper;
pub use shaper::{generate, Shaper};

mod tree;
pub use tree::{class_tree, ClassTree, FlatTree, SharedTree};

mod xml;
pub use xml::{format, parse};

pub use netbw_tc;
