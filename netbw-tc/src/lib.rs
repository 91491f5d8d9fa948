#![doc(issue_tracker_base_url = "https://github.com/chainbound/netbw/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! # Traffic Control Commands
//!
//! Typed builders for the handful of Linux traffic control (`tc`) commands used to shape and
//! police a network interface, and the [`Executor`] seam that runs them.
//!
//! ```text
//!   egress (shaping)                        ingress (policing)
//!
//!   ┌──────────────────────────┐            ┌──────────────────────────┐
//!   │ htb root qdisc 1:        │            │ ingress qdisc ffff:      │
//!   │ default class 1          │            └────────────┬─────────────┘
//!   └────────────┬─────────────┘                         │
//!                ▼                                       ▼
//!   ┌──────────────────────────┐            ┌──────────────────────────┐
//!   │ htb class 1:1            │            │ u32 filter, match all    │
//!   │ rate / ceil / burst      │            │ police rate / burst      │
//!   └────────────┬─────────────┘            │ drop on exceed           │
//!                ▼                          └──────────────────────────┘
//!   ┌──────────────────────────┐
//!   │ sfq qdisc 2:             │
//!   │ perturb 10               │
//!   └──────────────────────────┘
//! ```
//!
//! Commands are plain values: building them has no side effects, and their
//! [`Display`](std::fmt::Display) output is the exact argument string handed to `tc`.

pub mod command;
pub mod filter;
pub mod handle;
pub mod htb;
pub mod qdisc;
pub mod runner;
pub mod units;

pub use command::{Action, TcCommand};
pub use handle::{FlowId, TcHandle};
pub use runner::{DryRun, Executor, Runner};
