//! A single `tc` invocation as a value.

use std::fmt;

use crate::filter::FilterRequest;
use crate::htb::HtbClassRequest;
use crate::qdisc::QdiscRequest;

/// The `tc` verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Add,
    Change,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Change => f.write_str("change"),
            Self::Delete => f.write_str("del"),
        }
    }
}

/// One `tc` command, without the program name.
///
/// The [`fmt::Display`] implementation renders the exact argument string passed to `tc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TcCommand {
    Qdisc(QdiscRequest),
    Class(HtbClassRequest),
    Filter(FilterRequest),
}

impl TcCommand {
    /// The kind of change the command makes.
    pub const fn action(&self) -> Action {
        match self {
            Self::Qdisc(req) => req.action,
            Self::Class(req) => req.action,
            Self::Filter(req) => req.action,
        }
    }

    /// Returns the device this command targets.
    pub fn device(&self) -> &str {
        match self {
            Self::Qdisc(req) => &req.device,
            Self::Class(req) => &req.device,
            Self::Filter(req) => &req.device,
        }
    }

    /// Deletions are expected to fail when there is nothing to delete.
    pub const fn is_delete(&self) -> bool {
        matches!(self.action(), Action::Delete)
    }

    /// Returns the arguments to pass to `tc`, in order.
    pub fn args(&self) -> Vec<String> {
        self.to_string().split_ascii_whitespace().map(str::to_owned).collect()
    }
}

impl fmt::Display for TcCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Qdisc(req) => req.fmt(f),
            Self::Class(req) => req.fmt(f),
            Self::Filter(req) => req.fmt(f),
        }
    }
}

impl From<QdiscRequest> for TcCommand {
    fn from(value: QdiscRequest) -> Self {
        Self::Qdisc(value)
    }
}

impl From<HtbClassRequest> for TcCommand {
    fn from(value: HtbClassRequest) -> Self {
        Self::Class(value)
    }
}

impl From<FilterRequest> for TcCommand {
    fn from(value: FilterRequest) -> Self {
        Self::Filter(value)
    }
}
