//! TC handle notation.
//!
//! TC handles are 32-bit values split into major:minor (16:16 bits). `tc` accepts several textual
//! spellings of the same handle (`1:`, `1:0`, `:1`, `1`), and the command lines we emit rely on
//! specific spellings, so the notation is modelled explicitly instead of as a bare `u32`.

use std::fmt;

/// Major number of the htb root qdisc (`1:`).
pub const ROOT_MAJOR: u16 = 1;

/// Major number reserved by the kernel for the ingress qdisc (`ffff:`).
pub const INGRESS_MAJOR: u16 = 0xffff;

/// A qdisc or class handle.
///
/// Numbers are rendered in hexadecimal, which is how `tc` parses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TcHandle {
    /// The `root` attachment point of an interface.
    Root,
    /// The `ingress` attachment point of an interface.
    Ingress,
    /// A qdisc handle, rendered as `major:`.
    Qdisc(u16),
    /// A class handle, rendered as `major:minor`.
    Class(u16, u16),
}

impl TcHandle {
    /// The htb root qdisc handle, `1:`.
    pub const fn root_qdisc() -> Self {
        Self::Qdisc(ROOT_MAJOR)
    }

    /// The handle used by filters to address the root qdisc, `1:0`.
    pub const fn root_filter_parent() -> Self {
        Self::Class(ROOT_MAJOR, 0)
    }

    /// The parent handle filters attach to on the ingress qdisc, `ffff:`.
    pub const fn ingress_parent() -> Self {
        Self::Qdisc(INGRESS_MAJOR)
    }

    /// A class directly below the htb root, `1:minor`.
    pub const fn root_class(minor: u16) -> Self {
        Self::Class(ROOT_MAJOR, minor)
    }
}

impl fmt::Display for TcHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("root"),
            Self::Ingress => f.write_str("ingress"),
            Self::Qdisc(major) => write!(f, "{major:x}:"),
            Self::Class(major, minor) => write!(f, "{major:x}:{minor:x}"),
        }
    }
}

/// The target class of a filter (`flowid`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowId {
    /// A fully qualified class, e.g. `1:3`.
    Class(TcHandle),
    /// A minor number relative to the filter's qdisc, rendered as `:minor`.
    Minor(u16),
    /// A bare class number, rendered as-is (`flowid 1`).
    Bare(u32),
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(handle) => handle.fmt(f),
            Self::Minor(minor) => write!(f, ":{minor:x}"),
            Self::Bare(id) => write!(f, "{id}"),
        }
    }
}
