use quick_xml::events::attributes::AttrError;

/// Errors returned when building, parsing or applying a bandwidth configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("malformed bandwidth document")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed attribute in bandwidth document")]
    Attr(#[from] AttrError),
    #[error("failed to execute tc command")]
    Execution(#[from] netbw_tc::runner::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
