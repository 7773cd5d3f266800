//! Error taxonomy for the results pipeline.

/// Every way a render cycle can fail. All of them are terminal for the current
/// selection; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("format error in {source_name}: {detail}")]
    Format { source_name: String, detail: String },

    #[error("no circuit matched between {votes} voting circuits and {geometries} geometries")]
    JoinMismatch { votes: usize, geometries: usize },

    #[error("no votes recorded for {scope}; percentages are undefined")]
    DivisionDegenerate { scope: String },

    #[error("unknown {field} '{value}'")]
    Selection { field: &'static str, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn format(source_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Format { source_name: source_name.into(), detail: detail.into() }
    }

    pub(crate) fn network(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Network { url: url.into(), reason: reason.to_string() }
    }
}
