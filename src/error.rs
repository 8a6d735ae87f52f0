use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes of dataset access and URL translation.
///
/// `KeyFormat` and `KeyNotFound` are deliberately distinct so callers can tell
/// "wrong shape" from "absent": a key that does not fit a dataset's naming
/// pattern is the former, a well-formed key with no entry behind it the latter.
#[derive(Debug, Error)]
pub enum Error {
    /// The key template itself could not be compiled.
    #[error("invalid key template `{template}`: {reason}")]
    Template { template: String, reason: String },

    /// A key or entry name does not fit the dataset's naming pattern.
    #[error("{detail} (template `{template}`)")]
    KeyFormat { template: String, detail: String },

    /// A well-formed key with no entry behind it.
    #[error("no entry named `{0}`")]
    KeyNotFound(String),

    /// An entry name (or dataset name) owned by no registered dataset.
    #[error("no dataset registered for `{0}`")]
    UnknownDataset(String),

    /// Two registered dataset prefixes would both claim some entry names.
    #[error("dataset prefixes `{0}` and `{1}` overlap")]
    AmbiguousPrefixes(String, String),

    /// Input matches none of the recognised arXiv URI shapes.
    #[error("not an arXiv identifier: `{0}`")]
    UriParse(String),

    /// The platform exposes no per-user data directory.
    #[error("no platform data directory available")]
    NoDataDir,

    #[error("invalid archive url")]
    InvalidUrl(#[from] url::ParseError),

    #[error("download of {url} failed")]
    Fetch {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error(transparent)]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
