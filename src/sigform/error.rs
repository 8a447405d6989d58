use thiserror::Error;

#[derive(Error, Debug)]
pub enum SigformError {
    /// A draft was committed with an empty name. The draft stays open so the
    /// caller can re-prompt.
    #[error("Name must be specified")]
    MissingName,

    /// A draft was committed with an account pattern that does not compile.
    /// The draft stays open.
    #[error("Invalid account pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A positional operation addressed a record that does not exist.
    #[error("No record at position {position} (list has {len})")]
    NoSuchRecord { position: usize, len: usize },

    /// `begin_create`/`begin_edit` while a draft is already open.
    #[error("A draft is already open")]
    DraftAlreadyOpen,

    /// `commit`/`cancel` with no open draft.
    #[error("No draft is open")]
    NoOpenDraft,

    /// A structural mutation would disturb the open draft's target.
    #[error("Operation conflicts with the open draft")]
    DraftOpen,

    /// A document violated the expected shape (unknown element or attribute,
    /// stray text, missing name). On `load` this folds into the empty-store
    /// fallback; `from_xml` surfaces it.
    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, SigformError>;
