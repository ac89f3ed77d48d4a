use arcstr::ArcStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Two distinct module definitions share a name that is not on the
    /// library reuse list.
    #[error("duplicate module name: {0}")]
    DuplicateModuleName(ArcStr),

    #[error(
        "instance {instance} of {master} in module {module}: \
         {found} connections for {expected} pins"
    )]
    PinCountMismatch {
        module: ArcStr,
        instance: ArcStr,
        master: ArcStr,
        expected: usize,
        found: usize,
    },

    #[error("module {module}: {instances} instances but {connections} connection records")]
    UnconnectedInstance {
        module: ArcStr,
        instances: usize,
        connections: usize,
    },

    #[error("library cell not found: {0}")]
    LibraryCellNotFound(ArcStr),

    #[error("malformed hierarchy in module {module}: {reason}")]
    MalformedHierarchy { module: ArcStr, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
