use std::path::PathBuf;

/// Load-time errors shared by the touchmap crates.
///
/// Contract rule: the per-frame path (contact events, axis processing) never returns this type.
/// Only configuration and template loading can fail.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json parse error at {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON supplied in memory (no file path to report).
    #[error("json parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config at {}: {msg}", path.display())]
    InvalidConfig { path: PathBuf, msg: String },

    #[error("{0}")]
    Other(String),
}

impl MapError {
    pub fn other<T: Into<String>>(s: T) -> Self {
        MapError::Other(s.into())
    }

    /// Attach a file path to an error produced while parsing in-memory JSON.
    pub fn at_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            MapError::Parse(source) => MapError::Json {
                path: path.into(),
                source,
            },
            MapError::InvalidConfig { msg, .. } => MapError::InvalidConfig {
                path: path.into(),
                msg,
            },
            other => other,
        }
    }
}
