use std::path::PathBuf;

use thiserror::Error;

/// Errors from the fallible edges of the crate (file loading, parsing, splicing).
///
/// The scheduler itself never fails: rejection, stalls and interrupts are policy.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported file extension: {path} (expected .json, .yaml or .yml)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid scheduler config: {0}")]
    InvalidConfig(String),

    #[error("Unknown preset: {name}")]
    UnknownPreset { name: String },

    #[error("Splice index {index} out of range for template of length {len}")]
    SpliceOutOfRange { index: usize, len: usize },
}

impl CommandError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CommandError::Io { path: path.into(), source }
    }

    /// Errors caused by authored data rather than the environment.
    pub fn is_authoring_error(&self) -> bool {
        match self {
            CommandError::Io { .. } => false,
            CommandError::Json(_) => true,
            CommandError::Yaml(_) => true,
            CommandError::UnsupportedFormat { .. } => true,
            CommandError::InvalidConfig(_) => true,
            CommandError::UnknownPreset { .. } => true,
            CommandError::SpliceOutOfRange { .. } => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Data file format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataFormat {
    Json,
    Yaml,
}

impl DataFormat {
    pub(crate) fn from_path(path: &std::path::Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()).map(|ext| ext.to_ascii_lowercase()) {
            Some(ext) if ext == "json" => Ok(DataFormat::Json),
            Some(ext) if ext == "yaml" || ext == "yml" => Ok(DataFormat::Yaml),
            _ => Err(CommandError::UnsupportedFormat { path: path.to_path_buf() }),
        }
    }
}

/// Read and deserialize a JSON or YAML file.
pub(crate) fn load_data_file<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let format = DataFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|e| CommandError::io(path, e))?;
    match format {
        DataFormat::Json => Ok(serde_json::from_str(&text)?),
        DataFormat::Yaml => Ok(serde_yaml::from_str(&text)?),
    }
}
