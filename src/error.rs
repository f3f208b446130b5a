use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read registry file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse registry: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Unknown model slug '{0}'")]
    UnknownModel(String),

    #[error("No models configured in registry")]
    NoModels,

    #[error("Missing API key: set {0} or pass it on the command line")]
    MissingApiKey(&'static str),

    #[error("Failed to read prompt file '{path}': {source}")]
    ReadPrompt {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read data directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No simulation descriptors found in {0}")]
    NoCases(PathBuf),

    #[error("Failed to read results file '{path}': {source}")]
    ReadResults {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse results file '{path}': {source}")]
    ParseResults {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("Failed to read image '{path}': {source}")]
    ImageRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl AdapterError {
    /// The three failure classes eligible for retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AdapterError::Timeout(_) | AdapterError::Connect(_) | AdapterError::Status { .. }
        )
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout(err)
        } else if err.is_connect() {
            AdapterError::Connect(err)
        } else {
            AdapterError::Transport(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("{label}: retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        label: String,
        attempts: u32,
        #[source]
        source: AdapterError,
    },

    #[error("{label}: retry loop ended without an attempt (max_retries = 0)")]
    NoAttempts { label: String },

    #[error("No completed runs for model '{0}'")]
    NoCompletedRuns(String),

    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write result file: {0}")]
    Write(std::io::Error),

    #[error("Failed to persist result file '{path}': {source}")]
    Persist {
        path: PathBuf,
        source: tempfile::PersistError,
    },

    #[error("Failed to read checkpoint '{path}': {source}")]
    ReadCheckpoint {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse checkpoint '{path}': {source}")]
    ParseCheckpoint {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
