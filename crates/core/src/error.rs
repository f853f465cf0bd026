//! Error types for content access, form validation and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Failure talking to the content repository.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid content URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to encode request body for {url}: {source}")]
    Encode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read corpus file {path}: {source}")]
    CorpusFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse corpus file {path}: {source}")]
    CorpusFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A lead form rejected before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid mobile number: {0}")]
    InvalidPhone(String),

    #[error("sample quantity must be between {min} and {max}, got {got}")]
    QuantityOutOfRange { got: u32, min: u32, max: u32 },

    #[error("requirements must be at least {min} characters")]
    RequirementsTooShort { min: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
}
