//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading and normalizing an SDK configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required section or key is absent. Holds the dotted key path.
    #[error("{0} has not been set")]
    Missing(&'static str),

    /// Two keys of one table differ only in case.
    #[error("duplicate key '{0}': keys are case-insensitive")]
    DuplicateKey(String),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration file '{0}' not found. Please copy the template:\n\
             cp config/config.template.toml {0}\n\
             Then edit {0} with your actual values.")]
    NotFound(String),

    #[error("parse private key failed: {0}")]
    Key(#[from] KeyError),

    #[error("{expected} private key required, but found {found}")]
    CurveMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("failed to encode configuration: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors raised while decoding an account private key.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("failed to read key file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed PEM: {0}")]
    Pem(#[from] std::io::Error),

    #[error("no private key block found")]
    NoPrivateKey,

    #[error("malformed PKCS#8 key: {0}")]
    Pkcs8(#[from] pkcs8::Error),

    #[error("malformed EC private key: {0}")]
    Sec1(#[from] sec1::Error),

    #[error("key does not name its curve")]
    MissingCurve,

    #[error("unsupported curve {0}")]
    UnsupportedCurve(String),

    #[error("invalid private key scalar: {0}")]
    InvalidScalar(&'static str),

    #[error("address derivation is not supported for {0}")]
    AddressUnsupported(&'static str),
}
