//! SDK Configuration Library
//!
//! Loads the connection configuration of the chain client SDK: node
//! endpoints, TLS material, account key and chain settings. A single file can
//! name several nodes; each becomes its own connection record.

pub mod config;
pub mod crypto;
pub mod error;

// Re-export commonly used types
pub use config::{
    encode_configs, load_from_path, parse_config, parse_config_file, Config, ConfigDocument,
    ConnectionOptions, ConnectionType,
};
pub use crypto::{load_private_key_from_pem, parse_private_key_pem, AccountKey, Curve};
pub use error::{ConfigError, KeyError};
