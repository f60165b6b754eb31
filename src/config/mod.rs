//! Configuration Management Module
//!
//! This module turns an SDK configuration file into the list of connection
//! records the client consumes. A file names one or more nodes under
//! `[[Network.Connection]]`; every node becomes an independent `Config`
//! that shares the chain, crypto and TLS settings of the file.
//!
//! Records encode to JSON with fixed field names and order, and byte fields
//! (PEM material, private key) as standard base64.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::crypto::{load_private_key_from_pem, AccountKey, Curve};
use crate::error::ConfigError;

pub mod document;
pub mod material;

pub use document::{
    AccountSection, ChainSection, ConfigDocument, ConnectionEntry, ConnectionType, LogSection,
    NetworkSection,
};
pub use material::resolve_material;

/// Environment variable overriding the default configuration path
pub const CONFIG_PATH_ENV: &str = "SDK_CONFIG_PATH";
/// Configuration path used when neither an argument nor the env var is given
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

// ============================================================================
// CONNECTION RECORD
// ============================================================================

/// Fully resolved settings for one node connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// `true` for JSON-RPC over HTTP, `false` for the TLS channel
    #[serde(rename = "IsHTTP")]
    pub is_http: bool,
    #[serde(rename = "ChainID")]
    pub chain_id: i64,
    #[serde(rename = "CAFile")]
    pub ca_file: String,
    /// CA certificate PEM
    #[serde(rename = "TLSCAContext", with = "base64_bytes")]
    pub tls_ca_context: Vec<u8>,
    #[serde(rename = "Key")]
    pub key: String,
    /// SDK TLS private key PEM
    #[serde(rename = "TLSKeyContext", with = "base64_bytes")]
    pub tls_key_context: Vec<u8>,
    #[serde(rename = "Cert")]
    pub cert: String,
    /// SDK TLS certificate chain PEM
    #[serde(rename = "TLSCertContext", with = "base64_bytes")]
    pub tls_cert_context: Vec<u8>,
    #[serde(rename = "IsSMCrypto")]
    pub is_sm_crypto: bool,
    #[serde(rename = "DynamicKey")]
    pub dynamic_key: bool,
    /// Account private key scalar; empty for dynamic-key setups without a key file
    #[serde(rename = "PrivateKey", with = "base64_bytes")]
    pub private_key: Vec<u8>,
    #[serde(rename = "GroupID")]
    pub group_id: i32,
    /// Node address as `host:port`
    #[serde(rename = "NodeURL")]
    pub node_url: String,
}

impl Config {
    /// Channel connections are TLS-secured; RPC connections are not.
    pub fn uses_tls(&self) -> bool {
        !self.is_http
    }

    /// Builds a single record from explicit values instead of a file.
    ///
    /// TLS material is read from the given paths when they exist, and the
    /// account key is loaded and checked against the crypto mode.
    pub fn from_options(options: ConnectionOptions) -> Result<Self, ConfigError> {
        let private_key = load_account_key(&options.key_file, options.is_sm_crypto)?;

        Ok(Self {
            is_http: options.is_http,
            chain_id: options.chain_id,
            tls_ca_context: resolve_material(None, &options.ca_file)?,
            ca_file: options.ca_file,
            tls_key_context: resolve_material(None, &options.key)?,
            key: options.key,
            tls_cert_context: resolve_material(None, &options.cert)?,
            cert: options.cert,
            is_sm_crypto: options.is_sm_crypto,
            dynamic_key: false,
            private_key: private_key.into_secret_bytes(),
            group_id: options.group_id,
            node_url: options.node_url,
        })
    }
}

/// Explicit inputs for [`Config::from_options`].
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub ca_file: String,
    pub key: String,
    pub cert: String,
    /// PEM file holding the account private key
    pub key_file: String,
    pub group_id: i32,
    pub node_url: String,
    pub is_http: bool,
    pub chain_id: i64,
    pub is_sm_crypto: bool,
}

// ============================================================================
// PARSING AND EXPANSION
// ============================================================================

/// Parses a TOML configuration into one record per `[[Network.Connection]]`.
///
/// Fails if `[Chain]` (with `ChainID` and `SMCrypto`), `[Network]` or at least
/// one connection is missing, or if `[Account]` lacks a usable key file while
/// `DynamicKey` is off.
pub fn parse_config(buffer: &[u8]) -> Result<Vec<Config>, ConfigError> {
    let document = ConfigDocument::from_slice(buffer)?;
    expand_document(&document)
}

/// Reads a configuration file and parses it with [`parse_config`].
///
/// Relative paths inside the file (key file, certificates) resolve against
/// the working directory, not the configuration file's directory.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<Vec<Config>, ConfigError> {
    let path = path.as_ref();
    let buffer = std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&buffer)
}

/// Loads the configuration records from a TOML file.
///
/// The path is taken from the argument, then the `SDK_CONFIG_PATH`
/// environment variable, then `config.toml`. A missing file yields an error
/// pointing at the bundled template.
pub fn load_from_path(path: Option<&str>) -> Result<Vec<Config>, ConfigError> {
    let document = load_document_from_path(path)?;
    expand_document(&document)
}

/// Loads the configuration document without expanding it, using the same
/// path resolution and missing-file error as [`load_from_path`].
pub fn load_document_from_path(path: Option<&str>) -> Result<ConfigDocument, ConfigError> {
    let config_path = resolve_config_path(path);
    if !Path::new(&config_path).exists() {
        return Err(ConfigError::NotFound(config_path));
    }
    info!("Loading SDK configuration from {}", config_path);
    let buffer = std::fs::read(&config_path).map_err(|source| ConfigError::Io {
        path: config_path.clone().into(),
        source,
    })?;
    ConfigDocument::from_slice(&buffer)
}

/// Config path precedence: argument > env var > default.
pub fn resolve_config_path(path: Option<&str>) -> String {
    path.map(|p| p.to_string())
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

/// Encodes records as a compact JSON array.
pub fn encode_configs(configs: &[Config]) -> Result<String, ConfigError> {
    Ok(serde_json::to_string(configs)?)
}

/// Checks required settings, resolves shared material once, then stamps out
/// one record per connection entry.
pub fn expand_document(document: &ConfigDocument) -> Result<Vec<Config>, ConfigError> {
    let chain = document.chain.as_ref().ok_or(ConfigError::Missing("Chain"))?;
    let chain_id = chain.chain_id.ok_or(ConfigError::Missing("Chain.ChainID"))?;
    let is_sm_crypto = chain
        .sm_crypto
        .ok_or(ConfigError::Missing("Chain.SMCrypto"))?;

    let account = document
        .account
        .as_ref()
        .ok_or(ConfigError::Missing("Account"))?;
    let private_key = match account.key_file.as_deref().filter(|f| !f.is_empty()) {
        Some(key_file) => load_account_key(key_file, is_sm_crypto)?.into_secret_bytes(),
        None if account.dynamic_key => {
            debug!("No account key file, keys are supplied dynamically");
            Vec::new()
        }
        None => return Err(ConfigError::Missing("Account.KeyFile")),
    };

    let network = document
        .network
        .as_ref()
        .ok_or(ConfigError::Missing("Network"))?;
    if network.connections.is_empty() {
        return Err(ConfigError::Missing("Network.Connection"));
    }

    let shared = Config {
        is_http: network.connection_type() == ConnectionType::Rpc,
        chain_id,
        ca_file: network.ca_file.clone(),
        tls_ca_context: resolve_material(network.ca_context.as_deref(), &network.ca_file)?,
        key: network.key.clone(),
        tls_key_context: resolve_material(network.key_context.as_deref(), &network.key)?,
        cert: network.cert.clone(),
        tls_cert_context: resolve_material(network.cert_context.as_deref(), &network.cert)?,
        is_sm_crypto,
        dynamic_key: account.dynamic_key,
        private_key,
        group_id: 0,
        node_url: String::new(),
    };

    let configs: Vec<Config> = network
        .connections
        .iter()
        .map(|connection| Config {
            group_id: connection.group_id,
            node_url: connection.node_url.clone(),
            ..shared.clone()
        })
        .collect();

    info!(
        "Expanded {} connection(s) for chain {}",
        configs.len(),
        chain_id
    );
    Ok(configs)
}

/// Loads the account key and checks its curve against the crypto mode.
fn load_account_key(key_file: &str, is_sm_crypto: bool) -> Result<AccountKey, ConfigError> {
    let key = load_private_key_from_pem(key_file)?;
    let expected = Curve::for_crypto_mode(is_sm_crypto);
    if key.curve() != expected {
        return Err(ConfigError::CurveMismatch {
            expected: expected.name(),
            found: key.curve().name(),
        });
    }
    Ok(key)
}

// ============================================================================
// BASE64 BYTE FIELDS
// ============================================================================

/// Byte fields travel as standard padded base64 strings. `null` decodes to
/// empty bytes.
mod base64_bytes {
    use base64::{engine::general_purpose, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => general_purpose::STANDARD
                .decode(encoded)
                .map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            is_http: true,
            chain_id: 1,
            ca_file: "ca.crt".to_string(),
            tls_ca_context: Vec::new(),
            key: "sdk.key".to_string(),
            tls_key_context: Vec::new(),
            cert: "sdk.crt".to_string(),
            tls_cert_context: Vec::new(),
            is_sm_crypto: false,
            dynamic_key: true,
            private_key: vec![1, 2, 3],
            group_id: 1,
            node_url: "127.0.0.1:8545".to_string(),
        }
    }

    #[test]
    fn test_empty_bytes_encode_as_empty_string() {
        let json = serde_json::to_value(sample_config()).unwrap();
        assert_eq!(json["TLSCAContext"], "");
        assert_eq!(json["PrivateKey"], "AQID");
    }

    #[test]
    fn test_null_bytes_decode_as_empty() {
        let mut json = serde_json::to_value(sample_config()).unwrap();
        json["TLSKeyContext"] = serde_json::Value::Null;
        let config: Config = serde_json::from_value(json).unwrap();
        assert!(config.tls_key_context.is_empty());
    }

    #[test]
    fn test_uses_tls_follows_transport() {
        let mut config = sample_config();
        assert!(!config.uses_tls());
        config.is_http = false;
        assert!(config.uses_tls());
    }

    #[test]
    fn test_resolve_config_path_prefers_argument() {
        assert_eq!(resolve_config_path(Some("custom.toml")), "custom.toml");
    }
}
