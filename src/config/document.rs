//! TOML document model
//!
//! Mirrors the on-disk layout of an SDK configuration file:
//!
//! ```toml
//! [Network]
//! Type = "channel"
//! CAFile = "ca.crt"
//! Cert = "sdk.crt"
//! Key = "sdk.key"
//!
//! [[Network.Connection]]
//! NodeURL = "127.0.0.1:20200"
//! GroupID = 1
//!
//! [Account]
//! KeyFile = "account.pem"
//!
//! [Chain]
//! ChainID = 1
//! SMCrypto = false
//!
//! [log]
//! Path = "./"
//! ```
//!
//! Keys are case-insensitive: every key is lowercased before deserializing,
//! so `ChainID`, `chainid` and `CHAINID` all address the same value. A table
//! that spells one key twice in different case is rejected.

use serde::Deserialize;
use std::str::FromStr;
use tracing::warn;

use crate::error::ConfigError;

// ============================================================================
// DOCUMENT STRUCTURES
// ============================================================================

/// A parsed configuration document, before defaults are checked and the
/// connection list is expanded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDocument {
    pub network: Option<NetworkSection>,
    pub account: Option<AccountSection>,
    pub chain: Option<ChainSection>,
    pub log: Option<LogSection>,
}

/// `[Network]`: transport mode, TLS material and node list.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkSection {
    /// "rpc" or "channel"
    #[serde(rename = "type", default = "default_network_type")]
    pub connection_type: String,
    #[serde(rename = "cafile", default = "default_ca_file")]
    pub ca_file: String,
    #[serde(default = "default_key_file")]
    pub key: String,
    #[serde(default = "default_cert_file")]
    pub cert: String,
    /// Inline CA certificate; takes precedence over `ca_file` when non-empty
    #[serde(rename = "cacontext")]
    pub ca_context: Option<String>,
    /// Inline SDK private key; takes precedence over `key` when non-empty
    #[serde(rename = "keycontext")]
    pub key_context: Option<String>,
    /// Inline SDK certificate chain; takes precedence over `cert` when non-empty
    #[serde(rename = "certcontext")]
    pub cert_context: Option<String>,
    /// `[[Network.Connection]]` entries, in file order
    #[serde(rename = "connection", default)]
    pub connections: Vec<ConnectionEntry>,
}

/// One `[[Network.Connection]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionEntry {
    #[serde(rename = "nodeurl")]
    pub node_url: String,
    #[serde(rename = "groupid")]
    pub group_id: i32,
}

/// `[Account]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountSection {
    /// PEM file holding the account private key
    #[serde(rename = "keyfile")]
    pub key_file: Option<String>,
    /// Account keys are supplied per call; `key_file` becomes optional
    #[serde(rename = "dynamickey", default)]
    pub dynamic_key: bool,
}

/// `[Chain]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChainSection {
    #[serde(rename = "chainid")]
    pub chain_id: Option<i64>,
    #[serde(rename = "smcrypto")]
    pub sm_crypto: Option<bool>,
}

/// `[log]`
#[derive(Debug, Clone, Deserialize)]
pub struct LogSection {
    #[serde(default = "default_log_path")]
    pub path: String,
}

fn default_network_type() -> String {
    "rpc".to_string()
}

fn default_ca_file() -> String {
    "ca.crt".to_string()
}

fn default_key_file() -> String {
    "sdk.key".to_string()
}

fn default_cert_file() -> String {
    "sdk.crt".to_string()
}

fn default_log_path() -> String {
    "./".to_string()
}

// ============================================================================
// CONNECTION TYPE
// ============================================================================

/// Transport used to reach a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionType {
    /// JSON-RPC over HTTP
    Rpc,
    /// Persistent TLS channel
    Channel,
}

impl FromStr for ConnectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("rpc") {
            Ok(ConnectionType::Rpc)
        } else if s.eq_ignore_ascii_case("channel") {
            Ok(ConnectionType::Channel)
        } else {
            Err(format!("unknown connection type '{}'", s))
        }
    }
}

impl NetworkSection {
    /// Transport mode for this network. Unrecognized values fall back to the
    /// channel transport.
    pub fn connection_type(&self) -> ConnectionType {
        self.connection_type.parse().unwrap_or_else(|_| {
            warn!(
                "Network.Type {} is not supported, use channel",
                self.connection_type
            );
            ConnectionType::Channel
        })
    }
}

// ============================================================================
// PARSING
// ============================================================================

impl ConfigDocument {
    /// Parses a document from raw bytes.
    pub fn from_slice(buffer: &[u8]) -> Result<Self, ConfigError> {
        let content = std::str::from_utf8(buffer).map_err(|e| ConfigError::InvalidValue {
            key: "document",
            reason: e.to_string(),
        })?;
        content.parse()
    }

    /// Directory the SDK writes its logs to.
    pub fn log_path(&self) -> &str {
        self.log.as_ref().map(|l| l.path.as_str()).unwrap_or("./")
    }
}

impl FromStr for ConfigDocument {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let table: toml::Table = content.parse()?;
        let normalized = toml::Value::Table(lowercase_keys(table)?);
        Ok(normalized.try_into()?)
    }
}

/// Lowercases every key of a table, descending into nested tables and arrays.
/// Keys that only differ in case collide and are rejected.
fn lowercase_keys(table: toml::Table) -> Result<toml::Table, ConfigError> {
    let mut normalized = toml::Table::new();
    for (key, value) in table {
        let lowered = key.to_lowercase();
        if normalized.contains_key(&lowered) {
            return Err(ConfigError::DuplicateKey(key));
        }
        normalized.insert(lowered, lowercase_value(value)?);
    }
    Ok(normalized)
}

fn lowercase_value(value: toml::Value) -> Result<toml::Value, ConfigError> {
    Ok(match value {
        toml::Value::Table(table) => toml::Value::Table(lowercase_keys(table)?),
        toml::Value::Array(items) => toml::Value::Array(
            items
                .into_iter()
                .map(lowercase_value)
                .collect::<Result<_, _>>()?,
        ),
        other => other,
    })
}
