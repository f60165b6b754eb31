//! Shared test helpers for configuration tests
//!
//! This module provides fixture paths and a small builder for configuration
//! documents used across the integration tests.

#![allow(dead_code)]

// ============================================================================
// FIXTURES
// ============================================================================

/// secp256k1 account key in PKCS#8 form
pub const SECP256K1_KEY_FILE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/0x83309d045a19c44dc3722d15a6abd472f95866ac.pem"
);

/// Same secp256k1 key in SEC1 form, preceded by an `EC PARAMETERS` block
pub const SECP256K1_SEC1_KEY_FILE: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/secp256k1_sec1.pem");

/// sm2p256v1 account key in PKCS#8 form (no embedded public key)
pub const SM2_KEY_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sm2p256v1.pem");

/// NIST P-256 key, which the SDK does not accept
pub const P256_KEY_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/prime256v1.pem");

/// Address derived from the secp256k1 fixture key
pub const SECP256K1_ADDRESS: &str = "0x83309d045a19c44dc3722d15a6abd472f95866ac";

/// Base64 of the secp256k1 fixture scalar
pub const SECP256K1_SECRET_B64: &str = "uJ1C8SKQBw8jX7j7Ydz5bjsRUWxdT2Mz8m5Ju5Vfi2I=";

/// Base64 of the sm2p256v1 fixture scalar
pub const SM2_SECRET_B64: &str = "OUUgj3shRLE/NuOKxtOflYiTk2koYLUaQvuB7033xbg=";

// ============================================================================
// DOCUMENT BUILDER
// ============================================================================

/// Assembles a configuration document from its sections.
///
/// Every section is passed as raw TOML so tests can drop or alter one
/// section at a time.
pub struct ConfigBuilder {
    pub network: Option<String>,
    pub connections: Vec<(String, i32)>,
    pub account: Option<String>,
    pub chain: Option<String>,
}

impl ConfigBuilder {
    /// RPC network with one connection, secp256k1 account and chain 1.
    pub fn new() -> Self {
        Self {
            network: Some("Type = \"rpc\"".to_string()),
            connections: vec![("127.0.0.1:8545".to_string(), 1)],
            account: Some(format!("KeyFile = '{}'", SECP256K1_KEY_FILE)),
            chain: Some("ChainID = 1\nSMCrypto = false".to_string()),
        }
    }

    pub fn network(mut self, body: &str) -> Self {
        self.network = Some(body.to_string());
        self
    }

    pub fn connections(mut self, connections: &[(&str, i32)]) -> Self {
        self.connections = connections
            .iter()
            .map(|(url, group)| (url.to_string(), *group))
            .collect();
        self
    }

    pub fn account(mut self, body: &str) -> Self {
        self.account = Some(body.to_string());
        self
    }

    pub fn chain(mut self, body: &str) -> Self {
        self.chain = Some(body.to_string());
        self
    }

    pub fn without_network(mut self) -> Self {
        self.network = None;
        self.connections.clear();
        self
    }

    pub fn without_account(mut self) -> Self {
        self.account = None;
        self
    }

    pub fn without_chain(mut self) -> Self {
        self.chain = None;
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::new();
        if let Some(network) = &self.network {
            out.push_str(&format!("[Network]\n{}\n\n", network));
            for (url, group) in &self.connections {
                out.push_str(&format!(
                    "[[Network.Connection]]\nNodeURL = \"{}\"\nGroupID = {}\n\n",
                    url, group
                ));
            }
        }
        if let Some(account) = &self.account {
            out.push_str(&format!("[Account]\n{}\n\n", account));
        }
        if let Some(chain) = &self.chain {
            out.push_str(&format!("[Chain]\n{}\n\n", chain));
        }
        out.push_str("[log]\nPath = \"./\"\n");
        out
    }
}
