//! Account Key Module
//!
//! Loads the account private key referenced by `Account.KeyFile` and derives
//! the on-chain account address from it.
//!
//! Keys are PEM files in either PKCS#8 (`PRIVATE KEY`) or SEC1
//! (`EC PRIVATE KEY`) form. Only two curves are accepted: secp256k1 for the
//! standard crypto mode and sm2p256v1 for SM-crypto mode.
//!
//! ## Security Requirements
//!
//! **CRITICAL**: Private key bytes must never be logged. `AccountKey` redacts
//! its secret in `Debug` output.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use pkcs8::{ObjectIdentifier, PrivateKeyInfo};
use rustls_pemfile::Item;
use sec1::EcPrivateKey;
use sha3::{Digest, Keccak256};
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

use crate::error::KeyError;

// ============================================================================
// CURVES
// ============================================================================

/// `id-ecPublicKey` algorithm identifier used by PKCS#8 EC keys
const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const SECP256K1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.10");
const SM2P256V1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.156.10197.1.301");

/// Elliptic curve an account key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Secp256k1,
    Sm2p256v1,
}

impl Curve {
    /// Conventional curve name, as printed by openssl.
    pub fn name(&self) -> &'static str {
        match self {
            Curve::Secp256k1 => "secp256k1",
            Curve::Sm2p256v1 => "sm2p256v1",
        }
    }

    /// Curve the chain expects for the given crypto mode.
    pub fn for_crypto_mode(sm_crypto: bool) -> Self {
        if sm_crypto {
            Curve::Sm2p256v1
        } else {
            Curve::Secp256k1
        }
    }

    fn from_oid(oid: ObjectIdentifier) -> Result<Self, KeyError> {
        if oid == SECP256K1_OID {
            Ok(Curve::Secp256k1)
        } else if oid == SM2P256V1_OID {
            Ok(Curve::Sm2p256v1)
        } else {
            Err(KeyError::UnsupportedCurve(oid.to_string()))
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// ACCOUNT KEY
// ============================================================================

/// A decoded account private key: the raw 32-byte scalar plus its curve.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountKey {
    curve: Curve,
    secret: Vec<u8>,
}

impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountKey")
            .field("curve", &self.curve)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl AccountKey {
    /// Builds a key from a raw scalar, validating it for the curve.
    pub fn from_scalar(curve: Curve, scalar: &[u8]) -> Result<Self, KeyError> {
        if scalar.len() != 32 {
            return Err(KeyError::InvalidScalar("expected 32 bytes"));
        }
        if scalar.iter().all(|b| *b == 0) {
            return Err(KeyError::InvalidScalar("scalar is zero"));
        }
        if curve == Curve::Secp256k1 {
            k256::SecretKey::from_slice(scalar)
                .map_err(|_| KeyError::InvalidScalar("out of range for secp256k1"))?;
        }
        Ok(Self {
            curve,
            secret: scalar.to_vec(),
        })
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Raw private key scalar (big-endian).
    pub fn secret_bytes(&self) -> &[u8] {
        &self.secret
    }

    pub fn into_secret_bytes(self) -> Vec<u8> {
        self.secret
    }

    /// Derives the account address.
    ///
    /// The address is computed as:
    /// keccak256(uncompressed_public_key)[12:32] (last 20 bytes)
    ///
    /// SM2 accounts hash with SM3 instead, which is not available here.
    pub fn address(&self) -> Result<String, KeyError> {
        if self.curve != Curve::Secp256k1 {
            return Err(KeyError::AddressUnsupported(self.curve.name()));
        }
        let secret = k256::SecretKey::from_slice(&self.secret)
            .map_err(|_| KeyError::InvalidScalar("out of range for secp256k1"))?;
        let point = secret.public_key().to_encoded_point(false);
        // Uncompressed format: 0x04 || x (32 bytes) || y (32 bytes)
        let public_key_bytes = &point.as_bytes()[1..];

        let mut hasher = Keccak256::new();
        hasher.update(public_key_bytes);
        let hash = hasher.finalize();

        Ok(format!("0x{}", hex::encode(&hash[12..32])))
    }
}

// ============================================================================
// PEM LOADING
// ============================================================================

/// Reads and decodes the private key stored in a PEM file.
pub fn load_private_key_from_pem(path: impl AsRef<Path>) -> Result<AccountKey, KeyError> {
    let path = path.as_ref();
    let content = std::fs::read(path).map_err(|source| KeyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let key = parse_private_key_pem(&content)?;
    debug!("Loaded {} account key from {}", key.curve(), path.display());
    Ok(key)
}

/// Decodes the first private key block of a PEM document.
///
/// `EC PARAMETERS` blocks (as emitted by `openssl ecparam -genkey`),
/// certificates and other non-key sections are skipped.
pub fn parse_private_key_pem(pem: &[u8]) -> Result<AccountKey, KeyError> {
    let mut reader = Cursor::new(pem);
    while let Some(item) = rustls_pemfile::read_one(&mut reader)? {
        match item {
            Item::Pkcs8Key(key) => return decode_pkcs8(key.secret_pkcs8_der()),
            Item::Sec1Key(key) => return decode_sec1(key.secret_sec1_der(), None),
            Item::Pkcs1Key(_) => {
                return Err(KeyError::UnsupportedCurve("rsaEncryption".to_string()))
            }
            _ => debug!("Skipping non-key PEM section"),
        }
    }
    Err(KeyError::NoPrivateKey)
}

fn decode_pkcs8(der: &[u8]) -> Result<AccountKey, KeyError> {
    let info = PrivateKeyInfo::try_from(der)?;
    if info.algorithm.oid != EC_PUBLIC_KEY_OID {
        return Err(KeyError::UnsupportedCurve(info.algorithm.oid.to_string()));
    }
    let curve_oid = info
        .algorithm
        .parameters_oid()
        .map_err(|_| KeyError::MissingCurve)?;
    decode_sec1(info.private_key, Some(curve_oid))
}

/// Decodes an `ECPrivateKey` structure. The curve comes from the enclosing
/// PKCS#8 algorithm parameters when present, else from the key itself.
fn decode_sec1(der: &[u8], outer_curve: Option<ObjectIdentifier>) -> Result<AccountKey, KeyError> {
    let key = EcPrivateKey::try_from(der)?;
    let curve_oid = outer_curve
        .or_else(|| key.parameters.and_then(|p| p.named_curve()))
        .ok_or(KeyError::MissingCurve)?;
    let curve = Curve::from_oid(curve_oid)?;
    AccountKey::from_scalar(curve, key.private_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_for_crypto_mode() {
        assert_eq!(Curve::for_crypto_mode(true), Curve::Sm2p256v1);
        assert_eq!(Curve::for_crypto_mode(false), Curve::Secp256k1);
    }

    #[test]
    fn test_zero_scalar_rejected() {
        let result = AccountKey::from_scalar(Curve::Sm2p256v1, &[0u8; 32]);
        assert!(matches!(result, Err(KeyError::InvalidScalar(_))));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let key = AccountKey::from_scalar(Curve::Secp256k1, &[7u8; 32]).unwrap();
        let rendered = format!("{:?}", key);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("7, 7"));
    }
}
