//! TLS material resolution
//!
//! Certificates and keys can be given either as a file path or inline as a
//! `*Context` string. Both forms collapse into the raw PEM bytes carried by
//! each connection record.

use std::path::Path;
use tracing::debug;

use crate::error::ConfigError;

/// Resolves one piece of TLS material.
///
/// A non-empty inline context is used verbatim and the file is not touched.
/// Otherwise the file contents are used if the file exists. Material that is
/// neither inline nor on disk resolves to empty bytes; RPC connections never
/// read it.
pub fn resolve_material(inline: Option<&str>, file: &str) -> Result<Vec<u8>, ConfigError> {
    if let Some(context) = inline.filter(|c| !c.is_empty()) {
        return Ok(context.as_bytes().to_vec());
    }

    let path = Path::new(file);
    if file.is_empty() || !path.is_file() {
        debug!("TLS material {} is neither inline nor on disk", file);
        return Ok(Vec::new());
    }

    std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_inline_wins_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"from-file").unwrap();
        let path = file.path().to_str().unwrap();

        let bytes = resolve_material(Some("from-context"), path).unwrap();
        assert_eq!(bytes, b"from-context");
    }

    #[test]
    fn test_empty_inline_falls_back_to_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"from-file").unwrap();
        let path = file.path().to_str().unwrap();

        let bytes = resolve_material(Some(""), path).unwrap();
        assert_eq!(bytes, b"from-file");
    }

    #[test]
    fn test_missing_file_resolves_empty() {
        let bytes = resolve_material(None, "definitely/not/here/ca.crt").unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_inline_whitespace_preserved() {
        let bytes = resolve_material(Some("\tPEM\n\t"), "ca.crt").unwrap();
        assert_eq!(bytes, b"\tPEM\n\t");
    }
}
