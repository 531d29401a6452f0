//! Content hashing helpers.
//!
//! Reports identify their source image by the SHA-1 of the raw file bytes,
//! which lets downstream tooling dedupe results without re-reading the image.

use anyhow::{Context, Result};
use sha1::{Digest, Sha1};
use std::{fs::File, io, path::Path};

/// Computes the lowercase hex SHA-1 digest of a byte slice.
pub fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Computes the lowercase hex SHA-1 digest of a file's contents.
///
/// The file is streamed through the hasher, so arbitrarily large inputs are
/// fine.
pub fn sha1_hex_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let mut file = File::open(path)
        .with_context(|| format!("failed to open file for hashing: {}", path.display()))?;
    let mut hasher = Sha1::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("failed to read file for hashing: {}", path.display()))?;
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn hashes_known_vectors() {
        assert_eq!(sha1_hex(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(sha1_hex(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(
            sha1_hex(b"The quick brown fox jumps over the lazy dog"),
            "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12"
        );
    }

    #[test]
    fn file_digest_matches_slice_digest() {
        let mut file = NamedTempFile::new().expect("tempfile");
        let payload = b"sightkit digest payload";
        file.write_all(payload).expect("write payload");
        file.flush().expect("flush payload");

        let from_file = sha1_hex_file(file.path()).expect("hash file");
        assert_eq!(from_file, sha1_hex(payload));
    }

    #[test]
    fn missing_file_reports_path_in_error() {
        let err = sha1_hex_file("does/not/exist.bin").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.bin"));
    }
}
