//! Content hashing using blake3
//!
//! This module provides fast, cryptographically-secure hashing for content comparison.
//! blake3 is 3-10x faster than SHA256 while maintaining cryptographic security.

use std::fs::File;
use std::io::{BufReader, Result as IoResult};
use std::path::Path;

/// 256-bit blake3 digest
pub type Digest = [u8; 32];

/// Hash content using blake3
///
/// Returns a fixed-size array allocated on the stack (zero heap allocations),
/// which is more efficient than returning a `Vec<u8>` for comparison operations.
///
/// # Examples
///
/// ```
/// use folio_engine::hash::hash_content;
///
/// let content = b"Hello, world!";
/// let hash = hash_content(content);
/// assert_eq!(hash.len(), 32); // 256-bit hash
/// ```
#[must_use]
pub fn hash_content(content: &[u8]) -> Digest {
    *blake3::hash(content).as_bytes()
}

/// Hash a file with buffered reading
///
/// Uses blake3's streaming hasher so large assets are never loaded into memory
/// in one piece.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn hash_file(path: &Path) -> IoResult<Digest> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = blake3::Hasher::new();
    std::io::copy(&mut reader, &mut hasher)?;
    Ok(*hasher.finalize().as_bytes())
}

/// Best-effort file digest for change detection
///
/// A file that cannot be read yields `None`, the empty digest. Callers must
/// treat `None` as different from every digest, itself included, so a read
/// failure always leads to a copy and never to a skip.
pub fn digest_or_empty(path: &Path) -> Option<Digest> {
    match hash_file(path) {
        Ok(digest) => Some(digest),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Digest unavailable");
            None
        }
    }
}

/// Compare two best-effort digests
///
/// Only two present, identical digests count as equal.
///
/// # Examples
///
/// ```
/// use folio_engine::hash::{digests_match, hash_content};
///
/// let a = hash_content(b"a");
/// assert!(digests_match(Some(a), Some(a)));
/// assert!(!digests_match(None, None));
/// ```
#[must_use]
pub fn digests_match(left: Option<Digest>, right: Option<Digest>) -> bool {
    matches!((left, right), (Some(l), Some(r)) if l == r)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_hash_content_deterministic() {
        let content = b"Hello, world!";
        let hash1 = hash_content(content);
        let hash2 = hash_content(content);

        assert_eq!(hash1, hash2, "Hashes should be deterministic");
    }

    #[test]
    fn test_hash_content_different() {
        assert_ne!(hash_content(b"cover.png v1"), hash_content(b"cover.png v2"));
    }

    #[test]
    fn test_hash_file_matches_content_hash() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let content = b"\x89PNG fake image bytes";
        temp_file.write_all(content).unwrap();
        temp_file.flush().unwrap();

        assert_eq!(hash_file(temp_file.path()).unwrap(), hash_content(content));
    }

    #[test]
    fn test_hash_file_nonexistent() {
        assert!(hash_file(Path::new("/nonexistent/file")).is_err());
    }

    #[test]
    fn test_digest_or_empty_on_missing_file() {
        assert_eq!(digest_or_empty(Path::new("/nonexistent/file")), None);
    }

    #[test]
    fn test_empty_digests_never_match() {
        let digest = hash_content(b"x");
        assert!(!digests_match(None, None));
        assert!(!digests_match(Some(digest), None));
        assert!(!digests_match(None, Some(digest)));
        assert!(!digests_match(Some(digest), Some(hash_content(b"y"))));
        assert!(digests_match(Some(digest), Some(digest)));
    }
}
