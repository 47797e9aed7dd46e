//! Content hashing for upload deduplication

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Produces a stable digest of a file's content
///
/// Identical content must always give identical digests, whatever the path.
pub trait ContentHasher {
    fn digest(&self, path: &Path) -> io::Result<String>;
}

/// Streaming SHA-256, rendered as lower-case hex
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl ContentHasher for Sha256Hasher {
    fn digest(&self, path: &Path) -> io::Result<String> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 8192];

        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }
}
