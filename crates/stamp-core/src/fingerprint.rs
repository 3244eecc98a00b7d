//! Content fingerprints used to name hashed assets

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

/// Number of hex characters of the digest that go into file names.
pub const SHORT_LEN: usize = 8;

/// A SHA-256 digest of a file's exact bytes.
///
/// Only the first [`SHORT_LEN`] hex characters (32 bits) end up in file
/// names. Past roughly 2^16 distinct files in one tree the birthday bound
/// makes a short-form collision plausible. Widening it changes every
/// physical file name, so it stays at 8.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Compute a fingerprint from bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Compute a fingerprint by streaming a file's contents
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::copy_from(&mut reader, &mut io::sink())
    }

    /// Stream `reader` into `writer`, fingerprinting exactly the bytes written
    pub fn copy_from<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..n]);
            writer.write_all(&buffer[..n])?;
        }
        writer.flush()?;

        Ok(Self(hasher.finalize().into()))
    }

    /// Full 64-character lowercase hex digest
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// The 8-character form embedded in fingerprinted file names
    pub fn short(&self) -> String {
        self.0[..SHORT_LEN / 2]
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// Get the digest as a prefixed hex string (e.g., "sha256:abcdef...")
    pub fn to_prefixed_hex(&self) -> String {
        format!("sha256:{}", self.to_hex())
    }

    /// Whether `s` looks like a short fingerprint (8 lowercase hex chars)
    pub fn is_short_form(s: &str) -> bool {
        s.len() == SHORT_LEN
            && s.bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistent_hashing() {
        let f1 = Fingerprint::from_bytes(b"hello");
        let f2 = Fingerprint::from_bytes(b"hello");
        assert_eq!(f1, f2);
    }

    #[test]
    fn test_different_content_different_fingerprint() {
        let f1 = Fingerprint::from_bytes(b"hello");
        let f2 = Fingerprint::from_bytes(b"world");
        assert_ne!(f1, f2);
    }

    #[test]
    fn test_known_digests() {
        assert_eq!(
            Fingerprint::from_bytes(b"hello").to_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(Fingerprint::from_bytes(b"X").short(), "4b68ab38");
        assert_eq!(Fingerprint::from_bytes(b"").short(), "e3b0c442");
    }

    #[test]
    fn test_short_is_prefix_of_hex() {
        let f = Fingerprint::from_bytes(b"shader source");
        assert_eq!(f.short().len(), SHORT_LEN);
        assert!(f.to_hex().starts_with(&f.short()));
        assert_eq!(f.to_string(), f.short());
    }

    #[test]
    fn test_from_file_matches_from_bytes() {
        let path = std::env::temp_dir().join(format!(
            "stamp_fingerprint_{}.bin",
            std::process::id()
        ));
        // Larger than one read buffer
        let data: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &data).unwrap();

        let from_file = Fingerprint::from_file(&path).unwrap();
        assert_eq!(from_file, Fingerprint::from_bytes(&data));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_copy_from_hashes_what_it_writes() {
        let data: Vec<u8> = (0..20_000u32).map(|i| (i % 7) as u8).collect();
        let mut copy = Vec::new();

        let fingerprint = Fingerprint::copy_from(&mut data.as_slice(), &mut copy).unwrap();

        assert_eq!(copy, data);
        assert_eq!(fingerprint, Fingerprint::from_bytes(&copy));
    }

    #[test]
    fn test_is_short_form() {
        assert!(Fingerprint::is_short_form("4b68ab38"));
        assert!(!Fingerprint::is_short_form("4B68AB38"));
        assert!(!Fingerprint::is_short_form("4b68ab3"));
        assert!(!Fingerprint::is_short_form("zzzzzzzz"));
    }

    #[test]
    fn test_prefixed_hex() {
        let f = Fingerprint::from_bytes(b"test data");
        assert_eq!(f.to_prefixed_hex(), format!("sha256:{}", f.to_hex()));
    }
}
