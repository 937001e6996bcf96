//! Cryptographic operations for manifest verification.
//!
//! The SHA-256 digest of a file's full content is the only identity used for
//! matching. Digests are rendered as 64 lowercase hex characters.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{Result, VerifyError};

/// SHA-256 of the empty byte sequence.
pub const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Length of a hex-rendered SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Computes SHA-256 hash of data and returns lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Computes SHA-256 over the complete content of a file.
///
/// The file is consumed to the end before the digest is finalized; no
/// partial result is ever produced.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Startup check that the hashing primitive produces the known answer.
pub fn self_test() -> Result<()> {
    if sha256_hex(b"") != EMPTY_SHA256 {
        return Err(VerifyError::CryptoUnsupported);
    }
    Ok(())
}
