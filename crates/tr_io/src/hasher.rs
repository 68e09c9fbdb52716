//! crates/tr_io/src/hasher.rs
//!
//! SHA-256 digests over canonical JSON (for values) or raw bytes (for rendered
//! artifacts). Hex output is always lowercase.

#[cfg(feature = "hash")]
use std::fs::File;
#[cfg(feature = "hash")]
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;
#[cfg(feature = "hash")]
use sha2::{Digest, Sha256};

use crate::canonical_json::to_canonical_bytes;
use crate::{try_sha256_hex, IoResult};

/// SHA-256 over raw bytes.
#[cfg(feature = "hash")]
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over the canonical JSON bytes of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    let bytes = to_canonical_bytes(value)?;
    try_sha256_hex(&bytes)
}

/// SHA-256 of a file's raw bytes, streamed.
#[cfg(feature = "hash")]
pub fn sha256_file(path: &Path) -> IoResult<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(not(feature = "hash"))]
pub fn sha256_file(_path: &Path) -> IoResult<String> {
    Err(crate::IoError::Hash("hash feature disabled".into()))
}
