//! Fingerprints of the input files a run consumed

use crate::error::Result;
use crate::types::ChecksumAlgorithm;
use sha2::{Digest, Sha256, Sha512};
use std::io::{BufReader, Read};
use std::path::Path;

/// Hex digest of the file at `path`
pub fn compute_file_checksum(path: impl AsRef<Path>, algorithm: ChecksumAlgorithm) -> Result<String> {
    let file = std::fs::File::open(path)?;
    compute_checksum(BufReader::new(file), algorithm)
}

/// Hex digest of everything `reader` yields
pub fn compute_checksum<R: Read>(mut reader: R, algorithm: ChecksumAlgorithm) -> Result<String> {
    let digest = match algorithm {
        ChecksumAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            std::io::copy(&mut reader, &mut hasher)?;
            hex::encode(hasher.finalize())
        },
        ChecksumAlgorithm::Sha512 => {
            let mut hasher = Sha512::new();
            std::io::copy(&mut reader, &mut hasher)?;
            hex::encode(hasher.finalize())
        },
    };
    Ok(digest)
}
