//! Content fingerprints for build resolution
//!
//! A build is identified by the MD5 digest of its executable's full
//! contents, rendered as lowercase hex. The digest is only used as an opaque
//! identity string; nothing downstream depends on the hash algorithm beyond
//! the catalog checksums being produced the same way.

use md5::{Digest, Md5};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// Compute the hex-encoded MD5 fingerprint of a file's contents
pub fn compute<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut file = File::open(path.as_ref())?;
    let mut hasher = Md5::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    let digest: [u8; 16] = hasher.finalize().into();
    Ok(hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(contents).expect("write temp file");
        file.flush().expect("flush temp file");
        file
    }

    #[test]
    fn test_known_digest() {
        let file = file_with(b"abc");
        assert_eq!(
            compute(file.path()).unwrap(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
    }

    #[test]
    fn test_empty_file_digest() {
        let file = file_with(b"");
        assert_eq!(
            compute(file.path()).unwrap(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(compute("no/such/file").is_err());
    }
}
