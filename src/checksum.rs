//! Content fingerprints for trigger packages.
//!
//! Per-file checksums are SHA-1 digests over raw file bytes, keyed by the
//! path relative to the package root (forward slashes, no leading slash).
//! The map is a pure function of file contents: traversal order never
//! affects it, and directories are traversed but never hashed themselves.
//! The archive checksum is a separate digest over a pre-built zip's bytes;
//! building the archive is the [`crate::archive`] collaborator's job.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use sha1::{Digest, Sha1};
use tracing::debug;

/// Package-relative file path → lowercase hex SHA-1 digest.
pub type ChecksumMap = BTreeMap<String, String>;

/// Hex SHA-1 over a byte slice.
pub fn hex_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Walks every regular file under `dir` with an explicit worklist and
/// records its content digest under the normalized relative path.
pub fn trigger_file_checksums(dir: &Path) -> io::Result<ChecksumMap> {
    let mut checksums = ChecksumMap::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                let contents = fs::read(&path)?;
                let relative = relative_key(dir, &path);
                debug!(file = %relative, bytes = contents.len(), "Hashed trigger file");
                checksums.insert(relative, hex_digest(&contents));
            }
        }
    }

    Ok(checksums)
}

/// Hex SHA-1 over the bytes of a pre-built package archive.
pub fn archive_checksum(archive_path: &Path) -> io::Result<String> {
    let contents = fs::read(archive_path)?;
    Ok(hex_digest(&contents))
}

fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
