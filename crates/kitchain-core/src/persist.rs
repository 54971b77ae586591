//! Atomic file output.

use std::io::{self, Write};
use std::path::Path;

/// Writes `bytes` to `path` via a sibling temp file and an atomic rename.
///
/// Other processes either see the previous file or the complete new one,
/// never a partial write.
pub(crate) fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
