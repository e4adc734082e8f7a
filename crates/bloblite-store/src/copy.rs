//! Staged file copies.
//!
//! Bytes are written to a temporary file next to the target and renamed into
//! place only once the copy (including permissions and timestamps) is
//! complete. A failed copy drops the temporary file, so the target is either
//! absent, untouched, or complete.

use std::fs::{self, File, FileTimes};
use std::io;
use std::path::Path;

use tracing::debug;

/// Name prefix of in-flight staging files. Listings skip these.
pub const STAGING_PREFIX: &str = ".bloblite-staging-";

/// How the staged file is published at the target path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Publish {
    /// Replace an existing target, like a conventional copy.
    Overwrite,
    /// Fail with [`io::ErrorKind::AlreadyExists`] if the target exists.
    NoClobber,
}

/// Returns `true` if `name` is an in-flight staging file.
pub fn is_staging_file(name: &str) -> bool {
    name.starts_with(STAGING_PREFIX)
}

/// Copy `src` to `dst` through a staging file in `dst`'s directory.
///
/// Permissions and access/modification times of `src` are carried over.
/// Returns the number of bytes copied.
pub(crate) fn copy_staged(src: &Path, dst: &Path, publish: Publish) -> io::Result<u64> {
    let dir = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut reader = File::open(src)?;
    let source_meta = reader.metadata()?;

    let mut staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempfile_in(dir)?;
    let copied = io::copy(&mut reader, staged.as_file_mut())?;

    let mut times = FileTimes::new();
    if let Ok(accessed) = source_meta.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = source_meta.modified() {
        times = times.set_modified(modified);
    }
    staged.as_file().set_times(times)?;
    staged.as_file().sync_all()?;
    fs::set_permissions(staged.path(), source_meta.permissions())?;

    match publish {
        Publish::Overwrite => staged.persist(dst).map_err(|e| e.error)?,
        Publish::NoClobber => staged.persist_noclobber(dst).map_err(|e| e.error)?,
    };

    debug!(src = %src.display(), dst = %dst.display(), bytes = copied, "staged copy published");
    Ok(copied)
}
