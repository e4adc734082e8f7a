//! Container and blob name validation.
//!
//! Every name maps to exactly one directory entry under the storage root, so
//! a valid name is a single path component:
//! - Must be non-empty
//! - Must not be `.` or `..`
//! - Must not contain `/`, `\` or NUL
//!
//! Uploaded blob names additionally must not end with the metadata sidecar
//! suffix or start with the staging prefix, since such files are hidden from
//! listings.

use crate::copy::{is_staging_file, STAGING_PREFIX};
use crate::error::{StoreError, StoreResult};
use crate::metadata::METADATA_SUFFIX;

/// Characters that are forbidden anywhere in a name.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0'];

fn invalid(name: &str, reason: impl Into<String>) -> StoreError {
    StoreError::InvalidName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn validate_component(name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(invalid(name, "name must not be empty"));
    }

    if name == "." || name == ".." {
        return Err(invalid(name, "name must not be '.' or '..'"));
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(invalid(name, format!("contains forbidden character: {ch:?}")));
        }
    }

    Ok(())
}

/// Validate a container name, returning `Ok(())` if valid.
///
/// ```
/// use bloblite_store::names::validate_container_name;
///
/// assert!(validate_container_name("clients").is_ok());
/// assert!(validate_container_name("").is_err());
/// assert!(validate_container_name("../escape").is_err());
/// ```
pub fn validate_container_name(name: &str) -> StoreResult<()> {
    validate_component(name)
}

/// Validate the name of a blob being looked up (download, metadata).
pub fn validate_blob_name(name: &str) -> StoreResult<()> {
    validate_component(name)
}

/// Validate the name a new blob would be stored under.
pub fn validate_upload_name(name: &str) -> StoreResult<()> {
    validate_component(name)?;
    if is_metadata_file(name) {
        return Err(invalid(
            name,
            format!("must not end with '{METADATA_SUFFIX}'"),
        ));
    }
    if is_staging_file(name) {
        return Err(invalid(
            name,
            format!("must not start with '{STAGING_PREFIX}'"),
        ));
    }
    Ok(())
}

/// Returns `true` if `name` follows the metadata sidecar naming pattern.
pub fn is_metadata_file(name: &str) -> bool {
    name.ends_with(METADATA_SUFFIX)
}
