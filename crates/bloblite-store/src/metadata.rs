use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Suffix appended to a blob's stem to name its metadata sidecar.
pub const METADATA_SUFFIX: &str = ".metadata.json";

/// Content type recorded for every blob. There is no content sniffing.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Descriptive record persisted beside each uploaded blob.
///
/// On disk this is a JSON object with the keys `name`, `size`,
/// `uploaded_at` and `content_type`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobMetadata {
    /// File name of the blob.
    pub name: String,
    /// Byte length of the blob at upload time.
    pub size: u64,
    /// UTC time of the upload.
    #[serde(with = "iso8601")]
    pub uploaded_at: DateTime<Utc>,
    /// Always [`DEFAULT_CONTENT_TYPE`] for records written by this crate.
    pub content_type: String,
}

impl BlobMetadata {
    /// Record for a blob of `size` bytes uploaded now.
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self::with_timestamp(name, size, Utc::now())
    }

    pub fn with_timestamp(name: impl Into<String>, size: u64, uploaded_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            size,
            uploaded_at,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }
}

/// Sidecar file name for a blob: its stem plus [`METADATA_SUFFIX`].
///
/// The stem drops only the final extension, so `archive.tar.gz` maps to
/// `archive.tar.metadata.json` and `data.csv` to `data.metadata.json`.
/// A leading dot (`.bashrc`) or a trailing dot (`notes.`) is not an
/// extension, so such names keep their full text as the stem.
pub fn sidecar_file_name(blob_name: &str) -> String {
    let stem = match blob_name.rfind('.') {
        Some(i) if i > 0 && i + 1 < blob_name.len() => &blob_name[..i],
        _ => blob_name,
    };
    format!("{stem}{METADATA_SUFFIX}")
}

/// Serialize `metadata` to `path` as 2-space indented JSON.
pub(crate) fn write_sidecar(path: &Path, metadata: &BlobMetadata) -> io::Result<()> {
    let json = serde_json::to_vec_pretty(metadata).map_err(io::Error::other)?;
    fs::write(path, json)
}

/// Read the sidecar at `path`.
///
/// Returns `Ok(None)` when no sidecar exists. A sidecar that exists but
/// cannot be parsed is reported as [`StoreError::CorruptMetadata`].
pub(crate) fn read_sidecar(path: &Path) -> StoreResult<Option<BlobMetadata>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StoreError::io(
                format!("read metadata {}", path.display()),
                e,
            ))
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StoreError::CorruptMetadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Timestamps are written as `YYYY-MM-DDTHH:MM:SS.ffffff+00:00` and read
/// back from any RFC 3339 string.
mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f+00:00";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sidecar_name_uses_stem() {
        assert_eq!(sidecar_file_name("data.csv"), "data.metadata.json");
        assert_eq!(sidecar_file_name("archive.tar.gz"), "archive.tar.metadata.json");
        assert_eq!(sidecar_file_name("README"), "README.metadata.json");
        assert_eq!(sidecar_file_name(".bashrc"), ".bashrc.metadata.json");
    }

    #[test]
    fn trailing_dot_is_part_of_the_stem() {
        assert_eq!(sidecar_file_name("notes."), "notes..metadata.json");
        assert_eq!(sidecar_file_name("a..b"), "a..metadata.json");
        assert_eq!(sidecar_file_name("..x"), "..metadata.json");
    }

    #[test]
    fn json_shape_matches_layout() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap();
        let meta = BlobMetadata::with_timestamp("data.csv", 23, at);
        let value = serde_json::to_value(&meta).unwrap();

        assert_eq!(value["name"], "data.csv");
        assert_eq!(value["size"], 23);
        assert_eq!(value["content_type"], "application/octet-stream");
        assert_eq!(value["uploaded_at"], "2025-03-01T12:30:00.000000+00:00");
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn reads_offset_and_zulu_timestamps() {
        let python = r#"{"name": "a.bin", "size": 4,
            "uploaded_at": "2024-06-01T08:00:00.123456+00:00",
            "content_type": "application/octet-stream"}"#;
        let meta: BlobMetadata = serde_json::from_str(python).unwrap();
        assert_eq!(meta.size, 4);
        assert_eq!(meta.uploaded_at.timestamp_subsec_micros(), 123456);

        let zulu = python.replace("+00:00", "Z");
        let meta2: BlobMetadata = serde_json::from_str(&zulu).unwrap();
        assert_eq!(meta.uploaded_at, meta2.uploaded_at);
    }

    #[test]
    fn sidecar_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.metadata.json");
        let meta = BlobMetadata::new("data.csv", 23);

        write_sidecar(&path, &meta).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"name\": \"data.csv\""));

        let back = read_sidecar(&path).unwrap().unwrap();
        assert_eq!(back.name, "data.csv");
        assert_eq!(back.size, 23);
        // Sub-microsecond precision is not persisted.
        assert_eq!(
            back.uploaded_at.timestamp_micros(),
            meta.uploaded_at.timestamp_micros()
        );
    }

    #[test]
    fn missing_sidecar_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_sidecar(&dir.path().join("nope.metadata.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn garbage_sidecar_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.metadata.json");
        fs::write(&path, b"{not json").unwrap();

        let err = read_sidecar(&path).unwrap_err();
        assert!(matches!(err, StoreError::CorruptMetadata { .. }));
    }
}
