use std::ffi::{OsStr, OsString};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde_json::Value;

use crate::error::{Result, SampleError};

const RAW_MARKER: &str = "raw";
const CLEAN_MARKER: &str = "clean";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Compact,
    Pretty,
}

/// `data/city_raw.geojson` -> `data/city_clean.geojson`.
///
/// Only the file name is rewritten, every occurrence of the marker.
/// Directories keep their names even if they contain "raw".
pub fn derive_output_path(input: &Path) -> PathBuf {
    let Some(name) = input.file_name() else {
        return input.to_path_buf();
    };

    let renamed = replace_marker(name);
    if renamed.as_os_str() == name {
        warn!("No \"{RAW_MARKER}\" in {:?}; output path equals input", name);
    }
    input.with_file_name(renamed)
}

// Byte-level so names that are not valid UTF-8 keep their other bytes
fn replace_marker(name: &OsStr) -> OsString {
    let bytes = name.as_encoded_bytes();
    let raw = RAW_MARKER.as_bytes();

    let mut out = Vec::with_capacity(bytes.len() + 2);
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i..].starts_with(raw) {
            out.extend_from_slice(CLEAN_MARKER.as_bytes());
            i += raw.len();
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    // SAFETY: only whole ASCII runs were swapped for other ASCII, so `out`
    // is `name`'s encoding split and joined at valid UTF-8 boundaries.
    unsafe { OsString::from_encoded_bytes_unchecked(out) }
}

/// Write `doc` to a file that must not exist yet.
///
/// A failed write removes the half-written file.
pub fn write_new(path: &Path, doc: &Value, format: OutputFormat) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => SampleError::OutputExists { path: path.to_path_buf() },
            _ => SampleError::io(path, e),
        })?;

    if let Err(e) = write_doc(file, path, doc, format) {
        if let Err(rm) = fs::remove_file(path) {
            warn!("Could not remove partial output {}: {rm}", path.display());
        }
        return Err(e);
    }
    info!("Wrote {}", path.display());
    Ok(())
}

fn write_doc(file: File, path: &Path, doc: &Value, format: OutputFormat) -> Result<()> {
    let mut writer = BufWriter::new(file);
    let written = match format {
        OutputFormat::Compact => serde_json::to_writer(&mut writer, doc),
        OutputFormat::Pretty => serde_json::to_writer_pretty(&mut writer, doc),
    };
    written.map_err(|e| {
        if e.is_io() {
            SampleError::io(path, e.into())
        } else {
            SampleError::Serialize { path: path.to_path_buf(), source: e }
        }
    })?;

    writer.flush().map_err(|e| SampleError::io(path, e))?;
    writer
        .into_inner()
        .map_err(|e| SampleError::io(path, e.into_error()))?
        .sync_all()
        .map_err(|e| SampleError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_becomes_clean_in_file_name() {
        let out = derive_output_path(Path::new("data/berlin_raw.geojson"));
        assert_eq!(out, PathBuf::from("data/berlin_clean.geojson"));
    }

    #[test]
    fn directories_are_left_alone() {
        let out = derive_output_path(Path::new("raw/raw_points.json"));
        assert_eq!(out, PathBuf::from("raw/clean_points.json"));
    }

    #[test]
    fn every_marker_in_name_is_replaced() {
        let out = derive_output_path(Path::new("raw_city_raw.json"));
        assert_eq!(out, PathBuf::from("clean_city_clean.json"));
    }

    #[test]
    fn name_without_marker_is_unchanged() {
        let out = derive_output_path(Path::new("/tmp/city.json"));
        assert_eq!(out, PathBuf::from("/tmp/city.json"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_name_keeps_its_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let input = Path::new("data").join(OsStr::from_bytes(b"city_\xff_raw.json"));
        let out = derive_output_path(&input);
        assert_eq!(out.file_name().unwrap().as_bytes(), b"city_\xff_clean.json");
        assert_eq!(out.parent(), Some(Path::new("data")));
    }

    #[test]
    fn write_new_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a_clean.json");
        let doc = json!({ "features": [1, 2] });

        write_new(&path, &doc, OutputFormat::Compact).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, r#"{"features":[1,2]}"#);
    }

    #[test]
    fn pretty_output_is_indented() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a_clean.json");
        write_new(&path, &json!({ "features": [] }), OutputFormat::Pretty).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"features\""));
    }

    #[test]
    fn existing_output_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a_clean.json");
        fs::write(&path, "previous run").unwrap();

        let err = write_new(&path, &json!({ "features": [] }), OutputFormat::Compact).unwrap_err();

        assert!(matches!(err, SampleError::OutputExists { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous run");
    }

    #[test]
    fn missing_parent_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("a_clean.json");
        let err = write_new(&path, &json!({}), OutputFormat::Compact).unwrap_err();
        assert!(matches!(err, SampleError::Io { .. }));
        assert!(!path.exists());
    }
}
