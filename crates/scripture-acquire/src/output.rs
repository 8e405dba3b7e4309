use crate::error::FetchError;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;

const INDENT: &[u8] = b"    ";

/// Serialize `value` as 4-space indented JSON with a trailing newline.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write `value` to `path` as pretty JSON, creating missing parent
/// directories and overwriting any existing file.
pub fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), FetchError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(FetchError::io(dir))?;
    }

    let json = to_pretty_json(value).map_err(|source| FetchError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, &json).map_err(FetchError::io(path))?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "Wrote JSON");
    Ok(())
}
