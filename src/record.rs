//! Record model and JSON array persistence shared by the converter and the
//! enricher.

use crate::error::{EnrichError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::Path;

pub const NAME_FIELD: &str = "name";
pub const ERA_FIELD: &str = "era";
pub const THEME_FIELD: &str = "theme";
pub const DESCRIPTION_FIELD: &str = "description";

/// One flat exhibit record. Key order is the order keys were inserted, which
/// is the CSV column order for converted data.
pub type Record = Map<String, Value>;

/// The three fields an eligible record must carry, as prompt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhibitFields<'a> {
    pub name: Cow<'a, str>,
    pub era: Cow<'a, str>,
    pub theme: Cow<'a, str>,
}

impl<'a> ExhibitFields<'a> {
    /// Returns `None` unless `name`, `era` and `theme` are all present and
    /// truthy: a non-empty string, a non-zero number or `true`. `null`,
    /// `false`, `0`, `""`, arrays and objects make the record ineligible.
    pub fn from_record(record: &'a Record) -> Option<Self> {
        Some(Self {
            name: slot_text(record, NAME_FIELD)?,
            era: slot_text(record, ERA_FIELD)?,
            theme: slot_text(record, THEME_FIELD)?,
        })
    }
}

fn slot_text<'a>(record: &'a Record, key: &str) -> Option<Cow<'a, str>> {
    match record.get(key)? {
        Value::String(s) if !s.is_empty() => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => {
            Some(Cow::Owned(n.to_string()))
        }
        Value::Bool(true) => Some(Cow::Borrowed("true")),
        _ => None,
    }
}

/// Label used in progress lines.
pub fn display_name(record: &Record) -> String {
    match record.get(NAME_FIELD) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Null) | None => "<unnamed>".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Load a JSON document whose root is an array of objects.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    if !path.is_file() {
        return Err(EnrichError::InputNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    let Value::Array(items) = value else {
        return Err(EnrichError::InvalidInput(format!(
            "{}: root must be a JSON array",
            path.display()
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(EnrichError::InvalidInput(format!(
                "{}: element {} is {}, expected an object",
                path.display(),
                idx,
                json_kind(&other)
            ))),
        })
        .collect()
}

/// Serialize `value` with two-space indentation and replace `path` in one
/// step. The document goes to a temporary sibling first, so a failed write
/// never leaves a truncated file behind.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    // Temp files are created owner-only; keep the permissions a plain write would give.
    match fs::metadata(path) {
        Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
        #[cfg(unix)]
        Err(_) => {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))?;
        }
        #[cfg(not(unix))]
        Err(_) => {}
    }
    tmp.write_all(json.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| EnrichError::Io(e.error))?;
    Ok(())
}

pub fn write_records(path: &Path, records: &[Record]) -> Result<()> {
    write_json(path, records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
