//! Loading the input document and locating its `features` array.
//!
//! Features are opaque: nothing here looks inside them.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use log::debug;
use serde_json::Value;

use crate::error::{Result, SampleError};

pub(crate) const FEATURES_KEY: &str = "features";

/// Read and parse the whole file at `path`.
pub fn load_document(path: &Path) -> Result<Value> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SampleError::InputNotFound { path: path.to_path_buf() },
        _ => SampleError::io(path, e),
    })?;
    let reader = BufReader::new(file);

    let doc: Value = serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            SampleError::io(path, e.into())
        } else {
            SampleError::Parse { path: path.to_path_buf(), source: e }
        }
    })?;

    if let Value::Object(obj) = &doc {
        debug!("Top-level keys: {:?}", obj.keys().collect::<Vec<_>>());
    }
    Ok(doc)
}

/// Mutable handle on the document's `features` array.
pub fn features_mut(doc: &mut Value) -> Result<&mut Vec<Value>> {
    let obj = doc.as_object_mut().ok_or(SampleError::NotAnObject)?;
    match obj.get_mut(FEATURES_KEY) {
        Some(Value::Array(arr)) => Ok(arr),
        Some(other) => Err(SampleError::FeaturesNotArray { found: json_type(other) }),
        None => Err(SampleError::MissingFeatures),
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
