use serde_json::{Map, Value};

/// Reads the value at a dotted path, descending through nested objects.
/// Any segment that is missing or not an object ends the walk with `None`.
pub fn resolve<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = document;
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Writes a value at a dotted path, creating intermediate objects as needed.
/// A non-object intermediate is replaced by a fresh object. An empty path is
/// a no-op.
pub fn insert(document: &mut Value, path: &str, value: Value) {
    if path.is_empty() {
        return;
    }

    let mut current = document;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Some(object) = current.as_object_mut() else {
            return;
        };

        if segments.peek().is_none() {
            object.insert(segment.to_string(), value);
            return;
        }
        current = object.entry(segment.to_string()).or_insert(Value::Null);
    }
}
