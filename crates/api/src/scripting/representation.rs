//! Script result conversion to the external JSON representation.
//!
//! One object shape per result is supported: unit (null), primitives,
//! arrays, maps, and graph elements, with arrays and maps converted
//! element-wise so traversal results serialize naturally. Anything else
//! (a bound handle, a function pointer) is an unsupported shape and
//! propagates as an error rather than being masked.

use grax_core::error::CoreError;
use grax_db::models::{Edge, Node};
use rhai::Dynamic;
use serde_json::Value;

/// Convert a script result into its response representation.
pub fn convert(value: Dynamic) -> Result<Value, CoreError> {
    if value.is_unit() {
        return Ok(Value::Null);
    }

    if let Some(node) = value.clone().try_cast::<Node>() {
        return serde_json::to_value(node)
            .map_err(|err| CoreError::Internal(format!("Node serialization failed: {err}")));
    }
    if let Some(edge) = value.clone().try_cast::<Edge>() {
        return serde_json::to_value(edge)
            .map_err(|err| CoreError::Internal(format!("Edge serialization failed: {err}")));
    }

    if value.is_array() {
        let items = value.cast::<rhai::Array>();
        return items
            .into_iter()
            .map(convert)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array);
    }

    if value.is_map() {
        let map = value.cast::<rhai::Map>();
        let mut object = serde_json::Map::new();
        for (key, item) in map {
            object.insert(key.to_string(), convert(item)?);
        }
        return Ok(Value::Object(object));
    }

    let shape = value.type_name().to_string();
    rhai::serde::from_dynamic::<Value>(&value).map_err(|_| CoreError::UnsupportedResult(shape))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
