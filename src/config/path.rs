//! Dotted-path lookups and deep merging over JSON trees.

// self
use crate::_prelude::*;

/// Walks `path` (dot separated) through `value`.
///
/// Object segments are looked up by key and array segments by numeric index. Missing
/// intermediates and `null` leaves both yield `None`.
pub fn get_deep<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
	path.split('.')
		.try_fold(value, |level, key| match level {
			Value::Object(map) => map.get(key),
			Value::Array(items) => key.parse::<usize>().ok().and_then(|idx| items.get(idx)),
			_ => None,
		})
		.filter(|found| !found.is_null())
}

/// Merges `overrides` into `base` in place.
///
/// Objects merge key by key; any other override value (arrays included) replaces the base
/// value wholesale.
pub fn deep_merge(base: &mut Value, overrides: Value) {
	match (base, overrides) {
		(Value::Object(base), Value::Object(overrides)) =>
			for (key, value) in overrides {
				match base.get_mut(&key) {
					Some(slot) => deep_merge(slot, value),
					None => {
						base.insert(key, value);
					},
				}
			},
		(slot, value) => *slot = value,
	}
}

/// Flattens a JSON value into display strings.
///
/// Strings pass through, arrays contribute one entry per item, and other scalars use their
/// JSON rendering. `null` contributes nothing.
pub fn to_strings(value: &Value) -> Vec<String> {
	match value {
		Value::Null => Vec::new(),
		Value::String(text) => vec![text.clone()],
		Value::Array(items) => items.iter().flat_map(to_strings).collect(),
		other => vec![other.to_string()],
	}
}

pub(crate) fn type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
