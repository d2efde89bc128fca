//! Shallow JSON merge used to apply a `Patch(delta)` action.

use serde_json::Value;

/// Merge `delta` into `current`. When both sides are objects, `delta`'s
/// top-level keys overwrite or insert into `current`'s map; any other
/// shape combination replaces `current` wholesale.
pub fn shallow_merge(current: Value, delta: Value) -> Value {
    match (current, delta) {
        (Value::Object(mut base), Value::Object(patch)) => {
            for (key, value) in patch {
                base.insert(key, value);
            }
            Value::Object(base)
        }
        (_, delta) => delta,
    }
}

#[cfg(test)]
#[path = "merge.test.rs"]
mod tests;
