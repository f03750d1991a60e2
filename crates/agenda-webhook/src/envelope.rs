//! Transport envelope stripping.
//!
//! The upstream wraps substantive payloads in one or more layers of
//! `{body}` / `{data}` / `{result}` / `{eventos}` / `{items}` objects, and
//! sometimes in a single-element array around such an object. Unwrapping is a
//! bounded loop over variant inspection rather than open recursion, so
//! adversarial nesting cannot blow the stack.

use serde_json::Value;

/// Envelope keys in priority order.
const ENVELOPE_KEYS: [&str; 5] = ["body", "data", "result", "eventos", "items"];

/// Nesting cap. Real payloads stay under three layers.
const MAX_UNWRAP_DEPTH: usize = 8;

/// Strip transport envelopes until the substantive payload is reached.
pub fn unwrap_payload(value: Value) -> Value {
    let mut current = value;
    for _ in 0..MAX_UNWRAP_DEPTH {
        match unwrap_once(current) {
            Ok(inner) => current = inner,
            Err(done) => return done,
        }
    }
    current
}

/// One unwrapping step: `Ok` descends into the envelope's content, `Err`
/// returns the value as the substantive payload.
fn unwrap_once(value: Value) -> Result<Value, Value> {
    match value {
        Value::Array(mut items) => {
            if items.len() == 1 {
                let key = items
                    .first()
                    .and_then(Value::as_object)
                    .and_then(|record| {
                        ["body", "data"]
                            .into_iter()
                            .find(|k| record.contains_key(*k))
                    });
                if let Some(key) = key {
                    if let Some(Value::Object(mut record)) = items.pop() {
                        return Ok(record.remove(key).unwrap_or(Value::Null));
                    }
                }
            }
            Err(Value::Array(items))
        }
        Value::Object(mut record) => {
            let key = ENVELOPE_KEYS
                .into_iter()
                .find(|k| record.get(*k).is_some_and(is_truthy));
            match key {
                Some(key) => Ok(record.remove(key).unwrap_or(Value::Null)),
                None => Err(Value::Object(record)),
            }
        }
        other => Err(other),
    }
}

/// JS-style truthiness, matching how the upstream contract evolved: `null`,
/// `false`, `0` and `""` do not count as envelope content.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
