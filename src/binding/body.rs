use super::params::bind_attribute;
use crate::error::{DispatchError, FrameworkErrorKind};
use crate::registry::{BodySlot, Bindings, Instance, MemberKind, Slot};
use serde_json::{Map, Value};
use tracing::debug;

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

/// Parse `text` into the body object of a terminal handler.
///
/// Returns the number of top-level keys that were bound.
///
/// # Errors
///
/// [`DispatchError::BodyParse`] naming the body type when the text is not a
/// well-formed object payload. Keys that do not bind are not errors.
pub fn parse_body(slot: &BodySlot, instance: &mut Instance, text: &str) -> Result<usize, DispatchError> {
    let failed = |reason: String| DispatchError::BodyParse {
        target: slot.type_name().to_string(),
        reason,
    };

    let payload: Value = serde_json::from_str(text).map_err(|e| failed(e.to_string()))?;
    let Value::Object(fields) = payload else {
        return Err(failed(format!(
            "expected an object payload, found {}",
            json_kind(&payload)
        )));
    };

    let body = slot
        .project(instance)
        .ok_or_else(|| DispatchError::Framework {
            kind: FrameworkErrorKind::Construction,
            resource: slot.type_name().to_string(),
            cause: "body acceptor does not match the handler instance".to_string(),
        })?;
    Ok(apply_object(slot.bindings(), body, &fields))
}

/// Bind every key of an object payload, recursing into nested members.
pub fn apply_object(bindings: &Bindings, target: &mut Instance, fields: &Map<String, Value>) -> usize {
    let mut bound = 0;
    for (key, value) in fields {
        let applied = match value {
            Value::String(s) => bind_attribute(bindings, target, key, s),
            Value::Number(n) => bind_attribute(bindings, target, key, &n.to_string()),
            Value::Bool(b) => bind_attribute(bindings, target, key, if *b { "true" } else { "false" }),
            Value::Object(inner) => apply_nested(bindings, target, key, inner),
            Value::Null | Value::Array(_) => false,
        };
        if applied {
            bound += 1;
        } else {
            debug!(key = %key, kind = json_kind(value), "Body key ignored");
        }
    }
    bound
}

fn apply_nested(bindings: &Bindings, target: &mut Instance, key: &str, fields: &Map<String, Value>) -> bool {
    for member in bindings.of_kind(MemberKind::Field).filter(|m| m.matches(key)) {
        let Slot::Nested { bindings: nested, .. } = member.slot() else {
            continue;
        };
        if let Some(inner) = member.project_nested(target) {
            apply_object(nested, inner, fields);
            return true;
        }
    }
    false
}
