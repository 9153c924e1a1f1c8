//! Untrusted movement-vector parsing
//!
//! External target generators return loosely-typed movement hints:
//! sometimes a `[x, y]` array, sometimes an `{x, y}` object, sometimes
//! numbers encoded as strings. The engine treats all of it as untrusted
//! bounded input: parse into a fixed numeric pair, clamp to the
//! normalized coordinate range, and fall back to the last accepted value
//! on any shape mismatch. Malformed generator output can never violate
//! position invariants.

use serde_json::Value;
use tracing::warn;

fn number(value: &Value) -> Option<f32> {
    match value {
        Value::Number(n) => n.as_f64().map(|v| v as f32),
        Value::String(s) => s.trim().parse::<f32>().ok(),
        _ => None,
    }
}

fn pair(value: &Value) -> Option<(f32, f32)> {
    match value {
        Value::Array(items) if items.len() >= 2 => {
            Some((number(&items[0])?, number(&items[1])?))
        }
        Value::Object(map) => Some((number(map.get("x")?)?, number(map.get("y")?)?)),
        _ => None,
    }
}

/// Parse a movement-target hint, clamped to [0,1] per axis. Returns
/// `fallback` when the value has no usable pair or a non-finite component.
pub fn parse_target_hint(raw: &Value, fallback: (f32, f32)) -> (f32, f32) {
    match pair(raw) {
        Some((x, y)) if x.is_finite() && y.is_finite() => {
            (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0))
        }
        _ => {
            warn!("unusable target hint, keeping last accepted value");
            fallback
        }
    }
}
