use serde_json::Value;

/// Coerce a loosely-typed JSON value to a finite number.
///
/// Numbers pass through, strings are trimmed and parsed. Everything else
/// (null, booleans, arrays, objects, blank strings) and any non-finite
/// result yields `None`, which fallback chains treat as "not found".
pub fn num(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    parsed.filter(|n| n.is_finite())
}
