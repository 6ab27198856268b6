//! Command-line literals

use dbcall_core::Value;

/// Parse a command-line argument into a value
///
/// `null`, `true` and `false` are keywords; anything that parses as an
/// integer or a float becomes one. Everything else is text, with one layer
/// of single quotes removed so `'42'` stays a string.
pub fn parse_literal(arg: &str) -> Value {
    match arg {
        "null" | "NULL" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Some(text) = arg.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return Value::String(text.to_string());
    }
    if let Ok(v) = arg.parse::<i64>() {
        return Value::Int64(v);
    }
    if let Ok(v) = arg.parse::<f64>() {
        return Value::Float64(v);
    }
    Value::String(arg.to_string())
}
