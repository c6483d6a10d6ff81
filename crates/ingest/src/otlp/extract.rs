//! Typed accessors over decoded OTLP/JSON trees.
//!
//! Every accessor has one defined behavior: absent or null fields decode to a
//! semantic default, a present field of the wrong type is a schema violation
//! naming the field and both types. 64-bit wire fields are decimal strings
//! per proto3 JSON (JSON numbers only carry 53 bits); integer numbers are
//! accepted as well since several SDKs emit them that way.

use std::collections::BTreeMap;

use otlite_core::error::{OtliteError, Result};
use serde_json::{Map, Value};

pub(crate) type JsonObject = Map<String, Value>;

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn wrong_type(field: &str, expected: &str, actual: &Value) -> OtliteError {
    OtliteError::Schema(format!(
        "field '{field}': expected {expected}, got {}",
        json_type(actual)
    ))
}

pub(crate) fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a JsonObject> {
    value
        .as_object()
        .ok_or_else(|| wrong_type(what, "object", value))
}

/// Absent or null decodes to the empty string.
pub(crate) fn string_field(obj: &JsonObject, field: &str) -> Result<String> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(wrong_type(field, "string", other)),
    }
}

/// Absent, null, or empty decodes to None.
pub(crate) fn opt_string_field(obj: &JsonObject, field: &str) -> Result<Option<String>> {
    Ok(Some(string_field(obj, field)?).filter(|s| !s.is_empty()))
}

/// Small integers (enum discriminants, flags, counts) arrive as plain JSON
/// numbers. Absent or null decodes to zero.
pub(crate) fn int_field(obj: &JsonObject, field: &str) -> Result<i64> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| {
            OtliteError::Schema(format!("field '{field}': expected integer, got {n}"))
        }),
        Some(other) => Err(wrong_type(field, "integer", other)),
    }
}

/// Enum discriminant with a closed range starting at zero.
pub(crate) fn enum_field(obj: &JsonObject, field: &str, max: i64) -> Result<i64> {
    let value = int_field(obj, field)?;
    if !(0..=max).contains(&value) {
        return Err(OtliteError::Schema(format!(
            "field '{field}': value {value} out of range 0..={max}"
        )));
    }
    Ok(value)
}

pub(crate) fn bool_field(obj: &JsonObject, field: &str) -> Result<bool> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(wrong_type(field, "bool", other)),
    }
}

/// Absent or null is "not provided", not zero.
pub(crate) fn f64_field(obj: &JsonObject, field: &str) -> Result<Option<f64>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| {
            OtliteError::Schema(format!("field '{field}': unrepresentable number {n}"))
        }),
        Some(other) => Err(wrong_type(field, "number", other)),
    }
}

/// 64-bit wire field; absent, null, or an empty string decodes to zero.
pub(crate) fn i64_string_field(obj: &JsonObject, field: &str) -> Result<i64> {
    Ok(opt_i64_string_field(obj, field)?.unwrap_or(0))
}

/// 64-bit wire field; absent, null, or an empty string is "not provided".
pub(crate) fn opt_i64_string_field(obj: &JsonObject, field: &str) -> Result<Option<i64>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => parse_i64(value, field).map(Some),
    }
}

/// Parse one value (a field or an array element) as a signed base-10 int64.
pub(crate) fn parse_i64(value: &Value, field: &str) -> Result<i64> {
    match value {
        Value::String(s) => s.trim().parse::<i64>().map_err(|e| {
            OtliteError::Schema(format!("field '{field}': invalid int64 string '{s}': {e}"))
        }),
        Value::Number(n) => n.as_i64().ok_or_else(|| {
            OtliteError::Schema(format!("field '{field}': expected integer, got {n}"))
        }),
        other => Err(wrong_type(field, "int64 string", other)),
    }
}

pub(crate) fn parse_f64(value: &Value, field: &str) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            OtliteError::Schema(format!("field '{field}': unrepresentable number {n}"))
        }),
        other => Err(wrong_type(field, "number", other)),
    }
}

const EMPTY: &[Value] = &[];

/// Absent or null decodes to an empty slice.
pub(crate) fn array_field<'a>(obj: &'a JsonObject, field: &str) -> Result<&'a [Value]> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(EMPTY),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(wrong_type(field, "array", other)),
    }
}

/// The top-level signal array: its absence is fatal, not a default.
pub(crate) fn required_array<'a>(obj: &'a JsonObject, field: &str) -> Result<&'a [Value]> {
    match obj.get(field) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(wrong_type(field, "array", other)),
        None => Err(OtliteError::Schema(format!(
            "missing required array '{field}'"
        ))),
    }
}

/// Absent or null decodes to None; a present value must be an object.
pub(crate) fn object_field<'a>(obj: &'a JsonObject, field: &str) -> Result<Option<&'a JsonObject>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(wrong_type(field, "object", other)),
    }
}

/// Decode an OTLP KeyValue list into a canonical JSON object string with
/// sorted keys. Equal attribute sets must serialize byte-identically or the
/// storage dedup keys silently stop matching.
pub(crate) fn canonical_attrs(items: &[Value], field: &str) -> Result<String> {
    let map = attrs_map(items, field)?;
    serde_json::to_string(&map)
        .map_err(|e| OtliteError::Encode(format!("failed to serialize attributes: {e}")))
}

fn attrs_map(items: &[Value], field: &str) -> Result<BTreeMap<String, Value>> {
    let mut map = BTreeMap::new();
    for item in items {
        let kv = as_object(item, field)?;
        let key = match kv.get("key") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => return Err(wrong_type(&format!("{field}.key"), "string", other)),
            None => {
                return Err(OtliteError::Schema(format!(
                    "field '{field}': attribute entry missing key"
                )));
            }
        };
        let value = match kv.get("value") {
            None | Some(Value::Null) => Value::Null,
            Some(wrapped) => any_value_to_json(wrapped, &format!("{field}.{key}"))?,
        };
        map.insert(key, value);
    }
    Ok(map)
}

/// Collapse an OTLP AnyValue wrapper into its plain JSON form. An unset
/// wrapper decodes to null; bytes stay base64 exactly as transmitted.
fn any_value_to_json(value: &Value, field: &str) -> Result<Value> {
    let obj = as_object(value, field)?;

    if let Some(v) = obj.get("stringValue").filter(|v| !v.is_null()) {
        return match v {
            Value::String(s) => Ok(Value::String(s.clone())),
            other => Err(wrong_type(&format!("{field}.stringValue"), "string", other)),
        };
    }
    if let Some(v) = obj.get("boolValue").filter(|v| !v.is_null()) {
        return match v {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            other => Err(wrong_type(&format!("{field}.boolValue"), "bool", other)),
        };
    }
    if let Some(v) = obj.get("intValue").filter(|v| !v.is_null()) {
        return Ok(Value::from(parse_i64(v, &format!("{field}.intValue"))?));
    }
    if let Some(v) = obj.get("doubleValue").filter(|v| !v.is_null()) {
        let n = parse_f64(v, &format!("{field}.doubleValue"))?;
        return serde_json::Number::from_f64(n)
            .map(Value::Number)
            .ok_or_else(|| {
                OtliteError::Schema(format!("field '{field}.doubleValue': non-finite double"))
            });
    }
    if let Some(v) = obj.get("bytesValue").filter(|v| !v.is_null()) {
        return match v {
            Value::String(s) => Ok(Value::String(s.clone())),
            other => Err(wrong_type(&format!("{field}.bytesValue"), "string", other)),
        };
    }
    if let Some(v) = obj.get("arrayValue").filter(|v| !v.is_null()) {
        let inner = as_object(v, &format!("{field}.arrayValue"))?;
        let values = array_field(inner, "values")?;
        let mut out = Vec::with_capacity(values.len());
        for (i, item) in values.iter().enumerate() {
            out.push(any_value_to_json(item, &format!("{field}[{i}]"))?);
        }
        return Ok(Value::Array(out));
    }
    if let Some(v) = obj.get("kvlistValue").filter(|v| !v.is_null()) {
        let inner = as_object(v, &format!("{field}.kvlistValue"))?;
        let values = array_field(inner, "values")?;
        let map = attrs_map(values, field)?;
        return Ok(Value::Object(map.into_iter().collect()));
    }

    Ok(Value::Null)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn obj(value: Value) -> JsonObject {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn absent_and_null_fields_default() {
        let o = obj(json!({"b": null}));
        assert_eq!(string_field(&o, "a").unwrap(), "");
        assert_eq!(string_field(&o, "b").unwrap(), "");
        assert_eq!(int_field(&o, "a").unwrap(), 0);
        assert_eq!(i64_string_field(&o, "a").unwrap(), 0);
        assert!(!bool_field(&o, "a").unwrap());
        assert_eq!(f64_field(&o, "a").unwrap(), None);
        assert!(array_field(&o, "a").unwrap().is_empty());
        assert!(object_field(&o, "a").unwrap().is_none());
    }

    #[test]
    fn wrong_type_names_field_and_types() {
        let o = obj(json!({"name": 7}));
        let err = string_field(&o, "name").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'name'"), "{msg}");
        assert!(msg.contains("expected string"), "{msg}");
        assert!(msg.contains("got number"), "{msg}");
    }

    #[test]
    fn i64_fields_accept_strings_and_integers() {
        let o = obj(json!({
            "s": "1700000000000000000",
            "n": 42,
            "empty": "",
            "neg": "-5",
        }));
        assert_eq!(i64_string_field(&o, "s").unwrap(), 1_700_000_000_000_000_000);
        assert_eq!(i64_string_field(&o, "n").unwrap(), 42);
        assert_eq!(opt_i64_string_field(&o, "empty").unwrap(), None);
        assert_eq!(i64_string_field(&o, "neg").unwrap(), -5);
    }

    #[test]
    fn i64_fields_reject_garbage() {
        let o = obj(json!({"ts": "2023-01-01T00:00:00Z", "f": 1.5}));
        assert!(i64_string_field(&o, "ts").is_err());
        assert!(i64_string_field(&o, "f").is_err());
    }

    #[test]
    fn enum_field_rejects_out_of_range() {
        let o = obj(json!({"kind": 6}));
        assert!(enum_field(&o, "kind", 5).is_err());
        let o = obj(json!({"kind": 5}));
        assert_eq!(enum_field(&o, "kind", 5).unwrap(), 5);
    }

    #[test]
    fn required_array_is_fatal_when_missing() {
        let o = obj(json!({}));
        let err = required_array(&o, "resourceSpans").unwrap_err();
        assert!(err.to_string().contains("resourceSpans"));
    }

    #[test]
    fn attrs_canonicalize_with_sorted_keys() {
        let items = vec![
            json!({"key": "zebra", "value": {"stringValue": "z"}}),
            json!({"key": "alpha", "value": {"intValue": "7"}}),
        ];
        let canonical = canonical_attrs(&items, "attributes").unwrap();
        assert_eq!(canonical, "{\"alpha\":7,\"zebra\":\"z\"}");
    }

    #[test]
    fn attrs_are_order_insensitive() {
        let forward = vec![
            json!({"key": "a", "value": {"stringValue": "1"}}),
            json!({"key": "b", "value": {"stringValue": "2"}}),
        ];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();
        assert_eq!(
            canonical_attrs(&forward, "attributes").unwrap(),
            canonical_attrs(&reversed, "attributes").unwrap()
        );
    }

    #[test]
    fn any_value_variants_decode_to_plain_json() {
        let items = vec![
            json!({"key": "s", "value": {"stringValue": "x"}}),
            json!({"key": "b", "value": {"boolValue": true}}),
            json!({"key": "i", "value": {"intValue": "9007199254740993"}}),
            json!({"key": "d", "value": {"doubleValue": 1.5}}),
            json!({"key": "arr", "value": {"arrayValue": {"values": [{"stringValue": "v"}]}}}),
            json!({"key": "kv", "value": {"kvlistValue": {"values": [
                {"key": "inner", "value": {"intValue": 1}}
            ]}}}),
            json!({"key": "unset", "value": {}}),
        ];
        let canonical = canonical_attrs(&items, "attributes").unwrap();
        let round: Value = serde_json::from_str(&canonical).unwrap();
        assert_eq!(round["s"], json!("x"));
        assert_eq!(round["b"], json!(true));
        assert_eq!(round["i"], json!(9007199254740993i64));
        assert_eq!(round["d"], json!(1.5));
        assert_eq!(round["arr"], json!(["v"]));
        assert_eq!(round["kv"], json!({"inner": 1}));
        assert_eq!(round["unset"], Value::Null);
    }

    #[test]
    fn attrs_reject_wrongly_typed_values() {
        let items = vec![json!({"key": "s", "value": {"stringValue": 3}})];
        assert!(canonical_attrs(&items, "attributes").is_err());

        let items = vec![json!("not-an-object")];
        assert!(canonical_attrs(&items, "attributes").is_err());
    }
}
