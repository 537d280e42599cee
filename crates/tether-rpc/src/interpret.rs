//! Response interpreters.
//!
//! Each interpreter turns a raw response body into a typed value or fails
//! with an [`InterpretError`]. They are pure functions: no I/O, no logging and
//! no attempt to recover a partial value from a malformed envelope. The
//! dispatch core in [`crate::client`] decides which public error a failure
//! becomes.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use tether_types::{Capability, MethodType};

use crate::error::InterpretError;
use crate::protocol::ErrorEnvelope;

/// How each element of a `result` is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    /// A string, number or boolean.
    #[default]
    Primitive,
    /// Any structured value, decoded through `T`'s `Deserialize` impl.
    Object,
}

/// Extract the scalar `result` as `T`.
///
/// # Errors
///
/// Fails if `result` is missing, is not a string, number or boolean, or does
/// not deserialize into `T`.
pub fn primitive<T: DeserializeOwned>(body: &str) -> Result<T, InterpretError> {
    decode(result_field(body)?, ValueKind::Primitive)
}

/// Extract `result` as a list of scalars, in server order.
///
/// # Errors
///
/// Fails if `result` is missing or not an array, or if any element is not a
/// scalar of type `T`.
pub fn primitive_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, InterpretError> {
    decode_all(result_field(body)?, "result", ValueKind::Primitive)
}

/// Deserialize `result` into `T`.
///
/// # Errors
///
/// Fails if `result` is missing or does not deserialize into `T`.
pub fn object<T: DeserializeOwned>(body: &str) -> Result<T, InterpretError> {
    decode(result_field(body)?, ValueKind::Object)
}

/// Deserialize `result` into a list of `T`, in server order.
///
/// # Errors
///
/// Fails if `result` is missing or not an array, or if any element does not
/// deserialize into `T`.
pub fn object_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, InterpretError> {
    decode_all(result_field(body)?, "result", ValueKind::Object)
}

/// Single value of either kind.
///
/// # Errors
///
/// See [`primitive`] and [`object`].
pub fn value<T: DeserializeOwned>(body: &str, kind: ValueKind) -> Result<T, InterpretError> {
    decode(result_field(body)?, kind)
}

/// List of either kind.
///
/// # Errors
///
/// See [`primitive_list`] and [`object_list`].
pub fn values<T: DeserializeOwned>(body: &str, kind: ValueKind) -> Result<Vec<T>, InterpretError> {
    decode_all(result_field(body)?, "result", kind)
}

/// Read `result` as `[current, [candidate, ...]]`.
///
/// # Errors
///
/// Fails unless `result` is an array of exactly two elements whose second
/// element is an array, and every value decodes as `kind` into `T`.
pub fn capability<T: DeserializeOwned>(
    body: &str,
    kind: ValueKind,
) -> Result<Capability<T>, InterpretError> {
    let items = expect_array(result_field(body)?, "result")?;
    let [current, candidates]: [Value; 2] =
        items
            .try_into()
            .map_err(|items: Vec<Value>| InterpretError::Arity {
                expected: 2,
                found: items.len(),
            })?;

    let current = decode(current, kind)?;
    let candidates = decode_all(candidates, "candidates", kind)?;
    Ok(Capability::new(current, candidates))
}

/// Succeed when the body carries a `result` and no `error`.
///
/// A `null` error counts as absent. Any other error value must be a
/// well-formed envelope, which is surfaced as [`InterpretError::Remote`].
/// The value of `result` is ignored, but it must be present and non-null.
///
/// # Errors
///
/// Returns `InterpretError::Remote` for a server-reported error,
/// `InterpretError::MalformedError` when the error field has an unknown shape
/// and `InterpretError::MissingField` when there is no `result`.
pub fn success_only(body: &str) -> Result<(), InterpretError> {
    let mut envelope = envelope(body)?;
    match envelope.remove("error") {
        None | Some(Value::Null) => {}
        Some(error) => {
            return Err(match ErrorEnvelope::from_value(&error) {
                Some(reported) => InterpretError::Remote(reported.into()),
                None => InterpretError::MalformedError(error.to_string()),
            });
        }
    }
    take_field(&mut envelope, "result")?;
    Ok(())
}

/// Read the server's method self-description.
///
/// Entries are `[name, parameterTypes, resultTypes, version]`, found under
/// `results` (or `result` when `results` is absent).
///
/// # Errors
///
/// Fails if neither field is present, the value is not an array, or any
/// entry is not a 4-tuple of the expected types.
pub fn method_types(body: &str) -> Result<Vec<MethodType>, InterpretError> {
    let mut envelope = envelope(body)?;
    let results = take_field(&mut envelope, "results")
        .or_else(|_| take_field(&mut envelope, "result"))
        .map_err(|_| InterpretError::MissingField("results"))?;

    expect_array(results, "results")?
        .into_iter()
        .map(|entry| {
            let MethodTypeEntry(name, parameter_types, result_types, version) =
                serde_json::from_value(entry)?;
            Ok::<_, InterpretError>(MethodType {
                name,
                parameter_types: parameter_types.into_vec(),
                result_types: result_types.into_vec(),
                version,
            })
        })
        .collect()
}

#[derive(Deserialize)]
struct MethodTypeEntry(String, TypeList, TypeList, String);

/// Type names as either a JSON array or a comma-separated string.
#[derive(Deserialize)]
#[serde(untagged)]
enum TypeList {
    Listed(Vec<String>),
    Joined(String),
}

impl TypeList {
    fn into_vec(self) -> Vec<String> {
        match self {
            TypeList::Listed(types) => types,
            TypeList::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

fn envelope(body: &str) -> Result<Map<String, Value>, InterpretError> {
    match serde_json::from_str(body)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(InterpretError::NotAnObject),
    }
}

fn take_field(
    envelope: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Value, InterpretError> {
    match envelope.remove(field) {
        None | Some(Value::Null) => Err(InterpretError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

fn result_field(body: &str) -> Result<Value, InterpretError> {
    take_field(&mut envelope(body)?, "result")
}

fn expect_array(value: Value, field: &'static str) -> Result<Vec<Value>, InterpretError> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(InterpretError::NotAnArray(field)),
    }
}

fn decode<T: DeserializeOwned>(value: Value, kind: ValueKind) -> Result<T, InterpretError> {
    if kind == ValueKind::Primitive {
        match &value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => {}
            Value::Null => return Err(InterpretError::NotScalar("null")),
            Value::Array(_) => return Err(InterpretError::NotScalar("array")),
            Value::Object(_) => return Err(InterpretError::NotScalar("object")),
        }
    }
    Ok(serde_json::from_value(value)?)
}

fn decode_all<T: DeserializeOwned>(
    value: Value,
    field: &'static str,
    kind: ValueKind,
) -> Result<Vec<T>, InterpretError> {
    expect_array(value, field)?
        .into_iter()
        .map(|item| decode(item, kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_types::StatusCode;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Size {
        width: u32,
        height: u32,
    }

    #[test]
    fn test_primitive_string() {
        let value: String = primitive(r#"{"result": "still", "id": 1}"#).unwrap();
        assert_eq!(value, "still");
    }

    #[test]
    fn test_primitive_number_and_bool() {
        let value: i64 = primitive(r#"{"result": 42}"#).unwrap();
        assert_eq!(value, 42);

        let flag: bool = primitive(r#"{"result": true}"#).unwrap();
        assert!(flag);
    }

    #[test]
    fn test_primitive_rejects_structured_result() {
        let err = primitive::<String>(r#"{"result": ["a"]}"#).unwrap_err();
        assert!(matches!(err, InterpretError::NotScalar("array")));

        let err = primitive::<String>(r#"{"result": {"a": 1}}"#).unwrap_err();
        assert!(matches!(err, InterpretError::NotScalar("object")));
    }

    #[test]
    fn test_primitive_type_mismatch() {
        let err = primitive::<i32>(r#"{"result": "ten"}"#).unwrap_err();
        assert!(matches!(err, InterpretError::Json(_)));
    }

    #[test]
    fn test_missing_result() {
        let err = primitive::<String>(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, InterpretError::MissingField("result")));

        let err = object::<Size>(r#"{"result": null}"#).unwrap_err();
        assert!(matches!(err, InterpretError::MissingField("result")));
    }

    #[test]
    fn test_body_must_be_object() {
        let err = primitive::<String>(r#"["result"]"#).unwrap_err();
        assert!(matches!(err, InterpretError::NotAnObject));

        let err = primitive::<String>("not json").unwrap_err();
        assert!(matches!(err, InterpretError::Json(_)));
    }

    #[test]
    fn test_primitive_list_keeps_order() {
        let values: Vec<String> = primitive_list(r#"{"result": ["1.0", "1.1", "1.2"]}"#).unwrap();
        assert_eq!(values, vec!["1.0", "1.1", "1.2"]);
    }

    #[test]
    fn test_primitive_list_rejects_nested() {
        let err = primitive_list::<String>(r#"{"result": [["1.0"]]}"#).unwrap_err();
        assert!(matches!(err, InterpretError::NotScalar("array")));

        let err = primitive_list::<String>(r#"{"result": "1.0"}"#).unwrap_err();
        assert!(matches!(err, InterpretError::NotAnArray("result")));
    }

    #[test]
    fn test_object() {
        let size: Size = object(r#"{"result": {"width": 640, "height": 480}}"#).unwrap();
        assert_eq!(
            size,
            Size {
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn test_object_missing_field_fails() {
        let err = object::<Size>(r#"{"result": {"width": 640}}"#).unwrap_err();
        assert!(matches!(err, InterpretError::Json(_)));
    }

    #[test]
    fn test_object_list() {
        let sizes: Vec<Size> = object_list(
            r#"{"result": [{"width": 1, "height": 2}, {"width": 3, "height": 4}]}"#,
        )
        .unwrap();
        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes[1].width, 3);
    }

    #[test]
    fn test_value_and_values_dispatch_on_kind() {
        let body = r#"{"result": {"a": 1}}"#;
        let decoded: Value = value(body, ValueKind::Object).unwrap();
        assert_eq!(decoded["a"], 1);
        assert!(value::<Value>(body, ValueKind::Primitive).is_err());

        let items: Vec<u8> = values(r#"{"result": [1, 2]}"#, ValueKind::Primitive).unwrap();
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn test_capability() {
        let capability: Capability<i32> =
            capability(r#"{"result": [30, [10, 20, 30, 40]]}"#, ValueKind::Primitive).unwrap();
        assert_eq!(*capability.current(), 30);
        assert_eq!(capability.candidates(), &[10, 20, 30, 40]);
    }

    #[test]
    fn test_capability_empty_candidates() {
        let capability: Capability<String> =
            capability(r#"{"result": ["auto", []]}"#, ValueKind::Primitive).unwrap();
        assert_eq!(capability.current(), "auto");
        assert!(capability.candidates().is_empty());
    }

    #[test]
    fn test_capability_of_objects() {
        let capability: Capability<Size> = capability(
            r#"{"result": [{"width": 1, "height": 1}, [{"width": 2, "height": 2}]]}"#,
            ValueKind::Object,
        )
        .unwrap();
        assert_eq!(capability.current().width, 1);
        assert_eq!(capability.candidates()[0].height, 2);
    }

    #[test]
    fn test_capability_wrong_arity() {
        let err = capability::<i32>(r#"{"result": [30]}"#, ValueKind::Primitive).unwrap_err();
        assert!(matches!(
            err,
            InterpretError::Arity {
                expected: 2,
                found: 1
            }
        ));

        let err = capability::<i32>(r#"{"result": [30, [10], [20]]}"#, ValueKind::Primitive)
            .unwrap_err();
        assert!(matches!(
            err,
            InterpretError::Arity {
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_capability_candidates_must_be_array() {
        let err = capability::<i32>(r#"{"result": [30, 40]}"#, ValueKind::Primitive).unwrap_err();
        assert!(matches!(err, InterpretError::NotAnArray("candidates")));
    }

    #[test]
    fn test_capability_wrong_element_type() {
        let err = capability::<i32>(r#"{"result": [30, [10, "x"]]}"#, ValueKind::Primitive)
            .unwrap_err();
        assert!(matches!(err, InterpretError::Json(_)));
    }

    #[test]
    fn test_success_only_ok() {
        assert!(success_only(r#"{"result": [0], "id": 1}"#).is_ok());
        assert!(success_only(r#"{"result": [], "error": null}"#).is_ok());
    }

    #[test]
    fn test_success_only_requires_result() {
        for body in [r#"{"id": 1}"#, "{}", r#"{"result": null}"#, r#"{"error": null}"#] {
            let err = success_only(body).unwrap_err();
            assert!(
                matches!(err, InterpretError::MissingField("result")),
                "body {body}: {err:?}"
            );
        }
    }

    #[test]
    fn test_success_only_reports_server_error() {
        let err = success_only(r#"{"error": [1, "Illegal Argument"], "id": 1}"#).unwrap_err();
        let InterpretError::Remote(remote) = err else {
            panic!("Expected Remote error, got {err:?}");
        };
        assert_eq!(remote.status(), StatusCode::Any);
        assert_eq!(remote.message(), Some("Illegal Argument"));
    }

    #[test]
    fn test_success_only_malformed_error() {
        let err = success_only(r#"{"error": "something broke"}"#).unwrap_err();
        assert!(matches!(err, InterpretError::MalformedError(_)));

        let err = success_only(r#"{"error": ["one", "text"]}"#).unwrap_err();
        assert!(matches!(err, InterpretError::MalformedError(_)));
    }

    #[test]
    fn test_success_only_not_an_object() {
        let err = success_only("[]").unwrap_err();
        assert!(matches!(err, InterpretError::NotAnObject));
    }

    #[test]
    fn test_method_types_array_form() {
        let body = r#"{"results": [
            ["getVersions", [], ["string*"], "1.0"],
            ["setShootMode", ["string"], ["int"], "1.0"]
        ], "id": 1}"#;
        let methods = method_types(body).unwrap();

        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].name, "getVersions");
        assert_eq!(methods[0].parameter_arity(), 0);
        assert_eq!(methods[0].result_types, vec!["string*"]);
        assert_eq!(methods[1].parameter_types, vec!["string"]);
    }

    #[test]
    fn test_method_types_joined_form() {
        let body = r#"{"results": [
            ["getEvent", "bool", "", "1.1"],
            ["actZoom", "string, string", "int", "1.0"]
        ]}"#;
        let methods = method_types(body).unwrap();

        assert_eq!(methods[0].parameter_types, vec!["bool"]);
        assert!(methods[0].result_types.is_empty());
        assert_eq!(methods[0].version, "1.1");
        assert_eq!(methods[1].parameter_arity(), 2);
    }

    #[test]
    fn test_method_types_result_fallback() {
        let methods = method_types(r#"{"result": [["getVersions", [], [], "1.0"]]}"#).unwrap();
        assert_eq!(methods.len(), 1);
    }

    #[test]
    fn test_method_types_missing() {
        let err = method_types(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, InterpretError::MissingField("results")));
    }

    #[test]
    fn test_method_types_wrong_arity_entry() {
        let err = method_types(r#"{"results": [["getVersions", [], [], "1.0", "extra"]]}"#)
            .unwrap_err();
        assert!(matches!(err, InterpretError::Json(_)));

        let err = method_types(r#"{"results": [["getVersions", [], []]]}"#).unwrap_err();
        assert!(matches!(err, InterpretError::Json(_)));
    }
}
