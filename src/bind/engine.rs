//! Type-directed binding of untyped documents.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use super::bound::{Bound, BoundObject};
use super::coerce::coerce;
use super::descriptor::{join, Literal, ObjectSchema, Primitive, TypeDescriptor};
use super::error::{BindError, BindErrorKind};
use crate::value::Value;

/// Stand-in for mapping keys that are absent from the input.
static NULL: Value = Value::Null;

/// Binds `value` against `descriptor`.
///
/// The descriptor is only read, so the same descriptor can be used from any
/// number of threads at once. On failure no partial result is returned; the
/// error carries the path from the root to the failing value.
pub fn bind(value: &Value, descriptor: &TypeDescriptor) -> Result<Bound, BindError> {
    match descriptor {
        TypeDescriptor::Object(schema) => bind_object(value, schema),
        TypeDescriptor::Sequence(element) => bind_elements(value, element).map(Bound::Sequence),
        TypeDescriptor::Set(element) => bind_set(value, element),
        TypeDescriptor::Tuple(elements) => bind_tuple(value, elements),
        TypeDescriptor::Map { key, value: element } => bind_map(value, key, element),
        TypeDescriptor::Literal(allowed) => bind_literal(value, allowed),
        TypeDescriptor::Union(alternatives) => bind_union(value, alternatives),
        TypeDescriptor::Primitive(primitive) => coerce(value, *primitive),
    }
}

fn expect_mapping(value: &Value) -> Result<&BTreeMap<String, Value>, BindError> {
    value
        .as_mapping()
        .ok_or_else(|| BindError::shape("mapping", value.kind()))
}

fn expect_sequence(value: &Value) -> Result<&[Value], BindError> {
    value
        .as_sequence()
        .ok_or_else(|| BindError::shape("sequence", value.kind()))
}

fn bind_object(value: &Value, schema: &ObjectSchema) -> Result<Bound, BindError> {
    let map = expect_mapping(value)?;

    let fields = schema
        .fields()
        .iter()
        .map(|field| {
            let field_value = map.get(&field.name).unwrap_or(&NULL);
            bind(field_value, &field.descriptor)
                .map(|bound| (field.name.clone(), bound))
                .map_err(|e| e.in_field(&field.name))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Bound::Object(BoundObject::new(schema.name(), fields)))
}

fn bind_elements(value: &Value, element: &TypeDescriptor) -> Result<Vec<Bound>, BindError> {
    expect_sequence(value)?
        .iter()
        .enumerate()
        .map(|(index, item)| bind(item, element).map_err(|e| e.at_index(index)))
        .collect()
}

fn bind_set(value: &Value, element: &TypeDescriptor) -> Result<Bound, BindError> {
    let mut distinct: Vec<Bound> = Vec::new();
    for bound in bind_elements(value, element)? {
        if !distinct.contains(&bound) {
            distinct.push(bound);
        }
    }
    Ok(Bound::Set(distinct))
}

fn bind_tuple(value: &Value, elements: &[TypeDescriptor]) -> Result<Bound, BindError> {
    let items = expect_sequence(value)?;
    let arity = || {
        BindError::new(BindErrorKind::TupleArity {
            expected: elements.len(),
            found: items.len(),
        })
    };

    let mut bound = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        let item = items.get(index).ok_or_else(|| arity().at_index(index))?;
        bound.push(bind(item, element).map_err(|e| e.at_index(index))?);
    }
    if items.len() > elements.len() {
        return Err(arity().at_index(elements.len()));
    }
    Ok(Bound::Tuple(bound))
}

/// Only object-typed map values are bound; any other value passes through as `Raw`.
fn bind_map(
    value: &Value,
    key: &TypeDescriptor,
    element: &TypeDescriptor,
) -> Result<Bound, BindError> {
    if key.as_primitive() != Some(Primitive::String) {
        return Err(BindError::new(BindErrorKind::UnsupportedMapKey {
            key: key.to_string(),
        }));
    }

    let map = expect_mapping(value)?;
    let entries = match element {
        TypeDescriptor::Object(schema) => map
            .iter()
            .map(|(k, v)| {
                bind_object(v, schema)
                    .map(|bound| (k.clone(), bound))
                    .map_err(|e| e.at_key(k))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?,
        _ => map
            .iter()
            .map(|(k, v)| (k.clone(), Bound::Raw(v.clone())))
            .collect(),
    };
    Ok(Bound::Map(entries))
}

fn bind_literal(value: &Value, allowed: &[Literal]) -> Result<Bound, BindError> {
    for candidate in allowed {
        match coerce(value, candidate.primitive()) {
            Ok(bound) if bound.matches_literal(candidate) => {
                trace!(%value, %candidate, "literal matched");
                return Ok(bound);
            }
            _ => {}
        }
    }

    Err(BindError::new(BindErrorKind::Literal {
        value: value.to_string(),
        allowed: join(allowed),
    }))
}

/// Alternatives of nested unions are spliced into the outer list in place, so
/// `Union[Union[int, str], bool]` resolves exactly like `Union[int, str, bool]`.
fn flatten<'a>(alternatives: &'a [TypeDescriptor], flat: &mut Vec<&'a TypeDescriptor>) {
    for alternative in alternatives {
        match alternative {
            TypeDescriptor::Union(nested) => flatten(nested, flat),
            other => flat.push(other),
        }
    }
}

/// Structured alternatives are tried first in declared order, then primitive
/// alternatives in [`Primitive`] priority order. If nothing matches but `str`
/// is allowed, the input's text is returned as is.
///
/// Every non-primitive alternative takes part in the first pass: objects, but
/// also collections, maps and literals.
fn bind_union(value: &Value, alternatives: &[TypeDescriptor]) -> Result<Bound, BindError> {
    let mut flat = Vec::with_capacity(alternatives.len());
    flatten(alternatives, &mut flat);

    let mut primitives = Vec::new();
    for alternative in &flat {
        if let Some(primitive) = alternative.as_primitive() {
            primitives.push(primitive);
            continue;
        }
        match bind(value, alternative) {
            Ok(bound) => {
                trace!(%value, %alternative, "union resolved to structured alternative");
                return Ok(bound);
            }
            Err(e) if e.is_descriptor_error() => return Err(e),
            Err(_) => {}
        }
    }

    primitives.sort();
    primitives.dedup();
    for primitive in &primitives {
        if let Ok(bound) = coerce(value, *primitive) {
            trace!(%value, %primitive, "union resolved to primitive alternative");
            return Ok(bound);
        }
    }

    if primitives.contains(&Primitive::String) {
        debug!(%value, "union fell back to raw string");
        return Ok(Bound::String(value.to_string()));
    }

    Err(BindError::new(BindErrorKind::Union {
        value: value.to_string(),
        alternatives: join(&flat),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(value: impl Into<Value>) -> Value {
        [("field", value.into())].into_iter().collect()
    }

    fn schema_of(descriptor: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::object(ObjectSchema::new("TestConfig").field("field", descriptor))
    }

    /// Binds `{field: value}` against a one-field schema and returns the bound field.
    fn bind_field(value: impl Into<Value>, descriptor: TypeDescriptor) -> Result<Bound, BindError> {
        let bound = bind(&field(value), &schema_of(descriptor))?;
        Ok(bound.as_object().unwrap().get("field").unwrap().clone())
    }

    fn fibonacci_literal() -> TypeDescriptor {
        TypeDescriptor::Literal(vec![
            1.into(),
            2.into(),
            3.into(),
            5.into(),
            8.into(),
            13.into(),
            false.into(),
        ])
    }

    #[test]
    fn test_object_binds_fields_in_order() {
        let descriptor = TypeDescriptor::object(
            ObjectSchema::new("Server")
                .field("port", TypeDescriptor::integer())
                .field("host", TypeDescriptor::string()),
        );
        let input: Value = [("host", Value::from("localhost")), ("port", Value::from("8080"))]
            .into_iter()
            .collect();

        let bound = bind(&input, &descriptor).unwrap();
        let object = bound.as_object().unwrap();
        let names: Vec<_> = object.fields().map(|(name, _)| name).collect();

        assert_eq!(object.schema(), "Server");
        assert_eq!(names, vec!["port", "host"]);
        assert_eq!(object.get("port"), Some(&Bound::Integer(8080)));
    }

    #[test]
    fn test_missing_field_binds_against_null() {
        let descriptor = TypeDescriptor::object(
            ObjectSchema::new("Config")
                .field("name", TypeDescriptor::string())
                .field("debug", TypeDescriptor::optional(TypeDescriptor::bool()))
                .field("port", TypeDescriptor::integer()),
        );

        let err = bind(&field(1), &descriptor).unwrap_err();
        assert_eq!(err.path().to_string(), "port");

        let input: Value = [("port", 80)].into_iter().collect();
        let bound = bind(&input, &descriptor).unwrap();
        let object = bound.as_object().unwrap();
        assert_eq!(object.get("name"), Some(&Bound::String("None".into())));
        assert_eq!(object.get("debug"), Some(&Bound::Null));
    }

    #[test]
    fn test_object_rejects_non_mapping() {
        let descriptor = schema_of(TypeDescriptor::integer());
        let err = bind(&Value::from("text"), &descriptor).unwrap_err();
        assert_eq!(err.to_string(), "expected mapping, found str");
    }

    #[test]
    fn test_nested_error_path() {
        let nested = ObjectSchema::new("Nested").field("nested_field", TypeDescriptor::integer());
        let descriptor = schema_of(TypeDescriptor::sequence(TypeDescriptor::object(nested)));
        let nested_input: Value = [(
            "field",
            Value::from(vec![
                [("nested_field", 1)].into_iter().collect::<Value>(),
                [("nested_field", "two")].into_iter().collect::<Value>(),
            ]),
        )]
        .into_iter()
        .collect();

        let err = bind(&nested_input, &descriptor).unwrap_err();
        assert_eq!(
            err.to_string(),
            "field[1].nested_field: cannot bind value 'two' to type 'int'"
        );
    }

    #[test]
    fn test_sequence_preserves_order_and_coerces() {
        let bound = bind_field(
            vec![Value::from(1), Value::from("2"), Value::from(3)],
            TypeDescriptor::sequence(TypeDescriptor::integer()),
        )
        .unwrap();
        assert_eq!(
            bound,
            Bound::Sequence(vec![Bound::Integer(1), Bound::Integer(2), Bound::Integer(3)])
        );

        let err = bind_field(
            vec!["1", "two", "3"],
            TypeDescriptor::sequence(TypeDescriptor::integer()),
        )
        .unwrap_err();
        assert_eq!(err.path().to_string(), "field[1]");
    }

    #[test]
    fn test_set_drops_duplicates_after_coercion() {
        let bound = bind_field(
            vec![Value::from("1"), Value::from(2), Value::from(1), Value::from("3")],
            TypeDescriptor::set(TypeDescriptor::integer()),
        )
        .unwrap();
        assert_eq!(
            bound,
            Bound::Set(vec![Bound::Integer(1), Bound::Integer(2), Bound::Integer(3)])
        );
        assert!(bind_field(
            vec![Value::from(1), Value::from("two")],
            TypeDescriptor::set(TypeDescriptor::integer())
        )
        .is_err());
    }

    #[test]
    fn test_tuple_binds_positionally() {
        let nested = ObjectSchema::new("TestConfigNested").field("field", TypeDescriptor::bool());
        let descriptor = TypeDescriptor::tuple([
            TypeDescriptor::integer(),
            TypeDescriptor::string(),
            TypeDescriptor::bool(),
            TypeDescriptor::object(nested),
        ]);

        let bound = bind_field(
            vec![Value::from("1"), Value::from("test"), Value::from("False"), field("False")],
            descriptor.clone(),
        )
        .unwrap();
        let Bound::Tuple(items) = bound else {
            panic!("expected tuple");
        };
        assert_eq!(items[0], Bound::Integer(1));
        assert_eq!(items[1], Bound::String("test".into()));
        assert_eq!(items[2], Bound::Bool(false));
        assert_eq!(items[3].as_object().unwrap().get("field"), Some(&Bound::Bool(false)));

        assert!(bind_field(
            vec![Value::from(1), Value::from(2), Value::from(3), field(true)],
            descriptor.clone()
        )
        .is_err());
        assert!(bind_field(
            vec![Value::from("False"), Value::from("False"), Value::from("False"), field(true)],
            descriptor
        )
        .is_err());
    }

    #[test]
    fn test_tuple_length_mismatch() {
        let descriptor =
            TypeDescriptor::tuple([TypeDescriptor::integer(), TypeDescriptor::integer()]);

        let short = bind_field(vec![1], descriptor.clone()).unwrap_err();
        assert_eq!(short.path().to_string(), "field[1]");
        assert!(matches!(
            short.kind(),
            BindErrorKind::TupleArity { expected: 2, found: 1 }
        ));

        let long = bind_field(vec![1, 2, 3], descriptor).unwrap_err();
        assert_eq!(long.path().to_string(), "field[2]");
    }

    #[test]
    fn test_map_binds_object_values() {
        let nested =
            ObjectSchema::new("NestedConfig").field("nested_field", TypeDescriptor::integer());
        let input: Value = [
            ("key1", [("nested_field", 123)].into_iter().collect::<Value>()),
            ("key2", [("nested_field", "456")].into_iter().collect::<Value>()),
        ]
        .into_iter()
        .collect();

        let descriptor = TypeDescriptor::map(TypeDescriptor::object(nested.clone()));
        let bound = bind_field(input, descriptor).unwrap();
        let Bound::Map(entries) = bound else {
            panic!("expected map");
        };
        assert_eq!(
            entries["key2"].as_object().unwrap().get("nested_field"),
            Some(&Bound::Integer(456))
        );

        let bad: Value = [("key1", [("nested_field", "not an int")].into_iter().collect::<Value>())]
            .into_iter()
            .collect();
        let err = bind_field(bad, TypeDescriptor::map(TypeDescriptor::object(nested))).unwrap_err();
        assert_eq!(err.path().to_string(), "field[key1].nested_field");
    }

    #[test]
    fn test_map_primitive_values_pass_through() {
        let input: Value = [("a", "1"), ("b", "x")].into_iter().collect();
        let bound = bind_field(input, TypeDescriptor::map(TypeDescriptor::integer())).unwrap();
        let Bound::Map(entries) = bound else {
            panic!("expected map");
        };
        assert_eq!(entries["a"], Bound::Raw(Value::from("1")));
        assert_eq!(entries["b"], Bound::Raw(Value::from("x")));
    }

    #[test]
    fn test_map_non_string_key_is_descriptor_error() {
        let nested =
            ObjectSchema::new("NestedConfig").field("nested_field", TypeDescriptor::integer());
        let descriptor = TypeDescriptor::map_with_key(
            TypeDescriptor::integer(),
            TypeDescriptor::object(nested),
        );

        // Rejected before the (non-mapping) input is looked at.
        let err = bind(&Value::from(5), &descriptor).unwrap_err();
        assert!(err.is_descriptor_error());
        assert_eq!(
            err.to_string(),
            "only str keys dicts supported; found Dict keys with type 'int'"
        );
    }

    #[test]
    fn test_descriptor_error_escapes_union_trials() {
        let descriptor = TypeDescriptor::union([
            TypeDescriptor::map_with_key(TypeDescriptor::integer(), TypeDescriptor::string()),
            TypeDescriptor::string(),
        ]);
        let err = bind(&Value::from("x"), &descriptor).unwrap_err();
        assert!(err.is_descriptor_error());
    }

    #[test]
    fn test_literal_strings() {
        let descriptor = TypeDescriptor::literal(["option1", "option2"]);
        assert_eq!(
            bind(&Value::from("option2"), &descriptor).unwrap(),
            Bound::String("option2".into())
        );
        let err = bind(&Value::from("option3"), &descriptor).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot bind 'option3' to Literal['option1', 'option2']"
        );
    }

    #[test]
    fn test_literal_mixed_kinds() {
        let descriptor = fibonacci_literal();
        let ok = |value: Value| bind(&value, &descriptor).unwrap();

        assert_eq!(ok(Value::from(5)), Bound::Integer(5));
        assert_eq!(ok(Value::from("5")), Bound::Integer(5));
        assert_eq!(ok(Value::from(13)), Bound::Integer(13));
        assert_eq!(ok(Value::from("13")), Bound::Integer(13));
        assert_eq!(ok(Value::from(false)), Bound::Bool(false));
        assert_eq!(ok(Value::from("False")), Bound::Bool(false));

        let rejected = [Value::from(33), Value::from("33"), Value::from(true), Value::from("True")];
        for rejected in rejected {
            assert!(bind(&rejected, &descriptor).is_err(), "{rejected} should fail");
        }
    }

    #[test]
    fn test_union_primitive_priority() {
        let descriptor = TypeDescriptor::union([
            TypeDescriptor::integer(),
            TypeDescriptor::string(),
            TypeDescriptor::bool(),
        ]);
        let ok = |value: Value| bind(&value, &descriptor).unwrap();

        assert_eq!(ok(Value::from(23)), Bound::Integer(23));
        assert_eq!(ok(Value::from("23")), Bound::Integer(23));
        assert_eq!(ok(Value::from(32.2)), Bound::Integer(32));
        assert_eq!(ok(Value::from("32.2")), Bound::Integer(32));
        assert_eq!(ok(Value::from("test")), Bound::String("test".into()));
        assert_eq!(ok(Value::from(true)), Bound::Bool(true));
        assert_eq!(ok(Value::from("True")), Bound::Bool(true));
        assert_eq!(ok(Value::from(false)), Bound::Bool(false));
        assert_eq!(ok(Value::from("False")), Bound::Bool(false));
        assert_eq!(ok(Value::Null), Bound::String("None".into()));
    }

    #[test]
    fn test_optional_bool() {
        let descriptor = TypeDescriptor::optional(TypeDescriptor::bool());
        let ok = |value: Value| bind(&value, &descriptor).unwrap();

        assert_eq!(ok(Value::from(false)), Bound::Bool(false));
        assert_eq!(ok(Value::from("False")), Bound::Bool(false));
        assert_eq!(ok(Value::from("None")), Bound::Null);
        assert_eq!(ok(Value::Null), Bound::Null);

        for rejected in [Value::from(23), Value::from("23"), Value::from("test")] {
            let err = bind(&rejected, &descriptor).unwrap_err();
            assert!(matches!(err.kind(), BindErrorKind::Union { .. }));
        }
    }

    #[test]
    fn test_union_prefers_structured_alternatives() {
        let endpoint = ObjectSchema::new("Endpoint")
            .field("host", TypeDescriptor::string())
            .field("port", TypeDescriptor::integer());
        let descriptor = TypeDescriptor::union([
            TypeDescriptor::string(),
            TypeDescriptor::object(endpoint),
        ]);

        let input: Value = [("host", Value::from("db")), ("port", Value::from(5432))]
            .into_iter()
            .collect();
        let bound = bind(&input, &descriptor).unwrap();
        assert_eq!(bound.as_object().unwrap().schema(), "Endpoint");

        // An object alternative that does not fit falls through to str.
        let input: Value = [("host", "db")].into_iter().collect();
        let bound = bind(&input, &descriptor).unwrap();
        assert_eq!(bound, Bound::String("{'host': 'db'}".into()));
    }

    #[test]
    fn test_union_error_lists_alternatives() {
        let descriptor =
            TypeDescriptor::union([TypeDescriptor::integer(), TypeDescriptor::float()]);
        let err = bind(&Value::from("abc"), &descriptor).unwrap_err();
        assert_eq!(err.to_string(), "cannot bind 'abc' to Union[int, float]");
    }

    #[test]
    fn test_nested_unions_are_flattened() {
        let inner = TypeDescriptor::union([TypeDescriptor::integer(), TypeDescriptor::string()]);
        let descriptor = TypeDescriptor::union([inner.clone(), TypeDescriptor::bool()]);
        assert_eq!(bind(&Value::from("true"), &descriptor).unwrap(), Bound::Bool(true));
        assert_eq!(bind(&Value::from("7"), &descriptor).unwrap(), Bound::Integer(7));

        let optional = TypeDescriptor::optional(inner);
        assert_eq!(bind(&Value::Null, &optional).unwrap(), Bound::Null);
        assert_eq!(bind(&Value::from("None"), &optional).unwrap(), Bound::Null);
        assert_eq!(bind(&Value::from("x"), &optional).unwrap(), Bound::String("x".into()));
    }

    #[test]
    fn test_primitive_round_trip_is_identity() {
        let cases = [
            (Value::Bool(true), TypeDescriptor::bool(), Bound::Bool(true)),
            (Value::Integer(-4), TypeDescriptor::integer(), Bound::Integer(-4)),
            (Value::Float(0.25), TypeDescriptor::float(), Bound::Float(0.25)),
            (Value::Null, TypeDescriptor::null(), Bound::Null),
            (Value::from("s"), TypeDescriptor::string(), Bound::String("s".into())),
        ];
        for (value, descriptor, expected) in cases {
            assert_eq!(bind(&value, &descriptor).unwrap(), expected);
        }
    }
}
