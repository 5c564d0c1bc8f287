//! Format-agnostic document tree produced by the loader.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{
    self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};

/// Key the `toml` deserializer uses to smuggle datetimes through `deserialize_any`.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// An untyped document node.
///
/// Produced once by the loader and never mutated by the binder. Mapping keys
/// are always strings; scalar keys in the source document are rendered to
/// their textual form.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
}

impl Value {
    /// Short name of the node kind, used in shape mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "str",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up `key` when this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Renders the node the way it appears nested inside a collection:
    /// strings are quoted, everything else matches `Display`.
    pub(crate) fn repr(&self) -> String {
        match self {
            Value::String(s) => format!("'{s}'"),
            other => other.to_string(),
        }
    }
}

/// Formats a float so that integral values keep a fractional part (`7.0`).
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::String(s) => f.write_str(s),
            Value::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&item.repr())?;
                }
                f.write_str("]")
            }
            Value::Mapping(map) => {
                f.write_str("{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{key}': {}", item.repr())?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any document value")
    }

    fn visit_bool<E>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E>(self, i: i64) -> Result<Value, E> {
        Ok(Value::Integer(i))
    }

    fn visit_u64<E>(self, u: u64) -> Result<Value, E> {
        Ok(i64::try_from(u).map_or(Value::Float(u as f64), Value::Integer))
    }

    fn visit_f64<E>(self, x: f64) -> Result<Value, E> {
        Ok(Value::Float(x))
    }

    fn visit_str<E>(self, s: &str) -> Result<Value, E> {
        Ok(Value::String(s.to_string()))
    }

    fn visit_string<E>(self, s: String) -> Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = BTreeMap::new();
        while let Some(key) = access.next_key::<Value>()? {
            let key = match key {
                Value::String(s) if s == TOML_DATETIME_KEY => {
                    let datetime: String = access.next_value()?;
                    return Ok(Value::String(datetime));
                }
                Value::String(s) => s,
                Value::Sequence(_) | Value::Mapping(_) => {
                    return Err(de::Error::custom(format!(
                        "mapping keys must be scalars, found {}",
                        key.kind()
                    )));
                }
                scalar => scalar.to_string(),
            };
            let value = access.next_value()?;
            map.insert(key, value);
        }
        Ok(Value::Mapping(map))
    }

    // Tagged YAML nodes (`!Tag value`) arrive as single-variant enums; the tag is dropped.
    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (_tag, variant) = data.variant::<de::IgnoredAny>()?;
        variant.newtype_variant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_canonical_text() {
        assert_eq!(Value::Null.to_string(), "None");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Bool(false).to_string(), "False");
        assert_eq!(Value::Integer(-23).to_string(), "-23");
        assert_eq!(Value::Float(32.2).to_string(), "32.2");
        assert_eq!(Value::Float(7.0).to_string(), "7.0");
        assert_eq!(Value::from("test").to_string(), "test");
    }

    #[test]
    fn test_display_nested_quotes_strings() {
        let value = Value::from(vec![Value::from(1), Value::from("a")]);
        assert_eq!(value.to_string(), "[1, 'a']");

        let value: Value = [("k", Value::from("v")), ("n", Value::Null)].into_iter().collect();
        assert_eq!(value.to_string(), "{'k': 'v', 'n': None}");
    }

    #[test]
    fn test_deserialize_yaml_scalars_and_keys() {
        let value: Value = serde_yaml::from_str(
            r#"
            name: app
            port: 8080
            ratio: 0.5
            debug: true
            empty: ~
            1: one
            list: [1, "2"]
            "#,
        )
        .unwrap();

        assert_eq!(value.get("name"), Some(&Value::from("app")));
        assert_eq!(value.get("port"), Some(&Value::Integer(8080)));
        assert_eq!(value.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(value.get("debug"), Some(&Value::Bool(true)));
        assert_eq!(value.get("empty"), Some(&Value::Null));
        assert_eq!(value.get("1"), Some(&Value::from("one")));
        assert_eq!(
            value.get("list"),
            Some(&Value::from(vec![Value::Integer(1), Value::from("2")]))
        );
    }

    #[test]
    fn test_deserialize_yaml_strips_tags() {
        let value: Value = serde_yaml::from_str("secret: !vault abc").unwrap();
        assert_eq!(value.get("secret"), Some(&Value::from("abc")));
    }

    #[test]
    fn test_deserialize_json_large_unsigned_becomes_float() {
        let value: Value = serde_json::from_str(r#"{"big": 18446744073709551615}"#).unwrap();
        assert!(matches!(value.get("big"), Some(Value::Float(_))));
    }

    #[test]
    fn test_deserialize_toml_datetime_as_string() {
        let value: Value = toml::from_str("released = 1979-05-27T07:32:00Z").unwrap();
        assert_eq!(value.get("released"), Some(&Value::from("1979-05-27T07:32:00Z")));
    }
}
