use std::collections::BTreeMap;

use super::descriptor::Literal;
use super::error::BindError;
use super::schema::Bind;
use crate::value::Value;

/// The typed result of a bind, mirroring the descriptor it was bound against.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Object(BoundObject),
    Sequence(Vec<Bound>),
    /// Distinct elements in first-seen order.
    Set(Vec<Bound>),
    Tuple(Vec<Bound>),
    Map(BTreeMap<String, Bound>),
    /// A map value passed through without coercion.
    Raw(Value),
}

impl Bound {
    pub fn kind(&self) -> &'static str {
        match self {
            Bound::Null => "null",
            Bound::Bool(_) => "bool",
            Bound::Integer(_) => "int",
            Bound::Float(_) => "float",
            Bound::String(_) => "str",
            Bound::Object(_) => "object",
            Bound::Sequence(_) => "sequence",
            Bound::Set(_) => "set",
            Bound::Tuple(_) => "tuple",
            Bound::Map(_) => "map",
            Bound::Raw(value) => value.kind(),
        }
    }

    /// Pushes a `Raw` scalar into its bound form; compound raw values stay raw.
    pub(crate) fn settle(self) -> Self {
        match self {
            Bound::Raw(Value::Null) => Bound::Null,
            Bound::Raw(Value::Bool(b)) => Bound::Bool(b),
            Bound::Raw(Value::Integer(i)) => Bound::Integer(i),
            Bound::Raw(Value::Float(x)) => Bound::Float(x),
            Bound::Raw(Value::String(s)) => Bound::String(s),
            other => other,
        }
    }

    pub(crate) fn matches_literal(&self, literal: &Literal) -> bool {
        match (self, literal) {
            (Bound::Null, Literal::Null) => true,
            (Bound::Bool(a), Literal::Bool(b)) => a == b,
            (Bound::Integer(a), Literal::Integer(b)) => a == b,
            (Bound::Float(a), Literal::Float(b)) => a == b,
            (Bound::String(a), Literal::String(b)) => a == b,
            _ => false,
        }
    }

    pub fn as_object(&self) -> Option<&BoundObject> {
        match self {
            Bound::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn into_object(self) -> Result<BoundObject, BindError> {
        match self {
            Bound::Object(object) => Ok(object),
            other => Err(BindError::shape("object", other.kind())),
        }
    }
}

impl From<Literal> for Bound {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Null => Bound::Null,
            Literal::Bool(b) => Bound::Bool(b),
            Literal::Integer(i) => Bound::Integer(i),
            Literal::Float(x) => Bound::Float(x),
            Literal::String(s) => Bound::String(s),
        }
    }
}

/// A fully populated schema instance: every declared field, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundObject {
    schema: String,
    fields: Vec<(String, Bound)>,
}

impl BoundObject {
    pub(crate) fn new(schema: &str, fields: Vec<(String, Bound)>) -> Self {
        Self {
            schema: schema.to_string(),
            fields,
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Option<&Bound> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, bound)| bound)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Bound)> {
        self.fields.iter().map(|(name, bound)| (name.as_str(), bound))
    }

    /// Removes a field and converts it into `T`, annotating failures with the field name.
    pub fn take<T: Bind>(&mut self, name: &str) -> Result<T, BindError> {
        let index = self
            .fields
            .iter()
            .position(|(field, _)| field == name)
            .ok_or_else(|| {
                BindError::construct(format!("{} has no field '{name}'", self.schema))
            })?;
        let (_, bound) = self.fields.remove(index);
        T::from_bound(bound).map_err(|e| e.in_field(name))
    }
}
