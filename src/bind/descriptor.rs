//! Caller-supplied descriptions of target shapes.

use std::fmt;
use std::sync::Arc;

use crate::value::format_float;

/// Scalar target kinds.
///
/// Declaration order is the coercion priority used when resolving unions:
/// the most restrictive kind is tried first and `String` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Primitive {
    Bool,
    Integer,
    Float,
    Null,
    String,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Integer => "int",
            Primitive::Float => "float",
            Primitive::Null => "NoneType",
            Primitive::String => "str",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A concrete value allowed by a literal type.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Literal {
    /// The primitive kind an input is coerced to before comparing.
    pub fn primitive(&self) -> Primitive {
        match self {
            Literal::Null => Primitive::Null,
            Literal::Bool(_) => Primitive::Bool,
            Literal::Integer(_) => Primitive::Integer,
            Literal::Float(_) => Primitive::Float,
            Literal::String(_) => Primitive::String,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("None"),
            Literal::Bool(true) => f.write_str("True"),
            Literal::Bool(false) => f.write_str("False"),
            Literal::Integer(i) => write!(f, "{i}"),
            Literal::Float(x) => f.write_str(&format_float(*x)),
            Literal::String(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<i64> for Literal {
    fn from(i: i64) -> Self {
        Literal::Integer(i)
    }
}

impl From<i32> for Literal {
    fn from(i: i32) -> Self {
        Literal::Integer(i64::from(i))
    }
}

impl From<f64> for Literal {
    fn from(x: f64) -> Self {
        Literal::Float(x)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

/// A named field of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub descriptor: TypeDescriptor,
}

/// Ordered field list of a user-defined schema type.
///
/// ```
/// use config_binder::{ObjectSchema, TypeDescriptor};
///
/// let schema = ObjectSchema::new("Server")
///     .field("host", TypeDescriptor::string())
///     .field("port", TypeDescriptor::integer());
/// assert_eq!(schema.fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    name: String,
    fields: Vec<Field>,
}

impl ObjectSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declares the next field. Fields are bound in declaration order.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        self.fields.push(Field {
            name: name.into(),
            descriptor,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// Description of a target shape.
///
/// Descriptors are built once by the caller and only ever read by the binder,
/// so one descriptor may be shared across threads and bind calls.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    Object(Arc<ObjectSchema>),
    Sequence(Box<TypeDescriptor>),
    Set(Box<TypeDescriptor>),
    Tuple(Vec<TypeDescriptor>),
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    Literal(Vec<Literal>),
    Union(Vec<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn bool() -> Self {
        TypeDescriptor::Primitive(Primitive::Bool)
    }

    pub fn integer() -> Self {
        TypeDescriptor::Primitive(Primitive::Integer)
    }

    pub fn float() -> Self {
        TypeDescriptor::Primitive(Primitive::Float)
    }

    pub fn null() -> Self {
        TypeDescriptor::Primitive(Primitive::Null)
    }

    pub fn string() -> Self {
        TypeDescriptor::Primitive(Primitive::String)
    }

    pub fn object(schema: ObjectSchema) -> Self {
        TypeDescriptor::Object(Arc::new(schema))
    }

    pub fn sequence(element: TypeDescriptor) -> Self {
        TypeDescriptor::Sequence(Box::new(element))
    }

    pub fn set(element: TypeDescriptor) -> Self {
        TypeDescriptor::Set(Box::new(element))
    }

    pub fn tuple(elements: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        TypeDescriptor::Tuple(elements.into_iter().collect())
    }

    /// A string-keyed map. Use [`TypeDescriptor::map_with_key`] to declare another key type.
    pub fn map(value: TypeDescriptor) -> Self {
        Self::map_with_key(Self::string(), value)
    }

    pub fn map_with_key(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn literal<L: Into<Literal>>(allowed: impl IntoIterator<Item = L>) -> Self {
        TypeDescriptor::Literal(allowed.into_iter().map(Into::into).collect())
    }

    pub fn union(alternatives: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        TypeDescriptor::Union(alternatives.into_iter().collect())
    }

    /// `Union[inner, null]`.
    pub fn optional(inner: TypeDescriptor) -> Self {
        Self::union([inner, Self::null()])
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            TypeDescriptor::Primitive(primitive) => Some(*primitive),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(primitive) => write!(f, "{primitive}"),
            TypeDescriptor::Object(schema) => f.write_str(schema.name()),
            TypeDescriptor::Sequence(element) => write!(f, "List[{element}]"),
            TypeDescriptor::Set(element) => write!(f, "Set[{element}]"),
            TypeDescriptor::Tuple(elements) => write!(f, "Tuple[{}]", join(elements)),
            TypeDescriptor::Map { key, value } => write!(f, "Dict[{key}, {value}]"),
            TypeDescriptor::Literal(allowed) => write!(f, "Literal[{}]", join(allowed)),
            TypeDescriptor::Union(alternatives) => write!(f, "Union[{}]", join(alternatives)),
        }
    }
}

pub(crate) fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
