use std::fmt;

use thiserror::Error;

/// One step on the way from the root schema to a failing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
    Key(String),
}

/// Location of a binding failure, rendered as `servers[0].ports[https]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::Key(key) => write!(f, "[{key}]")?,
            }
        }
        Ok(())
    }
}

/// Proximate cause of a binding failure.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum BindErrorKind {
    #[error("cannot bind value '{value}' to type '{target}'")]
    Coerce { value: String, target: &'static str },

    #[error("expected {expected}, found {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot bind '{value}' to Literal[{allowed}]")]
    Literal { value: String, allowed: String },

    #[error("cannot bind '{value}' to Union[{alternatives}]")]
    Union { value: String, alternatives: String },

    #[error("expected a tuple of {expected} elements, found {found}")]
    TupleArity { expected: usize, found: usize },

    /// The descriptor itself is unusable; never recovered by literal or union trials.
    #[error("only str keys dicts supported; found Dict keys with type '{key}'")]
    UnsupportedMapKey { key: String },

    #[error("{0}")]
    Construct(String),
}

/// A binding failure annotated with the path at which it happened.
#[derive(Debug, Clone, PartialEq)]
pub struct BindError {
    path: FieldPath,
    kind: BindErrorKind,
}

impl BindError {
    pub fn new(kind: BindErrorKind) -> Self {
        Self {
            path: FieldPath::default(),
            kind,
        }
    }

    pub(crate) fn coerce(value: impl fmt::Display, target: &'static str) -> Self {
        Self::new(BindErrorKind::Coerce {
            value: value.to_string(),
            target,
        })
    }

    pub(crate) fn shape(expected: &'static str, found: &'static str) -> Self {
        Self::new(BindErrorKind::Shape { expected, found })
    }

    /// Reports a failure while building a typed value from bound fields.
    pub fn construct(message: impl Into<String>) -> Self {
        Self::new(BindErrorKind::Construct(message.into()))
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn kind(&self) -> &BindErrorKind {
        &self.kind
    }

    /// True for errors caused by the descriptor rather than by the input data.
    pub fn is_descriptor_error(&self) -> bool {
        matches!(self.kind, BindErrorKind::UnsupportedMapKey { .. })
    }

    /// Prefixes the path with the segment of the enclosing frame.
    pub fn within(mut self, segment: PathSegment) -> Self {
        self.path.0.insert(0, segment);
        self
    }

    pub fn in_field(self, name: &str) -> Self {
        self.within(PathSegment::Field(name.to_string()))
    }

    pub fn at_index(self, index: usize) -> Self {
        self.within(PathSegment::Index(index))
    }

    pub fn at_key(self, key: &str) -> Self {
        self.within(PathSegment::Key(key.to_string()))
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for BindError {}
