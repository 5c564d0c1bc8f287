//! Binding of untyped documents into typed instances.

mod bound;
mod coerce;
mod descriptor;
mod engine;
mod error;
mod schema;

pub use bound::{Bound, BoundObject};
pub use descriptor::{Field, Literal, ObjectSchema, Primitive, TypeDescriptor};
pub use engine::bind;
pub use error::{BindError, BindErrorKind, FieldPath, PathSegment};
pub use schema::{bind_as, Bind};
