pub mod bind;
pub mod config;
mod error;
mod value;

pub use bind::{
    bind, bind_as, Bind, BindError, BindErrorKind, Bound, BoundObject, Literal, ObjectSchema,
    Primitive, TypeDescriptor,
};
pub use config::{load, load_as, load_with, read, read_as, read_with, ConfigError, Format};
pub use error::Error;
pub use value::Value;
