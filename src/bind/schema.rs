//! Typed front end over the binder.
//!
//! A [`Bind`] type knows its own [`TypeDescriptor`] and how to build itself
//! from the matching [`Bound`] tree. Std scalars and collections implement it
//! here; schema structs implement it with [`bind_schema!`](crate::bind_schema)
//! or by hand.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use super::bound::Bound;
use super::descriptor::TypeDescriptor;
use super::engine::bind;
use super::error::{BindError, BindErrorKind};
use crate::value::Value;

pub trait Bind: Sized {
    /// Shape the untyped input is bound against.
    fn descriptor() -> TypeDescriptor;

    /// Builds the value from a tree already bound against [`Bind::descriptor`].
    fn from_bound(bound: Bound) -> Result<Self, BindError>;
}

/// Binds `value` against `T`'s descriptor and builds a `T` from the result.
pub fn bind_as<T: Bind>(value: &Value) -> Result<T, BindError> {
    T::from_bound(bind(value, &T::descriptor())?)
}

/// Implements [`Bind`] for a struct whose fields all implement [`Bind`].
///
/// Fields are declared once; the macro generates both the object descriptor
/// and the constructor from the complete set of bound fields.
///
/// ```
/// use config_binder::{bind_as, bind_schema, Value};
///
/// struct Database {
///     host: String,
///     port: u16,
/// }
///
/// bind_schema!(Database { host: String, port: u16 });
///
/// let input: Value = [("host", Value::from("db")), ("port", Value::from("5432"))]
///     .into_iter()
///     .collect();
/// let db: Database = bind_as(&input)?;
/// assert_eq!(db.port, 5432);
/// # Ok::<(), config_binder::BindError>(())
/// ```
#[macro_export]
macro_rules! bind_schema {
    ($ty:ident { $($field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::Bind for $ty {
            fn descriptor() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::object(
                    $crate::ObjectSchema::new(stringify!($ty))
                        $(.field(stringify!($field), <$fty as $crate::Bind>::descriptor()))*
                )
            }

            fn from_bound(
                bound: $crate::Bound,
            ) -> ::std::result::Result<Self, $crate::BindError> {
                #[allow(unused_mut)]
                let mut object = bound.into_object()?;
                ::std::result::Result::Ok(Self {
                    $($field: object.take::<$fty>(stringify!($field))?,)*
                })
            }
        }
    };
}

fn into_items(bound: Bound, expected: &'static str) -> Result<Vec<Bound>, BindError> {
    match bound {
        Bound::Sequence(items) | Bound::Set(items) | Bound::Tuple(items) => Ok(items),
        Bound::Raw(Value::Sequence(items)) => Ok(items.into_iter().map(Bound::Raw).collect()),
        other => Err(BindError::shape(expected, other.kind())),
    }
}

fn into_entries(bound: Bound) -> Result<BTreeMap<String, Bound>, BindError> {
    match bound {
        Bound::Map(entries) => Ok(entries),
        Bound::Raw(Value::Mapping(map)) => Ok(map
            .into_iter()
            .map(|(key, value)| (key, Bound::Raw(value)))
            .collect()),
        other => Err(BindError::shape("map", other.kind())),
    }
}

impl Bind for bool {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::bool()
    }

    fn from_bound(bound: Bound) -> Result<Self, BindError> {
        match bound.settle() {
            Bound::Bool(b) => Ok(b),
            other => Err(BindError::shape("bool", other.kind())),
        }
    }
}

macro_rules! bind_integer {
    ($($ty:ty),*) => {$(
        impl Bind for $ty {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::integer()
            }

            fn from_bound(bound: Bound) -> Result<Self, BindError> {
                match bound.settle() {
                    Bound::Integer(i) => <$ty>::try_from(i).map_err(|_| {
                        BindError::construct(format!(
                            "{i} is out of range for {}",
                            stringify!($ty)
                        ))
                    }),
                    other => Err(BindError::shape("int", other.kind())),
                }
            }
        }
    )*};
}

bind_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Bind for f64 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::float()
    }

    fn from_bound(bound: Bound) -> Result<Self, BindError> {
        match bound.settle() {
            Bound::Float(x) => Ok(x),
            other => Err(BindError::shape("float", other.kind())),
        }
    }
}

impl Bind for f32 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::float()
    }

    fn from_bound(bound: Bound) -> Result<Self, BindError> {
        f64::from_bound(bound).map(|x| x as f32)
    }
}

impl Bind for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::string()
    }

    fn from_bound(bound: Bound) -> Result<Self, BindError> {
        match bound.settle() {
            Bound::String(s) => Ok(s),
            other => Err(BindError::shape("str", other.kind())),
        }
    }
}

impl Bind for () {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::null()
    }

    fn from_bound(bound: Bound) -> Result<Self, BindError> {
        match bound.settle() {
            Bound::Null => Ok(()),
            other => Err(BindError::shape("null", other.kind())),
        }
    }
}

impl<T: Bind> Bind for Option<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::optional(T::descriptor())
    }

    fn from_bound(bound: Bound) -> Result<Self, BindError> {
        match bound.settle() {
            Bound::Null => Ok(None),
            other => T::from_bound(other).map(Some),
        }
    }
}

impl<T: Bind> Bind for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::sequence(T::descriptor())
    }

    fn from_bound(bound: Bound) -> Result<Self, BindError> {
        into_items(bound, "sequence")?
            .into_iter()
            .enumerate()
            .map(|(index, item)| T::from_bound(item).map_err(|e| e.at_index(index)))
            .collect()
    }
}

impl<T: Bind + Eq + Hash> Bind for HashSet<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::set(T::descriptor())
    }

    fn from_bound(bound: Bound) -> Result<Self, BindError> {
        Vec::<T>::from_bound(bound).map(|items| items.into_iter().collect())
    }
}

impl<T: Bind + Ord> Bind for BTreeSet<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::set(T::descriptor())
    }

    fn from_bound(bound: Bound) -> Result<Self, BindError> {
        Vec::<T>::from_bound(bound).map(|items| items.into_iter().collect())
    }
}

impl<T: Bind> Bind for BTreeMap<String, T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::map(T::descriptor())
    }

    fn from_bound(bound: Bound) -> Result<Self, BindError> {
        into_entries(bound)?
            .into_iter()
            .map(|(key, item)| {
                let value = T::from_bound(item).map_err(|e| e.at_key(&key))?;
                Ok((key, value))
            })
            .collect()
    }
}

impl<T: Bind> Bind for HashMap<String, T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::map(T::descriptor())
    }

    fn from_bound(bound: Bound) -> Result<Self, BindError> {
        BTreeMap::<String, T>::from_bound(bound).map(|entries| entries.into_iter().collect())
    }
}

macro_rules! bind_tuple {
    ($len:expr => $($name:ident),+) => {
        impl<$($name: Bind),+> Bind for ($($name,)+) {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::tuple([$($name::descriptor()),+])
            }

            fn from_bound(bound: Bound) -> Result<Self, BindError> {
                let items = into_items(bound, "tuple")?;
                if items.len() != $len {
                    return Err(BindError::new(BindErrorKind::TupleArity {
                        expected: $len,
                        found: items.len(),
                    }));
                }
                let mut items = items.into_iter().enumerate();
                Ok(($(
                    match items.next() {
                        Some((index, item)) => {
                            $name::from_bound(item).map_err(|e| e.at_index(index))?
                        }
                        None => unreachable!("tuple length checked above"),
                    },
                )+))
            }
        }
    };
}

bind_tuple!(1 => A);
bind_tuple!(2 => A, B);
bind_tuple!(3 => A, B, C);
bind_tuple!(4 => A, B, C, D);
bind_tuple!(5 => A, B, C, D, E);
bind_tuple!(6 => A, B, C, D, E, F);
