//! The addressable node graph.
//!
//! Every value reachable from the state tree root presents itself as
//! one of three node kinds: a record with named fields, a sequence
//! with indexed elements, or a scalar leaf. The navigation engine only
//! ever sees this capability set, so application types stay opaque to
//! it; they opt in through the [`record!`] macro or the blanket
//! implementations for scalars, `Vec<T>`, and `Option<T>`.

use serde::{Serialize, de::DeserializeOwned};

pub mod errors;
pub mod index;

pub use errors::NodeError;
pub use index::{FieldSpec, FieldTable, fields};
pub use serde_json::value::RawValue;

/// Classification of a value in the graph, together with the
/// capabilities of that kind.
pub enum Node<'a> {
    Record(&'a mut dyn Record),
    Sequence(&'a mut dyn Sequence),
    Scalar,
}

impl Node<'_> {
    /// Returns a human-readable name for this node kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Record(_) => "record",
            Node::Sequence(_) => "sequence",
            Node::Scalar => "scalar",
        }
    }
}

/// A value the navigation engine can address.
pub trait Addressable {
    /// Classify this value and expose the capabilities of its kind.
    fn node(&mut self) -> Node<'_>;

    /// Serialize this value to JSON text.
    fn to_json(&self) -> Result<String, NodeError>;

    /// Overwrite this value in place from a serialized body.
    ///
    /// On failure the value is left untouched.
    fn replace_from(&mut self, body: &RawValue) -> Result<(), NodeError>;
}

/// A composite value with named fields.
pub trait Record: Addressable {
    /// Identity used to memoize the field table for this type.
    fn type_key(&self) -> std::any::TypeId;

    /// The type's fields, in declaration order.
    fn field_specs(&self) -> &'static [FieldSpec];

    /// Borrow the field with the given declared name.
    fn field_mut(&mut self, declared: &str) -> Option<&mut dyn Addressable>;
}

/// An ordered collection with integer-indexed elements.
pub trait Sequence: Addressable {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the element at `index`. Callers must bounds-check first.
    fn elem_mut(&mut self, index: usize) -> &mut dyn Addressable;

    /// Deserialize a new element from `body` and push it to the end,
    /// preserving all existing elements and their indices. Returns the
    /// appended element serialized on its own.
    fn append_from(&mut self, body: &RawValue) -> Result<String, NodeError>;

    /// Remove the element at `index`, shifting later elements down by
    /// one. Callers must bounds-check first.
    fn remove_at(&mut self, index: usize);
}

/// Serialize any value to JSON text, mapping failures into the node
/// error taxonomy.
pub fn render<T: Serialize + ?Sized>(value: &T) -> Result<String, NodeError> {
    serde_json::to_string(value).map_err(|e| NodeError::Serialize {
        reason: e.to_string(),
    })
}

/// Deserialize a request body into a concrete value, mapping failures
/// into the node error taxonomy.
pub fn parse<T: DeserializeOwned>(body: &RawValue) -> Result<T, NodeError> {
    serde_json::from_str(body.get()).map_err(|e| NodeError::MalformedBody {
        reason: e.to_string(),
    })
}

macro_rules! impl_scalar {
    ($($ty:ty),+ $(,)?) => {$(
        impl Addressable for $ty {
            fn node(&mut self) -> Node<'_> {
                Node::Scalar
            }

            fn to_json(&self) -> Result<String, NodeError> {
                render(self)
            }

            fn replace_from(&mut self, body: &RawValue) -> Result<(), NodeError> {
                *self = parse(body)?;
                Ok(())
            }
        }
    )+};
}

impl_scalar!(bool, i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, String);

impl<T> Addressable for Vec<T>
where
    T: Addressable + Serialize + DeserializeOwned,
{
    fn node(&mut self) -> Node<'_> {
        Node::Sequence(self)
    }

    fn to_json(&self) -> Result<String, NodeError> {
        render(self)
    }

    fn replace_from(&mut self, body: &RawValue) -> Result<(), NodeError> {
        *self = parse(body)?;
        Ok(())
    }
}

impl<T> Sequence for Vec<T>
where
    T: Addressable + Serialize + DeserializeOwned,
{
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn elem_mut(&mut self, index: usize) -> &mut dyn Addressable {
        &mut self[index]
    }

    fn append_from(&mut self, body: &RawValue) -> Result<String, NodeError> {
        let element: T = parse(body)?;
        let rendered = render(&element)?;
        self.push(element);
        Ok(rendered)
    }

    fn remove_at(&mut self, index: usize) {
        self.remove(index);
    }
}

/// An optional value navigates like its inner value when present and
/// is a leaf when absent, so a path through an absent optional fails
/// the same way a path through any other scalar does.
impl<T> Addressable for Option<T>
where
    T: Addressable + Serialize + DeserializeOwned,
{
    fn node(&mut self) -> Node<'_> {
        match self {
            Some(inner) => inner.node(),
            None => Node::Scalar,
        }
    }

    fn to_json(&self) -> Result<String, NodeError> {
        render(self)
    }

    fn replace_from(&mut self, body: &RawValue) -> Result<(), NodeError> {
        *self = parse(body)?;
        Ok(())
    }
}

/// Implements [`Addressable`] and [`Record`] for an application struct.
///
/// Fields are listed in declaration order, each mapped to how it is
/// addressed: a string literal for an external serialization name, `_`
/// for a field addressed by its declared name, or `-` for a field
/// excluded from serialization (addressable by its declared name only,
/// and only if no earlier field claimed it).
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// struct Panel {
///     #[serde(rename = "dateTime")]
///     date_time: String,
///     visible: bool,
/// }
///
/// vitrine::record! {
///     Panel {
///         date_time: "dateTime",
///         visible: _,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $($field:ident: $spec:tt),+ $(,)? }) => {
        impl $crate::node::Addressable for $ty {
            fn node(&mut self) -> $crate::node::Node<'_> {
                $crate::node::Node::Record(self)
            }

            fn to_json(&self) -> ::std::result::Result<::std::string::String, $crate::node::NodeError> {
                $crate::node::render(self)
            }

            fn replace_from(
                &mut self,
                body: &$crate::node::RawValue,
            ) -> ::std::result::Result<(), $crate::node::NodeError> {
                *self = $crate::node::parse(body)?;
                ::std::result::Result::Ok(())
            }
        }

        impl $crate::node::Record for $ty {
            fn type_key(&self) -> ::std::any::TypeId {
                ::std::any::TypeId::of::<$ty>()
            }

            fn field_specs(&self) -> &'static [$crate::node::FieldSpec] {
                const SPECS: &[$crate::node::FieldSpec] = &[
                    $($crate::__field_spec!($field: $spec)),+
                ];
                SPECS
            }

            fn field_mut(
                &mut self,
                declared: &str,
            ) -> ::std::option::Option<&mut dyn $crate::node::Addressable> {
                match declared {
                    $(stringify!($field) => {
                        ::std::option::Option::Some(&mut self.$field)
                    })+
                    _ => ::std::option::Option::None,
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_spec {
    ($field:ident: -) => {
        $crate::node::FieldSpec {
            declared: stringify!($field),
            external: ::std::option::Option::None,
            skip: true,
        }
    };
    ($field:ident: _) => {
        $crate::node::FieldSpec {
            declared: stringify!($field),
            external: ::std::option::Option::None,
            skip: false,
        }
    };
    ($field:ident: $external:literal) => {
        $crate::node::FieldSpec {
            declared: stringify!($field),
            external: ::std::option::Option::Some($external),
            skip: false,
        }
    };
}
