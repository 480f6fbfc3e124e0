//! Dumpable values: the shapes the variable formatter knows how to render.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::BuildHasher;

/// Which kind of collection a sequence came from. Rendering is identical
/// for all three; the kind only survives for callers that inspect values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqKind {
    List,
    Tuple,
    Set,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Key/value pairs in iteration order.
    Map(Vec<(String, Value)>),
    Seq { kind: SeqKind, items: Vec<Value> },
    /// An object with named fields, e.g. parsed command-line options.
    Record {
        type_name: String,
        fields: Vec<(String, Value)>,
    },
    /// A reference to a type rather than an instance of it.
    Type(String),
    /// Anything the formatter has no layout for. Holds the type name.
    Unsupported(String),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::Seq { kind: SeqKind::List, items }
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Seq { kind: SeqKind::Tuple, items }
    }

    pub fn set(items: Vec<Value>) -> Self {
        Value::Seq { kind: SeqKind::Set, items }
    }

    pub fn map<K: ToString, V: Dump>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_value()))
                .collect(),
        )
    }

    pub fn record(type_name: impl Into<String>, fields: Vec<(&str, Value)>) -> Self {
        Value::Record {
            type_name: type_name.into(),
            fields: fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }

    /// The type reference for `T`, rendered by its bare name.
    pub fn type_of<T: ?Sized>() -> Self {
        Value::Type(bare_type_name(std::any::type_name::<T>()))
    }

    /// Placeholder for a `T` the formatter cannot lay out.
    pub fn unsupported<T: ?Sized>() -> Self {
        Value::Unsupported(bare_type_name(std::any::type_name::<T>()))
    }

    /// True for values with no subordinate parts.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::None | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_)
        )
    }

    /// Short name of the value's shape, used in diagnostics.
    pub fn kind_name(&self) -> &str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Map(_) => "map",
            Value::Seq { kind: SeqKind::List, .. } => "list",
            Value::Seq { kind: SeqKind::Tuple, .. } => "tuple",
            Value::Seq { kind: SeqKind::Set, .. } => "set",
            Value::Record { type_name, .. } => type_name,
            Value::Type(_) => "type",
            Value::Unsupported(name) => name,
        }
    }
}

/// Strip module paths from a type name, keeping generic arguments readable:
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub fn bare_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        match ch {
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' | '*' => {
                out.push_str(last_path_segment(&segment));
                segment.clear();
                out.push(ch);
            }
            _ => segment.push(ch),
        }
    }
    out.push_str(last_path_segment(&segment));
    out
}

fn last_path_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Conversion into a [`Value`] for dumping.
///
/// Implemented for the standard scalar, string, option and collection
/// types. Record-like types implement it by hand, usually with
/// [`Value::record`].
pub trait Dump {
    fn to_value(&self) -> Value;
}

impl Dump for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: Dump + ?Sized> Dump for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: Dump + ?Sized> Dump for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

macro_rules! dump_int {
    ($($t:ty),*) => {
        $(impl Dump for $t {
            fn to_value(&self) -> Value {
                Value::Int(*self as i64)
            }
        })*
    };
}

dump_int!(i8, i16, i32, i64, isize, u8, u16, u32);

// Values past i64::MAX have no integer layout; keep their digits as text.
macro_rules! dump_wide_int {
    ($($t:ty),*) => {
        $(impl Dump for $t {
            fn to_value(&self) -> Value {
                match i64::try_from(*self) {
                    Ok(n) => Value::Int(n),
                    Err(_) => Value::Str(self.to_string()),
                }
            }
        })*
    };
}

dump_wide_int!(u64, usize, i128, u128);

impl Dump for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

impl Dump for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl Dump for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Dump for char {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl Dump for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl Dump for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl Dump for () {
    fn to_value(&self) -> Value {
        Value::None
    }
}

impl<T: Dump> Dump for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::None,
        }
    }
}

impl<T: Dump> Dump for [T] {
    fn to_value(&self) -> Value {
        Value::list(self.iter().map(Dump::to_value).collect())
    }
}

impl<T: Dump, const N: usize> Dump for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: Dump> Dump for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

macro_rules! dump_tuple {
    ($($name:ident),+) => {
        impl<$($name: Dump),+> Dump for ($($name,)+) {
            #[allow(non_snake_case)]
            fn to_value(&self) -> Value {
                let ($($name,)+) = self;
                Value::tuple(vec![$($name.to_value()),+])
            }
        }
    };
}

dump_tuple!(A);
dump_tuple!(A, B);
dump_tuple!(A, B, C);
dump_tuple!(A, B, C, D);
dump_tuple!(A, B, C, D, E);

impl<K: ToString, V: Dump, S: BuildHasher> Dump for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.to_string(), v.to_value())).collect())
    }
}

impl<K: ToString, V: Dump> Dump for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.to_string(), v.to_value())).collect())
    }
}

impl<T: Dump, S: BuildHasher> Dump for HashSet<T, S> {
    fn to_value(&self) -> Value {
        Value::set(self.iter().map(Dump::to_value).collect())
    }
}

impl<T: Dump> Dump for BTreeSet<T> {
    fn to_value(&self) -> Value {
        Value::set(self.iter().map(Dump::to_value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_names_drop_module_paths() {
        assert_eq!(bare_type_name("alloc::string::String"), "String");
        assert_eq!(
            bare_type_name("alloc::vec::Vec<alloc::string::String>"),
            "Vec<String>"
        );
        assert_eq!(bare_type_name("u32"), "u32");
        assert_eq!(
            bare_type_name("std::collections::hash::map::HashMap<i32, core::option::Option<u8>>"),
            "HashMap<i32, Option<u8>>"
        );
    }

    #[test]
    fn option_and_unit_become_none() {
        assert_eq!(None::<i32>.to_value(), Value::None);
        assert_eq!(Some(3).to_value(), Value::Int(3));
        assert_eq!(().to_value(), Value::None);
    }

    #[test]
    fn oversized_unsigned_keeps_digits() {
        assert_eq!(u64::MAX.to_value(), Value::Str("18446744073709551615".into()));
        assert_eq!(7u64.to_value(), Value::Int(7));
    }

    #[test]
    fn btree_map_iterates_in_key_order() {
        let mut m = BTreeMap::new();
        m.insert("b", 2);
        m.insert("a", 1);
        assert_eq!(
            m.to_value(),
            Value::Map(vec![("a".into(), Value::Int(1)), ("b".into(), Value::Int(2))])
        );
    }

    #[test]
    fn tuples_are_tuple_sequences() {
        assert_eq!(
            (1, "x").to_value(),
            Value::tuple(vec![Value::Int(1), Value::Str("x".into())])
        );
    }

    #[test]
    fn type_of_uses_bare_name() {
        assert_eq!(Value::type_of::<String>(), Value::Type("String".into()));
    }
}
