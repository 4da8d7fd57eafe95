//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`TypeKey`] - Validated name of a catalog type
//! - [`FieldRef`] - A field together with the type that declares it
//! - [`GetterRef`] / [`SetterRef`] - Named accessor methods of a type
//! - [`Value`] - A generated value
//! - [`Record`] - A generated instance of a record type
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use fixtura::core::types::{TypeKey, Value};
//!
//! let key = TypeKey::new("Order").unwrap();
//! assert_eq!(key.as_str(), "Order");
//! assert!(TypeKey::string().is_scalar());
//!
//! // Invalid constructions fail at creation time
//! assert!(TypeKey::new("").is_err());
//! assert!(TypeKey::new("has space").is_err());
//!
//! assert!(Value::Null.is_null());
//! ```

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

/// Errors from type validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid type name: {0}")]
    InvalidTypeKey(String),
}

/// Names of the built-in scalar types.
const SCALARS: &[&str] = &[
    "bool", "char", "i32", "i64", "f32", "f64", "string", "uuid", "datetime",
];

/// A validated type name.
///
/// Type names identify entries in a [`TypeCatalog`](crate::core::catalog::TypeCatalog).
/// They must:
/// - Not be empty
/// - Not start with an ASCII digit
/// - Contain only alphanumerics and `_`, `:`, `.`, `<`, `>`, `,`
///
/// # Example
///
/// ```
/// use fixtura::core::types::TypeKey;
///
/// let order = TypeKey::new("shop::Order").unwrap();
/// assert_eq!(order.as_str(), "shop::Order");
/// assert!(!order.is_scalar());
///
/// assert!(TypeKey::new("1st").is_err());
/// assert!(TypeKey::new("a b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeKey(String);

impl TypeKey {
    /// Create a new validated type name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidTypeKey` if the name is malformed.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidTypeKey(
                "type name cannot be empty".into(),
            ));
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(TypeError::InvalidTypeKey(format!(
                "type name '{name}' cannot start with a digit"
            )));
        }
        const ALLOWED_PUNCT: [char; 6] = ['_', ':', '.', '<', '>', ','];
        if let Some(c) = name
            .chars()
            .find(|c| !c.is_alphanumeric() && !ALLOWED_PUNCT.contains(c))
        {
            return Err(TypeError::InvalidTypeKey(format!(
                "type name '{name}' cannot contain '{c}'"
            )));
        }
        Ok(())
    }

    pub fn bool() -> Self {
        Self("bool".into())
    }

    pub fn char() -> Self {
        Self("char".into())
    }

    pub fn i32() -> Self {
        Self("i32".into())
    }

    pub fn i64() -> Self {
        Self("i64".into())
    }

    pub fn f32() -> Self {
        Self("f32".into())
    }

    pub fn f64() -> Self {
        Self("f64".into())
    }

    pub fn string() -> Self {
        Self("string".into())
    }

    pub fn uuid() -> Self {
        Self("uuid".into())
    }

    pub fn datetime() -> Self {
        Self("datetime".into())
    }

    /// All built-in scalar type keys.
    pub fn scalars() -> impl Iterator<Item = TypeKey> {
        SCALARS.iter().map(|s| TypeKey((*s).to_string()))
    }

    /// Check if this names a built-in scalar type.
    pub fn is_scalar(&self) -> bool {
        SCALARS.contains(&self.0.as_str())
    }

    /// Get the type name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TypeKey {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for TypeKey {
    type Error = TypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<TypeKey> for String {
    fn from(key: TypeKey) -> Self {
        key.0
    }
}

impl AsRef<str> for TypeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A field of a record type, as seen from a node in the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    /// Type that declares the field
    pub declaring: TypeKey,
    /// Field name
    pub name: String,
    /// Declared type of the field
    pub ty: TypeKey,
}

impl std::fmt::Display for FieldRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.declaring, self.name)
    }
}

/// Reference to a getter method, the counterpart of `Order::get_id`.
///
/// Resolved against a [`Reflector`](crate::core::catalog::Reflector) when a
/// selector is built from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GetterRef {
    pub declaring: String,
    pub method: String,
}

impl GetterRef {
    pub fn new(declaring: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            declaring: declaring.into(),
            method: method.into(),
        }
    }
}

impl std::fmt::Display for GetterRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.declaring, self.method)
    }
}

/// Reference to a setter method, the counterpart of `Order::set_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SetterRef {
    pub declaring: String,
    pub method: String,
}

impl SetterRef {
    pub fn new(declaring: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            declaring: declaring.into(),
            method: method.into(),
        }
    }
}

impl std::fmt::Display for SetterRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.declaring, self.method)
    }
}

/// A generated value.
///
/// Serializes to plain JSON: records become objects with fields in
/// declaration order, enum variants become strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    Int(i64),
    Float(f64),
    Str(String),
    Uuid(Uuid),
    DateTime(NaiveDateTime),
    Enum { ty: TypeKey, variant: String },
    List(Vec<Value>),
    Record(Record),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Short name of the value's variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Uuid(_) => "uuid",
            Value::DateTime(_) => "datetime",
            Value::Enum { .. } => "enum",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    /// Follow a dotted field path through nested records.
    ///
    /// ```
    /// use fixtura::core::types::{Record, TypeKey, Value};
    ///
    /// let mut address = Record::new(TypeKey::new("Address").unwrap());
    /// address.set("city", Value::Str("Oslo".into()));
    /// let mut person = Record::new(TypeKey::new("Person").unwrap());
    /// person.set("address", Value::Record(address));
    ///
    /// let person = Value::Record(person);
    /// assert_eq!(person.at("address.city").and_then(Value::as_str), Some("Oslo"));
    /// assert!(person.at("address.zip").is_none());
    /// ```
    pub fn at(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(self, |value, segment| value.as_record()?.get(segment))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Char(c) => serializer.serialize_char(*c),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Uuid(u) => u.serialize(serializer),
            Value::DateTime(dt) => dt.serialize(serializer),
            Value::Enum { variant, .. } => serializer.serialize_str(variant),
            Value::List(items) => items.serialize(serializer),
            Value::Record(record) => record.serialize(serializer),
        }
    }
}

/// A generated instance of a record type.
///
/// Fields keep their declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    ty: TypeKey,
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create a record with no fields set.
    pub fn new(ty: TypeKey) -> Self {
        Self {
            ty,
            fields: Vec::new(),
        }
    }

    pub fn ty(&self) -> &TypeKey {
        &self.ty
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Check whether a field is absent or null.
    pub fn is_unset(&self, name: &str) -> bool {
        self.get(name).map_or(true, Value::is_null)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}
