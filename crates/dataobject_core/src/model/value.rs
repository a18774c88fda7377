//! Dynamic value model for data objects.
//!
//! # Responsibility
//! - Represent structured instances, loose input records and leaf values in
//!   one owned tree shape.
//! - Expose the runtime type of every value as a `TypeKey`.
//!
//! # Invariants
//! - Values are owned trees; two values never share storage, so cyclic data
//!   cannot be built.
//! - `Null` stands for an absent/undefined value.
//! - Reading a field off anything but `Map` or `Object` yields `Null`.

use crate::model::date::DateValue;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

static TYPE_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:(?:\.|::)[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("valid type key regex")
});

static NULL: Value = Value::Null;

// `type_key` hands out borrows of these.
static NULL_KEY: TypeKey = TypeKey::NULL;
static BOOLEAN_KEY: TypeKey = TypeKey::BOOLEAN;
static NUMBER_KEY: TypeKey = TypeKey::NUMBER;
static STRING_KEY: TypeKey = TypeKey::STRING;
static DATE_KEY: TypeKey = TypeKey::DATE;
static ARRAY_KEY: TypeKey = TypeKey::ARRAY;
static OBJECT_KEY: TypeKey = TypeKey::OBJECT;

/// Stable identity of a type ("constructor identity").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(Cow<'static, str>);

impl TypeKey {
    pub const NULL: TypeKey = TypeKey(Cow::Borrowed("Null"));
    pub const BOOLEAN: TypeKey = TypeKey(Cow::Borrowed("Boolean"));
    pub const NUMBER: TypeKey = TypeKey(Cow::Borrowed("Number"));
    pub const STRING: TypeKey = TypeKey(Cow::Borrowed("String"));
    pub const DATE: TypeKey = TypeKey(Cow::Borrowed("Date"));
    pub const ARRAY: TypeKey = TypeKey(Cow::Borrowed("Array"));
    pub const OBJECT: TypeKey = TypeKey(Cow::Borrowed("Object"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key follows the identifier grammar (`a.b` and `a::b`
    /// paths allowed).
    pub fn is_valid(&self) -> bool {
        TYPE_KEY_RE.is_match(self.as_str())
    }
}

impl Display for TypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&'static str> for TypeKey {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for TypeKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// One instance of a structured type.
///
/// Fields beyond the declared properties may be present; operations never
/// inspect them.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    type_key: TypeKey,
    fields: BTreeMap<String, Value>,
}

impl Instance {
    pub fn new(type_key: impl Into<TypeKey>) -> Self {
        Self {
            type_key: type_key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field assignment.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn type_key(&self) -> &TypeKey {
        &self.type_key
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Field value, `Null` when missing.
    pub fn field(&self, name: &str) -> &Value {
        self.fields.get(name).unwrap_or(&NULL)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Any value a data object operation can see.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Date(DateValue),
    Array(Vec<Value>),
    /// Loosely typed record, e.g. parsed external input.
    Map(BTreeMap<String, Value>),
    Object(Instance),
}

impl Value {
    /// Runtime type of this value.
    pub fn type_key(&self) -> &TypeKey {
        match self {
            Self::Null => &NULL_KEY,
            Self::Bool(_) => &BOOLEAN_KEY,
            Self::Number(_) => &NUMBER_KEY,
            Self::Text(_) => &STRING_KEY,
            Self::Date(_) => &DATE_KEY,
            Self::Array(_) => &ARRAY_KEY,
            Self::Map(_) => &OBJECT_KEY,
            Self::Object(instance) => instance.type_key(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Reads one named field; `Null` when absent or when this value has no
    /// fields.
    pub fn field(&self, name: &str) -> &Value {
        match self {
            Self::Map(entries) => entries.get(name).unwrap_or(&NULL),
            Self::Object(instance) => instance.field(name),
            _ => &NULL,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateValue> {
        match self {
            Self::Date(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Object(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn as_instance_mut(&mut self) -> Option<&mut Instance> {
        match self {
            Self::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// JSON rendering. Dates become RFC 3339 strings; invalid dates and
    /// non-finite numbers become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(value) => serde_json::Value::Bool(*value),
            Self::Number(value) => number_to_json(*value),
            Self::Text(value) => serde_json::Value::String(value.clone()),
            Self::Date(value) => value
                .to_rfc3339()
                .map(serde_json::Value::String)
                .unwrap_or(serde_json::Value::Null),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Self::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
            Self::Object(instance) => serde_json::Value::Object(
                instance
                    .fields()
                    .map(|(name, value)| (name.to_string(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

fn number_to_json(value: f64) -> serde_json::Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        return serde_json::Value::from(value as i64);
    }
    serde_json::Number::from_f64(value)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(flag) => Self::Bool(flag),
            serde_json::Value::Number(number) => {
                Self::Number(number.as_f64().unwrap_or(f64::NAN))
            }
            serde_json::Value::String(text) => Self::Text(text),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(name, value)| (name, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        Self::from(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateValue> for Value {
    fn from(value: DateValue) -> Self {
        Self::Date(value)
    }
}

impl From<Instance> for Value {
    fn from(value: Instance) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::{Instance, TypeKey, Value};
    use crate::model::date::DateValue;
    use serde_json::json;

    #[test]
    fn runtime_type_follows_variant_and_instance_key() {
        assert_eq!(Value::Null.type_key(), &TypeKey::NULL);
        assert_eq!(Value::from("a").type_key(), &TypeKey::STRING);
        assert_eq!(Value::from(DateValue::from_millis(0)).type_key(), &TypeKey::DATE);
        assert_eq!(Value::from(json!({ "a": 1 })).type_key(), &TypeKey::OBJECT);
        assert_eq!(
            Value::from(Instance::new("User")).type_key(),
            &TypeKey::new("User")
        );
    }

    #[test]
    fn field_reads_are_absent_for_leaf_values() {
        let record = Value::from(json!({ "name": "a" }));
        assert_eq!(record.field("name"), &Value::from("a"));
        assert!(record.field("missing").is_null());
        assert!(Value::from(3).field("name").is_null());
    }

    #[test]
    fn type_key_grammar() {
        assert!(TypeKey::new("User").is_valid());
        assert!(TypeKey::new("billing::Invoice").is_valid());
        assert!(TypeKey::new("app.model.Order_2").is_valid());
        assert!(!TypeKey::new("").is_valid());
        assert!(!TypeKey::new("2fast").is_valid());
        assert!(!TypeKey::new("has space").is_valid());
    }

    #[test]
    fn json_rendering_uses_rfc3339_dates_and_integral_numbers() {
        let instance = Instance::new("Event")
            .with("count", 3)
            .with("ratio", 0.5)
            .with("at", DateValue::parse("2020-01-01T00:00:00.000Z"))
            .with("broken", DateValue::invalid());
        assert_eq!(
            Value::from(instance).to_json(),
            json!({
                "count": 3,
                "ratio": 0.5,
                "at": "2020-01-01T00:00:00.000Z",
                "broken": null
            })
        );
    }

    #[test]
    fn serialize_matches_json_rendering() {
        let value = Value::from(vec![Value::from(true), Value::Null]);
        let text = serde_json::to_string(&value).expect("value should serialize");
        assert_eq!(text, "[true,null]");
    }
}
