use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;

/// A realized Terraform value, as produced by evaluating a variable's
/// `default = ...` expression or carried by an interface specification.
///
/// `Unknown` stands for a value the evaluator could not resolve (the host's
/// dynamic value system erases it); it compares equal to nothing.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    Null,
    Bool(bool),
    #[serde(serialize_with = "i128_serializer")]
    Integer(i128),
    Float(f64),
    String(String),
    List(Box<Vec<Value>>),
    Set(Box<Vec<Value>>),
    Tuple(Box<Vec<Value>>),
    Map(IndexMap<String, Value>),
    Object(IndexMap<String, Value>),
    Unknown,
}

impl PartialEq<Value> for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(lhs), Value::Bool(rhs)) => lhs == rhs,
            (Value::Integer(lhs), Value::Integer(rhs)) => lhs == rhs,
            (Value::Float(lhs), Value::Float(rhs)) => lhs == rhs,
            (Value::String(lhs), Value::String(rhs)) => lhs == rhs,
            (Value::List(lhs), Value::List(rhs))
            | (Value::Set(lhs), Value::Set(rhs))
            | (Value::Tuple(lhs), Value::Tuple(rhs)) => {
                if lhs.len() != rhs.len() {
                    return false;
                }
                lhs.iter().zip(rhs.iter()).all(|(l, r)| l == r)
            }
            (Value::Map(lhs), Value::Map(rhs)) | (Value::Object(lhs), Value::Object(rhs)) => {
                if lhs.len() != rhs.len() {
                    return false;
                }
                for (k, v) in lhs.iter() {
                    match rhs.get(k) {
                        Some(r) if v == r => continue,
                        _ => return false,
                    }
                }
                true
            }
            // An unknown value is never known to equal anything.
            (Value::Unknown, _) | (_, Value::Unknown) => false,
            _ => false,
        }
    }
}

fn i128_serializer<S>(value: &i128, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    ser.serialize_str(&value.to_string())
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid Value")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut typing = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "type" => {
                            if typing.is_some() {
                                return Err(de::Error::duplicate_field("type"));
                            }
                            let the_typing = map.next_value::<String>()?;
                            if the_typing.eq("null") {
                                return Ok(Value::null());
                            }
                            if the_typing.eq("unknown") {
                                return Ok(Value::unknown());
                            }
                            typing = Some(the_typing);
                        }
                        "value" => {
                            let typing = typing.ok_or_else(|| de::Error::missing_field("type"))?;
                            match typing.as_str() {
                                "bool" => return Ok(Value::bool(map.next_value()?)),
                                "integer" => {
                                    let value: String = map.next_value()?;
                                    let i128 = value.parse().map_err(de::Error::custom)?;
                                    return Ok(Value::integer(i128));
                                }
                                "float" => return Ok(Value::float(map.next_value()?)),
                                "string" => return Ok(Value::string(map.next_value::<String>()?)),
                                "list" => return Ok(Value::list(map.next_value()?)),
                                "set" => return Ok(Value::set(map.next_value()?)),
                                "tuple" => return Ok(Value::tuple(map.next_value()?)),
                                "map" => return Ok(Value::map(map.next_value()?)),
                                "object" => return Ok(Value::object(map.next_value()?)),
                                "null" | "unknown" => unreachable!(),
                                other => {
                                    return Err(de::Error::custom(format!("invalid type {other}")))
                                }
                            }
                        }
                        unexpected => {
                            return Err(de::Error::custom(format!(
                                "invalid Value: unexpected key {unexpected}"
                            )));
                        }
                    }
                }

                Err(de::Error::custom("invalid Value: missing required key value"))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl Value {
    pub fn null() -> Value {
        Value::Null
    }
    pub fn bool(value: bool) -> Value {
        Value::Bool(value)
    }
    pub fn integer(value: i128) -> Value {
        Value::Integer(value)
    }
    pub fn float(value: f64) -> Value {
        Value::Float(value)
    }
    pub fn string(value: impl Into<String>) -> Value {
        Value::String(value.into())
    }
    pub fn list(entries: Vec<Value>) -> Value {
        Value::List(Box::new(entries))
    }
    pub fn set(entries: Vec<Value>) -> Value {
        Value::Set(Box::new(entries))
    }
    pub fn tuple(entries: Vec<Value>) -> Value {
        Value::Tuple(Box::new(entries))
    }
    pub fn map(entries: IndexMap<String, Value>) -> Value {
        Value::Map(entries)
    }
    pub fn object(entries: IndexMap<String, Value>) -> Value {
        Value::Object(entries)
    }
    pub fn unknown() -> Value {
        Value::Unknown
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }
    pub fn as_null(&self) -> Option<()> {
        match self {
            Value::Null => Some(()),
            _ => None,
        }
    }
    pub fn as_entries(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(entries) | Value::Set(entries) | Value::Tuple(entries) => Some(entries),
            _ => None,
        }
    }
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(entries) | Value::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn expect_entries(&self) -> &Vec<Value> {
        match self {
            Value::List(entries) | Value::Set(entries) | Value::Tuple(entries) => entries,
            _ => unreachable!(),
        }
    }
    pub fn expect_object(&self) -> &IndexMap<String, Value> {
        match self {
            Value::Map(entries) | Value::Object(entries) => entries,
            _ => unreachable!(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Number of entries when the value is a collection or an object of any
    /// flavor, `None` for primitives, null and unknown.
    pub fn collection_len(&self) -> Option<usize> {
        match self {
            Value::List(entries) | Value::Set(entries) | Value::Tuple(entries) => {
                Some(entries.len())
            }
            Value::Map(entries) | Value::Object(entries) => Some(entries.len()),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
            Value::Unknown => "unknown",
        }
    }

    /// Renders the value back as HCL-flavored source text, used when a
    /// diagnostic echoes an expected default back to the module author.
    pub fn to_source(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(value) => value.to_string(),
            Value::Integer(value) => value.to_string(),
            Value::Float(value) => value.to_string(),
            Value::String(value) => format!("{:?}", value),
            Value::List(entries) | Value::Set(entries) | Value::Tuple(entries) => {
                format!(
                    "[{}]",
                    entries.iter().map(|e| e.to_source()).collect::<Vec<_>>().join(", ")
                )
            }
            Value::Map(entries) | Value::Object(entries) => {
                if entries.is_empty() {
                    return "{}".to_string();
                }
                format!(
                    "{{ {} }}",
                    entries
                        .iter()
                        .map(|(k, v)| format!("{} = {}", k, v.to_source()))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            Value::Unknown => "(unknown)".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_source())
    }
}
