//! Values accepted and produced by converters.

use std::{fmt, str::FromStr};

use jiff::{
    civil::{Date, DateTime, Time},
    Timestamp, Zoned,
};
use serde::{Deserialize, Serialize};

/// Type-safe enumeration of conversion targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// An instant with nanosecond precision
    Timestamp,
    /// A civil calendar date
    Date,
    /// A civil wall clock time
    Time,
    /// An instant bound to a time zone
    Zoned,
    /// A display string
    String,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Timestamp => "Timestamp",
            TargetType::Date => "Date",
            TargetType::Time => "Time",
            TargetType::Zoned => "Zoned",
            TargetType::String => "String",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "timestamp" => Ok(TargetType::Timestamp),
            "date" => Ok(TargetType::Date),
            "time" => Ok(TargetType::Time),
            "zoned" => Ok(TargetType::Zoned),
            "string" => Ok(TargetType::String),
            _ => Err(format!("Invalid target type: {s}")),
        }
    }
}

/// A value flowing into or out of a converter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value
    Null,
    /// Text to be parsed
    String(String),
    /// Milliseconds since the Unix epoch
    Integer(i64),
    Timestamp(Timestamp),
    Zoned(Zoned),
    DateTime(DateTime),
    Date(Date),
    Time(Time),
    /// Only the first element takes part in a conversion
    List(Vec<Value>),
}

impl Value {
    /// The target type this value already satisfies, if any.
    pub fn target_type(&self) -> Option<TargetType> {
        match self {
            Value::String(_) => Some(TargetType::String),
            Value::Timestamp(_) => Some(TargetType::Timestamp),
            Value::Zoned(_) => Some(TargetType::Zoned),
            Value::Date(_) => Some(TargetType::Date),
            Value::Time(_) => Some(TargetType::Time),
            Value::Null | Value::Integer(_) | Value::DateTime(_) | Value::List(_) => None,
        }
    }

    /// Short name of the value's kind, used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Timestamp(_) => "timestamp",
            Value::Zoned(_) => "zoned",
            Value::DateTime(_) => "datetime",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::List(_) => "list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Replaces a list by its first element (an empty list becomes `Null`).
    pub fn into_scalar(self) -> Value {
        match self {
            Value::List(values) => values
                .into_iter()
                .next()
                .map(Value::into_scalar)
                .unwrap_or(Value::Null),
            other => other,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            Value::Zoned(zoned) => Some(zoned.timestamp()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::String(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Timestamp(ts) => write!(f, "{ts}"),
            Value::Zoned(zoned) => write!(f, "{zoned}"),
            Value::DateTime(dt) => write!(f, "{dt}"),
            Value::Date(date) => write!(f, "{date}"),
            Value::Time(time) => write!(f, "{time}"),
            Value::List(values) => {
                let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(millis: i64) -> Self {
        Value::Integer(millis)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<Zoned> for Value {
    fn from(zoned: Zoned) -> Self {
        Value::Zoned(zoned)
    }
}

impl From<DateTime> for Value {
    fn from(dt: DateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Date> for Value {
    fn from(date: Date) -> Self {
        Value::Date(date)
    }
}

impl From<Time> for Value {
    fn from(time: Time) -> Self {
        Value::Time(time)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::List(values)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_target_type_from_str() {
        assert_eq!("timestamp".parse::<TargetType>(), Ok(TargetType::Timestamp));
        assert_eq!("DATE".parse::<TargetType>(), Ok(TargetType::Date));
        assert!("calendar".parse::<TargetType>().is_err());
    }

    #[test]
    fn test_into_scalar_takes_first_element() {
        let list = Value::List(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(list.into_scalar(), Value::from("a"));
        assert_eq!(Value::List(Vec::new()).into_scalar(), Value::Null);
        assert_eq!(Value::Integer(5).into_scalar(), Value::Integer(5));
    }

    #[test]
    fn test_target_type_of_values() {
        assert_eq!(
            Value::from(date(2003, 1, 2)).target_type(),
            Some(TargetType::Date)
        );
        assert_eq!(Value::Integer(0).target_type(), None);
        assert_eq!(Value::Null.target_type(), None);
    }

    #[test]
    fn test_option_maps_to_null() {
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::from(Some(7i64)), Value::Integer(7));
    }
}
