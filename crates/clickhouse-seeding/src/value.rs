//! Typed attribute values and their ClickHouse literal encoding.
//!
//! [`Value`] is the currency between factories, mappers and gateways:
//! callers supply already-typed values, and nothing in the resolution engine
//! touches their wire representation. Encoding into statement literals
//! happens once, at the gateway boundary, via [`Value::to_sql`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;
use uuid::Uuid;

/// Ordered attribute map: column name to typed value.
///
/// Insertion order is preserved and determines column order in generated
/// INSERT statements. Re-inserting an existing key replaces the value but
/// keeps its original position, which is exactly the merge semantics the
/// factory layering relies on.
pub type Row = IndexMap<String, Value>;

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Absent value, encoded as `NULL`.
	Null,
	/// Boolean, encoded as `1`/`0`.
	Bool(bool),
	/// Signed integer, encoded unquoted.
	Int(i64),
	/// Unsigned integer, encoded unquoted.
	UInt(u64),
	/// Floating point number, encoded unquoted.
	Float(f64),
	/// Text, quoted and escaped on encoding.
	Text(String),
	/// Date-time, encoded as `'YYYY-MM-DD HH:MM:SS'`.
	DateTime(NaiveDateTime),
	/// Ordered sequence of values, encoded as `[a, b]`.
	Array(Vec<Value>),
}

impl Value {
	/// Encodes the value as a ClickHouse SQL literal.
	///
	/// Text is single-quoted with embedded quotes doubled, arrays encode
	/// their elements recursively inside brackets, date-times use the
	/// `YYYY-MM-DD HH:MM:SS` format and booleans become `1`/`0`. The output
	/// is always a single line.
	///
	/// # Examples
	///
	/// ```
	/// use clickhouse_seeding::Value;
	///
	/// assert_eq!(Value::from("It's").to_sql(), "'It''s'");
	/// assert_eq!(Value::from(vec!["a", "b"]).to_sql(), "['a', 'b']");
	/// assert_eq!(Value::Null.to_sql(), "NULL");
	/// ```
	pub fn to_sql(&self) -> String {
		match self {
			Value::Null => "NULL".to_string(),
			Value::Bool(true) => "1".to_string(),
			Value::Bool(false) => "0".to_string(),
			Value::Int(value) => value.to_string(),
			Value::UInt(value) => value.to_string(),
			Value::Float(value) => value.to_string(),
			Value::Text(value) => format!("'{}'", value.replace('\'', "''")),
			Value::DateTime(value) => format!("'{}'", value.format("%Y-%m-%d %H:%M:%S")),
			Value::Array(items) => {
				let elements = items.iter().map(Value::to_sql).collect::<Vec<_>>().join(", ");
				format!("[{elements}]")
			}
		}
	}

	/// Returns the contained integer, if the value is an integer.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int(value) => Some(*value),
			Value::UInt(value) => i64::try_from(*value).ok(),
			_ => None,
		}
	}

	/// Returns the contained text, if the value is text.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Text(value) => Some(value),
			_ => None,
		}
	}

	/// Returns the contained boolean, if the value is a boolean.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(value) => Some(*value),
			_ => None,
		}
	}

	/// Returns true if the value is `Null`.
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Int(i64::from(value))
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Int(value)
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Value::UInt(u64::from(value))
	}
}

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		Value::UInt(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::Text(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::Text(value)
	}
}

impl From<NaiveDateTime> for Value {
	fn from(value: NaiveDateTime) -> Self {
		Value::DateTime(value)
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(value: DateTime<Utc>) -> Self {
		Value::DateTime(value.naive_utc())
	}
}

impl From<NaiveDate> for Value {
	fn from(value: NaiveDate) -> Self {
		Value::DateTime(value.and_time(NaiveTime::MIN))
	}
}

impl From<Uuid> for Value {
	fn from(value: Uuid) -> Self {
		Value::Text(value.to_string())
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(values: Vec<T>) -> Self {
		Value::Array(values.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(value) => Value::Bool(value),
			serde_json::Value::Number(number) => {
				if let Some(value) = number.as_i64() {
					Value::Int(value)
				} else if let Some(value) = number.as_u64() {
					Value::UInt(value)
				} else {
					Value::Float(number.as_f64().unwrap_or(0.0))
				}
			}
			serde_json::Value::String(value) => Value::Text(value),
			serde_json::Value::Array(items) => {
				Value::Array(items.into_iter().map(Value::from).collect())
			}
			object @ serde_json::Value::Object(_) => Value::Text(object.to_string()),
		}
	}
}

/// Builds a [`Row`] from `"column" => value` pairs.
///
/// Values are converted through [`Value::from`], so anything with a `From`
/// conversion works on the right-hand side.
///
/// # Examples
///
/// ```
/// use clickhouse_seeding::row;
///
/// let attrs = row! { "name" => "Alice", "active" => true };
/// assert_eq!(attrs.len(), 2);
/// ```
#[macro_export]
macro_rules! row {
	() => { $crate::Row::new() };
	($($column:expr => $value:expr),+ $(,)?) => {{
		let mut row = $crate::Row::new();
		$(row.insert(($column).to_string(), $crate::Value::from($value));)+
		row
	}};
}
