//! Attribute values.
use std::fmt;

use time::{OffsetDateTime, PrimitiveDateTime};

use crate::{config::TIME_FORMAT, error::Error};

/// A single value of a directory attribute.
///
/// LDAP attribute values are octet strings, so a [`Value`] holds raw bytes and
/// two values are equal exactly when their bytes are. Most attributes carry
/// UTF-8 text, which [`Value::as_str`] exposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Value(Vec<u8>);

impl Value {
	/// The raw bytes of the value
	#[must_use]
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// The value as text. Will return `None` if the value is not valid UTF-8.
	#[must_use]
	pub fn as_str(&self) -> Option<&str> {
		std::str::from_utf8(&self.0).ok()
	}

	/// Interpret the value as a boolean, using the `TRUE`/`FALSE` spelling of
	/// the LDAP Boolean syntax.
	pub fn to_bool(&self) -> Result<bool, Error> {
		match self.as_str() {
			Some("TRUE") => Ok(true),
			Some("FALSE") => Ok(false),
			_ => Err(Error::Invalid(self.to_string())),
		}
	}

	/// Interpret the value as a Generalized Time, such as the
	/// `modifyTimestamp` operational attribute.
	pub fn to_time(&self) -> Result<OffsetDateTime, Error> {
		let text = self.as_str().ok_or_else(|| Error::Invalid(self.to_string()))?;
		Ok(PrimitiveDateTime::parse(text, &TIME_FORMAT)?.assume_utc())
	}

	/// Format a point in time as a Generalized Time value
	pub fn from_time(time: OffsetDateTime) -> Result<Self, Error> {
		let utc = time.to_offset(time::UtcOffset::UTC);
		Ok(Self::from(utc.format(&TIME_FORMAT)?))
	}

	/// Consume the value, returning its bytes
	#[must_use]
	pub fn into_bytes(self) -> Vec<u8> {
		self.0
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&String::from_utf8_lossy(&self.0))
	}
}

impl AsRef<[u8]> for Value {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self(value.into_bytes())
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self(value.as_bytes().to_vec())
	}
}

impl From<&String> for Value {
	fn from(value: &String) -> Self {
		Self::from(value.as_str())
	}
}

impl From<Vec<u8>> for Value {
	fn from(value: Vec<u8>) -> Self {
		Self(value)
	}
}

impl From<&[u8]> for Value {
	fn from(value: &[u8]) -> Self {
		Self(value.to_vec())
	}
}

impl From<&Value> for Value {
	fn from(value: &Value) -> Self {
		value.clone()
	}
}

impl PartialEq<str> for Value {
	fn eq(&self, other: &str) -> bool {
		self.0 == other.as_bytes()
	}
}

impl PartialEq<&str> for Value {
	fn eq(&self, other: &&str) -> bool {
		self.0 == other.as_bytes()
	}
}
