//! Multi-valued directory attributes.
use std::{collections::BTreeMap, fmt};

use crate::{error::Error, value::Value};

/// The values of a single directory attribute.
///
/// Values keep their insertion order. Positions can be vacated with
/// [`Attribute::unset`] or skipped over with [`Attribute::set`]; vacant
/// positions are never yielded by [`Attribute::iter`] and are squeezed out by
/// [`Attribute::delete_value`].
///
/// The values an attribute was constructed with are kept as its original
/// values, which [`crate::Entity::changes`] compares against to find out how
/// an attribute was modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribute {
	/// Current values by position. Positions without an entry are vacant.
	values: BTreeMap<usize, Value>,
	/// The values as loaded
	original: Vec<Value>,
}

impl Attribute {
	/// Create an attribute holding the given values
	#[must_use]
	pub fn new<I, V>(values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<Value>,
	{
		let original: Vec<Value> = values.into_iter().map(Into::into).collect();
		Self { values: original.iter().cloned().enumerate().collect(), original }
	}

	/// The position after the last occupied one. Positions are squeezed
	/// together first if the last occupied position is `usize::MAX`.
	fn next_offset(&mut self) -> usize {
		let Some(&last) = self.values.keys().next_back() else {
			return 0;
		};
		match last.checked_add(1) {
			Some(next) => next,
			None => {
				self.reindex();
				self.values.len()
			}
		}
	}

	/// Move the present values to positions `0..len()`
	fn reindex(&mut self) {
		let values = std::mem::take(&mut self.values);
		self.values = values.into_values().enumerate().collect();
	}

	/// Append a value after the last occupied position
	pub fn add_value(&mut self, value: impl Into<Value>) -> &mut Self {
		let offset = self.next_offset();
		self.values.insert(offset, value.into());
		self
	}

	/// Append a value unless an equal value is already present
	pub fn add_value_if_not_exists(&mut self, value: impl Into<Value>) -> &mut Self {
		let value = value.into();
		if !self.has_value(&value) {
			self.add_value(value);
		}
		self
	}

	/// Remove every occurrence of a value. The remaining values are moved
	/// together so that their positions are `0..len()` again.
	pub fn delete_value(&mut self, value: impl Into<Value>) -> &mut Self {
		let value = value.into();
		self.values.retain(|_, v| *v != value);
		self.reindex();
		self
	}

	/// Whether an equal value is present
	#[must_use]
	pub fn has_value(&self, value: impl Into<Value>) -> bool {
		let value = value.into();
		self.iter().any(|v| *v == value)
	}

	/// Get the value at a position
	pub fn get(&self, offset: usize) -> Result<&Value, Error> {
		self.values.get(&offset).ok_or(Error::IndexOutOfRange(offset))
	}

	/// Set the value at a position. Setting a position past the end leaves
	/// any positions in between vacant.
	pub fn set(&mut self, offset: usize, value: impl Into<Value>) -> &mut Self {
		self.values.insert(offset, value.into());
		self
	}

	/// Vacate a position without moving the values after it
	pub fn unset(&mut self, offset: usize) -> &mut Self {
		self.values.remove(&offset);
		self
	}

	/// Whether a value is present at a position
	#[must_use]
	pub fn exists(&self, offset: usize) -> bool {
		self.values.contains_key(&offset)
	}

	/// The first value, if the attribute has one
	#[must_use]
	pub fn value(&self) -> Option<&Value> {
		self.values.get(&0)
	}

	/// Iterate over the present values in order
	pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
		self.values.values()
	}

	/// The number of present values
	#[must_use]
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Whether the attribute has no values
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// The present values, in order and without gaps
	#[must_use]
	pub fn to_vec(&self) -> Vec<Value> {
		self.iter().cloned().collect()
	}

	/// The values the attribute held when it was created
	#[must_use]
	pub fn original_values(&self) -> &[Value] {
		&self.original
	}
}

impl<'a> IntoIterator for &'a Attribute {
	type Item = &'a Value;
	type IntoIter = std::collections::btree_map::Values<'a, usize, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.values.values()
	}
}

impl fmt::Display for Attribute {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value() {
			Some(value) => value.fmt(f),
			None => Ok(()),
		}
	}
}

#[cfg(test)]
mod tests {
	#![allow(clippy::unwrap_used)]

	use super::Attribute;
	use crate::{error::Error, value::Value};

	fn strings(attribute: &Attribute) -> Vec<String> {
		attribute.iter().map(ToString::to_string).collect()
	}

	#[test]
	fn construct_keeps_original_values() {
		let mut attribute = Attribute::new(["Apple", "Banana", "Grapefruit"]);
		assert_eq!(strings(&attribute), ["Apple", "Banana", "Grapefruit"]);

		attribute.add_value("Orange").delete_value("Apple");
		assert_eq!(strings(&attribute), ["Banana", "Grapefruit", "Orange"]);
		assert_eq!(
			attribute.original_values(),
			[Value::from("Apple"), Value::from("Banana"), Value::from("Grapefruit")],
			"Mutation must not touch the original values"
		);
	}

	#[test]
	fn add_value_if_not_exists() {
		let mut attribute = Attribute::default();
		attribute.add_value_if_not_exists("Foo").add_value_if_not_exists("Foo");
		assert_eq!(attribute.len(), 1);
		attribute.add_value_if_not_exists("Bar").add_value_if_not_exists("Bar");
		assert_eq!(strings(&attribute), ["Foo", "Bar"]);

		attribute.add_value("Foo");
		assert_eq!(attribute.len(), 3, "Plain add doesn't deduplicate");
	}

	#[test]
	fn delete_value_reindexes() {
		let mut attribute =
			Attribute::new(["Apple", "Banana", "Banana", "Orange", "Grapefruit", "Banana"]);
		attribute.delete_value("Banana");

		assert_eq!(strings(&attribute), ["Apple", "Orange", "Grapefruit"]);
		assert_eq!(attribute.get(1).unwrap(), "Orange");
		assert_eq!(attribute.get(2).unwrap(), "Grapefruit");
		assert!(!attribute.exists(3));

		attribute.delete_value("Kiwi");
		assert_eq!(attribute.len(), 3, "Deleting an absent value is a no-op");
	}

	#[test]
	fn value_and_membership() {
		let mut attribute = Attribute::default();
		assert_eq!(attribute.value(), None);
		assert_eq!(attribute.to_string(), "");

		attribute.add_value("Apple").add_value("Banana").add_value("Orange");
		assert_eq!(attribute.value().unwrap(), "Apple");
		assert_eq!(attribute.to_string(), "Apple");
		assert!(attribute.has_value("Banana"));
		assert!(!attribute.has_value("Grapefruit"));
	}

	#[test]
	fn positional_access() {
		let mut attribute = Attribute::new(["Apple", "Banana", "Grapefruit"]);
		assert!(attribute.exists(1));
		assert!(!attribute.exists(5));
		assert_eq!(attribute.get(1).unwrap(), "Banana");
		assert!(matches!(attribute.get(5), Err(Error::IndexOutOfRange(5))));

		attribute.set(1, "Blueberry");
		assert_eq!(attribute.get(1).unwrap(), "Blueberry");
	}

	#[test]
	fn sparse_positions() {
		let mut attribute = Attribute::default();
		attribute.set(2, "Grapefruit");
		assert!(!attribute.exists(0));
		assert!(attribute.exists(2));
		assert_eq!(attribute.value(), None, "Position 0 is vacant");
		assert_eq!(attribute.len(), 1);

		let mut attribute = Attribute::new(["Apple", "Banana", "Orange", "Grapefruit"]);
		attribute.unset(2);
		assert!(!attribute.exists(2));
		assert!(matches!(attribute.get(2), Err(Error::IndexOutOfRange(2))));
		assert_eq!(attribute.get(3).unwrap(), "Grapefruit", "Unset doesn't move later values");
		assert_eq!(strings(&attribute), ["Apple", "Banana", "Grapefruit"]);

		attribute.delete_value("Apple");
		assert_eq!(attribute.get(1).unwrap(), "Grapefruit", "Delete squeezes out vacancies");
		assert!(!attribute.exists(2));
	}

	#[test]
	fn to_vec_is_dense() {
		let mut attribute = Attribute::default();
		attribute.add_value("Apple").add_value("Banana").set(4, "Grapefruit");
		assert_eq!(
			attribute.to_vec(),
			[Value::from("Apple"), Value::from("Banana"), Value::from("Grapefruit")]
		);
		assert_eq!((&attribute).into_iter().count(), 3);
	}

	#[test]
	fn last_position() {
		let mut attribute = Attribute::default();
		attribute.set(usize::MAX, "Grapefruit");
		assert!(attribute.exists(usize::MAX));
		assert_eq!(attribute.get(usize::MAX).unwrap(), "Grapefruit");
		assert_eq!(attribute.len(), 1);
		assert_eq!(attribute.value(), None);

		attribute.add_value("Apple");
		assert_eq!(strings(&attribute), ["Grapefruit", "Apple"]);
		assert_eq!(attribute.get(0).unwrap(), "Grapefruit", "Appending past the end squeezes");
		assert_eq!(attribute.get(1).unwrap(), "Apple");

		attribute.unset(0).set(usize::MAX - 1, "Orange");
		attribute.add_value_if_not_exists("Orange").add_value("Kiwi");
		assert_eq!(strings(&attribute), ["Apple", "Orange", "Kiwi"]);
		assert!(attribute.exists(usize::MAX));
	}
}
