//! Directory entries with change tracking.
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{attribute::Attribute, error::Error, value::Value};

/// A directory entry: a DN and a set of named attributes.
///
/// An entity starts out "under construction", where attributes can be added
/// and removed freely without any record being kept. Once
/// [`Entity::set_loaded`] is called, the entity is taken to mirror what is
/// stored in the directory and every later addition or deletion of an
/// attribute is remembered, so that [`Entity::changes`] can work out which
/// modifications would bring the directory up to date.
#[derive(Debug, Clone, Default)]
pub struct Entity {
	/// The distinguished name of the entry
	dn: Option<String>,
	/// Current attributes
	attributes: BTreeMap<String, Attribute>,
	/// Names of attributes added since the entity was loaded
	added: BTreeSet<String>,
	/// Attributes deleted since the entity was loaded
	deleted: BTreeMap<String, Attribute>,
	/// Whether changes are being tracked
	loaded: bool,
}

/// A plain copy of an entity's DN and attribute values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
	/// The distinguished name of the entry
	pub dn: Option<String>,
	/// Attribute values by attribute name
	pub attributes: BTreeMap<String, Vec<Value>>,
}

/// The DN is not an attribute, but readers of LDIF and similar might expect it
/// to be one.
fn check_name(attribute: &str) -> Result<(), Error> {
	if attribute.eq_ignore_ascii_case("dn") {
		return Err(Error::InvalidAttribute(attribute.to_owned()));
	}
	Ok(())
}

impl Entity {
	/// Create an empty entity
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// The distinguished name of the entity, if one was set
	#[must_use]
	pub fn dn(&self) -> Option<&str> {
		self.dn.as_deref()
	}

	/// Set the distinguished name of the entity
	pub fn set_dn(&mut self, dn: impl Into<String>) -> &mut Self {
		self.dn = Some(dn.into());
		self
	}

	/// Add a new attribute.
	///
	/// Fails if the attribute already exists; use
	/// [`Entity::replace_attribute`] to change the values of an existing
	/// attribute. Adding an attribute which was deleted after loading brings
	/// it back with the new values.
	pub fn add_attribute<I, V>(
		&mut self,
		attribute: impl Into<String>,
		values: I,
	) -> Result<&mut Self, Error>
	where
		I: IntoIterator<Item = V>,
		V: Into<Value>,
	{
		let attribute = attribute.into();
		check_name(&attribute)?;

		if let Some(previous) = self.deleted.remove(&attribute) {
			self.attributes.insert(attribute.clone(), previous);
			return self.replace_attribute(attribute, values);
		}
		if self.attributes.contains_key(&attribute) {
			return Err(Error::AttributeExists(attribute));
		}

		self.attributes.insert(attribute.clone(), Attribute::new(values));
		if self.loaded {
			self.added.insert(attribute);
		}
		Ok(self)
	}

	/// Remove an attribute and all of its values
	pub fn delete_attribute(&mut self, attribute: &str) -> Result<&mut Self, Error> {
		let removed = self
			.attributes
			.remove(attribute)
			.ok_or_else(|| Error::NoSuchAttribute(attribute.to_owned()))?;

		// Attributes added since loading never reached the directory
		if !self.added.remove(attribute) && self.loaded {
			self.deleted.insert(attribute.to_owned(), removed);
		}
		Ok(self)
	}

	/// Replace the values of an attribute, adding the attribute if it doesn't
	/// exist yet.
	///
	/// Values which the attribute already holds keep their position, new
	/// values are appended and values not in `values` are removed.
	pub fn replace_attribute<I, V>(
		&mut self,
		attribute: impl Into<String>,
		values: I,
	) -> Result<&mut Self, Error>
	where
		I: IntoIterator<Item = V>,
		V: Into<Value>,
	{
		let attribute = attribute.into();
		check_name(&attribute)?;
		let values: Vec<Value> = values.into_iter().map(Into::into).collect();

		if let Some(previous) = self.deleted.remove(&attribute) {
			self.attributes.insert(attribute.clone(), previous);
		}

		match self.attributes.get_mut(&attribute) {
			Some(existing) => {
				for value in &values {
					existing.add_value_if_not_exists(value);
				}
				let stale: Vec<Value> =
					existing.iter().filter(|old| !values.contains(*old)).cloned().collect();
				for value in stale {
					existing.delete_value(value);
				}
			}
			None => {
				self.attributes.insert(attribute.clone(), Attribute::new(values));
				if self.loaded {
					self.added.insert(attribute);
				}
			}
		}
		Ok(self)
	}

	/// Get an attribute
	#[must_use]
	pub fn get(&self, attribute: &str) -> Option<&Attribute> {
		self.attributes.get(attribute)
	}

	/// Get an attribute for modifying its values
	pub fn get_mut(&mut self, attribute: &str) -> Option<&mut Attribute> {
		self.attributes.get_mut(attribute)
	}

	/// Get an attribute, adding it without any values if it doesn't exist.
	/// On a loaded entity the new attribute counts as added.
	pub fn get_or_create(&mut self, attribute: &str) -> Result<&mut Attribute, Error> {
		if !self.attributes.contains_key(attribute) {
			self.add_attribute(attribute, Vec::<Value>::new())?;
		}
		self.attributes
			.get_mut(attribute)
			.ok_or_else(|| Error::NoSuchAttribute(attribute.to_owned()))
	}

	/// Set the values of an attribute, see [`Entity::replace_attribute`]
	pub fn set<I, V>(&mut self, attribute: impl Into<String>, values: I) -> Result<&mut Self, Error>
	where
		I: IntoIterator<Item = V>,
		V: Into<Value>,
	{
		self.replace_attribute(attribute, values)
	}

	/// Whether the entity currently has the attribute
	#[must_use]
	pub fn contains(&self, attribute: &str) -> bool {
		self.attributes.contains_key(attribute)
	}

	/// Iterate over the current attributes by name
	pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> + '_ {
		self.attributes.iter().map(|(name, attribute)| (name.as_str(), attribute))
	}

	/// Names of the attributes added since the entity was loaded
	pub fn added_attributes(&self) -> impl Iterator<Item = &str> + '_ {
		self.added.iter().map(String::as_str)
	}

	/// Names of the attributes deleted since the entity was loaded
	pub fn deleted_attributes(&self) -> impl Iterator<Item = &str> + '_ {
		self.deleted.keys().map(String::as_str)
	}

	/// Start tracking changes. Called once all attributes stored in the
	/// directory have been added.
	pub fn set_loaded(&mut self) -> &mut Self {
		self.loaded = true;
		self
	}

	/// Whether changes are being tracked
	#[must_use]
	pub fn is_loaded(&self) -> bool {
		self.loaded
	}

	/// All attributes with their values
	#[must_use]
	pub fn to_map(&self) -> BTreeMap<String, Vec<Value>> {
		self.attributes.iter().map(|(name, attribute)| (name.clone(), attribute.to_vec())).collect()
	}

	/// Copy the DN and all attribute values
	#[must_use]
	pub fn snapshot(&self) -> EntitySnapshot {
		EntitySnapshot { dn: self.dn.clone(), attributes: self.to_map() }
	}

	/// Attributes deleted since loading, with the values they were loaded with
	pub(crate) fn deleted(&self) -> &BTreeMap<String, Attribute> {
		&self.deleted
	}

	/// Whether the attribute was added since loading
	pub(crate) fn is_added(&self, attribute: &str) -> bool {
		self.added.contains(attribute)
	}
}
