//! Computing the modifications needed to persist an edited entity.
use std::collections::HashSet;

use ldap3::Mod;
use tracing::debug;

use crate::{attribute::Attribute, entity::Entity, value::Value};

/// A change to a single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modification {
	/// Add values to an attribute, creating it if needed
	Add(String, Vec<Value>),
	/// Remove values from an attribute. Without any values, the whole
	/// attribute is removed.
	Delete(String, Vec<Value>),
	/// Set the values of an attribute, discarding all others
	Replace(String, Vec<Value>),
}

impl Modification {
	/// The name of the modified attribute
	#[must_use]
	pub fn attribute(&self) -> &str {
		match self {
			Modification::Add(name, _)
			| Modification::Delete(name, _)
			| Modification::Replace(name, _) => name,
		}
	}
}

impl From<Modification> for Mod<Vec<u8>> {
	fn from(modification: Modification) -> Self {
		/// Collect values into the set `ldap3` expects
		fn set(values: Vec<Value>) -> HashSet<Vec<u8>> {
			values.into_iter().map(Value::into_bytes).collect()
		}

		match modification {
			Modification::Add(name, values) => Mod::Add(name.into_bytes(), set(values)),
			Modification::Delete(name, values) => Mod::Delete(name.into_bytes(), set(values)),
			Modification::Replace(name, values) => Mod::Replace(name.into_bytes(), set(values)),
		}
	}
}

/// The modifications which bring a directory entry from the state it was
/// loaded in to the current state of an [`Entity`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitOfWork {
	/// The DN of the modified entry
	dn: Option<String>,
	/// Modifications in the order they should be applied
	modifications: Vec<Modification>,
}

impl UnitOfWork {
	/// The DN of the modified entry
	#[must_use]
	pub fn dn(&self) -> Option<&str> {
		self.dn.as_deref()
	}

	/// The modifications, in order
	#[must_use]
	pub fn modifications(&self) -> &[Modification] {
		&self.modifications
	}

	/// Whether the entity is unchanged
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.modifications.is_empty()
	}

	/// Convert into the modifications accepted by [`ldap3::Ldap::modify`]
	#[must_use]
	pub fn into_mods(self) -> Vec<Mod<Vec<u8>>> {
		self.modifications.into_iter().map(Mod::from).collect()
	}
}

/// Work out how a single pre-existing attribute changed
fn diff(name: &str, attribute: &Attribute) -> Option<Modification> {
	let original = attribute.original_values();
	let current = attribute.to_vec();

	let added: Vec<Value> = current.iter().filter(|v| !original.contains(*v)).cloned().collect();
	let removed: Vec<Value> = original.iter().filter(|v| !current.contains(*v)).cloned().collect();

	match (added.is_empty(), removed.is_empty()) {
		(true, true) => None,
		_ if current.is_empty() => Some(Modification::Delete(name.to_owned(), Vec::new())),
		(false, true) => Some(Modification::Add(name.to_owned(), added)),
		(true, false) => Some(Modification::Delete(name.to_owned(), removed)),
		(false, false) => Some(Modification::Replace(name.to_owned(), current)),
	}
}

impl Entity {
	/// Compute the unit of work for this entity.
	///
	/// Attributes deleted since loading are removed entirely, attributes added
	/// since loading are added with all their values, and for every other
	/// attribute the smallest of an add, delete or replace of values is chosen.
	/// An entity that was never loaded reports each of its attributes as added.
	#[must_use]
	pub fn changes(&self) -> UnitOfWork {
		let mut modifications: Vec<Modification> = self
			.deleted()
			.keys()
			.map(|name| Modification::Delete(name.clone(), Vec::new()))
			.collect();

		for (name, attribute) in self.attributes() {
			if !self.is_loaded() || self.is_added(name) {
				if !attribute.is_empty() {
					modifications.push(Modification::Add(name.to_owned(), attribute.to_vec()));
				}
			} else if let Some(modification) = diff(name, attribute) {
				modifications.push(modification);
			}
		}

		debug!(dn = ?self.dn(), modifications = modifications.len(), "Computed unit of work");
		UnitOfWork { dn: self.dn().map(str::to_owned), modifications }
	}
}
