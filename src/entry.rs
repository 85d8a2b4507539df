//! Loading entities from search results.
use std::collections::BTreeMap;

use ldap3::SearchEntry;
use tracing::debug;

use crate::{entity::Entity, error::Error, value::Value};

impl Entity {
	/// Converts a [`SearchEntry`] to a loaded [`Entity`], copying the DN and
	/// every value of both text and binary attributes.
	pub fn from_search(entry: SearchEntry) -> Result<Self, Error> {
		let mut values: BTreeMap<String, Vec<Value>> = BTreeMap::new();
		for (name, attr) in entry.attrs {
			values.entry(name).or_default().extend(attr.into_iter().map(Value::from));
		}
		for (name, attr) in entry.bin_attrs {
			values.entry(name).or_default().extend(attr.into_iter().map(Value::from));
		}

		let mut entity = Entity::new();
		entity.set_dn(entry.dn);
		for (name, attr) in values {
			entity.add_attribute(name, attr)?;
		}
		entity.set_loaded();

		debug!(dn = ?entity.dn(), attributes = entity.attributes().count(), "Loaded entity");
		Ok(entity)
	}
}
