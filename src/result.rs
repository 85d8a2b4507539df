//! Iterating over search results as entities.
use crate::{
	directory::Cursor,
	entity::{Entity, EntitySnapshot},
	error::Error,
};

/// The entities found by a search.
///
/// Entries are fetched from the underlying [`Cursor`] one at a time and can
/// only be walked through once.
#[derive(Debug)]
pub struct ResultSet<C> {
	/// The raw search results
	cursor: C,
	/// Number of entries, once it has been asked for
	count: Option<usize>,
	/// Number of entities handed out so far
	position: usize,
}

impl<C: Cursor> ResultSet<C> {
	/// Wrap the raw results of a search
	pub fn new(cursor: C) -> Self {
		Self { cursor, count: None, position: 0 }
	}

	/// The total number of entries found by the search
	pub async fn count(&mut self) -> Result<usize, Error> {
		if let Some(count) = self.count {
			return Ok(count);
		}
		let count = self.cursor.count().await?;
		self.count = Some(count);
		Ok(count)
	}

	/// How many entities have been returned so far
	#[must_use]
	pub fn position(&self) -> usize {
		self.position
	}

	/// Fetch the next entity, or `None` once all have been returned
	pub async fn next_entity(&mut self) -> Result<Option<Entity>, Error> {
		let Some(entry) = self.cursor.next_entry().await? else {
			return Ok(None);
		};
		let entity = Entity::from_search(entry)?;
		self.position += 1;
		Ok(Some(entity))
	}

	/// Fetch all remaining entities
	pub async fn entities(&mut self) -> Result<Vec<Entity>, Error> {
		let mut entities = Vec::new();
		while let Some(entity) = self.next_entity().await? {
			entities.push(entity);
		}
		Ok(entities)
	}

	/// Fetch all remaining entities as plain data, e.g. for serializing
	pub async fn snapshot(&mut self) -> Result<Vec<EntitySnapshot>, Error> {
		Ok(self.entities().await?.iter().map(Entity::snapshot).collect())
	}

	/// Check that iteration is still at the start of the results. This never
	/// re-fetches anything: it succeeds only as a no-op before the first entity
	/// was fetched and fails with [`Error::Unsupported`] afterwards, since the
	/// cursor can't be restarted.
	pub fn rewind(&mut self) -> Result<(), Error> {
		if self.position > 0 {
			return Err(Error::Unsupported("Cannot rewind an LDAP result set".to_owned()));
		}
		Ok(())
	}
}
