//! The interface to whatever answers search requests.
//!
//! [`crate::Query`] doesn't talk to a server directly, it hands its
//! [`SearchRequest`] to a [`Directory`]. [`crate::Connection`] is the
//! implementation backed by a real LDAP server; tests can substitute their own.
use std::collections::VecDeque;

use async_trait::async_trait;
use ldap3::SearchEntry;

use crate::{error::Error, query::SearchRequest};

/// Something that can execute searches
#[async_trait]
pub trait Directory: Send {
	/// The raw results of a search
	type Cursor: Cursor;

	/// Execute a search. A server side failure is reported as
	/// [`Error::Search`] with the server's result code and message.
	async fn search(&mut self, request: &SearchRequest) -> Result<Self::Cursor, Error>;
}

/// Sequential access to the entries returned by a search
#[async_trait]
pub trait Cursor: Send {
	/// The total number of entries in the result. May require a round trip.
	async fn count(&mut self) -> Result<usize, Error>;

	/// Advance to the next entry
	async fn next_entry(&mut self) -> Result<Option<SearchEntry>, Error>;
}

/// A cursor over entries which have already been received in full
#[derive(Debug, Clone, Default)]
pub struct Entries {
	/// Number of entries in the complete result
	total: usize,
	/// Entries not yet handed out
	pending: VecDeque<SearchEntry>,
}

impl From<Vec<SearchEntry>> for Entries {
	fn from(entries: Vec<SearchEntry>) -> Self {
		Self { total: entries.len(), pending: entries.into() }
	}
}

#[async_trait]
impl Cursor for Entries {
	async fn count(&mut self) -> Result<usize, Error> {
		Ok(self.total)
	}

	async fn next_entry(&mut self) -> Result<Option<SearchEntry>, Error> {
		Ok(self.pending.pop_front())
	}
}
