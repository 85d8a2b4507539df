//! Building and executing searches.
use ldap3::{DerefAliases, Scope};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
	condition::Condition,
	directory::Directory,
	error::Error,
	result::ResultSet,
};

/// When the server should follow alias entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerefPolicy {
	/// Never dereference aliases
	#[default]
	Never,
	/// Dereference aliases found below the base object, but not the base
	/// object itself
	Searching,
	/// Dereference the base object, but not aliases found below it
	Finding,
	/// Always dereference aliases
	Always,
}

impl From<DerefPolicy> for DerefAliases {
	fn from(policy: DerefPolicy) -> Self {
		match policy {
			DerefPolicy::Never => DerefAliases::Never,
			DerefPolicy::Searching => DerefAliases::Searching,
			DerefPolicy::Finding => DerefAliases::Finding,
			DerefPolicy::Always => DerefAliases::Always,
		}
	}
}

/// How much of the tree below the base DN to search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
	/// Only the base object
	Base,
	/// The immediate children of the base object
	OneLevel,
	/// The base object and everything below it
	#[default]
	Subtree,
}

impl From<SearchScope> for Scope {
	fn from(scope: SearchScope) -> Self {
		match scope {
			SearchScope::Base => Scope::Base,
			SearchScope::OneLevel => Scope::OneLevel,
			SearchScope::Subtree => Scope::Subtree,
		}
	}
}

/// The assembled parameters of a search, as handed to a [`Directory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
	/// The DN to search from
	pub base: String,
	/// The filter string. Empty if every entry should match.
	pub filter: String,
	/// Attributes to return. Empty to return all user attributes.
	pub attributes: Vec<String>,
	/// Return only attribute names, without values
	pub attributes_only: bool,
	/// Maximum number of entries, 0 for no limit
	pub size_limit: i32,
	/// Maximum number of seconds to spend searching, 0 for no limit
	pub time_limit: i32,
	/// Alias dereferencing
	pub deref: DerefPolicy,
	/// Search scope
	pub scope: SearchScope,
}

/// A search under construction.
///
/// ```
/// use ldap_entity::{condition::{equals, exists}, Query};
///
/// let query = Query::new()
/// 	.search_base("ou=people,dc=example,dc=com")
/// 	.attribute("cn", true)
/// 	.attribute("mail", true)
/// 	.filter(exists("mail"))
/// 	.and_filter(equals("sn", "Patterson"))
/// 	.limit(10)?;
///
/// let request = query.request()?;
/// assert_eq!(request.filter, "(&(mail=*)(sn=Patterson))");
/// assert_eq!(request.attributes, ["cn", "mail"]);
/// # Ok::<(), ldap_entity::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
	/// Search base DN
	base: String,
	/// Requested attributes and whether they're required, in insertion order
	attributes: Vec<(String, bool)>,
	/// Whether to return attribute names only
	attributes_only: bool,
	/// Maximum number of entries
	size_limit: i32,
	/// Maximum number of seconds
	time_limit: i32,
	/// Alias dereferencing
	deref: DerefPolicy,
	/// Search scope
	scope: SearchScope,
	/// Filter condition, `None` to match everything
	condition: Option<Condition>,
}

impl Query {
	/// Start a new query
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the DN to search from
	#[must_use]
	pub fn search_base(mut self, base: impl Into<String>) -> Self {
		self.base = base.into();
		self
	}

	/// Set whether an attribute should be returned in the results. Only
	/// attributes set as required are requested from the server.
	#[must_use]
	pub fn attribute(mut self, attribute: impl Into<String>, required: bool) -> Self {
		let attribute = attribute.into();
		match self.attributes.iter_mut().find(|(name, _)| *name == attribute) {
			Some((_, existing)) => *existing = required,
			None => self.attributes.push((attribute, required)),
		}
		self
	}

	/// Set whether to return only attribute names instead of names and values
	#[must_use]
	pub fn attributes_only(mut self, attributes_only: bool) -> Self {
		self.attributes_only = attributes_only;
		self
	}

	/// Set the maximum number of entries to fetch, 0 for no limit
	pub fn limit(mut self, limit: i32) -> Result<Self, Error> {
		if limit < 0 {
			return Err(Error::Configuration(format!(
				"Invalid value {limit} for LDAP query limit; value must be at least zero"
			)));
		}
		self.size_limit = limit;
		Ok(self)
	}

	/// Set the maximum number of seconds to spend searching, 0 for no limit
	pub fn timeout(mut self, timeout: i32) -> Result<Self, Error> {
		if timeout < 0 {
			return Err(Error::Configuration(format!(
				"Invalid value {timeout} for LDAP query timeout; value must be at least zero"
			)));
		}
		self.time_limit = timeout;
		Ok(self)
	}

	/// Set how much of the tree to search
	#[must_use]
	pub fn scope(mut self, scope: SearchScope) -> Self {
		self.scope = scope;
		self
	}

	/// Set the alias dereferencing policy
	#[must_use]
	pub fn dereference(mut self, policy: DerefPolicy) -> Self {
		self.deref = policy;
		self
	}

	/// Never dereference aliases
	#[must_use]
	pub fn dereference_never(self) -> Self {
		self.dereference(DerefPolicy::Never)
	}

	/// Dereference aliases during the search but not when locating the base
	/// object
	#[must_use]
	pub fn dereference_searching(self) -> Self {
		self.dereference(DerefPolicy::Searching)
	}

	/// Dereference aliases when locating the base object but not during the
	/// search
	#[must_use]
	pub fn dereference_finding(self) -> Self {
		self.dereference(DerefPolicy::Finding)
	}

	/// Always dereference aliases
	#[must_use]
	pub fn dereference_always(self) -> Self {
		self.dereference(DerefPolicy::Always)
	}

	/// Replace the query condition
	#[must_use]
	pub fn filter(mut self, condition: Condition) -> Self {
		self.condition = Some(condition);
		self
	}

	/// Conjoin a condition with the current one. Without a current condition
	/// this is the same as [`Query::filter`].
	#[must_use]
	pub fn and_filter(mut self, condition: Condition) -> Self {
		self.condition = Some(match self.condition.take() {
			Some(current) => current.and(condition),
			None => condition,
		});
		self
	}

	/// Disjoin a condition with the current one. Without a current condition
	/// this is the same as [`Query::filter`].
	#[must_use]
	pub fn or_filter(mut self, condition: Condition) -> Self {
		self.condition = Some(match self.condition.take() {
			Some(current) => current.or(condition),
			None => condition,
		});
		self
	}

	/// The current condition
	#[must_use]
	pub fn condition(&self) -> Option<&Condition> {
		self.condition.as_ref()
	}

	/// Assemble the search parameters
	pub fn request(&self) -> Result<SearchRequest, Error> {
		if self.base.is_empty() {
			return Err(Error::EmptyBase);
		}

		Ok(SearchRequest {
			base: self.base.clone(),
			filter: self.condition.as_ref().map(Condition::assemble).unwrap_or_default(),
			attributes: self
				.attributes
				.iter()
				.filter(|(_, required)| *required)
				.map(|(name, _)| name.clone())
				.collect(),
			attributes_only: self.attributes_only,
			size_limit: self.size_limit,
			time_limit: self.time_limit,
			deref: self.deref,
			scope: self.scope,
		})
	}

	/// Run the search against a directory
	pub async fn execute<D: Directory>(
		&self,
		directory: &mut D,
	) -> Result<ResultSet<D::Cursor>, Error> {
		let request = self.request()?;
		debug!(
			base = %request.base,
			filter = %request.filter,
			attributes = ?request.attributes,
			"Searching directory"
		);
		let cursor = directory.search(&request).await?;
		Ok(ResultSet::new(cursor))
	}
}
