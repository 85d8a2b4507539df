//! Connections to LDAP servers
use std::{fmt, time::Duration};

use async_trait::async_trait;
use ldap3::{LdapConnAsync, SearchEntry, SearchOptions, SearchResult};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
	config::Config,
	directory::{Directory, Entries},
	error::Error,
	query::SearchRequest,
};

/// Filter sent for queries without a condition
const MATCH_ALL: &str = "(objectClass=*)";

/// Result code for a search which found more entries than its size limit
/// allows. The entries up to the limit are still returned.
const SIZE_LIMIT_EXCEEDED: u32 = 4;

/// The filter to send for an assembled filter string
fn search_filter(filter: &str) -> &str {
	if filter.is_empty() {
		MATCH_ALL
	} else {
		filter
	}
}

/// Turn the result code of a finished search into an error unless entries
/// were returned
fn check_result(code: u32, message: String) -> Result<(), Error> {
	match code {
		0 | SIZE_LIMIT_EXCEEDED => Ok(()),
		_ => Err(Error::Search { code, message }),
	}
}

/// An open connection to an LDAP server
pub struct Connection {
	/// Handle to send operations through
	ldap: ldap3::Ldap,
	/// The background task driving the connection
	driver: JoinHandle<()>,
	/// The configuration the connection was opened with
	config: Config,
	/// Whether a bind has succeeded
	bound: bool,
}

impl fmt::Debug for Connection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Connection")
			.field("url", &self.config.url.as_str())
			.field("bound", &self.bound)
			.finish_non_exhaustive()
	}
}

impl Connection {
	/// Create a connection to an ldap server based on the settings and url
	/// specified in the configuration.
	pub async fn open(config: &Config) -> Result<Self, Error> {
		let settings = config.connection.to_settings().await?;
		let (conn, ldap) = LdapConnAsync::from_url_with_settings(settings, &config.url).await?;
		let driver = tokio::spawn(async move {
			if let Err(err) = conn.drive().await {
				warn!("Ldap connection error {err}");
			}
		});
		Ok(Self { ldap, driver, config: config.clone(), bound: false })
	}

	/// Open a connection and bind with the DN and password from the
	/// configuration
	pub async fn connect(config: &Config) -> Result<Self, Error> {
		let mut connection = Self::open(config).await?;
		connection.bind_configured().await?;
		Ok(connection)
	}

	/// Authenticate with a simple bind
	pub async fn bind(&mut self, dn: &str, password: &str) -> Result<(), Error> {
		self.ldap.simple_bind(dn, password).await?.success()?;
		self.bound = true;
		info!(dn, "Bound to {}", self.config.url);
		Ok(())
	}

	/// Bind with the DN and password from the configuration
	pub async fn bind_configured(&mut self) -> Result<(), Error> {
		let Config { bind_dn, bind_password, .. } = self.config.clone();
		self.bind(&bind_dn, &bind_password).await
	}

	/// Whether a bind has succeeded and the connection wasn't unbound since
	#[must_use]
	pub fn is_bound(&self) -> bool {
		self.bound
	}

	/// The underlying `ldap3` handle, e.g. for applying a
	/// [`crate::UnitOfWork`] with [`ldap3::Ldap::modify`]
	pub fn ldap_mut(&mut self) -> &mut ldap3::Ldap {
		&mut self.ldap
	}

	/// The time to wait for each operation
	fn operation_timeout(&self) -> Duration {
		self.config.connection.operation_timeout
	}

	/// End the session. The connection can't be used for further operations
	/// afterwards.
	pub async fn unbind(&mut self) -> Result<(), Error> {
		self.ldap.unbind().await?;
		self.bound = false;
		info!("Unbound from {}", self.config.url);
		Ok(())
	}

	/// End the session and wait for the connection to shut down. The
	/// background task is aborted if it doesn't stop within the operation
	/// timeout.
	pub async fn close(mut self) -> Result<(), Error> {
		if self.bound {
			self.unbind().await?;
		} else if let Err(err) = self.ldap.unbind().await {
			debug!("Unbind of unbound connection failed: {err}");
		}

		match tokio::time::timeout(self.operation_timeout(), &mut self.driver).await {
			Ok(Ok(())) => {}
			Ok(Err(err)) => warn!("Failed to join background task: {err}"),
			Err(_) => {
				warn!("Ldap connection did not shut down, aborting it");
				self.driver.abort();
			}
		}
		Ok(())
	}
}

#[async_trait]
impl Directory for Connection {
	type Cursor = Entries;

	async fn search(&mut self, request: &SearchRequest) -> Result<Entries, Error> {
		let options = SearchOptions::new()
			.deref(request.deref.into())
			.typesonly(request.attributes_only)
			.sizelimit(request.size_limit)
			.timelimit(request.time_limit);
		let filter = search_filter(&request.filter);
		let timeout = self.operation_timeout();

		let SearchResult(entries, result) = self
			.ldap
			.with_search_options(options)
			.with_timeout(timeout)
			.search(&request.base, request.scope.into(), filter, request.attributes.clone())
			.await?;

		check_result(result.rc, result.text)?;
		debug!(base = %request.base, filter, entries = entries.len(), "Search finished");

		Ok(Entries::from(entries.into_iter().map(SearchEntry::construct).collect::<Vec<_>>()))
	}
}

#[cfg(test)]
mod tests {
	#![allow(clippy::unwrap_used, clippy::expect_used)]

	use std::time::Duration;

	use tokio::net::TcpListener;
	use url::Url;

	use super::{check_result, search_filter, Connection};
	use crate::{
		config::{Config, ConnectionConfig},
		error::Error,
	};

	#[test]
	fn empty_filter_matches_everything() {
		assert_eq!(search_filter(""), "(objectClass=*)");
		assert_eq!(search_filter("(mail=*)"), "(mail=*)");
	}

	#[test]
	fn result_codes() {
		assert!(check_result(0, String::new()).is_ok());
		assert!(check_result(4, "Size limit exceeded".to_owned()).is_ok());

		let err = check_result(32, "No such object".to_owned()).err().unwrap();
		assert!(matches!(err, Error::Search { code: 32, ref message } if message == "No such object"));
	}

	#[tokio::test]
	async fn close_without_bind() -> Result<(), Box<dyn std::error::Error>> {
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let url = Url::parse(&format!("ldap://{}", listener.local_addr()?))?;
		let server = tokio::spawn(async move {
			let (socket, _) = listener.accept().await.expect("accept connection");
			tokio::time::sleep(Duration::from_secs(30)).await;
			drop(socket);
		});

		let config = Config {
			url,
			connection: ConnectionConfig {
				operation_timeout: Duration::from_secs(2),
				..ConnectionConfig::default()
			},
			bind_dn: String::new(),
			bind_password: String::new(),
		};
		let connection = Connection::open(&config).await?;
		assert!(!connection.is_bound());

		tokio::time::timeout(Duration::from_secs(5), connection.close())
			.await
			.expect("close() should return for an unbound connection")?;

		server.abort();
		Ok(())
	}
}
