//! Search an LDAP directory and edit its entries as change-tracked entities.
//!
//! Searches are described with a [`Query`], whose filter is assembled from a
//! tree of [`Condition`]s built with the functions in [`condition`]. Executing
//! the query against a [`Directory`], usually a [`Connection`], yields a
//! [`ResultSet`] of [`Entity`] values. An entity remembers what it looked like
//! when it was loaded, so once it has been edited [`Entity::changes`] works out
//! the modifications needed to store the edits in the directory.
//!
//! For a general primer on LDAP, the [introduction] in the `ldap3` crate which
//! is used here for interfacing with LDAP is an excellent resource. The site
//! "firstyear's blog-a-log" also has [a guide][firstyear] which is more
//! visually oriented and goes into more detail about searching
//!
//! [introduction]: https://github.com/inejge/ldap3/blob/master/LDAP-primer.md
//! [firstyear]: https://fy.blackhats.net.au/blog/html/pages/ldap_guide_part_1_foundations.html
//!
//! # Getting started
//! A minimal example might look like so:
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use url::Url;
//! use ldap_entity::{
//!     condition::{equals, exists},
//!     Config, Connection, ConnectionConfig, Query,
//! };
//!
//! // Configuration can also be deserialized with serde. It's hand-constructed
//! // here for demonstration purposes.
//! let config = Config {
//!     url: Url::parse("ldap://localhost")?,
//!     connection: ConnectionConfig::default(),
//!     bind_dn: "cn=admin,dc=example,dc=com".to_owned(),
//!     bind_password: "verysecret".to_owned(),
//! };
//! let mut connection = Connection::connect(&config).await?;
//!
//! let mut results = Query::new()
//!     .search_base("ou=people,dc=example,dc=com")
//!     .filter(equals("objectClass", "inetOrgPerson"))
//!     .and_filter(exists("mail"))
//!     .limit(100)?
//!     .execute(&mut connection)
//!     .await?;
//!
//! while let Some(mut entity) = results.next_entity().await? {
//!     entity.set("title", ["Engineer"])?;
//!     println!("{:?}: {:?}", entity.dn(), entity.changes().modifications());
//! }
//!
//! connection.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Limitations
//! * Entities only compute the modifications to make; sending them with
//!   [`ldap3::Ldap::modify`] is left to the caller, see
//!   [`UnitOfWork::into_mods`].
//! * Search results are received in full before the first entity is handed
//!   out. Controls such as [simple paged results] aren't used.
//! * Attribute names are compared case-sensitively, while LDAP treats them
//!   case-insensitively.
//!
//! [simple paged results]: https://www.rfc-editor.org/rfc/rfc2696.html

pub mod attribute;
pub mod changes;
pub mod condition;
pub mod config;
pub mod connection;
pub mod directory;
pub mod entity;
mod entry;
pub mod error;
pub mod query;
pub mod result;
pub mod value;

pub use ldap3::{self, SearchEntry};

pub use crate::{
	attribute::Attribute,
	changes::{Modification, UnitOfWork},
	condition::Condition,
	config::{Config, ConnectionConfig, TLSConfig},
	connection::Connection,
	directory::{Cursor, Directory, Entries},
	entity::{Entity, EntitySnapshot},
	error::Error,
	query::{DerefPolicy, Query, SearchRequest, SearchScope},
	result::ResultSet,
	value::Value,
};
