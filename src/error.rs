//! Error codes

/// Errors that can occur when using this library
#[derive(thiserror::Error, Debug)]
pub enum Error {
	/// A query parameter was set to a value outside its valid range.
	#[error("{0}")]
	Configuration(String),
	/// The contents of a configuration file or attribute value did not conform
	/// to the expected syntax.
	#[error("Malformed data: {0}")]
	Invalid(String),
	/// An attribute was added to an entity which already holds it.
	#[error("Cannot add attribute {0}; attribute already exists")]
	AttributeExists(String),
	/// An attribute was deleted from an entity which doesn't hold it.
	#[error("Cannot delete attribute {0}; attribute does not exist")]
	NoSuchAttribute(String),
	/// The attribute name is reserved and can't be modified like a regular
	/// attribute.
	#[error("Cannot add attribute {0}; use the entity's DN instead")]
	InvalidAttribute(String),
	/// No attribute value exists at the given offset.
	#[error("No attribute value at offset {0}")]
	IndexOutOfRange(usize),
	/// A search was attempted without a base DN.
	#[error("empty base DN")]
	EmptyBase,
	/// The directory server reported a failed search.
	#[error("LDAP query failed: {message} (code {code})")]
	Search {
		/// The LDAP result code
		code: u32,
		/// The diagnostic message sent by the server
		message: String,
	},
	/// The operation can't be performed on this kind of object.
	#[error("Unsupported operation: {0}")]
	Unsupported(String),
	/// A time value was malformed and failed to parse.
	#[error("Malformed time")]
	Time(#[from] time::error::Parse),
	/// A time value could not be formatted.
	#[error("Unformattable time")]
	TimeFormat(#[from] time::error::Format),
	/// Reading a file, such as a TLS certificate, failed.
	#[error(transparent)]
	Io(#[from] std::io::Error),
	/// An underlying protocol error or similar occurred, or the LDAP library
	/// was used incorrectly.
	#[error(transparent)]
	Ldap(#[from] ldap3::LdapError),
}
