#![allow(
	clippy::expect_used,
	clippy::missing_docs_in_private_items,
	clippy::unwrap_used
)]
use std::collections::HashMap;

use async_trait::async_trait;
use ldap_entity::{
	condition::{all_of, any_of, equals, exists, greater_than, not_exists},
	Cursor, DerefPolicy, Directory, Entries, Error, Modification, Query, SearchEntry,
	SearchRequest, Value,
};

/// An in-memory directory recording the requests it receives
#[derive(Debug, Default)]
struct FakeDirectory {
	entries: Vec<SearchEntry>,
	failure: Option<(u32, String)>,
	requests: Vec<SearchRequest>,
}

#[async_trait]
impl Directory for FakeDirectory {
	type Cursor = Entries;

	async fn search(&mut self, request: &SearchRequest) -> Result<Entries, Error> {
		self.requests.push(request.clone());
		if let Some((code, message)) = self.failure.clone() {
			return Err(Error::Search { code, message });
		}
		Ok(Entries::from(self.entries.clone()))
	}
}

/// A cursor counting how often the entry count is requested
#[derive(Debug)]
struct CountingCursor {
	inner: Entries,
	count_calls: usize,
}

#[async_trait]
impl Cursor for CountingCursor {
	async fn count(&mut self) -> Result<usize, Error> {
		self.count_calls += 1;
		self.inner.count().await
	}

	async fn next_entry(&mut self) -> Result<Option<SearchEntry>, Error> {
		self.inner.next_entry().await
	}
}

fn person(uid: &str, cn: &str, mail: &[&str]) -> SearchEntry {
	SearchEntry {
		dn: format!("uid={uid},ou=people,dc=example,dc=com"),
		attrs: HashMap::from([
			("objectClass".to_owned(), vec!["inetOrgPerson".to_owned()]),
			("cn".to_owned(), vec![cn.to_owned()]),
			("mail".to_owned(), mail.iter().map(|m| (*m).to_owned()).collect()),
		]),
		bin_attrs: HashMap::new(),
	}
}

fn directory() -> FakeDirectory {
	FakeDirectory {
		entries: vec![
			person("jdoe", "John Doe", &["jdoe@example.com"]),
			person("asmith", "Alice Smith", &["asmith@example.com", "alice@example.com"]),
		],
		..FakeDirectory::default()
	}
}

#[tokio::test]
async fn execute_passes_assembled_request() -> Result<(), Error> {
	let mut directory = directory();
	Query::new()
		.search_base("ou=people,dc=example,dc=com")
		.attribute("cn", true)
		.attribute("jpegPhoto", false)
		.attribute("mail", true)
		.attributes_only(true)
		.dereference_finding()
		.filter(all_of([equals("objectClass", "inetOrgPerson"), exists("mail")]))
		.or_filter(greater_than("employeeNumber", "1000"))
		.limit(50)?
		.timeout(10)?
		.execute(&mut directory)
		.await?;

	let request = &directory.requests[0];
	assert_eq!(request.base, "ou=people,dc=example,dc=com");
	assert_eq!(
		request.filter,
		"(|(&(objectClass=inetOrgPerson)(mail=*))(!(employeeNumber<=1000)))"
	);
	assert_eq!(request.attributes, ["cn", "mail"]);
	assert!(request.attributes_only);
	assert_eq!(request.size_limit, 50);
	assert_eq!(request.time_limit, 10);
	assert_eq!(request.deref, DerefPolicy::Finding);

	Ok(())
}

#[tokio::test]
async fn empty_base_never_searches() {
	let mut directory = directory();
	let result = Query::new().filter(exists("mail")).execute(&mut directory).await;

	assert!(matches!(result, Err(Error::EmptyBase)));
	assert!(directory.requests.is_empty(), "No search should have been attempted");
}

#[tokio::test]
async fn search_failure_is_reported_verbatim() {
	let mut directory = FakeDirectory {
		failure: Some((32, "No such object".to_owned())),
		..FakeDirectory::default()
	};
	let err = Query::new()
		.search_base("ou=nowhere,dc=example,dc=com")
		.execute(&mut directory)
		.await
		.err()
		.unwrap();

	assert!(matches!(err, Error::Search { code: 32, ref message } if message == "No such object"));
	assert_eq!(err.to_string(), "LDAP query failed: No such object (code 32)");
}

#[tokio::test]
async fn results_are_loaded_entities() -> Result<(), Error> {
	let mut directory = directory();
	let mut results = Query::new()
		.search_base("ou=people,dc=example,dc=com")
		.filter(any_of([exists("mail"), not_exists("uid")]))
		.execute(&mut directory)
		.await?;

	assert_eq!(results.count().await?, 2);
	assert_eq!(results.position(), 0);

	let mut john = results.next_entity().await?.expect("first entity");
	assert_eq!(john.dn(), Some("uid=jdoe,ou=people,dc=example,dc=com"));
	assert!(john.is_loaded());
	assert_eq!(results.position(), 1);

	john.get_mut("mail").unwrap().add_value("john@example.com");
	john.add_attribute("title", ["Engineer"])?;
	assert_eq!(
		john.changes().modifications(),
		[
			Modification::Add("mail".to_owned(), vec![Value::from("john@example.com")]),
			Modification::Add("title".to_owned(), vec![Value::from("Engineer")]),
		]
	);

	let alice = results.next_entity().await?.expect("second entity");
	assert_eq!(alice.get("mail").unwrap().len(), 2);
	assert!(alice.changes().is_empty());

	assert!(results.next_entity().await?.is_none());
	assert_eq!(results.count().await?, 2, "Count stays available after the last entry");

	Ok(())
}

#[tokio::test]
async fn result_set_is_single_pass() -> Result<(), Error> {
	let mut directory = directory();
	let mut results = Query::new()
		.search_base("ou=people,dc=example,dc=com")
		.execute(&mut directory)
		.await?;

	results.rewind()?;
	let snapshot = results.snapshot().await?;
	assert_eq!(snapshot.len(), 2);
	assert_eq!(snapshot[1].attributes["cn"], [Value::from("Alice Smith")]);

	assert!(matches!(results.rewind(), Err(Error::Unsupported(_))));
	assert!(results.snapshot().await?.is_empty(), "Nothing is left after the first pass");

	Ok(())
}

#[tokio::test]
async fn count_is_fetched_once() -> Result<(), Error> {
	let cursor = CountingCursor {
		inner: Entries::from(vec![person("jdoe", "John Doe", &[])]),
		count_calls: 0,
	};
	let mut results = ldap_entity::ResultSet::new(cursor);

	assert_eq!(results.count().await?, 1);
	assert_eq!(results.count().await?, 1);
	assert_eq!(results.entities().await?.len(), 1);
	assert_eq!(results.count().await?, 1);

	let snapshot = format!("{results:?}");
	assert!(snapshot.contains("count_calls: 1"), "Count should be cached: {snapshot}");

	Ok(())
}
