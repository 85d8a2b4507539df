use std::error::Error;

use ldap_entity::{Config, ConnectionConfig};
use url::Url;

/// Base DN of the test directory
pub const BASE_DN: &str = "dc=example,dc=org";

/// Configuration for the directory started by docker compose
pub fn test_config() -> Config {
	Config {
		url: Url::parse("ldap://localhost:1389").unwrap(),
		connection: ConnectionConfig::default(),
		bind_dn: format!("cn=admin,{BASE_DN}"),
		bind_password: "adminpassword".to_owned(),
	}
}

pub fn people_dn(ou: &str) -> String {
	format!("ou={ou},{BASE_DN}")
}

pub async fn ldap_add_organizational_unit(
	ldap: &mut ldap3::Ldap,
	ou: &str,
) -> Result<(), Box<dyn Error>> {
	ldap.add(&people_dn(ou), vec![("objectClass", ["organizationalUnit"].into())])
		.await?
		.success()?;
	Ok(())
}

/// Delete an organizational unit along with the users created in it
pub async fn ldap_delete_organizational_unit(
	ldap: &mut ldap3::Ldap,
	ou: &str,
	users: &[&str],
) -> Result<(), Box<dyn Error>> {
	for cn in users {
		ldap.delete(&format!("cn={cn},{}", people_dn(ou))).await?.success()?;
	}
	ldap.delete(&people_dn(ou)).await?.success()?;
	Ok(())
}

pub async fn ldap_add_user(
	ldap: &mut ldap3::Ldap,
	ou: &str,
	cn: &str,
	sn: &str,
	mail: &str,
) -> Result<(), Box<dyn Error>> {
	ldap.add(
		&format!("cn={cn},{}", people_dn(ou)),
		vec![
			("objectClass", ["inetOrgPerson"].into()),
			("sn", [sn].into()),
			("mail", [mail].into()),
		],
	)
	.await?
	.success()?;
	Ok(())
}
