//! Composable search conditions which assemble into LDAP filter strings.
//!
//! Conditions are built from the free functions in this module and combined
//! into trees:
//! ```
//! use ldap_entity::condition::{all_of, equals, exists, not_exists};
//!
//! let condition = all_of([
//! 	equals("objectClass", "inetOrgPerson"),
//! 	exists("mail"),
//! 	not_exists("nsAccountLock"),
//! ]);
//! assert_eq!(
//! 	condition.assemble(),
//! 	"(&(objectClass=inetOrgPerson)(mail=*)(!(nsAccountLock=*)))"
//! );
//! ```
//!
//! RFC 4511 has no strict inequality, no negated presence and no negated
//! approximate match, so [`greater_than`], [`less_than`], [`not_exists`] and
//! [`not_like`] are expressed as negations of the operators it does define.
use std::fmt;

/// Characters with a special meaning in filter strings and their escaped
/// forms. Only a doubled `*` is escaped.
const ESCAPES: &[(&str, &str)] = &[
	("&", "\\26"),
	("(", "\\28"),
	(")", "\\29"),
	("|", "\\7c"),
	("=", "\\3d"),
	(">", "\\3e"),
	("<", "\\3c"),
	("~", "\\7e"),
	("**", "\\2a"),
	("/", "\\2f"),
	("\\", "\\5c"),
];

/// Escape the characters of a criteria string which would otherwise be
/// interpreted as filter syntax.
///
/// The input is scanned once from left to right and replacements are never
/// rescanned. A lone `*` is left alone so that substring wildcards keep
/// working.
#[must_use]
pub fn escape(criteria: &str) -> String {
	let mut escaped = String::with_capacity(criteria.len());
	let mut rest = criteria;
	'scan: while let Some(c) = rest.chars().next() {
		for (from, to) in ESCAPES {
			if rest.starts_with(from) {
				escaped.push_str(to);
				rest = &rest[from.len()..];
				continue 'scan;
			}
		}
		escaped.push(c);
		rest = &rest[c.len_utf8()..];
	}
	escaped
}

/// Comparison operators supported in filter items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
	/// `=`
	Equal,
	/// `>=`
	GreaterOrEqual,
	/// `<=`
	LessOrEqual,
	/// `~=`, approximate match
	Approximate,
}

impl Operator {
	/// The operator as written in a filter
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Operator::Equal => "=",
			Operator::GreaterOrEqual => ">=",
			Operator::LessOrEqual => "<=",
			Operator::Approximate => "~=",
		}
	}
}

/// A node of a search condition tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
	/// Compare an attribute's values against a criteria
	Comparison {
		/// Attribute name
		attribute: String,
		/// How to compare
		operator: Operator,
		/// The unescaped value to compare against
		criteria: String,
	},
	/// Match entries which hold the attribute at all
	Present {
		/// Attribute name
		attribute: String,
	},
	/// Invert the contained condition
	Not(Box<Condition>),
	/// Match entries that match every contained condition
	And(Vec<Condition>),
	/// Match entries that match any contained condition
	Or(Vec<Condition>),
}

impl Condition {
	/// Assemble the condition into a filter string.
	///
	/// A conjunction or disjunction without any children assembles into an
	/// empty string rather than `(&)` or `(|)`.
	#[must_use]
	pub fn assemble(&self) -> String {
		match self {
			Condition::Comparison { attribute, operator, criteria } => {
				format!("({attribute}{}{})", operator.as_str(), escape(criteria))
			}
			Condition::Present { attribute } => format!("({attribute}=*)"),
			Condition::Not(condition) => format!("(!{})", condition.assemble()),
			Condition::And(conditions) => assemble_list('&', conditions),
			Condition::Or(conditions) => assemble_list('|', conditions),
		}
	}

	/// Conjoin this condition with another
	#[must_use]
	pub fn and(self, other: Condition) -> Condition {
		Condition::And(vec![self, other])
	}

	/// Disjoin this condition with another
	#[must_use]
	pub fn or(self, other: Condition) -> Condition {
		Condition::Or(vec![self, other])
	}
}

/// Assemble the children of a logical operator
fn assemble_list(operator: char, conditions: &[Condition]) -> String {
	let assembled: String = conditions.iter().map(Condition::assemble).collect();
	if assembled.is_empty() {
		return assembled;
	}
	format!("({operator}{assembled})")
}

impl fmt::Display for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.assemble())
	}
}

/// Build a comparison node
fn comparison(
	attribute: impl Into<String>,
	operator: Operator,
	criteria: impl Into<String>,
) -> Condition {
	Condition::Comparison { attribute: attribute.into(), operator, criteria: criteria.into() }
}

/// Match entries that match all of the conditions
pub fn all_of(conditions: impl IntoIterator<Item = Condition>) -> Condition {
	Condition::And(conditions.into_iter().collect())
}

/// Match entries that match any of the conditions
pub fn any_of(conditions: impl IntoIterator<Item = Condition>) -> Condition {
	Condition::Or(conditions.into_iter().collect())
}

/// Negate a condition
#[must_use]
pub fn not(condition: Condition) -> Condition {
	Condition::Not(Box::new(condition))
}

/// `attribute=criteria`
pub fn equals(attribute: impl Into<String>, criteria: impl Into<String>) -> Condition {
	comparison(attribute, Operator::Equal, criteria)
}

/// `!(attribute=criteria)`
pub fn not_equals(attribute: impl Into<String>, criteria: impl Into<String>) -> Condition {
	not(equals(attribute, criteria))
}

/// `attribute=*`
pub fn exists(attribute: impl Into<String>) -> Condition {
	Condition::Present { attribute: attribute.into() }
}

/// `!(attribute=*)`
pub fn not_exists(attribute: impl Into<String>) -> Condition {
	not(exists(attribute))
}

/// Strictly greater than, the negation of `attribute<=criteria`
pub fn greater_than(attribute: impl Into<String>, criteria: impl Into<String>) -> Condition {
	not(less_than_or_equals(attribute, criteria))
}

/// `attribute>=criteria`
pub fn greater_than_or_equals(
	attribute: impl Into<String>,
	criteria: impl Into<String>,
) -> Condition {
	comparison(attribute, Operator::GreaterOrEqual, criteria)
}

/// Strictly less than, the negation of `attribute>=criteria`
pub fn less_than(attribute: impl Into<String>, criteria: impl Into<String>) -> Condition {
	not(greater_than_or_equals(attribute, criteria))
}

/// `attribute<=criteria`
pub fn less_than_or_equals(
	attribute: impl Into<String>,
	criteria: impl Into<String>,
) -> Condition {
	comparison(attribute, Operator::LessOrEqual, criteria)
}

/// `attribute~=criteria`
pub fn like(attribute: impl Into<String>, criteria: impl Into<String>) -> Condition {
	comparison(attribute, Operator::Approximate, criteria)
}

/// `!(attribute~=criteria)`
pub fn not_like(attribute: impl Into<String>, criteria: impl Into<String>) -> Condition {
	not(like(attribute, criteria))
}
