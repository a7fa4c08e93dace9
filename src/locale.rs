//! Localized string tables for the authentication and onboarding-wizard copy.
//!
//! Tables are opaque key/value data: keys are dotted (`auth.failed`,
//! `wizard.next`) and values are the final display strings, with any
//! `:placeholder` segments left for the rendering layer to substitute.
//! Interpolation, pluralization, and locale fallback all live in that
//! external renderer, not here.

// self
use crate::{_prelude::*, error::LocaleError};

const DE_TABLE: &str = include_str!("../locales/de.json");
const NL_TABLE: &str = include_str!("../locales/nl.json");

/// Languages shipped with the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
	/// German.
	De,
	/// Dutch.
	Nl,
}
impl Locale {
	/// Returns the BCP 47 language tag.
	pub const fn as_str(self) -> &'static str {
		match self {
			Locale::De => "de",
			Locale::Nl => "nl",
		}
	}

	/// Parses this locale's embedded string table.
	pub fn strings(self) -> Result<StringTable, LocaleError> {
		StringTable::from_json(match self {
			Locale::De => DE_TABLE,
			Locale::Nl => NL_TABLE,
		})
	}
}
impl Display for Locale {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Flat key/value table of display strings for one locale.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringTable(BTreeMap<String, String>);
impl StringTable {
	/// Parses a table from JSON, e.g. one shipped out-of-band with the page.
	pub fn from_json(raw: &str) -> Result<Self, LocaleError> {
		let mut deserializer = serde_json::Deserializer::from_str(raw);
		let table = serde_path_to_error::deserialize(&mut deserializer)?;

		Ok(table)
	}

	/// Looks up one display string.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Iterates entries in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn embedded_tables_parse() {
		let de = Locale::De.strings().expect("German table should parse.");
		let nl = Locale::Nl.strings().expect("Dutch table should parse.");

		assert_eq!(de.get("auth.failed").map(str::is_empty), Some(false));
		assert_eq!(nl.get("wizard.next"), Some("Volgende"));
	}

	#[test]
	fn locales_cover_the_same_keys() {
		let de = Locale::De.strings().expect("German table should parse.");
		let nl = Locale::Nl.strings().expect("Dutch table should parse.");
		let de_keys = de.iter().map(|(key, _)| key.to_owned()).collect::<Vec<_>>();
		let nl_keys = nl.iter().map(|(key, _)| key.to_owned()).collect::<Vec<_>>();

		assert_eq!(de_keys, nl_keys);
		assert!(!de_keys.is_empty());
	}

	#[test]
	fn tables_span_auth_and_wizard_surfaces() {
		let de = Locale::De.strings().expect("German table should parse.");

		for key in ["auth.login", "auth.throttle", "wizard.welcome", "wizard.finish"] {
			assert!(de.get(key).is_some(), "German table should contain `{key}`.");
		}
	}

	#[test]
	fn malformed_json_reports_the_failing_path() {
		let err = StringTable::from_json(r#"{"auth.login": 42}"#)
			.expect_err("Non-string values should be rejected.");
		let LocaleError::Parse(parse) = err;

		assert!(parse.path().to_string().contains("auth"));
	}

	#[test]
	fn locale_labels_are_stable() {
		assert_eq!(Locale::De.as_str(), "de");
		assert_eq!(format!("{}", Locale::Nl), "nl");
	}
}
