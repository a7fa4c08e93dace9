//! Page metadata queries.
//!
//! The current page is represented as an HTML snapshot; [`MetaQuery`] locates
//! one `<meta>` element in it and reads one attribute. Lookups are performed
//! fresh by the caller on every request so a token rotated by the server
//! (e.g. after re-authentication) is picked up without any cache
//! invalidation.

// crates.io
use regex::Regex;

/// Element name the server-rendered layout uses for the CSRF token.
pub const CSRF_META_NAME: &str = "csrf-token";
/// Attribute carrying the token value on the metadata element.
pub const CONTENT_ATTRIBUTE: &str = "content";

const META_TAG_PATTERN: &str = r"(?is)<meta\b[^>]*>";
const NAME_ATTRIBUTE: &str = "name";

/// Identifies a single metadata element on the page by element name and
/// attribute.
///
/// When several elements carry the designated name, the first one in document
/// order wins; later duplicates are never consulted, even when the first
/// element's attribute is empty.
#[derive(Clone, Debug)]
pub struct MetaQuery {
	name: String,
	tag_re: Option<Regex>,
	name_re: Option<Regex>,
	value_re: Option<Regex>,
}
impl MetaQuery {
	/// Creates a query for an arbitrary metadata element and attribute.
	pub fn new(name: impl Into<String>, attribute: impl AsRef<str>) -> Self {
		Self {
			name: name.into(),
			tag_re: Regex::new(META_TAG_PATTERN).ok(),
			name_re: attribute_re(NAME_ATTRIBUTE),
			value_re: attribute_re(attribute.as_ref()),
		}
	}

	/// Returns the element name this query matches against.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Scans `html` for the designated element and returns its attribute value.
	///
	/// Returns `None` when the element is absent, when its attribute is
	/// missing or empty, or when the first matching element carries no usable
	/// value. Element and attribute names match case-insensitively; the value
	/// is returned verbatim. This lookup never fails.
	pub fn extract(&self, html: &str) -> Option<String> {
		let (Some(tag_re), Some(name_re), Some(value_re)) =
			(self.tag_re.as_ref(), self.name_re.as_ref(), self.value_re.as_ref())
		else {
			return None;
		};

		for tag in tag_re.find_iter(html) {
			let tag = tag.as_str();
			let Some(name) = capture(name_re, tag) else { continue };

			if !name.eq_ignore_ascii_case(&self.name) {
				continue;
			}

			// First element in document order wins.
			return match capture(value_re, tag) {
				Some(value) if !value.is_empty() => Some(value.to_owned()),
				_ => None,
			};
		}

		None
	}
}
impl Default for MetaQuery {
	fn default() -> Self {
		Self::new(CSRF_META_NAME, CONTENT_ATTRIBUTE)
	}
}

fn attribute_re(attribute: &str) -> Option<Regex> {
	// Requires a preceding delimiter so `data-name` never matches `name`.
	Regex::new(&format!(
		r#"(?i)[\s"']{}\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
		regex::escape(attribute)
	))
	.ok()
}

fn capture<'h>(re: &Regex, tag: &'h str) -> Option<&'h str> {
	let caps = re.captures(tag)?;

	caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const PAGE: &str = "<html><head>\
		<meta charset=\"utf-8\">\
		<meta name=\"csrf-token\" content=\"abc123\">\
		<title>App</title></head><body></body></html>";

	#[test]
	fn extract_reads_designated_element() {
		assert_eq!(MetaQuery::default().extract(PAGE).as_deref(), Some("abc123"));
	}

	#[test]
	fn extract_ignores_attribute_order() {
		let html = "<meta content=\"reversed\" name=\"csrf-token\">";

		assert_eq!(MetaQuery::default().extract(html).as_deref(), Some("reversed"));
	}

	#[test]
	fn extract_accepts_single_quotes_and_mixed_case() {
		let html = "<META NAME='CSRF-TOKEN' CONTENT='shouty'>";

		assert_eq!(MetaQuery::default().extract(html).as_deref(), Some("shouty"));
	}

	#[test]
	fn extract_first_match_wins() {
		let html = "<meta name=\"csrf-token\" content=\"first\">\
			<meta name=\"csrf-token\" content=\"second\">";

		assert_eq!(MetaQuery::default().extract(html).as_deref(), Some("first"));
	}

	#[test]
	fn extract_empty_first_match_yields_none() {
		let html = "<meta name=\"csrf-token\" content=\"\">\
			<meta name=\"csrf-token\" content=\"later\">";

		assert_eq!(MetaQuery::default().extract(html), None);
	}

	#[test]
	fn extract_missing_attribute_yields_none() {
		assert_eq!(MetaQuery::default().extract("<meta name=\"csrf-token\">"), None);
	}

	#[test]
	fn extract_absent_element_yields_none() {
		let html = "<html><head><meta charset=\"utf-8\"><title>App</title></head></html>";

		assert_eq!(MetaQuery::default().extract(html), None);
	}

	#[test]
	fn extract_ignores_other_meta_names() {
		let html = "<meta name=\"description\" content=\"not a token\">";

		assert_eq!(MetaQuery::default().extract(html), None);
	}

	#[test]
	fn custom_query_targets_other_elements() {
		let query = MetaQuery::new("api-token", "value");
		let html = "<meta name=\"csrf-token\" content=\"abc123\">\
			<meta name=\"api-token\" value=\"xyz789\">";

		assert_eq!(query.extract(html).as_deref(), Some("xyz789"));
		assert_eq!(query.name(), "api-token");
	}
}
