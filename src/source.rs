//! Token acquisition seam between the page and the request pipeline.
//!
//! A [`TokenSource`] answers one question per outgoing request: what is the
//! CSRF token embedded in the page *right now*? Absence is a valid answer,
//! not an error, and implementations are consulted fresh on every request so
//! the pipeline never observes a stale token.

// self
use crate::{_prelude::*, page::MetaQuery};

/// Opaque CSRF token read from the page, kept out of logs.
///
/// The token is produced by the server when the page is rendered and echoed
/// back verbatim; this type never inspects or normalizes it beyond rejecting
/// the empty string, which the pipeline treats as "no token available".
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);
impl CsrfToken {
	/// Wraps a token value; the empty string yields `None`.
	pub fn new(value: impl Into<String>) -> Option<Self> {
		let value = value.into();

		if value.is_empty() { None } else { Some(Self(value)) }
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for CsrfToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for CsrfToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CsrfToken").field(&"<redacted>").finish()
	}
}
impl Display for CsrfToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Strategy that produces the token currently embedded in the page.
///
/// Queried once per outgoing request, synchronously. `None` means the request
/// goes out without the token header; nothing at this seam may fail or block.
pub trait TokenSource
where
	Self: Send + Sync,
{
	/// Returns the token currently available to the page, if any.
	fn csrf_token(&self) -> Option<CsrfToken>;
}
impl<F> TokenSource for F
where
	F: Fn() -> Option<CsrfToken> + Send + Sync,
{
	fn csrf_token(&self) -> Option<CsrfToken> {
		self()
	}
}

/// Reads the token out of the current page snapshot on every call.
///
/// The provider closure hands back the page HTML as it exists at call time;
/// [`MetaQuery`] then locates the metadata element. No caching happens at
/// either step, so a token rotated between two requests is observed by the
/// second one.
pub struct MetaTokenSource<P> {
	provider: P,
	query: MetaQuery,
}
impl<P> MetaTokenSource<P>
where
	P: Fn() -> Option<String> + Send + Sync,
{
	/// Creates a source reading the standard `csrf-token` metadata element.
	pub fn new(provider: P) -> Self {
		Self { provider, query: MetaQuery::default() }
	}

	/// Creates a source with a custom metadata query.
	pub fn with_query(provider: P, query: MetaQuery) -> Self {
		Self { provider, query }
	}
}
impl<P> TokenSource for MetaTokenSource<P>
where
	P: Fn() -> Option<String> + Send + Sync,
{
	fn csrf_token(&self) -> Option<CsrfToken> {
		let html = (self.provider)()?;

		self.query.extract(&html).and_then(CsrfToken::new)
	}
}

/// Fixed token for tests and execution contexts without a rendered page.
#[derive(Clone, Default)]
pub struct StaticTokenSource(Option<CsrfToken>);
impl StaticTokenSource {
	/// Creates a source that always yields `token` (or nothing, when empty).
	pub fn new(token: impl Into<String>) -> Self {
		Self(CsrfToken::new(token))
	}

	/// Creates a source that never yields a token.
	pub const fn empty() -> Self {
		Self(None)
	}
}
impl TokenSource for StaticTokenSource {
	fn csrf_token(&self) -> Option<CsrfToken> {
		self.0.clone()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::Mutex;
	// self
	use super::*;

	#[test]
	fn token_formatters_redact() {
		let token = CsrfToken::new("super-secret").expect("Token should wrap a non-empty string.");

		assert_eq!(format!("{token:?}"), "CsrfToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(token.expose(), "super-secret");
	}

	#[test]
	fn empty_token_is_no_token() {
		assert!(CsrfToken::new("").is_none());
		assert!(StaticTokenSource::new("").csrf_token().is_none());
		assert!(StaticTokenSource::empty().csrf_token().is_none());
	}

	#[test]
	fn static_source_yields_fixed_token() {
		let source = StaticTokenSource::new("abc123");

		assert_eq!(source.csrf_token().map(|token| token.expose().to_owned()), Some("abc123".to_owned()));
	}

	#[test]
	fn meta_source_reads_fresh_on_every_call() {
		let page = Mutex::new(
			"<meta name=\"csrf-token\" content=\"before\">".to_owned(),
		);
		let source = MetaTokenSource::new(|| {
			Some(page.lock().expect("Page snapshot lock should not be poisoned.").clone())
		});

		assert_eq!(source.csrf_token().map(|token| token.expose().to_owned()), Some("before".to_owned()));

		*page.lock().expect("Page snapshot lock should not be poisoned.") =
			"<meta name=\"csrf-token\" content=\"after\">".to_owned();

		assert_eq!(source.csrf_token().map(|token| token.expose().to_owned()), Some("after".to_owned()));
	}

	#[test]
	fn meta_source_without_document_yields_none() {
		let source = MetaTokenSource::new(|| None);

		assert!(source.csrf_token().is_none());
	}

	#[test]
	fn closure_source_satisfies_the_seam() {
		let source = || CsrfToken::new("closure-token");

		assert_eq!(
			TokenSource::csrf_token(&source).map(|token| token.expose().to_owned()),
			Some("closure-token".to_owned())
		);
	}
}
