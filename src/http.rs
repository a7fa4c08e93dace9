//! The authenticated request pipeline.
//!
//! [`apply_csrf_headers`] is the entire contract: a synchronous, total,
//! idempotent transformation from "header map + current page state" to
//! "header map". It always marks the request as programmatic and attaches
//! the CSRF token when the page currently carries one. [`CsrfClient`]
//! composes that hook with a reqwest transport at send time; timeouts,
//! redirects, retries, and response handling stay whatever the wrapped
//! client was built with.

// std
#[cfg(feature = "reqwest")] use std::time::Duration;
// crates.io
use http::{HeaderMap, HeaderName, HeaderValue};
#[cfg(feature = "reqwest")] use reqwest::{Body, Method, Request, RequestBuilder, Response};
// self
#[cfg(feature = "reqwest")]
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	obs::{RequestSpan, record_request},
};
use crate::{obs::TokenPresence, source::TokenSource};

/// Header carrying the CSRF token.
///
/// Header names are matched case-insensitively on the wire; the `http` crate
/// stores the canonical `X-CSRF-TOKEN` spelling in lowercase.
pub static X_CSRF_TOKEN: HeaderName = HeaderName::from_static("x-csrf-token");
/// Marker header identifying the request as a programmatic, non-navigational
/// call.
pub static X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

static XML_HTTP_REQUEST: HeaderValue = HeaderValue::from_static("XMLHttpRequest");

/// Pre-send hook applied to every outgoing request.
///
/// Always inserts `X-Requested-With: XMLHttpRequest`. When `source` yields a
/// token whose bytes form a valid header value, it is written under
/// `X-CSRF-TOKEN`; otherwise that key is left untouched and the request
/// proceeds unmodified. Insert semantics keep the hook idempotent, and no
/// input makes it fail, suspend, or reject the request.
pub fn apply_csrf_headers(headers: &mut HeaderMap, source: &dyn TokenSource) -> TokenPresence {
	headers.insert(&X_REQUESTED_WITH, XML_HTTP_REQUEST.clone());

	let value = source.csrf_token().and_then(|token| {
		let mut value = HeaderValue::from_str(token.expose()).ok()?;

		value.set_sensitive(true);

		Some(value)
	});
	let Some(value) = value else { return TokenPresence::Absent };

	headers.insert(&X_CSRF_TOKEN, value);

	TokenPresence::Present
}

/// Drop-in HTTP client for same-origin background calls.
///
/// Wraps a reqwest [`ReqwestClient`] and a [`TokenSource`]; every request
/// dispatched through it passes through [`apply_csrf_headers`] at send time,
/// so the token lookup happens against the page state current at that moment
/// rather than at construction or builder-creation time.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct CsrfClient {
	client: ReqwestClient,
	source: Arc<dyn TokenSource>,
}
#[cfg(feature = "reqwest")]
impl CsrfClient {
	/// Builds a client on reqwest's default transport configuration.
	pub fn new(source: Arc<dyn TokenSource>) -> Result<Self> {
		let client =
			ReqwestClient::builder().build().map_err(ConfigError::http_client_build)?;

		Ok(Self::with_client(client, source))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// Transport behavior (timeouts, proxies, redirect policy) stays whatever
	/// the client was built with; only header attachment is added.
	pub fn with_client(client: ReqwestClient, source: Arc<dyn TokenSource>) -> Self {
		Self { client, source }
	}

	/// Returns the underlying transport, bypassing token attachment.
	pub fn inner(&self) -> &ReqwestClient {
		&self.client
	}

	/// Starts building a request with an arbitrary method.
	pub fn request(&self, method: Method, url: Url) -> CsrfRequestBuilder {
		CsrfRequestBuilder { client: self.clone(), builder: self.client.request(method, url) }
	}

	/// Starts building a `GET` request.
	pub fn get(&self, url: Url) -> CsrfRequestBuilder {
		self.request(Method::GET, url)
	}

	/// Starts building a `POST` request.
	pub fn post(&self, url: Url) -> CsrfRequestBuilder {
		self.request(Method::POST, url)
	}

	/// Starts building a `PUT` request.
	pub fn put(&self, url: Url) -> CsrfRequestBuilder {
		self.request(Method::PUT, url)
	}

	/// Starts building a `PATCH` request.
	pub fn patch(&self, url: Url) -> CsrfRequestBuilder {
		self.request(Method::PATCH, url)
	}

	/// Starts building a `DELETE` request.
	pub fn delete(&self, url: Url) -> CsrfRequestBuilder {
		self.request(Method::DELETE, url)
	}

	/// Starts building a `HEAD` request.
	pub fn head(&self, url: Url) -> CsrfRequestBuilder {
		self.request(Method::HEAD, url)
	}

	/// Applies the pre-send hook to an assembled request and dispatches it.
	///
	/// Transport failures propagate unchanged from reqwest; non-2xx responses
	/// are returned as responses, not errors.
	pub async fn execute(&self, mut request: Request) -> Result<Response> {
		let presence = apply_csrf_headers(request.headers_mut(), self.source.as_ref());
		let span = RequestSpan::new(request.method().as_str(), presence);

		record_request(presence);

		let response = span
			.instrument(self.client.execute(request))
			.await
			.map_err(TransportError::from)?;

		Ok(response)
	}
}

/// Request builder that funnels dispatch through [`CsrfClient::execute`].
#[cfg(feature = "reqwest")]
pub struct CsrfRequestBuilder {
	client: CsrfClient,
	builder: RequestBuilder,
}
#[cfg(feature = "reqwest")]
impl CsrfRequestBuilder {
	/// Adds a header to the request.
	pub fn header<K, V>(mut self, key: K, value: V) -> Self
	where
		HeaderName: TryFrom<K>,
		<HeaderName as TryFrom<K>>::Error: Into<http::Error>,
		HeaderValue: TryFrom<V>,
		<HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
	{
		self.builder = self.builder.header(key, value);

		self
	}

	/// Merges a header map into the request.
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.builder = self.builder.headers(headers);

		self
	}

	/// Appends a serializable query string to the URL.
	pub fn query<T>(mut self, query: &T) -> Self
	where
		T: Serialize + ?Sized,
	{
		self.builder = self.builder.query(query);

		self
	}

	/// Sends a URL-encoded form body.
	pub fn form<T>(mut self, form: &T) -> Self
	where
		T: Serialize + ?Sized,
	{
		self.builder = self.builder.form(form);

		self
	}

	/// Sets the request body.
	pub fn body(mut self, body: impl Into<Body>) -> Self {
		self.builder = self.builder.body(body);

		self
	}

	/// Overrides the transport timeout for this request only.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.builder = self.builder.timeout(timeout);

		self
	}

	/// Assembles the request without dispatching it.
	///
	/// The pre-send hook is applied by [`CsrfClient::execute`], not here, so
	/// the token is read at dispatch time.
	pub fn build(self) -> Result<Request> {
		Ok(self.builder.build().map_err(ConfigError::request_build)?)
	}

	/// Assembles the request, applies the pre-send hook, and dispatches it.
	pub async fn send(self) -> Result<Response> {
		let request = self.builder.build().map_err(ConfigError::request_build)?;

		self.client.execute(request).await
	}
}
