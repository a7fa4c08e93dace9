//! Same-origin request plumbing for the application's front end: an HTTP
//! client that reads the page's CSRF token fresh on every outgoing request
//! and attaches it as a header, plus the German and Dutch string tables the
//! server-rendered screens consume.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod error;
pub mod http;
pub mod locale;
pub mod obs;
pub mod page;
pub mod source;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{http::CsrfClient, source::TokenSource};

	/// Builds a [`CsrfClient`] whose reqwest transport accepts the self-signed
	/// certificates produced by `httpmock` during tests.
	pub fn test_csrf_client(source: Arc<dyn TokenSource>) -> CsrfClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		CsrfClient::with_client(client, source)
	}

	/// Renders a minimal page head embedding `token` in the standard metadata
	/// element.
	pub fn page_with_token(token: &str) -> String {
		format!(
			"<html><head><meta charset=\"utf-8\">\
			<meta name=\"csrf-token\" content=\"{token}\">\
			<title>App</title></head><body></body></html>"
		)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
