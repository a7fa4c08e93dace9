//! Demonstrates wiring a rendered page snapshot to the CSRF-aware client and
//! issuing a background request against a mock API.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use csrf_client::{
	http::CsrfClient,
	source::{MetaTokenSource, TokenSource},
};

const PAGE: &str = "<html><head><meta charset=\"utf-8\">\
	<meta name=\"csrf-token\" content=\"demo-token\">\
	<title>App</title></head><body></body></html>";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let api_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/me")
				.header("x-csrf-token", "demo-token")
				.header("x-requested-with", "XMLHttpRequest");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"name\":\"demo\",\"locale\":\"de\"}");
		})
		.await;
	let source: Arc<dyn TokenSource> = Arc::new(MetaTokenSource::new(|| Some(PAGE.to_owned())));
	let client = CsrfClient::new(source)?;
	let response = client.get(Url::parse(&server.url("/api/me"))?).send().await?;

	println!("status: {}", response.status());
	println!("body: {}", response.text().await?);

	api_mock.assert_async().await;

	Ok(())
}
