//! Optional observability helpers for the request pipeline.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit a span named `csrf_client.request` around each
//!   dispatch, carrying the `method` and `token` (presence) fields.
//! - Enable `metrics` to increment the `csrf_client_request_total` counter
//!   for every dispatched request, labeled by token presence.
//!
//! The token value itself is never recorded in either backend.

// self
use crate::_prelude::*;

/// Whether the pre-send hook found a usable token for the current request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenPresence {
	/// A token was read from the page and attached.
	Present,
	/// No usable token; the request went out with the marker header only.
	Absent,
}
impl TokenPresence {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenPresence::Present => "present",
			TokenPresence::Absent => "absent",
		}
	}
}
impl Display for TokenPresence {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records a dispatched request via the global metrics recorder (when enabled).
pub fn record_request(presence: TokenPresence) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("csrf_client_request_total", "token" => presence.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = presence;
	}
}

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// A span covering one outgoing request.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a span tagged with the request method and token presence.
	pub fn new(method: &str, presence: TokenPresence) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("csrf_client.request", method, token = presence.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, presence);

			Self {}
		}
	}

	/// Instruments the dispatch future without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
