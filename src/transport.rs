use std::sync::Arc;

use url::Url;

use crate::Verb;
use crate::error::TransportError;

/// A request ready to be sent by a [`Transport`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RawRequest {
	/// The transport verb.
	pub verb: Verb,

	/// The full request URL: resolved address, rendered path and query string.
	pub url: Url,

	/// Request headers.
	pub headers: Vec<(String, String)>,

	/// The encoded request body, if any.
	pub body: Option<Vec<u8>>,
}

impl RawRequest {
	/// Get the value of the first header with the given name.
	///
	/// Header names are compared case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}
}

/// A response received by a [`Transport`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RawResponse {
	/// The status code.
	pub status: u16,

	/// Response headers.
	pub headers: Vec<(String, String)>,

	/// The raw response body.
	pub body: Vec<u8>,
}

impl RawResponse {
	/// Create a response without headers.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self {
			status,
			headers: Vec::new(),
			body: body.into(),
		}
	}

	/// Check if the status code indicates success.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Get the value of the first header with the given name.
	///
	/// Header names are compared case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}
}

/// Trait for transports that perform a single request/response exchange.
///
/// A transport must not retry requests.
/// Dropping the returned future must abort the in-flight request.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
	/// Send a request and wait for the response.
	async fn send(&self, request: RawRequest) -> Result<RawResponse, TransportError>;
}

#[async_trait::async_trait]
impl<T> Transport for Box<T>
where
	T: Transport + ?Sized,
{
	async fn send(&self, request: RawRequest) -> Result<RawResponse, TransportError> {
		self.as_ref().send(request).await
	}
}

#[async_trait::async_trait]
impl<T> Transport for Arc<T>
where
	T: Transport + ?Sized,
{
	async fn send(&self, request: RawRequest) -> Result<RawResponse, TransportError> {
		self.as_ref().send(request).await
	}
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
	headers
		.iter()
		.find(|(key, _)| key.eq_ignore_ascii_case(name))
		.map(|(_, value)| value.as_str())
}

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpTransport;
