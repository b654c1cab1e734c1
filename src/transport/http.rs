use std::time::Duration;

use crate::Verb;
use crate::error::{TransportError, TransportErrorKind};
use super::{RawRequest, RawResponse, Transport};

/// HTTP transport backed by [`reqwest`].
///
/// The underlying client keeps a connection pool, so a single transport should be shared by all clients.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
	client: reqwest::Client,
}

impl HttpTransport {
	/// Create a transport with a default [`reqwest::Client`].
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a transport with a connect timeout.
	///
	/// The connect timeout is separate from the request timeout of [`ClientConfig`][crate::ClientConfig].
	pub fn with_connect_timeout(timeout: Duration) -> Result<Self, TransportError> {
		let client = reqwest::Client::builder()
			.connect_timeout(timeout)
			.build()
			.map_err(|e| TransportError::new(TransportErrorKind::Other, e))?;
		Ok(Self { client })
	}

	/// Create a transport from an existing [`reqwest::Client`].
	pub fn from_client(client: reqwest::Client) -> Self {
		Self { client }
	}
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
	async fn send(&self, request: RawRequest) -> Result<RawResponse, TransportError> {
		let mut builder = self.client.request(to_method(request.verb), request.url);
		for (name, value) in request.headers {
			builder = builder.header(name, value);
		}
		if let Some(body) = request.body {
			builder = builder.body(body);
		}

		let response = builder.send().await.map_err(map_reqwest_error)?;
		let status = response.status().as_u16();
		let headers = response
			.headers()
			.iter()
			.filter_map(|(name, value)| Some((name.as_str().to_owned(), value.to_str().ok()?.to_owned())))
			.collect();
		let body = response.bytes().await.map_err(map_reqwest_error)?;

		Ok(RawResponse {
			status,
			headers,
			body: body.to_vec(),
		})
	}
}

fn to_method(verb: Verb) -> reqwest::Method {
	match verb {
		Verb::Get => reqwest::Method::GET,
		Verb::Post => reqwest::Method::POST,
		Verb::Put => reqwest::Method::PUT,
		Verb::Patch => reqwest::Method::PATCH,
		Verb::Delete => reqwest::Method::DELETE,
		Verb::Head => reqwest::Method::HEAD,
		Verb::Options => reqwest::Method::OPTIONS,
	}
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
	let kind = if e.is_timeout() {
		TransportErrorKind::Timeout
	} else if e.is_connect() {
		TransportErrorKind::Connect
	} else {
		TransportErrorKind::Other
	};
	TransportError::new(kind, e)
}
