//! Body formats, used to encode/decode request and response bodies from/to Rust types.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{BoxError, DecodingError};

/// A body format, the encoding declared by a contract.
///
/// The format determines the media type sent in the `Accept` and `Content-Type` headers,
/// and how request bodies and response bodies are converted.
pub trait Format: Send + Sync + 'static {
	/// The media type produced and accepted by the format.
	const MEDIA_TYPE: &'static str;

	/// Encode a Rust value to a request body.
	fn encode_body<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, BoxError>;

	/// Decode a response body to a Rust value.
	///
	/// An empty body must be decoded as if it was the null value of the format,
	/// so that operations returning `()` or `Option<T>` accept empty responses.
	fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodingError>;
}

/// JSON body format.
#[derive(Debug, Copy, Clone, Default)]
pub struct Json;

impl Format for Json {
	const MEDIA_TYPE: &'static str = "application/json";

	fn encode_body<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, BoxError> {
		Ok(serde_json::to_vec(value)?)
	}

	fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodingError> {
		let body = if body.iter().all(u8::is_ascii_whitespace) {
			&b"null"[..]
		} else {
			body
		};
		serde_json::from_slice(body).map_err(|e| DecodingError::new::<T>(e))
	}
}
