//! Error types.

use thiserror::Error;

/// Boxed error type used as source for collaborator failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error occurred while binding a contract to a service.
#[derive(Debug, Error)]
#[error("{0}")]
pub enum BindError {
	/// The contract is not internally consistent.
	Configuration(#[from] ConfigurationError),

	/// The binder input is invalid.
	Binding(#[from] BindingError),
}

impl BindError {
	/// Check if the error is caused by an invalid contract.
	pub fn is_configuration_error(&self) -> bool {
		matches!(self, Self::Configuration(_))
	}

	/// Check if the error is caused by invalid binder input.
	pub fn is_binding_error(&self) -> bool {
		matches!(self, Self::Binding(_))
	}
}

/// The contract can not be bound because it is not internally consistent.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ConfigurationError {
	/// The contract does not contain any operations.
	#[error("contract {contract:?} does not contain any operations")]
	EmptyContract {
		/// The name of the contract.
		contract: String,
	},

	/// Two operations in the contract have the same name.
	#[error("duplicate operation name: {operation:?} appears more than once in contract {contract:?}")]
	DuplicateOperation {
		/// The name of the contract.
		contract: String,

		/// The duplicated operation name.
		operation: String,
	},

	/// The path template of an operation is malformed.
	#[error("invalid path template for operation {operation:?}: {source}")]
	InvalidPathTemplate {
		/// The name of the operation.
		operation: String,

		/// The parse error.
		source: PathTemplateError,
	},

	/// A placeholder in the path template has no matching path parameter.
	#[error("path placeholder {{{placeholder}}} of operation {operation:?} has no matching path parameter")]
	UnboundPlaceholder {
		/// The name of the operation.
		operation: String,

		/// The name of the placeholder.
		placeholder: String,
	},

	/// A path parameter does not appear in the path template.
	#[error("path parameter {parameter:?} of operation {operation:?} does not appear in the path template")]
	UnusedPathParameter {
		/// The name of the operation.
		operation: String,

		/// The name of the parameter.
		parameter: String,
	},

	/// Two parameters of an operation have the same name.
	#[error("duplicate parameter name: {parameter:?} appears more than once in operation {operation:?}")]
	DuplicateParameter {
		/// The name of the operation.
		operation: String,

		/// The duplicated parameter name.
		parameter: String,
	},

	/// An operation declares more than one body parameter.
	#[error("operation {operation:?} declares more than one body parameter")]
	MultipleBodies {
		/// The name of the operation.
		operation: String,
	},

	/// The contract declares a body encoding that the client format can not produce.
	#[error("unsupported encoding: contract declares {declared:?}, but the client format produces {supported:?}")]
	UnsupportedEncoding {
		/// The media type declared by the contract.
		declared: String,

		/// The media type of the client format.
		supported: String,
	},
}

/// A path template could not be parsed.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum PathTemplateError {
	/// The template does not start with a slash.
	#[error("path template must start with '/', got {template:?}")]
	MissingLeadingSlash {
		/// The template text.
		template: String,
	},

	/// A brace is not balanced.
	#[error("unbalanced brace at byte {position} of {template:?}")]
	UnbalancedBrace {
		/// The template text.
		template: String,

		/// The byte offset of the offending brace.
		position: usize,
	},

	/// A placeholder name is not a valid identifier.
	#[error("invalid placeholder name {name:?} in {template:?}")]
	InvalidPlaceholder {
		/// The template text.
		template: String,

		/// The placeholder name.
		name: String,
	},

	/// A placeholder appears more than once.
	#[error("duplicate placeholder {{{name}}} in {template:?}")]
	DuplicatePlaceholder {
		/// The template text.
		template: String,

		/// The placeholder name.
		name: String,
	},

	/// The template contains a `.` or `..` segment.
	#[error("path template may not contain \".\" or \"..\" segments: {template:?}")]
	DotSegment {
		/// The template text.
		template: String,
	},

	/// The template contains a query string or fragment.
	#[error("path template may not contain a query string or fragment: {template:?}")]
	QueryOrFragment {
		/// The template text.
		template: String,
	},
}

/// A path template could not be rendered with the given values.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum PathRenderError {
	/// No value was given for a placeholder.
	#[error("no value for placeholder {{{placeholder}}}")]
	MissingValue {
		/// The placeholder name.
		placeholder: String,
	},

	/// A segment with a placeholder rendered as empty, `.` or `..`.
	#[error("path segment {segment:?} of {template:?} may not be empty, \".\" or \"..\"")]
	InvalidSegment {
		/// The template text.
		template: String,

		/// The rendered segment.
		segment: String,
	},
}

/// The binder input is invalid.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum BindingError {
	/// The service name is empty.
	#[error("the service name may not be empty")]
	EmptyServiceName,
}

/// An error occurred while invoking an operation.
#[derive(Debug, Error)]
#[error("{0}")]
pub enum InvokeError {
	/// The arguments do not match the operation.
	Argument(#[from] ArgumentError),

	/// The service name could not be resolved to a network address.
	Resolution(#[from] ResolutionError),

	/// The request could not be delivered or the response could not be received.
	Transport(#[from] TransportError),

	/// The response body does not match the declared return type.
	Decoding(#[from] DecodingError),

	/// The remote endpoint returned an error status.
	Remote(#[from] RemoteError),
}

impl InvokeError {
	/// Check if the error is a transport timeout.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Transport(e) if e.is_timeout())
	}

	/// Get the status code of a remote error.
	///
	/// Returns `None` for all other kinds of errors.
	pub fn remote_status(&self) -> Option<u16> {
		match self {
			Self::Remote(e) => Some(e.status),
			_ => None,
		}
	}
}

/// The arguments passed to an operation do not match its declaration.
#[derive(Debug, Error)]
pub enum ArgumentError {
	/// The contract has no operation with the given name.
	#[error("unknown operation: the contract has no operation named {operation:?}")]
	UnknownOperation {
		/// The requested operation name.
		operation: String,
	},

	/// A required path parameter was not given.
	#[error("missing path parameter {parameter:?} for operation {operation:?}")]
	MissingParameter {
		/// The name of the operation.
		operation: String,

		/// The name of the parameter.
		parameter: String,
	},

	/// An argument was given that the operation does not declare, or in the wrong location.
	#[error("unexpected argument {parameter:?} for operation {operation:?}")]
	UnexpectedParameter {
		/// The name of the operation.
		operation: String,

		/// The name of the argument.
		parameter: String,
	},

	/// A path parameter did not produce exactly one value.
	#[error("path parameter {parameter:?} of operation {operation:?} must have exactly one value, got {count}")]
	PathValueCount {
		/// The name of the operation.
		operation: String,

		/// The name of the parameter.
		parameter: String,

		/// The number of values produced.
		count: usize,
	},

	/// The same argument was given more than once.
	#[error("argument {parameter:?} for operation {operation:?} was given more than once")]
	DuplicateArgument {
		/// The name of the operation.
		operation: String,

		/// The name of the argument.
		parameter: String,
	},

	/// A path value would render as an empty, `.` or `..` segment.
	#[error("path segment {segment:?} of operation {operation:?} may not be empty, \".\" or \"..\"")]
	InvalidPathSegment {
		/// The name of the operation.
		operation: String,

		/// The rendered segment.
		segment: String,
	},

	/// The operation declares a body, but none was given.
	#[error("operation {operation:?} requires a request body")]
	MissingBody {
		/// The name of the operation.
		operation: String,
	},

	/// A body was given, but the operation does not declare one.
	#[error("operation {operation:?} does not accept a request body")]
	UnexpectedBody {
		/// The name of the operation.
		operation: String,
	},

	/// An argument value could not be encoded.
	#[error("failed to encode argument {parameter:?}: {source}")]
	Encode {
		/// The name of the argument.
		parameter: String,

		/// The underlying encoding error.
		source: BoxError,
	},
}

/// The service name could not be resolved to a network address.
#[derive(Debug, Error)]
#[error("failed to resolve service {service_name:?}: {message}")]
pub struct ResolutionError {
	/// The service name that could not be resolved.
	pub service_name: String,

	/// Description of the failure.
	pub message: String,
}

impl ResolutionError {
	/// Create a new resolution error.
	pub fn new(service_name: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			service_name: service_name.into(),
			message: message.into(),
		}
	}

	/// Create a resolution error for a service name that the resolver does not know.
	pub fn unknown_service(service_name: impl Into<String>) -> Self {
		Self::new(service_name, "no known instances")
	}
}

/// The kind of a transport failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TransportErrorKind {
	/// The connection to the remote endpoint could not be established.
	Connect,

	/// The request did not complete within the configured timeout.
	Timeout,

	/// Any other failure while sending the request or receiving the response.
	Other,
}

/// The request could not be delivered or the response could not be received.
#[derive(Debug, Error)]
pub struct TransportError {
	kind: TransportErrorKind,
	source: Option<BoxError>,
}

impl TransportError {
	/// Create a new transport error.
	pub fn new(kind: TransportErrorKind, source: impl Into<BoxError>) -> Self {
		Self { kind, source: Some(source.into()) }
	}

	/// Create a transport error for a request that did not complete in time.
	pub fn timeout() -> Self {
		Self { kind: TransportErrorKind::Timeout, source: None }
	}

	/// Get the kind of the error.
	pub fn kind(&self) -> TransportErrorKind {
		self.kind
	}

	/// Check if the request did not complete in time.
	pub fn is_timeout(&self) -> bool {
		self.kind == TransportErrorKind::Timeout
	}
}

impl std::fmt::Display for TransportError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let what = match self.kind {
			TransportErrorKind::Connect => "failed to connect",
			TransportErrorKind::Timeout => "request timed out",
			TransportErrorKind::Other => "transport failure",
		};
		match &self.source {
			Some(source) => write!(f, "{}: {}", what, source),
			None => f.write_str(what),
		}
	}
}

/// The response body does not match the declared return type.
#[derive(Debug, Error)]
#[error("failed to decode response body as {type_name}: {source}")]
pub struct DecodingError {
	/// The name of the declared return type.
	pub type_name: &'static str,

	/// The underlying decoding error.
	pub source: BoxError,
}

impl DecodingError {
	/// Create a new decoding error for the given target type.
	pub fn new<T: ?Sized>(source: impl Into<BoxError>) -> Self {
		Self {
			type_name: std::any::type_name::<T>(),
			source: source.into(),
		}
	}
}

/// The remote endpoint returned an application-level error status.
#[derive(Debug, Clone, Error)]
pub struct RemoteError {
	/// The operation that failed.
	pub operation: String,

	/// The response status code.
	pub status: u16,

	/// The raw error payload.
	pub body: Vec<u8>,
}

impl RemoteError {
	/// Get the error payload as text, if it is valid UTF-8.
	pub fn body_text(&self) -> Option<&str> {
		std::str::from_utf8(&self.body).ok()
	}
}

impl std::fmt::Display for RemoteError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "operation {:?} failed with status {}", self.operation, self.status)?;
		match self.body_text() {
			Some(text) if !text.is_empty() => write!(f, ": {}", text),
			_ => Ok(()),
		}
	}
}

/// A network address could not be parsed or can not be used as base for request URLs.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("invalid network address {address:?}: {message}")]
pub struct InvalidAddress {
	/// The rejected address.
	pub address: String,

	/// Description of the problem.
	pub message: String,
}
