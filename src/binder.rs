use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{self, ArgumentError, BindError, ConfigurationError, InvokeError, PathRenderError, RemoteError, TransportError};
use crate::format::{Format, Json};
use crate::path::{self, PathTemplate};
use crate::transport::{RawRequest, RawResponse, Transport};
use crate::{ContractDescriptor, OperationSpec, ParamLocation, Resolver, ServiceName};

mod param_values;
use param_values::to_param_values;

/// Configuration for a bound client.
///
/// The default configuration has no timeout, no extra headers and treats every non-2xx status as [`RemoteError`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
	/// Maximum time to wait for the response of a single invocation.
	///
	/// The timeout covers sending the request and receiving the full response,
	/// but not the service name resolution.
	pub timeout: Option<Duration>,

	/// Headers added to every request.
	pub default_headers: Vec<(String, String)>,

	/// Decode a 404 response as if it was a successful empty response.
	///
	/// Combined with an `Option<T>` return type, this turns "not found" into `Ok(None)`.
	pub decode_not_found: bool,
}

impl ClientConfig {
	/// Set the request timeout.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);
		self
	}

	/// Add a header to every request.
	pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.default_headers.push((name.into(), value.into()));
		self
	}

	/// Decode 404 responses as successful empty responses.
	pub fn decode_not_found(mut self, decode_not_found: bool) -> Self {
		self.decode_not_found = decode_not_found;
		self
	}
}

/// Bind a contract to a service using the JSON format and the default configuration.
///
/// No network traffic happens here: the service name is resolved again for every invocation.
pub fn bind<R, T>(
	service_name: impl Into<String>,
	contract: impl Into<Arc<ContractDescriptor>>,
	resolver: R,
	transport: T,
) -> Result<ClientHandle<Json>, BindError>
where
	R: Resolver + 'static,
	T: Transport + 'static,
{
	ClientHandle::bind(service_name, contract, resolver, transport)
}

/// Bind a contract to a service using the JSON format and a custom configuration.
pub fn bind_with_config<R, T>(
	service_name: impl Into<String>,
	contract: impl Into<Arc<ContractDescriptor>>,
	resolver: R,
	transport: T,
	config: ClientConfig,
) -> Result<ClientHandle<Json>, BindError>
where
	R: Resolver + 'static,
	T: Transport + 'static,
{
	ClientHandle::bind_with_config(service_name, contract, resolver, transport, config)
}

/// A client for a contract bound to a named service.
///
/// The handle exposes one [`Operation`] for each operation of the contract.
/// It holds no mutable state and can be cloned cheaply to share it between tasks.
pub struct ClientHandle<F: Format = Json> {
	inner: Arc<Inner>,
	_format: PhantomData<fn() -> F>,
}

struct Inner {
	service_name: ServiceName,
	contract: Arc<ContractDescriptor>,
	templates: Vec<PathTemplate>,
	index: HashMap<String, usize>,
	resolver: Arc<dyn Resolver>,
	transport: Arc<dyn Transport>,
	config: ClientConfig,
}

impl<F: Format> ClientHandle<F> {
	/// Bind a contract to a service with the default configuration.
	pub fn bind<R, T>(
		service_name: impl Into<String>,
		contract: impl Into<Arc<ContractDescriptor>>,
		resolver: R,
		transport: T,
	) -> Result<Self, BindError>
	where
		R: Resolver + 'static,
		T: Transport + 'static,
	{
		Self::bind_with_config(service_name, contract, resolver, transport, ClientConfig::default())
	}

	/// Bind a contract to a service.
	///
	/// Fails with a [`BindingError`][error::BindingError] if the service name is empty,
	/// or with a [`ConfigurationError`] if the contract is not internally consistent.
	pub fn bind_with_config<R, T>(
		service_name: impl Into<String>,
		contract: impl Into<Arc<ContractDescriptor>>,
		resolver: R,
		transport: T,
		config: ClientConfig,
	) -> Result<Self, BindError>
	where
		R: Resolver + 'static,
		T: Transport + 'static,
	{
		let service_name = ServiceName::new(service_name)?;
		let contract: Arc<ContractDescriptor> = contract.into();

		if !contract.declared_media_type().eq_ignore_ascii_case(F::MEDIA_TYPE) {
			return Err(ConfigurationError::UnsupportedEncoding {
				declared: contract.declared_media_type().into(),
				supported: F::MEDIA_TYPE.into(),
			}.into());
		}

		let templates = contract.compile()?;
		let index = contract
			.operations()
			.iter()
			.enumerate()
			.map(|(i, operation)| (operation.name().to_owned(), i))
			.collect();

		log::debug!(
			"bound contract {} to service {} with {} operations",
			contract.name(),
			service_name,
			templates.len(),
		);

		Ok(Self {
			inner: Arc::new(Inner {
				service_name,
				contract,
				templates,
				index,
				resolver: Arc::new(resolver),
				transport: Arc::new(transport),
				config,
			}),
			_format: PhantomData,
		})
	}

	/// Get the name of the bound service.
	pub fn service_name(&self) -> &ServiceName {
		&self.inner.service_name
	}

	/// Get the bound contract.
	pub fn contract(&self) -> &ContractDescriptor {
		&self.inner.contract
	}

	/// Get the client configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.inner.config
	}

	/// Iterate over the operations of the client, in order of declaration.
	pub fn operations(&self) -> impl ExactSizeIterator<Item = Operation<'_, F>> + '_ {
		(0..self.inner.templates.len()).map(move |index| Operation { handle: self, index })
	}

	/// Get an operation by name.
	pub fn operation(&self, name: &str) -> Option<Operation<'_, F>> {
		let index = *self.inner.index.get(name)?;
		Some(Operation { handle: self, index })
	}

	/// Invoke an operation by name.
	///
	/// Argument mismatches are reported before the service name is resolved.
	pub async fn invoke<B, R>(&self, operation: &str, arguments: Arguments<B>) -> Result<R, InvokeError>
	where
		B: Serialize,
		R: DeserializeOwned,
	{
		let index = self.inner.index.get(operation).copied().ok_or_else(|| ArgumentError::UnknownOperation {
			operation: operation.into(),
		})?;
		self.invoke_index(index, arguments).await
	}

	async fn invoke_index<B, R>(&self, index: usize, arguments: Arguments<B>) -> Result<R, InvokeError>
	where
		B: Serialize,
		R: DeserializeOwned,
	{
		let inner = &*self.inner;
		let spec = &inner.contract.operations()[index];
		let prepared = arguments.prepare::<F>(spec)?;
		let segments = inner.templates[index]
			.render_segments(|name| prepared.path.get(name).map(String::as_str))
			.map_err(|e| match e {
				PathRenderError::MissingValue { placeholder } => ArgumentError::MissingParameter {
					operation: spec.name().into(),
					parameter: placeholder,
				},
				PathRenderError::InvalidSegment { segment, .. } => ArgumentError::InvalidPathSegment {
					operation: spec.name().into(),
					segment,
				},
			})?;

		let address = inner.resolver.resolve(&inner.service_name).await?;

		let mut url = path::append_segments(address.url(), &segments);
		if !prepared.query.is_empty() {
			url.query_pairs_mut().extend_pairs(&prepared.query);
		}

		let mut headers = vec![(String::from("Accept"), String::from(F::MEDIA_TYPE))];
		if prepared.body.is_some() {
			headers.push((String::from("Content-Type"), String::from(F::MEDIA_TYPE)));
		}
		headers.extend(inner.config.default_headers.iter().cloned());

		let request = RawRequest {
			verb: spec.verb(),
			url,
			headers,
			body: prepared.body,
		};

		log::debug!("invoking {}.{}: {} {}", inner.service_name, spec.name(), request.verb, request.url);
		let response = match inner.config.timeout {
			None => inner.transport.send(request).await?,
			Some(timeout) => tokio::time::timeout(timeout, inner.transport.send(request))
				.await
				.map_err(|_| TransportError::timeout())??,
		};
		log::trace!("{}.{} returned status {}", inner.service_name, spec.name(), response.status);

		self.decode_response(spec, response)
	}

	fn decode_response<R: DeserializeOwned>(&self, spec: &OperationSpec, response: RawResponse) -> Result<R, InvokeError> {
		if response.is_success() {
			Ok(F::decode_body(&response.body)?)
		} else if response.status == 404 && self.inner.config.decode_not_found {
			Ok(F::decode_body(&[])?)
		} else {
			log::debug!("{}.{} failed with status {}", self.inner.service_name, spec.name(), response.status);
			Err(RemoteError {
				operation: spec.name().into(),
				status: response.status,
				body: response.body,
			}.into())
		}
	}
}

impl<F: Format> Clone for ClientHandle<F> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
			_format: PhantomData,
		}
	}
}

impl<F: Format> std::fmt::Debug for ClientHandle<F> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct(std::any::type_name::<Self>())
			.field("service_name", &self.inner.service_name)
			.field("contract", &self.inner.contract.name())
			.field("config", &self.inner.config)
			.finish()
	}
}

/// A single operation of a [`ClientHandle`].
#[derive(Debug)]
pub struct Operation<'a, F: Format = Json> {
	handle: &'a ClientHandle<F>,
	index: usize,
}

impl<'a, F: Format> Operation<'a, F> {
	/// Get the declaration of the operation.
	pub fn spec(&self) -> &'a OperationSpec {
		&self.handle.inner.contract.operations()[self.index]
	}

	/// Get the name of the operation.
	pub fn name(&self) -> &'a str {
		self.spec().name()
	}

	/// Invoke the operation.
	pub async fn invoke<B, R>(&self, arguments: Arguments<B>) -> Result<R, InvokeError>
	where
		B: Serialize,
		R: DeserializeOwned,
	{
		self.handle.invoke_index(self.index, arguments).await
	}
}

impl<F: Format> Clone for Operation<'_, F> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<F: Format> Copy for Operation<'_, F> {}

/// Arguments for an operation invocation.
///
/// Path and query values may be any type that serializes to a scalar, a sequence of scalars or null.
/// Null query values are left out of the query string and sequences repeat the query key.
/// A path value must produce exactly one scalar.
#[derive(Debug)]
pub struct Arguments<B = ()> {
	params: Vec<Argument>,
	body: Option<B>,
}

#[derive(Debug)]
struct Argument {
	name: String,
	location: ParamLocation,
	values: Result<Vec<String>, error::BoxError>,
}

struct PreparedArguments {
	path: HashMap<String, String>,
	query: Vec<(String, String)>,
	body: Option<Vec<u8>>,
}

impl Arguments<()> {
	/// Create an empty argument list.
	pub fn new() -> Self {
		Self {
			params: Vec::new(),
			body: None,
		}
	}
}

impl Default for Arguments<()> {
	fn default() -> Self {
		Self::new()
	}
}

impl<B> Arguments<B> {
	/// Add a path argument.
	pub fn path(self, name: impl Into<String>, value: impl Serialize) -> Self {
		self.push(name.into(), ParamLocation::Path, &value)
	}

	/// Add a query argument.
	pub fn query(self, name: impl Into<String>, value: impl Serialize) -> Self {
		self.push(name.into(), ParamLocation::Query, &value)
	}

	/// Set the request body.
	pub fn body<T>(self, body: T) -> Arguments<T> {
		Arguments {
			params: self.params,
			body: Some(body),
		}
	}

	fn push<T: Serialize>(mut self, name: String, location: ParamLocation, value: &T) -> Self {
		self.params.push(Argument {
			name,
			location,
			values: to_param_values(value),
		});
		self
	}
}

impl<B: Serialize> Arguments<B> {
	/// Check the arguments against an operation and encode them.
	fn prepare<F: Format>(self, spec: &OperationSpec) -> Result<PreparedArguments, ArgumentError> {
		let mut path = HashMap::new();
		let mut query = Vec::new();

		let mut seen = HashSet::new();
		for argument in self.params {
			if !seen.insert(argument.name.clone()) {
				return Err(ArgumentError::DuplicateArgument {
					operation: spec.name().into(),
					parameter: argument.name,
				});
			}

			let declared = spec.param_by_name(&argument.name).map(|param| param.location());
			if declared != Some(argument.location) {
				return Err(ArgumentError::UnexpectedParameter {
					operation: spec.name().into(),
					parameter: argument.name,
				});
			}

			let values = match argument.values {
				Ok(values) => values,
				Err(source) => return Err(ArgumentError::Encode { parameter: argument.name, source }),
			};

			match argument.location {
				ParamLocation::Path => {
					if values.len() != 1 {
						return Err(ArgumentError::PathValueCount {
							operation: spec.name().into(),
							parameter: argument.name,
							count: values.len(),
						});
					}
					path.extend(values.into_iter().map(|value| (argument.name.clone(), value)));
				},
				ParamLocation::Query => {
					query.extend(values.into_iter().map(|value| (argument.name.clone(), value)));
				},
				ParamLocation::Body => unreachable!("body arguments are never pushed as named parameters"),
			}
		}

		for param in spec.params() {
			if param.location() == ParamLocation::Path && !path.contains_key(param.name()) {
				return Err(ArgumentError::MissingParameter {
					operation: spec.name().into(),
					parameter: param.name().into(),
				});
			}
		}

		let body = match (spec.body_param(), self.body) {
			(None, None) => None,
			(Some(param), Some(body)) => {
				let encoded = F::encode_body(&body).map_err(|source| ArgumentError::Encode {
					parameter: param.name().into(),
					source,
				})?;
				Some(encoded)
			},
			(Some(_), None) => return Err(ArgumentError::MissingBody { operation: spec.name().into() }),
			(None, Some(_)) => return Err(ArgumentError::UnexpectedBody { operation: spec.name().into() }),
		};

		Ok(PreparedArguments { path, query, body })
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use assert2::assert;
	use assert2::let_assert;
	use std::sync::Mutex;

	use crate::error::{ResolutionError, TransportErrorKind};
	use crate::{NetworkAddress, ParamSpec, StaticResolver, Verb};

	/// Transport that records requests and answers with a fixed response.
	#[derive(Default)]
	struct FakeTransport {
		response: Mutex<Option<RawResponse>>,
		requests: Mutex<Vec<RawRequest>>,
		delay: Option<Duration>,
		completed: std::sync::atomic::AtomicUsize,
	}

	impl FakeTransport {
		fn respond(status: u16, body: &str) -> Arc<Self> {
			Arc::new(Self {
				response: Mutex::new(Some(RawResponse::new(status, body))),
				..Default::default()
			})
		}

		fn requests(&self) -> Vec<RawRequest> {
			self.requests.lock().unwrap().clone()
		}
	}

	#[async_trait::async_trait]
	impl Transport for FakeTransport {
		async fn send(&self, request: RawRequest) -> Result<RawResponse, TransportError> {
			self.requests.lock().unwrap().push(request);
			if let Some(delay) = self.delay {
				tokio::time::sleep(delay).await;
			}
			self.completed.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
			let response = self.response.lock().unwrap().clone();
			response.ok_or_else(|| TransportError::new(TransportErrorKind::Connect, "connection refused"))
		}
	}

	/// Resolver that fails for every service.
	struct NoResolver;

	#[async_trait::async_trait]
	impl Resolver for NoResolver {
		async fn resolve(&self, service_name: &ServiceName) -> Result<NetworkAddress, ResolutionError> {
			Err(ResolutionError::unknown_service(service_name.as_str()))
		}
	}

	fn resolver() -> StaticResolver {
		let_assert!(Ok(resolver) = StaticResolver::from_pairs([("messages", "http://messages:8080/api")]));
		resolver
	}

	fn contract() -> ContractDescriptor {
		ContractDescriptor::new("messages-api")
			.operation(
				OperationSpec::new("list", Verb::Get, "/messages")
					.param(ParamSpec::query::<Option<u32>>("limit"))
					.param(ParamSpec::query::<Vec<String>>("tag"))
					.returns::<Vec<String>>(),
			)
			.operation(
				OperationSpec::new("get", Verb::Get, "/messages/{id}")
					.param(ParamSpec::path::<String>("id"))
					.returns::<Option<String>>(),
			)
			.operation(
				OperationSpec::new("create", Verb::Post, "/messages")
					.param(ParamSpec::body::<String>("text"))
					.returns::<u64>(),
			)
	}

	#[test]
	fn bind_exposes_one_operation_per_declaration() {
		let transport = FakeTransport::respond(200, "[]");
		let_assert!(Ok(handle) = bind("messages", contract(), resolver(), transport));
		assert!(handle.operations().len() == 3);
		let names: Vec<_> = handle.operations().map(|operation| operation.name()).collect();
		assert!(names == ["list", "get", "create"]);
		for (operation, spec) in handle.operations().zip(contract().operations()) {
			assert!(operation.spec() == spec);
		}
		assert!(let Some(_) = handle.operation("get"));
		assert!(let None = handle.operation("delete"));
	}

	#[test]
	fn bind_rejects_duplicate_operations() {
		let contract = contract().operation(OperationSpec::new("list", Verb::Get, "/other"));
		let_assert!(Err(e) = bind("messages", contract, resolver(), FakeTransport::respond(200, "")));
		assert!(e.is_configuration_error());
		assert!(let BindError::Configuration(ConfigurationError::DuplicateOperation { .. }) = e);
	}

	#[test]
	fn bind_rejects_empty_service_name() {
		let_assert!(Err(e) = bind("", contract(), resolver(), FakeTransport::respond(200, "")));
		assert!(e.is_binding_error());
		assert!(let BindError::Binding(error::BindingError::EmptyServiceName) = e);
	}

	#[test]
	fn bind_rejects_unsupported_encoding() {
		let contract = contract().media_type("application/xml");
		let_assert!(Err(e) = bind("messages", contract, resolver(), FakeTransport::respond(200, "")));
		assert!(let BindError::Configuration(ConfigurationError::UnsupportedEncoding { .. }) = e);
	}

	#[tokio::test]
	async fn invoke_builds_request() {
		let transport = FakeTransport::respond(200, r#"["a","b"]"#);
		let config = ClientConfig::default().default_header("X-Request-Source", "bff");
		let_assert!(Ok(handle) = bind_with_config("messages", contract(), resolver(), transport.clone(), config));

		let arguments = Arguments::new().query("limit", Some(10)).query("tag", ["x", "y z"]);
		let_assert!(Ok(messages) = handle.invoke::<_, Vec<String>>("list", arguments).await);
		assert!(messages == ["a", "b"]);

		let requests = transport.requests();
		assert!(requests.len() == 1);
		assert!(requests[0].verb == Verb::Get);
		assert!(requests[0].url.as_str() == "http://messages:8080/api/messages?limit=10&tag=x&tag=y+z");
		assert!(requests[0].header("accept") == Some("application/json"));
		assert!(requests[0].header("content-type") == None);
		assert!(requests[0].header("x-request-source") == Some("bff"));
		assert!(requests[0].body == None);
	}

	#[tokio::test]
	async fn invoke_omits_null_query_values() {
		let transport = FakeTransport::respond(200, "[]");
		let_assert!(Ok(handle) = bind("messages", contract(), resolver(), transport.clone()));
		let arguments = Arguments::new().query("limit", None::<u32>);
		assert!(let Ok(_) = handle.invoke::<_, Vec<String>>("list", arguments).await);
		assert!(transport.requests()[0].url.as_str() == "http://messages:8080/api/messages");
	}

	#[tokio::test]
	async fn invoke_encodes_path_and_body() {
		let transport = FakeTransport::respond(201, "17");
		let_assert!(Ok(handle) = bind("messages", contract(), resolver(), transport.clone()));
		let_assert!(Some(create) = handle.operation("create"));
		let_assert!(Ok(17) = create.invoke::<_, u64>(Arguments::new().body("hello")).await);

		let requests = transport.requests();
		assert!(requests[0].verb == Verb::Post);
		assert!(requests[0].header("content-type") == Some("application/json"));
		assert!(requests[0].body.as_deref() == Some(&br#""hello""#[..]));

		let transport = FakeTransport::respond(200, r#""hi""#);
		let_assert!(Ok(handle) = bind("messages", contract(), resolver(), transport.clone()));
		let_assert!(Ok(Some(message)) = handle.invoke::<_, Option<String>>("get", Arguments::new().path("id", "a/b")).await);
		assert!(message == "hi");
		assert!(transport.requests()[0].url.path() == "/api/messages/a%2Fb");
	}

	#[tokio::test]
	async fn invoke_checks_arguments_before_resolving() {
		let transport = FakeTransport::respond(200, "");
		let_assert!(Ok(handle) = bind("messages", contract(), NoResolver, transport.clone()));

		let_assert!(Err(InvokeError::Argument(ArgumentError::UnknownOperation { .. })) = handle.invoke::<_, ()>("delete", Arguments::new()).await);
		let_assert!(Err(InvokeError::Argument(ArgumentError::MissingParameter { parameter, .. })) = handle.invoke::<_, Option<String>>("get", Arguments::new()).await);
		assert!(parameter == "id");
		let_assert!(Err(InvokeError::Argument(ArgumentError::UnexpectedParameter { .. })) = handle.invoke::<_, Vec<String>>("list", Arguments::new().path("limit", 1)).await);
		let_assert!(Err(InvokeError::Argument(ArgumentError::PathValueCount { count: 0, .. })) = handle.invoke::<_, Option<String>>("get", Arguments::new().path("id", None::<u8>)).await);
		let_assert!(Err(InvokeError::Argument(ArgumentError::MissingBody { .. })) = handle.invoke::<_, u64>("create", Arguments::new()).await);
		let_assert!(Err(InvokeError::Argument(ArgumentError::UnexpectedBody { .. })) = handle.invoke::<_, Vec<String>>("list", Arguments::new().body(1)).await);
		let_assert!(Err(InvokeError::Argument(ArgumentError::Encode { .. })) = handle.invoke::<_, Vec<String>>("list", Arguments::new().query("tag", [[1]])).await);
		assert!(transport.requests().is_empty());
	}

	#[tokio::test]
	async fn invoke_rejects_repeated_arguments() {
		let transport = FakeTransport::respond(200, "");
		let_assert!(Ok(handle) = bind("messages", contract(), NoResolver, transport.clone()));

		let arguments = Arguments::new().path("id", "a").path("id", "b");
		let_assert!(Err(InvokeError::Argument(ArgumentError::DuplicateArgument { parameter, .. })) = handle.invoke::<_, Option<String>>("get", arguments).await);
		assert!(parameter == "id");

		let arguments = Arguments::new().query("limit", 1).query("limit", 2);
		let_assert!(Err(InvokeError::Argument(ArgumentError::DuplicateArgument { parameter, .. })) = handle.invoke::<_, Vec<String>>("list", arguments).await);
		assert!(parameter == "limit");
		assert!(transport.requests().is_empty());
	}

	#[tokio::test]
	async fn invoke_rejects_non_finite_numbers() {
		let transport = FakeTransport::respond(200, "[]");
		let_assert!(Ok(handle) = bind("messages", contract(), NoResolver, transport.clone()));

		let arguments = Arguments::new().query("limit", f64::NAN);
		let_assert!(Err(InvokeError::Argument(ArgumentError::Encode { parameter, .. })) = handle.invoke::<_, Vec<String>>("list", arguments).await);
		assert!(parameter == "limit");

		let arguments = Arguments::new().path("id", f64::INFINITY);
		let_assert!(Err(InvokeError::Argument(ArgumentError::Encode { parameter, .. })) = handle.invoke::<_, Option<String>>("get", arguments).await);
		assert!(parameter == "id");
		assert!(transport.requests().is_empty());
	}

	#[tokio::test]
	async fn invoke_rejects_dot_path_values() {
		let transport = FakeTransport::respond(200, r#""hi""#);
		let_assert!(Ok(handle) = bind("messages", contract(), NoResolver, transport.clone()));

		for value in ["..", ".", ""] {
			let arguments = Arguments::new().path("id", value);
			let_assert!(Err(InvokeError::Argument(ArgumentError::InvalidPathSegment { segment, .. })) = handle.invoke::<_, Option<String>>("get", arguments).await);
			assert!(segment == value);
		}
		assert!(transport.requests().is_empty());

		// Dots inside a longer value are sent percent-encoded as part of a single segment.
		let_assert!(Ok(handle) = bind("messages", contract(), resolver(), transport.clone()));
		let_assert!(Ok(Some(_)) = handle.invoke::<_, Option<String>>("get", Arguments::new().path("id", "../admin")).await);
		assert!(transport.requests()[0].url.path() == "/api/messages/..%2Fadmin");
	}

	#[tokio::test]
	async fn dropping_invocation_aborts_request() {
		let transport = Arc::new(FakeTransport {
			response: Mutex::new(Some(RawResponse::new(200, "[]"))),
			delay: Some(Duration::from_millis(200)),
			..Default::default()
		});
		let_assert!(Ok(handle) = bind("messages", contract(), resolver(), transport.clone()));

		let invocation = handle.invoke::<_, Vec<String>>("list", Arguments::new());
		assert!(let Err(_) = tokio::time::timeout(Duration::from_millis(20), invocation).await);
		tokio::time::sleep(Duration::from_millis(300)).await;

		assert!(transport.requests().len() == 1);
		assert!(transport.completed.load(std::sync::atomic::Ordering::SeqCst) == 0);
	}

	#[tokio::test]
	async fn unresolvable_service() {
		let transport = FakeTransport::respond(200, "[]");
		let_assert!(Ok(handle) = bind("unknown", contract(), resolver(), transport.clone()));
		let_assert!(Err(InvokeError::Resolution(e)) = handle.invoke::<_, Vec<String>>("list", Arguments::new()).await);
		assert!(e.service_name == "unknown");
		assert!(transport.requests().is_empty());
	}

	#[tokio::test]
	async fn mismatched_response_body() {
		let transport = FakeTransport::respond(200, r#"{"not":"a list"}"#);
		let_assert!(Ok(handle) = bind("messages", contract(), resolver(), transport));
		let_assert!(Err(InvokeError::Decoding(e)) = handle.invoke::<_, Vec<String>>("list", Arguments::new()).await);
		assert!(e.type_name == std::any::type_name::<Vec<String>>());
	}

	#[tokio::test]
	async fn remote_error_status() {
		let transport = FakeTransport::respond(500, "internal error");
		let_assert!(Ok(handle) = bind("messages", contract(), resolver(), transport));
		let_assert!(Err(e) = handle.invoke::<_, Vec<String>>("list", Arguments::new()).await);
		assert!(e.remote_status() == Some(500));
		let_assert!(InvokeError::Remote(remote) = e);
		assert!(remote.operation == "list");
		assert!(remote.body_text() == Some("internal error"));
	}

	#[tokio::test]
	async fn not_found_handling() {
		let transport = FakeTransport::respond(404, r#"{"error":"Not Found"}"#);
		let_assert!(Ok(handle) = bind("messages", contract(), resolver(), transport.clone()));
		let_assert!(Err(e) = handle.invoke::<_, Option<String>>("get", Arguments::new().path("id", 1)).await);
		assert!(e.remote_status() == Some(404));

		let config = ClientConfig::default().decode_not_found(true);
		let_assert!(Ok(handle) = bind_with_config("messages", contract(), resolver(), transport, config));
		assert!(let Ok(None) = handle.invoke::<_, Option<String>>("get", Arguments::new().path("id", 1)).await);
	}

	#[tokio::test]
	async fn transport_failure() {
		let transport = Arc::new(FakeTransport::default());
		let_assert!(Ok(handle) = bind("messages", contract(), resolver(), transport));
		let_assert!(Err(InvokeError::Transport(e)) = handle.invoke::<_, Vec<String>>("list", Arguments::new()).await);
		assert!(e.kind() == TransportErrorKind::Connect);
	}

	#[tokio::test]
	async fn timeout() {
		let transport = Arc::new(FakeTransport {
			response: Mutex::new(Some(RawResponse::new(200, "[]"))),
			delay: Some(Duration::from_secs(5)),
			..Default::default()
		});
		let config = ClientConfig::default().timeout(Duration::from_millis(20));
		let_assert!(Ok(handle) = bind_with_config("messages", contract(), resolver(), transport, config));
		let_assert!(Err(e) = handle.invoke::<_, Vec<String>>("list", Arguments::new()).await);
		assert!(e.is_timeout());
	}

	#[tokio::test]
	async fn concurrent_invocations() {
		let transport = FakeTransport::respond(200, "[]");
		let_assert!(Ok(handle) = bind("messages", contract(), resolver(), transport.clone()));

		let tasks: Vec<_> = (0..8)
			.map(|i| {
				let handle = handle.clone();
				tokio::spawn(async move { handle.invoke::<_, Vec<String>>("list", Arguments::new().query("limit", i)).await })
			})
			.collect();
		for task in tasks {
			let_assert!(Ok(Ok(_)) = task.await);
		}
		assert!(transport.requests().len() == 8);
	}
}
