use std::collections::HashSet;

use crate::error::{BindingError, ConfigurationError};
use crate::path::PathTemplate;

/// The logical name of a remote service, used for discovery.
///
/// A service name is never empty.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ServiceName(String);

impl ServiceName {
	/// Create a new service name.
	pub fn new(name: impl Into<String>) -> Result<Self, BindingError> {
		let name = name.into();
		if name.is_empty() {
			Err(BindingError::EmptyServiceName)
		} else {
			Ok(Self(name))
		}
	}

	/// Get the service name as string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for ServiceName {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for ServiceName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

/// The transport verb of an operation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Verb {
	/// HTTP GET.
	Get,

	/// HTTP POST.
	Post,

	/// HTTP PUT.
	Put,

	/// HTTP PATCH.
	Patch,

	/// HTTP DELETE.
	Delete,

	/// HTTP HEAD.
	Head,

	/// HTTP OPTIONS.
	Options,
}

impl Verb {
	/// Get the verb as upper case method name.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
			Self::Head => "HEAD",
			Self::Options => "OPTIONS",
		}
	}
}

impl std::fmt::Display for Verb {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Where a parameter is placed in the request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ParamLocation {
	/// Substituted into a placeholder of the path template.
	Path,

	/// Appended to the query string.
	Query,

	/// Encoded as the request body.
	Body,
}

/// Declaration of a single parameter of an operation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParamSpec {
	name: String,
	location: ParamLocation,
	type_name: String,
}

impl ParamSpec {
	/// Create a new parameter declaration.
	pub fn new(name: impl Into<String>, location: ParamLocation, type_name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			location,
			type_name: type_name.into(),
		}
	}

	/// Declare a path parameter of type `T`.
	pub fn path<T: ?Sized>(name: impl Into<String>) -> Self {
		Self::new(name, ParamLocation::Path, std::any::type_name::<T>())
	}

	/// Declare a query parameter of type `T`.
	pub fn query<T: ?Sized>(name: impl Into<String>) -> Self {
		Self::new(name, ParamLocation::Query, std::any::type_name::<T>())
	}

	/// Declare a body parameter of type `T`.
	pub fn body<T: ?Sized>(name: impl Into<String>) -> Self {
		Self::new(name, ParamLocation::Body, std::any::type_name::<T>())
	}

	/// Get the name of the parameter.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Get the location of the parameter.
	pub fn location(&self) -> ParamLocation {
		self.location
	}

	/// Get the name of the parameter type.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}
}

/// Declaration of a single remote operation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OperationSpec {
	name: String,
	verb: Verb,
	path: String,
	params: Vec<ParamSpec>,
	return_type: String,
}

impl OperationSpec {
	/// Create a new operation without parameters that returns `()`.
	pub fn new(name: impl Into<String>, verb: Verb, path: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			verb,
			path: path.into(),
			params: Vec::new(),
			return_type: std::any::type_name::<()>().into(),
		}
	}

	/// Add a parameter.
	pub fn param(mut self, param: ParamSpec) -> Self {
		self.params.push(param);
		self
	}

	/// Set the return type to `T`.
	pub fn returns<T: ?Sized>(self) -> Self {
		self.returns_type(std::any::type_name::<T>())
	}

	/// Set the name of the return type.
	pub fn returns_type(mut self, type_name: impl Into<String>) -> Self {
		self.return_type = type_name.into();
		self
	}

	/// Get the name of the operation.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Get the transport verb.
	pub fn verb(&self) -> Verb {
		self.verb
	}

	/// Get the path template text.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Get the declared parameters in order.
	pub fn params(&self) -> &[ParamSpec] {
		&self.params
	}

	/// Get the declared parameter with the given name.
	pub fn param_by_name(&self, name: &str) -> Option<&ParamSpec> {
		self.params.iter().find(|param| param.name == name)
	}

	/// Get the body parameter, if the operation declares one.
	pub fn body_param(&self) -> Option<&ParamSpec> {
		self.params.iter().find(|param| param.location == ParamLocation::Body)
	}

	/// Get the name of the return type.
	pub fn return_type(&self) -> &str {
		&self.return_type
	}

	/// Check the operation and parse the path template.
	fn compile(&self) -> Result<PathTemplate, ConfigurationError> {
		let template = PathTemplate::parse(&self.path).map_err(|source| ConfigurationError::InvalidPathTemplate {
			operation: self.name.clone(),
			source,
		})?;

		let mut names = HashSet::new();
		let mut bodies = 0;
		for param in &self.params {
			if !names.insert(param.name.as_str()) {
				return Err(ConfigurationError::DuplicateParameter {
					operation: self.name.clone(),
					parameter: param.name.clone(),
				});
			}
			match param.location {
				ParamLocation::Path => {
					if !template.placeholders().any(|placeholder| placeholder == param.name) {
						return Err(ConfigurationError::UnusedPathParameter {
							operation: self.name.clone(),
							parameter: param.name.clone(),
						});
					}
				},
				ParamLocation::Body => bodies += 1,
				ParamLocation::Query => (),
			}
		}

		if bodies > 1 {
			return Err(ConfigurationError::MultipleBodies { operation: self.name.clone() });
		}

		for placeholder in template.placeholders() {
			let bound = self.params.iter().any(|param| param.location == ParamLocation::Path && param.name == placeholder);
			if !bound {
				return Err(ConfigurationError::UnboundPlaceholder {
					operation: self.name.clone(),
					placeholder: placeholder.to_owned(),
				});
			}
		}

		Ok(template)
	}
}

/// An ordered collection of remote operations: the shape of a remote API.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ContractDescriptor {
	name: String,
	media_type: String,
	operations: Vec<OperationSpec>,
}

impl ContractDescriptor {
	/// Create a new contract without operations.
	///
	/// The declared media type defaults to `application/json`.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			media_type: String::from("application/json"),
			operations: Vec::new(),
		}
	}

	/// Set the media type of request and response bodies.
	pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
		self.media_type = media_type.into();
		self
	}

	/// Add an operation.
	///
	/// Duplicate names are accepted here, but rejected when the contract is bound.
	pub fn operation(mut self, operation: OperationSpec) -> Self {
		self.operations.push(operation);
		self
	}

	/// Get the name of the contract.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Get the declared media type.
	pub fn declared_media_type(&self) -> &str {
		&self.media_type
	}

	/// Get the operations in order of declaration.
	pub fn operations(&self) -> &[OperationSpec] {
		&self.operations
	}

	/// Get an operation by name.
	pub fn get(&self, name: &str) -> Option<&OperationSpec> {
		self.operations.iter().find(|operation| operation.name == name)
	}

	/// Check that the contract is internally consistent.
	pub fn validate(&self) -> Result<(), ConfigurationError> {
		self.compile().map(drop)
	}

	/// Check the contract and parse the path templates of all operations.
	///
	/// The returned templates are in the same order as the operations.
	pub(crate) fn compile(&self) -> Result<Vec<PathTemplate>, ConfigurationError> {
		if self.operations.is_empty() {
			return Err(ConfigurationError::EmptyContract { contract: self.name.clone() });
		}

		let mut names = HashSet::new();
		for operation in &self.operations {
			if !names.insert(operation.name.as_str()) {
				return Err(ConfigurationError::DuplicateOperation {
					contract: self.name.clone(),
					operation: operation.name.clone(),
				});
			}
		}

		self.operations.iter().map(OperationSpec::compile).collect()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use assert2::assert;
	use assert2::let_assert;

	fn messages() -> ContractDescriptor {
		ContractDescriptor::new("messages-api")
			.operation(OperationSpec::new("list", Verb::Get, "/messages").returns::<Vec<String>>())
			.operation(
				OperationSpec::new("get", Verb::Get, "/messages/{id}")
					.param(ParamSpec::path::<u64>("id"))
					.returns::<String>(),
			)
	}

	#[test]
	fn service_name_may_not_be_empty() {
		assert!(let Err(BindingError::EmptyServiceName) = ServiceName::new(""));
		let_assert!(Ok(name) = ServiceName::new("messages"));
		assert!(name.as_str() == "messages");
	}

	#[test]
	fn valid_contract() {
		let contract = messages();
		assert!(let Ok(()) = contract.validate());
		let_assert!(Some(get) = contract.get("get"));
		assert!(get.verb() == Verb::Get);
		assert!(get.return_type() == "alloc::string::String");
		let_assert!(Some(id) = get.param_by_name("id"));
		assert!(id.location() == ParamLocation::Path);
		assert!(id.type_name() == "u64");
	}

	#[test]
	fn duplicate_operation_names() {
		let contract = messages().operation(OperationSpec::new("list", Verb::Post, "/messages"));
		let_assert!(Err(ConfigurationError::DuplicateOperation { operation, .. }) = contract.validate());
		assert!(operation == "list");
	}

	#[test]
	fn empty_contract() {
		assert!(let Err(ConfigurationError::EmptyContract { .. }) = ContractDescriptor::new("empty").validate());
	}

	#[test]
	fn placeholders_must_match_path_params() {
		let unbound = ContractDescriptor::new("c").operation(OperationSpec::new("get", Verb::Get, "/messages/{id}"));
		let_assert!(Err(ConfigurationError::UnboundPlaceholder { placeholder, .. }) = unbound.validate());
		assert!(placeholder == "id");

		let unused = ContractDescriptor::new("c")
			.operation(OperationSpec::new("get", Verb::Get, "/messages").param(ParamSpec::path::<u64>("id")));
		assert!(let Err(ConfigurationError::UnusedPathParameter { .. }) = unused.validate());
	}

	#[test]
	fn malformed_path_template() {
		let contract = ContractDescriptor::new("c").operation(OperationSpec::new("get", Verb::Get, "/messages/{id"));
		assert!(let Err(ConfigurationError::InvalidPathTemplate { .. }) = contract.validate());
	}

	#[test]
	fn parameter_declarations() {
		let duplicate = ContractDescriptor::new("c").operation(
			OperationSpec::new("search", Verb::Get, "/messages")
				.param(ParamSpec::query::<String>("q"))
				.param(ParamSpec::query::<u32>("q")),
		);
		assert!(let Err(ConfigurationError::DuplicateParameter { .. }) = duplicate.validate());

		let bodies = ContractDescriptor::new("c").operation(
			OperationSpec::new("create", Verb::Post, "/messages")
				.param(ParamSpec::body::<String>("a"))
				.param(ParamSpec::body::<String>("b")),
		);
		assert!(let Err(ConfigurationError::MultipleBodies { .. }) = bodies.validate());
	}
}
