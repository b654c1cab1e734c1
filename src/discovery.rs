//! Service discovery: resolving service names to network addresses.

use std::collections::HashMap;
use std::sync::Arc;

use url::Url;

use crate::ServiceName;
use crate::error::{InvalidAddress, ResolutionError};

/// The base address of a service instance, like `http://messages:8080/api/`.
///
/// Request paths are appended to the path of the base address.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct NetworkAddress {
	url: Url,
}

impl NetworkAddress {
	/// Create a network address from a URL.
	///
	/// The URL must be an `http` or `https` URL without query string or fragment.
	pub fn new(url: Url) -> Result<Self, InvalidAddress> {
		let invalid = |message: &str| InvalidAddress {
			address: url.to_string(),
			message: message.into(),
		};

		if !matches!(url.scheme(), "http" | "https") {
			return Err(invalid("expected an http or https URL"));
		}
		if url.cannot_be_a_base() || !url.has_host() {
			return Err(invalid("the URL can not be used as base address"));
		}
		if url.query().is_some() || url.fragment().is_some() {
			return Err(invalid("a base address may not have a query string or fragment"));
		}

		Ok(Self { url })
	}

	/// Parse a network address.
	pub fn parse(address: &str) -> Result<Self, InvalidAddress> {
		let url = Url::parse(address).map_err(|e| InvalidAddress {
			address: address.into(),
			message: e.to_string(),
		})?;
		Self::new(url)
	}

	/// Get the base URL.
	pub fn url(&self) -> &Url {
		&self.url
	}
}

impl std::fmt::Display for NetworkAddress {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		self.url.fmt(f)
	}
}

impl std::str::FromStr for NetworkAddress {
	type Err = InvalidAddress;

	fn from_str(address: &str) -> Result<Self, Self::Err> {
		Self::parse(address)
	}
}

/// Trait for service discovery backends.
///
/// Resolution happens for every invocation, so implementations may return a different address each time.
#[async_trait::async_trait]
pub trait Resolver: Send + Sync {
	/// Resolve a service name to the address of a service instance.
	async fn resolve(&self, service_name: &ServiceName) -> Result<NetworkAddress, ResolutionError>;
}

#[async_trait::async_trait]
impl<T> Resolver for Box<T>
where
	T: Resolver + ?Sized,
{
	async fn resolve(&self, service_name: &ServiceName) -> Result<NetworkAddress, ResolutionError> {
		self.as_ref().resolve(service_name).await
	}
}

#[async_trait::async_trait]
impl<T> Resolver for Arc<T>
where
	T: Resolver + ?Sized,
{
	async fn resolve(&self, service_name: &ServiceName) -> Result<NetworkAddress, ResolutionError> {
		self.as_ref().resolve(service_name).await
	}
}

/// Resolver backed by a fixed table of service names and addresses.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
	services: HashMap<String, NetworkAddress>,
}

impl StaticResolver {
	/// Create a resolver that does not know any services.
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a resolver from `(name, address)` pairs.
	///
	/// Fails on the first address that can not be parsed.
	pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, InvalidAddress>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: AsRef<str>,
	{
		let mut resolver = Self::new();
		for (name, address) in pairs {
			resolver.insert(name, NetworkAddress::parse(address.as_ref())?);
		}
		Ok(resolver)
	}

	/// Add a service, returning the resolver.
	pub fn with_service(mut self, name: impl Into<String>, address: NetworkAddress) -> Self {
		self.insert(name, address);
		self
	}

	/// Add or replace a service.
	///
	/// Returns the previous address of the service, if any.
	pub fn insert(&mut self, name: impl Into<String>, address: NetworkAddress) -> Option<NetworkAddress> {
		self.services.insert(name.into(), address)
	}

	/// Remove a service.
	pub fn remove(&mut self, name: &str) -> Option<NetworkAddress> {
		self.services.remove(name)
	}

	/// Look up the address of a service without going through the [`Resolver`] trait.
	pub fn get(&self, name: &str) -> Option<&NetworkAddress> {
		self.services.get(name)
	}
}

impl FromIterator<(String, NetworkAddress)> for StaticResolver {
	fn from_iter<I: IntoIterator<Item = (String, NetworkAddress)>>(iter: I) -> Self {
		Self {
			services: iter.into_iter().collect(),
		}
	}
}

#[async_trait::async_trait]
impl Resolver for StaticResolver {
	async fn resolve(&self, service_name: &ServiceName) -> Result<NetworkAddress, ResolutionError> {
		let address = self
			.services
			.get(service_name.as_str())
			.ok_or_else(|| ResolutionError::unknown_service(service_name.as_str()))?;
		log::trace!("resolved service {} to {}", service_name, address);
		Ok(address.clone())
	}
}

/// Resolver that resolves every service name to the same address.
///
/// This bypasses discovery, for example to point a client directly at a local instance.
#[derive(Debug, Clone)]
pub struct FixedResolver {
	address: NetworkAddress,
}

impl FixedResolver {
	/// Create a resolver that always returns `address`.
	pub fn new(address: NetworkAddress) -> Self {
		Self { address }
	}
}

#[async_trait::async_trait]
impl Resolver for FixedResolver {
	async fn resolve(&self, _service_name: &ServiceName) -> Result<NetworkAddress, ResolutionError> {
		Ok(self.address.clone())
	}
}
