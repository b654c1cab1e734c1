//! Bind typed API contracts to named remote services.
//!
//! A [`ContractDescriptor`] describes the operations of a remote API:
//! their names, transport verbs, path templates, parameters and return types.
//! [`bind()`] combines a contract with a service name, a [`Resolver`] and a [`Transport`]
//! into a [`ClientHandle`] that performs one request/response exchange per invocation.
//! The service name is resolved to a [`NetworkAddress`] for every invocation, never at bind time.
//!
//! With the `macros` feature, the [`contract!`] macro generates a typed client
//! with one async function per operation on top of the same machinery.
//!
//! Retries, caching, load balancing and circuit breaking are deliberately left to the caller.

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod binder;
mod contract;
mod discovery;
mod path;
pub mod error;
pub mod format;
pub mod transport;

pub use binder::Arguments;
pub use binder::ClientConfig;
pub use binder::ClientHandle;
pub use binder::Operation;
pub use binder::bind;
pub use binder::bind_with_config;
pub use contract::ContractDescriptor;
pub use contract::OperationSpec;
pub use contract::ParamLocation;
pub use contract::ParamSpec;
pub use contract::ServiceName;
pub use contract::Verb;
pub use discovery::FixedResolver;
pub use discovery::NetworkAddress;
pub use discovery::Resolver;
pub use discovery::StaticResolver;
pub use error::BindError;
pub use error::InvokeError;
pub use format::Format;
pub use format::Json;
pub use path::PathTemplate;
pub use transport::RawRequest;
pub use transport::RawResponse;
pub use transport::Transport;

#[cfg(feature = "http")]
pub use transport::HttpTransport;

#[cfg(feature = "macros")]
#[doc(hidden)]
pub use macros::contract_impl;
