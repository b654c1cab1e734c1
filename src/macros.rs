#[cfg(feature = "macros")]
#[doc(hidden)]
pub use contract_rpc_macros::contract as contract_impl;

/// Define an API contract and generate a typed client for it.
///
/// The macro generates a module with a `descriptor()` function returning the [`ContractDescriptor`][crate::ContractDescriptor]
/// and a `Client` struct with one async function per operation.
///
/// ```ignore
/// contract_rpc::contract! {
///     /// The messages API.
///     pub contract messages_api {
///         /// List all messages.
///         operation list_messages: GET "/messages" (query limit: Option<u32>) -> Vec<Message>,
///
///         /// Get a single message.
///         operation get_message: GET "/messages/{id}" (path id: u64) -> Message,
///
///         /// Create a message.
///         operation create_message: POST "/messages" (body message: NewMessage) -> Message,
///
///         /// Delete a message.
///         operation delete_message: DELETE "/messages/{id}" (path id: u64),
///     }
/// }
///
/// let client = messages_api::Client::<Json>::bind("messages", resolver, transport)?;
/// let messages = client.list_messages(Some(10)).await?;
/// ```
///
/// Path and query parameters are taken by value, body parameters by reference.
/// Operations without `->` return `()`.
#[cfg(feature = "macros")]
#[macro_export]
macro_rules! contract {
	($($tokens:tt)*) => {
		$crate::contract_impl!{$crate; $($tokens)*}
	}
}
