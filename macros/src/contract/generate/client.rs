use proc_macro2::TokenStream;
use quote::quote;

use crate::contract::parse::cooked::{ContractDefinition, OperationDefinition, ParamLocation};

use super::to_doc_attrs;

/// Generate the typed client struct.
pub fn generate_client(item_tokens: &mut TokenStream, contract_rpc: &syn::Ident, contract: &ContractDefinition) {
	let client_doc = format!("Client for the `{}` contract.", contract.name());
	let operations = contract.operations().iter().map(|operation| generate_operation(contract_rpc, operation));

	item_tokens.extend(quote! {
		#[doc = #client_doc]
		///
		/// The client has one function per operation of the contract.
		/// It can be cloned cheaply to share it between tasks.
		pub struct Client<F: #contract_rpc::format::Format = #contract_rpc::Json> {
			handle: #contract_rpc::ClientHandle<F>,
		}

		impl<F: #contract_rpc::format::Format> ::core::fmt::Debug for Client<F> {
			fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
				f.debug_struct(::core::any::type_name::<Self>())
					.field("handle", &self.handle)
					.finish()
			}
		}

		impl<F: #contract_rpc::format::Format> ::core::clone::Clone for Client<F> {
			fn clone(&self) -> Self {
				Self {
					handle: self.handle.clone(),
				}
			}
		}

		impl<F: #contract_rpc::format::Format> Client<F> {
			/// Bind the contract to a named service with the default configuration.
			pub fn bind<R, T>(
				service_name: impl ::core::convert::Into<::std::string::String>,
				resolver: R,
				transport: T,
			) -> ::core::result::Result<Self, #contract_rpc::BindError>
			where
				R: #contract_rpc::Resolver + 'static,
				T: #contract_rpc::Transport + 'static,
			{
				Self::bind_with_config(service_name, resolver, transport, #contract_rpc::ClientConfig::default())
			}

			/// Bind the contract to a named service.
			pub fn bind_with_config<R, T>(
				service_name: impl ::core::convert::Into<::std::string::String>,
				resolver: R,
				transport: T,
				config: #contract_rpc::ClientConfig,
			) -> ::core::result::Result<Self, #contract_rpc::BindError>
			where
				R: #contract_rpc::Resolver + 'static,
				T: #contract_rpc::Transport + 'static,
			{
				let contract = descriptor().media_type(<F as #contract_rpc::format::Format>::MEDIA_TYPE);
				let handle = #contract_rpc::ClientHandle::bind_with_config(service_name, contract, resolver, transport, config)?;
				::core::result::Result::Ok(Self { handle })
			}

			/// Wrap an existing handle.
			///
			/// Operations missing from the contract of the handle fail with an argument error when invoked.
			pub fn from_handle(handle: #contract_rpc::ClientHandle<F>) -> Self {
				Self { handle }
			}

			/// Get the untyped handle used by the client.
			pub fn handle(&self) -> &#contract_rpc::ClientHandle<F> {
				&self.handle
			}

			/// Consume the client and get the untyped handle.
			pub fn into_handle(self) -> #contract_rpc::ClientHandle<F> {
				self.handle
			}

			#(#operations)*
		}
	})
}

fn generate_operation(contract_rpc: &syn::Ident, operation: &OperationDefinition) -> TokenStream {
	let function_name = operation.name();
	let operation_name = operation.name_str();
	let doc = if operation.doc().is_empty() {
		let doc = format!("Invoke the `{}` operation.", operation_name);
		quote!(#[doc = #doc])
	} else {
		to_doc_attrs(operation.doc())
	};
	let return_type = operation.return_type();

	let mut inputs = Vec::new();
	let mut arguments = Vec::new();
	for param in operation.params() {
		let name = param.name();
		let name_str = param.name_str();
		let ty = param.ty();
		match param.location() {
			ParamLocation::Path => {
				inputs.push(quote!(#name: #ty));
				arguments.push(quote!(.path(#name_str, #name)));
			},
			ParamLocation::Query => {
				inputs.push(quote!(#name: #ty));
				arguments.push(quote!(.query(#name_str, #name)));
			},
			ParamLocation::Body => {
				inputs.push(quote!(#name: &#ty));
				arguments.push(quote!(.body(#name)));
			},
		}
	}

	quote! {
		#doc
		#[allow(clippy::ptr_arg, clippy::too_many_arguments)]
		pub async fn #function_name(&self, #(#inputs),*) -> ::core::result::Result<#return_type, #contract_rpc::InvokeError> {
			let arguments = #contract_rpc::Arguments::new()
				#(#arguments)*;
			self.handle.invoke(#operation_name, arguments).await
		}
	}
}
