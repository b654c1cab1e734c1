use proc_macro2::TokenStream;
use quote::quote;

use crate::contract::parse::cooked::{ContractDefinition, OperationDefinition, ParamLocation, Verb};

/// Generate the `descriptor()` function that builds the runtime contract.
pub fn generate_descriptor(item_tokens: &mut TokenStream, contract_rpc: &syn::Ident, contract: &ContractDefinition) {
	let contract_name = contract.name().to_string();
	let doc = format!("Get the descriptor of the `{}` contract.", contract_name);
	let operations = contract.operations().iter().map(|operation| generate_operation_spec(contract_rpc, operation));

	item_tokens.extend(quote! {
		#[doc = #doc]
		pub fn descriptor() -> #contract_rpc::ContractDescriptor {
			#contract_rpc::ContractDescriptor::new(#contract_name)
				#(.operation(#operations))*
		}
	})
}

fn generate_operation_spec(contract_rpc: &syn::Ident, operation: &OperationDefinition) -> TokenStream {
	let name = operation.name_str();
	let path = operation.path();
	let verb = match operation.verb().value {
		Verb::Get => quote!(Get),
		Verb::Post => quote!(Post),
		Verb::Put => quote!(Put),
		Verb::Patch => quote!(Patch),
		Verb::Delete => quote!(Delete),
		Verb::Head => quote!(Head),
		Verb::Options => quote!(Options),
	};
	let verb = quote::quote_spanned!(operation.verb().span => #contract_rpc::Verb::#verb);

	let params = operation.params().iter().map(|param| {
		let name = param.name_str();
		let ty = param.ty();
		let constructor = match param.location() {
			ParamLocation::Path => quote!(path),
			ParamLocation::Query => quote!(query),
			ParamLocation::Body => quote!(body),
		};
		quote!(.param(#contract_rpc::ParamSpec::#constructor::<#ty>(#name)))
	});
	let return_type = operation.return_type();

	quote! {
		#contract_rpc::OperationSpec::new(#name, #verb, #path)
			#(#params)*
			.returns::<#return_type>()
	}
}
