use proc_macro2::TokenStream;
use quote::quote;

use super::parse::cooked::ContractDefinition;

mod client;
mod descriptor;

/// Generate the module for a contract.
pub fn generate_contract(contract_rpc: &syn::Ident, contract: &ContractDefinition) -> TokenStream {
	let mut item_tokens = TokenStream::new();

	descriptor::generate_descriptor(&mut item_tokens, contract_rpc, contract);
	client::generate_client(&mut item_tokens, contract_rpc, contract);

	let visibility = contract.visibility();
	let name = contract.name();
	let doc = if contract.doc().is_empty() {
		let doc = format!("Typed client for the `{}` contract.", name);
		quote!(#[doc = #doc])
	} else {
		to_doc_attrs(contract.doc())
	};

	quote! {
		#doc
		#visibility mod #name {
			#[allow(unused_imports)]
			use super::*;

			#item_tokens
		}
	}
}

fn to_doc_attrs(docs: &[crate::util::WithSpan<String>]) -> TokenStream {
	let mut tokens = TokenStream::new();
	for doc in docs {
		let text = &doc.value;
		tokens.extend(quote::quote_spanned!(doc.span => #[doc = #text]));
	}
	tokens
}
