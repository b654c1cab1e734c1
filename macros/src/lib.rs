mod contract;
mod util;

/// Define an API contract with a typed client.
///
/// Use this through the `contract_rpc::contract!` macro, which passes the path of the runtime crate as first token.
#[proc_macro]
pub fn contract(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
	contract::generate_contract(tokens.into()).into()
}
