mod generate;
mod parse;

pub fn generate_contract(tokens: proc_macro2::TokenStream) -> proc_macro2::TokenStream {
	let raw: parse::raw::ContractInput = match syn::parse2(tokens) {
		Ok(x) => x,
		Err(e) => return e.into_compile_error(),
	};

	let mut tokens = proc_macro2::TokenStream::new();
	let mut errors = Vec::new();
	let contract = parse::cooked::ContractDefinition::from_raw(&mut errors, raw.contract);
	for error in errors {
		tokens.extend(error.into_compile_error());
	}

	tokens.extend(generate::generate_contract(&raw.contract_rpc, &contract));
	tokens
}
