/// Second stage parsing types.
///
/// These types never contain invalid data.
/// However, parsing them from their [`raw`] counterparts
/// always gives a cooked type and a list of errors.
/// If the list of errors is non-empty,
/// input data that caused the errors was discarded from the cooked type.
///
/// The cooked type can still be used for code generation to minimize the impact
/// on code using the generated type, but the errors MUST be emitted too.
pub mod cooked {
	use syn::ext::IdentExt;

	use crate::util::{parse_doc_attr_contents, path_placeholders, WithSpan};
	use super::raw;

	pub struct ContractDefinition {
		visibility: syn::Visibility,
		name: syn::Ident,
		doc: Vec<WithSpan<String>>,
		operations: Vec<OperationDefinition>,
	}

	pub struct OperationDefinition {
		name: syn::Ident,
		doc: Vec<WithSpan<String>>,
		verb: WithSpan<Verb>,
		path: syn::LitStr,
		params: Vec<ParamDefinition>,
		return_type: Box<syn::Type>,
	}

	pub struct ParamDefinition {
		location: ParamLocation,
		name: syn::Ident,
		ty: Box<syn::Type>,
	}

	#[derive(Debug, Copy, Clone, Eq, PartialEq)]
	pub enum Verb {
		Get,
		Post,
		Put,
		Patch,
		Delete,
		Head,
		Options,
	}

	#[derive(Debug, Copy, Clone, Eq, PartialEq)]
	pub enum ParamLocation {
		Path,
		Query,
		Body,
	}

	struct DocOnlyAttributes {
		doc: Vec<WithSpan<String>>,
	}

	/// Names of the functions generated on the client besides the operations.
	const RESERVED_NAMES: &[&str] = &["bind", "bind_with_config", "from_handle", "handle", "into_handle"];

	impl ContractDefinition {
		pub fn visibility(&self) -> &syn::Visibility {
			&self.visibility
		}

		pub fn name(&self) -> &syn::Ident {
			&self.name
		}

		pub fn doc(&self) -> &[WithSpan<String>] {
			&self.doc
		}

		pub fn operations(&self) -> &[OperationDefinition] {
			&self.operations
		}

		pub fn from_raw(errors: &mut Vec<syn::Error>, raw: raw::ContractDefinition) -> Self {
			let attrs = DocOnlyAttributes::from_raw(errors, raw.attrs);
			let mut operations: Vec<_> = raw.operations
				.into_iter()
				.map(|raw| OperationDefinition::from_raw(errors, raw))
				.collect();

			if operations.is_empty() {
				errors.push(syn::Error::new(raw.name.span(), "a contract needs at least one operation"));
			}

			// Remove operations with duplicate or reserved names, because they'll cause a lot more compile errors.
			let mut remove = Vec::new();
			for (i, operation) in operations.iter().enumerate() {
				let name = operation.name_str();
				if RESERVED_NAMES.contains(&name.as_str()) {
					let message = format!("operation name `{name}` is reserved for a method of the generated client");
					errors.push(syn::Error::new(operation.name().span(), message));
					remove.push(i);
				}
			}
			for (a_i, a) in operations.iter().enumerate() {
				for (b_i, b) in operations.iter().enumerate().skip(a_i + 1) {
					if a.name() == b.name() && !remove.contains(&a_i) && !remove.contains(&b_i) {
						errors.push(syn::Error::new(b.name().span(), "duplicate operation name"));
						remove.push(b_i);
					}
				}
			}
			remove.sort_unstable();
			for i in remove.into_iter().rev() {
				operations.remove(i);
			}

			Self {
				visibility: raw.visibility,
				name: raw.name,
				doc: attrs.doc,
				operations,
			}
		}
	}

	impl OperationDefinition {
		pub fn name(&self) -> &syn::Ident {
			&self.name
		}

		/// The operation name as used in the contract descriptor, without a `r#` prefix.
		pub fn name_str(&self) -> String {
			self.name.unraw().to_string()
		}

		pub fn doc(&self) -> &[WithSpan<String>] {
			&self.doc
		}

		pub fn verb(&self) -> &WithSpan<Verb> {
			&self.verb
		}

		pub fn path(&self) -> &syn::LitStr {
			&self.path
		}

		pub fn params(&self) -> &[ParamDefinition] {
			&self.params
		}

		pub fn return_type(&self) -> &syn::Type {
			self.return_type.as_ref()
		}

		fn from_raw(errors: &mut Vec<syn::Error>, raw: raw::OperationDefinition) -> Self {
			let attrs = DocOnlyAttributes::from_raw(errors, raw.attrs);
			let verb = Verb::from_raw(errors, &raw.verb);

			let mut params: Vec<ParamDefinition> = Vec::new();
			if let Some(list) = raw.params {
				for param in list.params {
					let param = ParamDefinition::from_raw(param);
					if params.iter().any(|other| other.name == param.name) {
						errors.push(syn::Error::new(param.name.span(), "duplicate parameter name"));
					} else if param.location == ParamLocation::Body && params.iter().any(|other| other.location == ParamLocation::Body) {
						errors.push(syn::Error::new(param.name.span(), "an operation can have at most one body parameter"));
					} else {
						params.push(param);
					}
				}
			}

			let template = raw.path.value();
			let placeholders = path_placeholders(&template);
			for param in &params {
				if param.location == ParamLocation::Path && !placeholders.contains(&param.name_str().as_str()) {
					errors.push(syn::Error::new(param.name.span(), "path parameter does not appear in the path template"));
				}
			}
			for placeholder in placeholders {
				let bound = params.iter().any(|param| param.location == ParamLocation::Path && param.name_str() == placeholder);
				if !bound {
					errors.push(syn::Error::new(raw.path.span(), format!("placeholder `{{{placeholder}}}` has no matching path parameter")));
				}
			}

			let return_type = match raw.output {
				syn::ReturnType::Default => Box::new(syn::parse_quote!(())),
				syn::ReturnType::Type(_arrow, ty) => ty,
			};

			Self {
				name: raw.name,
				doc: attrs.doc,
				verb,
				path: raw.path,
				params,
				return_type,
			}
		}
	}

	impl ParamDefinition {
		pub fn location(&self) -> ParamLocation {
			self.location
		}

		pub fn name(&self) -> &syn::Ident {
			&self.name
		}

		/// The parameter name as used in the contract descriptor, without a `r#` prefix.
		pub fn name_str(&self) -> String {
			self.name.unraw().to_string()
		}

		pub fn ty(&self) -> &syn::Type {
			self.ty.as_ref()
		}

		fn from_raw(raw: raw::ParamDefinition) -> Self {
			let location = match raw.location {
				raw::ParamLocation::Path => ParamLocation::Path,
				raw::ParamLocation::Query => ParamLocation::Query,
				raw::ParamLocation::Body => ParamLocation::Body,
			};
			Self {
				location,
				name: raw.name,
				ty: raw.ty,
			}
		}
	}

	impl Verb {
		fn from_raw(errors: &mut Vec<syn::Error>, ident: &syn::Ident) -> WithSpan<Verb> {
			let verb = match ident.to_string().as_str() {
				"GET" => Self::Get,
				"POST" => Self::Post,
				"PUT" => Self::Put,
				"PATCH" => Self::Patch,
				"DELETE" => Self::Delete,
				"HEAD" => Self::Head,
				"OPTIONS" => Self::Options,
				_ => {
					errors.push(syn::Error::new(
						ident.span(),
						"unknown verb, expected one of GET, POST, PUT, PATCH, DELETE, HEAD or OPTIONS",
					));
					Self::Get
				},
			};
			WithSpan::new(ident.span(), verb)
		}
	}

	impl DocOnlyAttributes {
		fn from_raw(errors: &mut Vec<syn::Error>, attrs: Vec<syn::Attribute>) -> Self {
			let mut doc = Vec::new();

			for attr in attrs {
				if attr.path().is_ident("doc") {
					match parse_doc_attr_contents(&attr) {
						Ok(x) => doc.push(x),
						Err(e) => errors.push(e),
					}
				} else {
					errors.push(syn::Error::new_spanned(attr.path(), "unknown attribute"));
				}
			}

			Self { doc }
		}
	}
}

/// First stage parsing types.
///
/// The types in this modules still contain potentially invalid data.
/// We want to fully parse this raw form before continuing to more detailed error checking.
pub mod raw {
	mod keyword {
		syn::custom_keyword!(contract);
		syn::custom_keyword!(operation);
		syn::custom_keyword!(path);
		syn::custom_keyword!(query);
		syn::custom_keyword!(body);
	}

	pub struct ContractInput {
		pub contract_rpc: syn::Ident,
		pub _semi_token: syn::token::Semi,
		pub contract: ContractDefinition,
	}

	pub struct ContractDefinition {
		pub attrs: Vec<syn::Attribute>,
		pub visibility: syn::Visibility,
		pub _contract: keyword::contract,
		pub name: syn::Ident,
		pub _brace_token: syn::token::Brace,
		pub operations: syn::punctuated::Punctuated<OperationDefinition, syn::token::Comma>,
	}

	pub struct OperationDefinition {
		pub attrs: Vec<syn::Attribute>,
		pub _operation: keyword::operation,
		pub name: syn::Ident,
		pub _colon: syn::token::Colon,
		pub verb: syn::Ident,
		pub path: syn::LitStr,
		pub params: Option<ParamList>,
		pub output: syn::ReturnType,
	}

	pub struct ParamList {
		pub _paren_token: syn::token::Paren,
		pub params: syn::punctuated::Punctuated<ParamDefinition, syn::token::Comma>,
	}

	pub struct ParamDefinition {
		pub location: ParamLocation,
		pub name: syn::Ident,
		pub _colon: syn::token::Colon,
		pub ty: Box<syn::Type>,
	}

	pub enum ParamLocation {
		Path,
		Query,
		Body,
	}

	impl syn::parse::Parse for ContractInput {
		fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
			Ok(Self {
				contract_rpc: input.parse()?,
				_semi_token: input.parse()?,
				contract: input.parse()?,
			})
		}
	}

	impl syn::parse::Parse for ContractDefinition {
		fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
			let body;
			Ok(Self {
				attrs: input.call(syn::Attribute::parse_outer)?,
				visibility: input.parse()?,
				_contract: input.parse()?,
				name: input.parse()?,
				_brace_token: syn::braced!(body in input),
				operations: body.call(syn::punctuated::Punctuated::parse_terminated)?,
			})
		}
	}

	impl syn::parse::Parse for OperationDefinition {
		fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
			Ok(Self {
				attrs: input.call(syn::Attribute::parse_outer)?,
				_operation: input.parse()?,
				name: input.parse()?,
				_colon: input.parse()?,
				verb: input.parse()?,
				path: input.parse()?,
				params: if input.peek(syn::token::Paren) {
					Some(input.parse()?)
				} else {
					None
				},
				output: input.parse()?,
			})
		}
	}

	impl syn::parse::Parse for ParamList {
		fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
			let params;
			Ok(Self {
				_paren_token: syn::parenthesized!(params in input),
				params: params.call(syn::punctuated::Punctuated::parse_terminated)?,
			})
		}
	}

	impl syn::parse::Parse for ParamDefinition {
		fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
			Ok(Self {
				location: input.parse()?,
				name: input.parse()?,
				_colon: input.parse()?,
				ty: input.parse()?,
			})
		}
	}

	impl syn::parse::Parse for ParamLocation {
		fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
			if input.peek(keyword::path) {
				input.parse::<keyword::path>()?;
				Ok(Self::Path)
			} else if input.peek(keyword::query) {
				input.parse::<keyword::query>()?;
				Ok(Self::Query)
			} else if input.peek(keyword::body) {
				input.parse::<keyword::body>()?;
				Ok(Self::Body)
			} else {
				Err(input.error("expected `path', `query' or `body'"))
			}
		}
	}
}
