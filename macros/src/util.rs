use proc_macro2::{Span, TokenStream};
use quote::ToTokens;

/// A span and a value.
///
/// Mainly used to keep spans around for generating errors later on.
#[derive(Debug, Clone)]
pub struct WithSpan<T> {
	pub span: Span,
	pub value: T,
}

impl<T> WithSpan<T> {
	/// Create a new `WithSpan` from a [`Span`] and a value.
	pub fn new(span: Span, value: T) -> Self {
		Self { span, value }
	}
}

impl<T: ToTokens> ToTokens for WithSpan<T> {
	fn to_tokens(&self, tokens: &mut TokenStream) {
		let value = &self.value;
		quote::quote_spanned!(self.span => #value).to_tokens(tokens);
	}
}

/// Parse the string value of a doc attribute.
pub fn parse_doc_attr_contents(attribute: &syn::Attribute) -> syn::Result<WithSpan<String>> {
	let meta = attribute.meta.require_name_value()?;
	let doc = match &meta.value {
		syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(value), .. }) => value,
		_ => return Err(syn::Error::new_spanned(&meta.value, "expected a string literal")),
	};

	Ok(WithSpan::new(doc.span(), doc.value()))
}

/// Get the placeholder names of a path template.
///
/// Malformed braces are skipped here: the template is fully validated when the contract is bound.
pub fn path_placeholders(template: &str) -> Vec<&str> {
	let mut placeholders = Vec::new();
	let mut rest = template;
	while let Some(start) = rest.find('{') {
		rest = &rest[start + 1..];
		match rest.find(['{', '}']) {
			Some(end) if rest.as_bytes()[end] == b'}' => {
				placeholders.push(&rest[..end]);
				rest = &rest[end + 1..];
			},
			Some(end) => rest = &rest[end..],
			None => break,
		}
	}
	placeholders
}
