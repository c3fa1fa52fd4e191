//! Procedural macros shared by the tilestitch crates.
//!
//! The only macro is [`macro@context`], which wraps the body of a function returning
//! `anyhow::Result` so that every error leaving the function carries a formatted message:
//!
//! ```ignore
//! #[context("resolving center for zoom {zoom}")]
//! fn resolve(zoom: u8) -> anyhow::Result<PixelPoint> { ... }
//! ```
//!
//! The message is a `format!` string evaluated only on the error path. Async functions are
//! supported; prefix the message with `move,` to move captured arguments into the wrapped
//! async block.

use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::{ToTokens, quote};
use syn::{
	ItemFn, ReturnType, Token,
	parse::{Parse, ParseStream},
	parse_macro_input,
};

/// Parsed arguments of `#[context(...)]`: an optional leading `move,` followed by `format!` arguments.
struct ContextArgs {
	move_token: Option<Token![move]>,
	message: TokenStream2,
}

impl Parse for ContextArgs {
	fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
		let mut move_token = None;
		if input.peek(Token![move]) {
			move_token = Some(input.parse::<Token![move]>()?);
			input.parse::<Token![,]>()?;
		}
		Ok(ContextArgs {
			move_token,
			message: input.parse()?,
		})
	}
}

/// Attach a formatted context message to every error returned by the annotated function.
#[proc_macro_attribute]
pub fn context(args: TokenStream, input: TokenStream) -> TokenStream {
	let ContextArgs { move_token, message } = parse_macro_input!(args as ContextArgs);
	let mut function = parse_macro_input!(input as ItemFn);

	let body = &function.block;
	let output = &function.sig.output;
	let error = Ident::new("error", Span::mixed_site());

	let wrapped = if function.sig.asyncness.is_some() {
		let ReturnType::Type(_, result_type) = output else {
			return syn::Error::new_spanned(&function.sig, "#[context] requires a function returning Result")
				.to_compile_error()
				.into();
		};
		let result = Ident::new("result", Span::mixed_site());
		quote! {
			let #result: #result_type = async #move_token { #body }.await;
			#result.map_err(|#error| #error.context(format!(#message)).into())
		}
	} else {
		// A dropped non-Copy value forces the closure to be FnOnce.
		let once = Ident::new("once", Span::mixed_site());
		quote! {
			let #once = ::core::iter::empty::<()>();
			(#move_token || #output {
				::core::mem::drop(#once);
				#body
			})().map_err(|#error| #error.context(format!(#message)).into())
		}
	};

	function.block.stmts = vec![syn::Stmt::Expr(syn::Expr::Verbatim(wrapped), None)];
	function.into_token_stream().into()
}
