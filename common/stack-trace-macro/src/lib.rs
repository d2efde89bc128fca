//! Proc-macro companion to `talon-error`.
//!
//! `#[stack_trace_debug]` is applied to a `#[derive(Snafu)]` error enum in
//! place of `#[derive(Debug)]`. It generates a `Debug` impl that prints the
//! full `source()` chain (one `caused by:` line per level) instead of the
//! default one-line variant dump, so `{:?}`-logged errors read like a
//! stack trace without pulling in a backtrace crate.

use proc_macro::TokenStream;
use quote::quote;
use syn::DeriveInput;
use syn::parse_macro_input;

#[proc_macro_attribute]
pub fn stack_trace_debug(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        #input

        impl #impl_generics ::std::fmt::Debug for #ident #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{self}")?;
                let mut source = ::std::error::Error::source(self);
                let mut depth = 0usize;
                while let Some(err) = source {
                    write!(f, "\ncaused by [{depth}]: {err}")?;
                    source = ::std::error::Error::source(err);
                    depth += 1;
                }
                Ok(())
            }
        }
    };

    expanded.into()
}
