use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, PatType, Type};

fn is_f64(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == "f64")
            .unwrap_or(false),
        _ => false,
    }
}

fn expand(input: ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let attrs = &input.attrs;
    let vis = &input.vis;
    let fn_name = &input.sig.ident;
    let fn_output = &input.sig.output;
    let fn_body = &input.block;

    let mut arg_bindings = Vec::new();

    for (i, arg) in input.sig.inputs.iter().enumerate() {
        let FnArg::Typed(PatType { pat, ty, .. }) = arg else {
            return Err(syn::Error::new_spanned(
                arg,
                "capability functions cannot take `self`",
            ));
        };

        if !matches!(**pat, syn::Pat::Ident(_)) {
            return Err(syn::Error::new_spanned(
                pat,
                "capability arguments must be plain identifiers",
            ));
        }

        if !is_f64(ty) {
            return Err(syn::Error::new_spanned(
                ty,
                format!("argument {} of {} must be f64", i, fn_name),
            ));
        }

        arg_bindings.push(quote! {
            let #pat: f64 = args[#i];
        });
    }

    let args_len = arg_bindings.len();

    Ok(quote! {
        #(#attrs)*
        #vis fn #fn_name(args: &[f64]) #fn_output {
            if args.len() != #args_len {
                return Err(CapabilityError::Arity {
                    expected: #args_len.to_string(),
                    got: args.len(),
                });
            }

            #(#arg_bindings)*

            #fn_body
        }
    })
}

/// Turns `fn f(a: f64, b: f64) -> Result<f64, CapabilityError>` into a
/// slice-taking function with an arity check, ready to be registered in a
/// function table. `CapabilityError` must be in scope at the call site.
#[proc_macro_attribute]
pub fn capability(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
