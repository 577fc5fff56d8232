use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, LitStr, parse_macro_input};

pub fn timer_inner(attr: TokenStream, item: TokenStream) -> TokenStream {
    let label = parse_macro_input!(attr as LitStr);
    let mut func = parse_macro_input!(item as ItemFn);

    if func.sig.asyncness.is_some() {
        return syn::Error::new_spanned(&func.sig, "timer does not support async functions")
            .to_compile_error()
            .into();
    }

    let block = func.block;
    // The closure keeps early `return`s inside the timed region.
    func.block = Box::new(syn::parse_quote!({
        let __timer_started = std::time::Instant::now();
        let __timer_output = (move || #block)();
        log::info!(
            "{}: elapsed_s={:.2}",
            #label,
            __timer_started.elapsed().as_secs_f32()
        );
        __timer_output
    }));

    quote!(#func).into()
}
