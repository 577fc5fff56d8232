use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

enum FmtMode {
    Display,
    Len,
    Path,
}

impl FmtMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "display" => Some(Self::Display),
            "len" => Some(Self::Len),
            "path" => Some(Self::Path),
            _ => None,
        }
    }
}

pub fn derive_kv_display_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let struct_ident = input.ident.clone();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new(input.span(), "KvDisplay can only be derived for structs")
            .to_compile_error()
            .into();
    };
    let Fields::Named(fields) = &data_struct.fields else {
        return syn::Error::new(input.span(), "KvDisplay requires named fields")
            .to_compile_error()
            .into();
    };

    let mut entries = Vec::new();
    for field in &fields.named {
        let Some(field_ident) = &field.ident else {
            continue;
        };

        let mut mode = FmtMode::Display;
        for attr in &field.attrs {
            if !attr.path().is_ident("kv") {
                continue;
            }
            let parse_result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("fmt") {
                    let lit: LitStr = meta.value()?.parse()?;
                    mode = FmtMode::parse(&lit.value())
                        .ok_or_else(|| meta.error("expected fmt = \"display\"/\"len\"/\"path\""))?;
                    return Ok(());
                }
                Err(meta.error("unsupported kv attribute; expected fmt"))
            });
            if let Err(err) = parse_result {
                return err.to_compile_error().into();
            }
        }

        let value = match mode {
            FmtMode::Display => quote! { &self.#field_ident },
            FmtMode::Len => quote! { &self.#field_ident.len() },
            FmtMode::Path => quote! { &self.#field_ident.display() },
        };
        entries.push((field_ident.to_string(), value));
    }

    let width = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let lines: Vec<String> = entries
        .iter()
        .map(|(key, _)| format!("\t{key:width$} = {{}}"))
        .collect();
    let format_lit = LitStr::new(&format!("\n{}", lines.join("\n")), Span::call_site());
    let values = entries.iter().map(|(_, value)| value);

    let expanded = quote! {
        impl std::fmt::Display for #struct_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, #format_lit, #(#values),*)
            }
        }
    };

    TokenStream::from(expanded)
}
